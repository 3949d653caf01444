use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{door::accessory::PublishReceiver, error::GarageResult};

pub struct StatePublisher {
  /// The channel state updates from every door are received on
  publish_rx: PublishReceiver,
}

impl StatePublisher {
  pub fn new(publish_rx: PublishReceiver) -> StatePublisher {
    StatePublisher { publish_rx }
  }

  /// Write each update as a line of JSON until every door has gone away
  pub async fn publish_states<W: AsyncWrite + Unpin>(&mut self, mut output: W) -> GarageResult<()> {
    while let Some(publish) = self.publish_rx.recv().await {
      let mut line = serde_json::to_vec(&publish)?;
      line.push(b'\n');
      output.write_all(&line).await?;
      output.flush().await?;
    }
    Ok(())
  }
}
