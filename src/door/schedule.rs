use std::{
  collections::HashMap,
  time::{Duration, Instant},
};

use tokio::{
  sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
  task::JoinHandle,
};

use super::state::{CurrentState, TargetState};

/// Identifies a single scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// What should happen when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
  /// Let go of the remote button
  ReleaseRelay,
  /// The pending transit timer elapsed, see [`ScheduledTransit`]
  Transit,
}

/// Single shot, cancellable delayed callbacks.
///
/// Fired timers are handed back to the controller through [`DoorController::on_timer`](super::controller::DoorController::on_timer).
pub trait Scheduler {
  fn now(&self) -> Instant;

  fn after(&mut self, delay: Duration, event: TimerEvent) -> TimerId;

  /// Must be safe to call on a timer that has already fired or been cancelled
  fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitPhase {
  /// Waiting for the door to slow down before pressing the remote again
  Reversing(TargetState),
  /// The door is assumed to be moving towards the target
  Travelling(TargetState),
}

/// The one timer the controller cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTransit {
  pub id: TimerId,
  pub armed_at: Instant,
  pub fire_at: Instant,
  pub phase: TransitPhase,
}

impl ScheduledTransit {
  /// The state the door will be in once this timer fires
  pub fn resulting_state(&self) -> CurrentState {
    match self.phase {
      TransitPhase::Reversing(target) => target.travel_state(),
      TransitPhase::Travelling(target) => target.into(),
    }
  }
}

#[derive(Debug)]
pub struct FiredTimer {
  pub id: TimerId,
  pub event: TimerEvent,
}

/// Runs every timer as its own sleeping task, sending it back over a channel once elapsed
#[derive(Debug)]
pub struct TokioScheduler {
  next_id: u64,
  fired_tx: UnboundedSender<FiredTimer>,
  timers: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
  pub fn new() -> (TokioScheduler, UnboundedReceiver<FiredTimer>) {
    let (fired_tx, fired_rx) = mpsc::unbounded_channel();
    let scheduler = TokioScheduler {
      next_id: 0,
      fired_tx,
      timers: HashMap::new(),
    };
    (scheduler, fired_rx)
  }
}

impl Scheduler for TokioScheduler {
  fn now(&self) -> Instant {
    tokio::time::Instant::now().into_std()
  }

  fn after(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
    self.timers.retain(|_, task| !task.is_finished());

    let id = TimerId(self.next_id);
    self.next_id += 1;

    let fired_tx = self.fired_tx.clone();
    let task = tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      // the door has gone away, nobody left to tell
      let _ = fired_tx.send(FiredTimer { id, event });
    });
    self.timers.insert(id, task);
    id
  }

  fn cancel(&mut self, id: TimerId) {
    if let Some(task) = self.timers.remove(&id) {
      task.abort();
    }
  }
}

impl Drop for TokioScheduler {
  fn drop(&mut self) {
    for (_, task) in self.timers.drain() {
      task.abort();
    }
  }
}
