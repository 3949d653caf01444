use std::{fmt, time::Duration};

use super::{
  accessory::Accessory,
  remote::Relay,
  schedule::{ScheduledTransit, Scheduler, TimerEvent, TimerId, TransitPhase},
  state::{CurrentState, TargetState},
};

/// How long the door is assumed to take to fully open or close when not configured
pub const DEFAULT_TRANSIT_DELAY: Duration = Duration::from_millis(10_000);
/// How long to wait for a reversing door to slow down before pressing the remote again
pub const REVERSAL_PAUSE: Duration = Duration::from_millis(2_000);
/// How long the remote's button is held down for
pub const PULSE_DURATION: Duration = Duration::from_millis(1_000);

/// Tracks where a door operated by a single toggle button is, without being able to see it.
///
/// Every press of the remote is a pulse of the relay. Travel is assumed to take `transit_delay`,
/// and at most one transit timer is pending at any time.
pub struct DoorController<R, S, A> {
  name: String,
  current_state: CurrentState,
  transit_delay: Duration,
  pending: Option<ScheduledTransit>,
  relay: R,
  scheduler: S,
  accessory: A,
}

impl<R, S, A> fmt::Display for DoorController<R, S, A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "DoorController ({})", self.name)
  }
}

impl<R, S, A> fmt::Debug for DoorController<R, S, A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DoorController")
      .field("name", &self.name)
      .field("current_state", &self.current_state)
      .field("transit_delay", &self.transit_delay)
      .field("pending", &self.pending)
      .finish()
  }
}

impl<R: Relay, S: Scheduler, A: Accessory> DoorController<R, S, A> {
  pub fn new(
    name: String,
    initial_state: CurrentState,
    transit_delay: Duration,
    relay: R,
    scheduler: S,
    accessory: A,
  ) -> DoorController<R, S, A> {
    let mut controller = DoorController {
      name,
      current_state: initial_state,
      transit_delay,
      pending: None,
      relay,
      scheduler,
      accessory,
    };
    controller.set_current_state(initial_state);
    controller
  }

  pub fn current_state(&self) -> CurrentState {
    self.current_state
  }

  pub fn transit_delay(&self) -> Duration {
    self.transit_delay
  }

  /// The transit timer currently armed, if any
  pub fn pending_transit(&self) -> Option<&ScheduledTransit> {
    self.pending.as_ref()
  }

  /// Asked to move to `target_state`. Returns the state after handling the request.
  pub fn request_move(&mut self, target_state: TargetState) -> CurrentState {
    log::debug!(
      "{} ({}) trying to move to {}",
      &self,
      self.current_state,
      target_state
    );

    match (self.current_state, target_state) {
      (CurrentState::Open, TargetState::Closed) | (CurrentState::Closed, TargetState::Open) => {
        self.pulse();
        self.set_current_state(target_state.travel_state());
        self.arm(self.transit_delay, TransitPhase::Travelling(target_state));
      }
      (CurrentState::Open, TargetState::Open) | (CurrentState::Closed, TargetState::Closed) => {
        // the remote is still pressed, we just don't expect anything to change
        self.pulse();
      }
      (CurrentState::Opening, TargetState::Closed) | (CurrentState::Closing, TargetState::Open) => {
        self.reverse(target_state);
      }
      (CurrentState::Opening, TargetState::Open) | (CurrentState::Closing, TargetState::Closed) => {
        log::debug!("{} already travelling to {}, ignoring", &self, target_state);
      }
      (CurrentState::Stopped, _) => {
        log::debug!("{} is stopped, ignoring", &self);
      }
    }

    self.current_state
  }

  /// Called by the host once a timer armed through the scheduler has elapsed
  pub fn on_timer(&mut self, id: TimerId, event: TimerEvent) {
    match event {
      TimerEvent::ReleaseRelay => self.relay.set_level(false),
      TimerEvent::Transit => {
        let transit = match self.pending {
          Some(transit) if transit.id == id => transit,
          _ => {
            log::debug!("{} ignoring stale timer {:?}", &self, id);
            return;
          }
        };
        self.pending = None;

        match transit.phase {
          TransitPhase::Reversing(target_state) => {
            // the door has stopped, press again to send it the other way
            self.pulse();
            self.arm(self.transit_delay, TransitPhase::Travelling(target_state));
          }
          TransitPhase::Travelling(target_state) => {
            log::debug!("{} transit to {} assumed complete", &self, target_state);
            self.set_current_state(target_state.into());
          }
        }
      }
    }
  }

  /// Cancel anything pending and let go of the remote
  pub fn shutdown(&mut self) {
    self.cancel_pending();
    self.relay.set_level(false);
  }

  /// Stop the door then press again once it has slowed down
  fn reverse(&mut self, target_state: TargetState) {
    log::debug!("{} reversing towards {}", &self, target_state);
    self.cancel_pending();
    self.set_current_state(target_state.travel_state());
    self.pulse();
    self.arm(REVERSAL_PAUSE, TransitPhase::Reversing(target_state));
  }

  /// Press the remote's button, releasing it after [`PULSE_DURATION`]
  fn pulse(&mut self) {
    self.relay.set_level(true);
    self.scheduler.after(PULSE_DURATION, TimerEvent::ReleaseRelay);
  }

  fn arm(&mut self, delay: Duration, phase: TransitPhase) {
    self.cancel_pending();
    let armed_at = self.scheduler.now();
    let id = self.scheduler.after(delay, TimerEvent::Transit);
    self.pending = Some(ScheduledTransit {
      id,
      armed_at,
      fire_at: armed_at + delay,
      phase,
    });
  }

  fn cancel_pending(&mut self) {
    if let Some(transit) = self.pending.take() {
      self.scheduler.cancel(transit.id);
    }
  }

  fn set_current_state(&mut self, current_state: CurrentState) {
    log::debug!("{} setting current state to {}", &self, current_state);
    self.current_state = current_state;
    self.accessory.update_current_state(current_state);
  }
}
