//! A virtual clock, relay and accessory to drive a [`DoorController`] through time deterministically

use std::{
  cell::RefCell,
  rc::Rc,
  time::{Duration, Instant},
};

use super::{
  accessory::Accessory,
  controller::DoorController,
  remote::Relay,
  schedule::{Scheduler, TimerEvent, TimerId},
  state::CurrentState,
};

pub type BenchController = DoorController<BenchRelay, BenchScheduler, BenchAccessory>;

struct BenchState {
  start: Instant,
  /// Time since the bench was created
  now: Duration,
  next_id: u64,
  queue: Vec<(TimerId, Duration, TimerEvent)>,
  relay_levels: Vec<(Duration, bool)>,
  states: Vec<(Duration, CurrentState)>,
}

#[derive(Clone)]
pub struct Bench(Rc<RefCell<BenchState>>);

impl Bench {
  pub fn new() -> Bench {
    Bench(Rc::new(RefCell::new(BenchState {
      start: Instant::now(),
      now: Duration::ZERO,
      next_id: 0,
      queue: Vec::new(),
      relay_levels: Vec::new(),
      states: Vec::new(),
    })))
  }

  pub fn controller(&self, initial_state: CurrentState, transit_delay: Duration) -> BenchController {
    DoorController::new(
      "bench".to_owned(),
      initial_state,
      transit_delay,
      BenchRelay(self.clone()),
      BenchScheduler(self.clone()),
      BenchAccessory(self.clone()),
    )
  }

  /// Move the clock forward, firing every timer that falls due in order
  pub fn advance(&self, controller: &mut BenchController, by: Duration) {
    let until = self.0.borrow().now + by;
    while let Some((id, event)) = self.pop_due(until) {
      controller.on_timer(id, event);
    }
    self.0.borrow_mut().now = until;
  }

  fn pop_due(&self, until: Duration) -> Option<(TimerId, TimerEvent)> {
    let mut state = self.0.borrow_mut();
    let due = state
      .queue
      .iter()
      .enumerate()
      .filter(|(_, (_, fire_at, _))| *fire_at <= until)
      .min_by_key(|(_, (id, fire_at, _))| (*fire_at, *id))
      .map(|(index, _)| index)?;

    let (id, fire_at, event) = state.queue.remove(due);
    state.now = fire_at;
    Some((id, event))
  }

  pub fn relay_levels(&self) -> Vec<(Duration, bool)> {
    self.0.borrow().relay_levels.clone()
  }

  /// Every state pushed to the accessory, including the initial one
  pub fn states(&self) -> Vec<(Duration, CurrentState)> {
    self.0.borrow().states.clone()
  }

  /// Transit timers still waiting to fire
  pub fn pending_transits(&self) -> usize {
    self
      .0
      .borrow()
      .queue
      .iter()
      .filter(|(_, _, event)| *event == TimerEvent::Transit)
      .count()
  }
}

pub struct BenchRelay(Bench);

impl Relay for BenchRelay {
  fn set_level(&mut self, active: bool) {
    let mut state = (self.0).0.borrow_mut();
    let now = state.now;
    state.relay_levels.push((now, active));
  }
}

pub struct BenchScheduler(Bench);

impl Scheduler for BenchScheduler {
  fn now(&self) -> Instant {
    let state = (self.0).0.borrow();
    state.start + state.now
  }

  fn after(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
    let mut state = (self.0).0.borrow_mut();
    let id = TimerId(state.next_id);
    state.next_id += 1;
    let fire_at = state.now + delay;
    state.queue.push((id, fire_at, event));
    id
  }

  fn cancel(&mut self, id: TimerId) {
    (self.0).0.borrow_mut().queue.retain(|(queued, _, _)| *queued != id);
  }
}

pub struct BenchAccessory(Bench);

impl Accessory for BenchAccessory {
  fn update_current_state(&mut self, current_state: CurrentState) {
    let mut state = (self.0).0.borrow_mut();
    let now = state.now;
    state.states.push((now, current_state));
  }
}
