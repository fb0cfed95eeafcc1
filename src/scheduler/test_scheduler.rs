//! Test Scheduler for deterministic testing of time-based operators.
//!
//! Provides virtual time that only advances when explicitly instructed,
//! enabling deterministic testing of `delay`, `debounce_time`, `interval`,
//! `timeout`, etc.
//!
//! # Usage
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let scheduler = TestScheduler::default();
//! observable::of([42])
//!   .delay(Duration::from_millis(100), scheduler.clone())
//!   .subscribe(|v| println!("{v}"));
//!
//! // Advance virtual time to trigger delayed emission
//! scheduler.advance_by(Duration::from_millis(100));
//!
//! // Or execute all pending tasks
//! scheduler.flush();
//! ```
//!
//! Clones share one clock and one task queue. Spawned futures are driven by
//! an internal `LocalPool` every time virtual time moves.

use std::{
  cell::{Cell, RefCell},
  cmp::Ordering,
  collections::BinaryHeap,
  rc::Rc,
};

use futures::{
  executor::{LocalPool, LocalSpawner},
  future::{abortable, LocalBoxFuture},
  task::LocalSpawnExt,
};

use super::{Duration, Instant, Scheduler};
use crate::subscription::{Subscription, SubscriptionLike};

struct ScheduledTask {
  due: Duration,
  task_id: usize,
  task: Box<dyn FnOnce()>,
  handle: Subscription,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool { self.due == other.due && self.task_id == other.task_id }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other.due.cmp(&self.due).then_with(|| other.task_id.cmp(&self.task_id))
  }
}

struct State {
  origin: Instant,
  virtual_time: Cell<Duration>,
  next_task_id: Cell<usize>,
  task_queue: RefCell<BinaryHeap<ScheduledTask>>,
  pool: RefCell<LocalPool>,
  spawner: LocalSpawner,
}

/// A virtual time scheduler for deterministic testing.
#[derive(Clone)]
pub struct TestScheduler(Rc<State>);

impl Default for TestScheduler {
  fn default() -> Self {
    let pool = LocalPool::new();
    let spawner = pool.spawner();
    TestScheduler(Rc::new(State {
      origin: Instant::now(),
      virtual_time: Cell::new(Duration::ZERO),
      next_task_id: Cell::new(0),
      task_queue: RefCell::new(BinaryHeap::new()),
      pool: RefCell::new(pool),
      spawner,
    }))
  }
}

impl TestScheduler {
  /// Virtual time elapsed since the scheduler was created.
  pub fn elapsed(&self) -> Duration { self.0.virtual_time.get() }

  /// Number of scheduled tasks that are neither run nor cancelled.
  pub fn pending_count(&self) -> usize {
    self.0.task_queue.borrow().iter().filter(|t| !t.handle.is_closed()).count()
  }

  pub fn is_empty(&self) -> bool { self.pending_count() == 0 }

  /// Advance virtual time by `duration`, running every task that falls due,
  /// in order of due time and FIFO for equal due times.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.elapsed() + duration;
    self.run_until(Some(target));
    self.0.virtual_time.set(target);
    self.run_until_stalled();
  }

  /// Execute all pending tasks by advancing time to each task's due time.
  ///
  /// Never returns while a periodic task (e.g. an `interval`) is still
  /// subscribed.
  pub fn flush(&self) {
    self.run_until(None);
    self.run_until_stalled();
  }

  /// Polls spawned futures until none of them can make progress.
  ///
  /// Must not be called from inside a task run by this scheduler.
  pub fn run_until_stalled(&self) { self.0.pool.borrow_mut().run_until_stalled(); }

  fn run_until(&self, target: Option<Duration>) {
    loop {
      let task = {
        let mut queue = self.0.task_queue.borrow_mut();
        let should_stop =
          queue.peek().is_none_or(|peek| target.is_some_and(|limit| peek.due > limit));
        if should_stop {
          None
        } else {
          queue.pop()
        }
      };
      let Some(ScheduledTask { due, task, handle, .. }) = task else {
        break;
      };

      if handle.is_closed() {
        continue;
      }
      self.0.virtual_time.set(due);
      task();
      handle.unsubscribe();
      self.run_until_stalled();
    }
  }
}

impl Scheduler for TestScheduler {
  fn now(&self) -> Instant { self.0.origin + self.elapsed() }

  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription {
    let handle = Subscription::default();
    let task_id = self.0.next_task_id.get();
    self.0.next_task_id.set(task_id + 1);
    self.0.task_queue.borrow_mut().push(ScheduledTask {
      due: self.elapsed() + delay,
      task_id,
      task,
      handle: handle.clone(),
    });
    handle
  }

  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> Subscription {
    let (future, abort) = abortable(future);
    let handle = Subscription::new(move || abort.abort());
    let finished = handle.clone();
    let spawned = self.0.spawner.spawn_local(async move {
      let _ = future.await;
      finished.unsubscribe();
    });
    if let Err(err) = spawned {
      tracing::error!(error = %err, "test scheduler failed to spawn a future");
      handle.unsubscribe();
    }
    handle
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn advance_by_cumulative() {
    let scheduler = TestScheduler::default();
    let start = scheduler.now();
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(scheduler.elapsed(), Duration::from_millis(100));
    scheduler.advance_by(Duration::from_millis(50));
    assert_eq!(scheduler.now() - start, Duration::from_millis(150));
  }

  #[test]
  fn schedule_immediate_and_delayed() {
    let scheduler = TestScheduler::default();
    let results = Rc::new(RefCell::new(Vec::new()));

    let r = results.clone();
    scheduler.schedule(Duration::ZERO, Box::new(move || r.borrow_mut().push("immediate")));
    let r = results.clone();
    scheduler
      .schedule(Duration::from_millis(100), Box::new(move || r.borrow_mut().push("delayed")));

    assert_eq!(scheduler.pending_count(), 2);
    assert!(results.borrow().is_empty());

    scheduler.advance_by(Duration::ZERO);
    assert_eq!(*results.borrow(), vec!["immediate"]);

    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(*results.borrow(), vec!["immediate", "delayed"]);
    assert!(scheduler.is_empty());
  }

  #[test]
  fn task_cancellation() {
    let scheduler = TestScheduler::default();
    let executed = Rc::new(Cell::new(false));
    let e = executed.clone();
    let handle = scheduler.schedule(Duration::from_millis(100), Box::new(move || e.set(true)));

    handle.unsubscribe();
    scheduler.advance_by(Duration::from_millis(150));

    assert!(!executed.get());
  }

  #[test]
  fn handle_closes_after_run() {
    let scheduler = TestScheduler::default();
    let handle = scheduler.schedule(Duration::from_millis(1), Box::new(|| {}));
    assert!(!handle.is_closed());
    scheduler.flush();
    assert!(handle.is_closed());
  }

  #[test]
  fn fifo_ordering_same_time() {
    let scheduler = TestScheduler::default();
    let order = Rc::new(RefCell::new(Vec::new()));
    for i in 0..5 {
      let o = order.clone();
      scheduler.schedule(Duration::from_millis(10), Box::new(move || o.borrow_mut().push(i)));
    }
    scheduler.flush();
    assert_eq!(*order.borrow(), vec![0, 1, 2, 3, 4]);
  }

  #[test]
  fn tasks_see_their_due_time() {
    let scheduler = TestScheduler::default();
    let seen = Rc::new(Cell::new(Duration::ZERO));
    let (c_seen, c_scheduler) = (seen.clone(), scheduler.clone());
    scheduler.schedule(
      Duration::from_millis(30),
      Box::new(move || c_seen.set(c_scheduler.elapsed())),
    );
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(seen.get(), Duration::from_millis(30));
    assert_eq!(scheduler.elapsed(), Duration::from_millis(100));
  }

  #[test]
  fn spawned_future_runs_and_can_be_cancelled() {
    let scheduler = TestScheduler::default();
    let ran = Rc::new(Cell::new(0));

    let c_ran = ran.clone();
    let done = scheduler.spawn(Box::pin(async move { c_ran.set(c_ran.get() + 1) }));
    let c_ran = ran.clone();
    let cancelled = scheduler.spawn(Box::pin(async move { c_ran.set(c_ran.get() + 10) }));
    cancelled.unsubscribe();

    scheduler.run_until_stalled();
    assert_eq!(ran.get(), 1);
    assert!(done.is_closed());
  }
}
