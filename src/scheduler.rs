//! Schedulers decide *when* delayed work runs.
//!
//! Every timed source and operator (`timer`, `interval`, `delay`,
//! `debounce_time`, `timeout`, `from_future`, ...) takes a scheduler value and
//! hands it the work it wants to run later. The [`Subscription`] returned by
//! [`Scheduler::schedule`] is the handle of that one piece of work: the
//! operator stores it in its own subscription, so unsubscribing cancels the
//! pending timer, and the handle closes by itself once the task has run.
//!
//! Available schedulers:
//! - [`TestScheduler`]: deterministic virtual time for tests.
//! - `futures::executor::LocalSpawner` (features `futures-scheduler` +
//!   `timer`): real time on a `futures` `LocalPool`.
//! - [`TokioLocalScheduler`] (feature `tokio-scheduler`): real time on a tokio
//!   `LocalSet`.

use std::{cell::RefCell, rc::Rc};

use futures::future::LocalBoxFuture;

pub use std::time::{Duration, Instant};

use crate::subscription::{Subscription, SubscriptionLike};

#[cfg(all(feature = "futures-scheduler", feature = "timer"))]
mod local_spawner;
mod test_scheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

pub use test_scheduler::TestScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioLocalScheduler;

/// A Scheduler orders tasks in time and runs them on the current thread.
pub trait Scheduler: Clone + 'static {
  /// The scheduler's notion of the current time.
  fn now(&self) -> Instant;

  /// Runs `task` once `delay` has elapsed. Even a zero delay never runs the
  /// task synchronously.
  ///
  /// The returned subscription cancels the task; it closes on its own after
  /// the task ran.
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription;

  /// Drives `future` to completion. Unsubscribing the returned subscription
  /// drops the future.
  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> Subscription;
}

/// Runs `task(0)` after `initial`, then `task(1)`, `task(2)`, ... every
/// `period`, until the returned subscription is unsubscribed.
pub fn schedule_repeating<S, F>(
  scheduler: &S,
  initial: Duration,
  period: Duration,
  task: F,
) -> Subscription
where
  S: Scheduler,
  F: FnMut(usize) + 'static,
{
  let handle = Subscription::default();
  let task: Rc<RefCell<dyn FnMut(usize)>> = Rc::new(RefCell::new(task));
  repeat(scheduler.clone(), initial, period, 0, task, handle.clone());
  handle
}

fn repeat<S: Scheduler>(
  scheduler: S, delay: Duration, period: Duration, seq: usize, task: Rc<RefCell<dyn FnMut(usize)>>,
  handle: Subscription,
) {
  let c_scheduler = scheduler.clone();
  let c_handle = handle.clone();
  let pending = scheduler.schedule(
    delay,
    Box::new(move || {
      if c_handle.is_closed() {
        return;
      }
      (&mut *task.borrow_mut())(seq);
      if !c_handle.is_closed() {
        repeat(c_scheduler, period, period, seq + 1, task, c_handle);
      }
    }),
  );
  handle.add(pending);
}

#[cfg(test)]
mod test {
  use std::cell::RefCell;

  use super::*;

  #[test]
  fn repeating_runs_until_unsubscribed() {
    let scheduler = TestScheduler::default();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let handle = schedule_repeating(
      &scheduler,
      Duration::from_millis(5),
      Duration::from_millis(10),
      move |seq| c_seen.borrow_mut().push(seq),
    );

    scheduler.advance_by(Duration::from_millis(4));
    assert!(seen.borrow().is_empty());
    scheduler.advance_by(Duration::from_millis(1));
    assert_eq!(*seen.borrow(), vec![0]);
    scheduler.advance_by(Duration::from_millis(20));
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);

    handle.unsubscribe();
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(scheduler.pending_count(), 0);
  }

  #[test]
  fn repeating_handle_does_not_grow() {
    let scheduler = TestScheduler::default();
    let handle = schedule_repeating(&scheduler, Duration::ZERO, Duration::from_millis(1), |_| {});
    scheduler.advance_by(Duration::from_millis(50));
    assert!(handle.teardown_size() <= 2);
    handle.unsubscribe();
  }
}
