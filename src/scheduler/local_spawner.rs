use futures::{
  executor::LocalSpawner,
  future::{abortable, LocalBoxFuture},
  task::LocalSpawnExt,
  FutureExt,
};

use super::{Duration, Instant, Scheduler};
use crate::subscription::{Subscription, SubscriptionLike};

/// Real time on a `futures` `LocalPool`: delayed tasks sleep with
/// `futures-time` and nothing runs until the pool is driven.
impl Scheduler for LocalSpawner {
  fn now(&self) -> Instant { Instant::now() }

  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription {
    let delayed = futures_time::task::sleep(delay.into()).map(move |_| task());
    Scheduler::spawn(self, delayed.boxed_local())
  }

  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> Subscription {
    let (future, abort) = abortable(future);
    let handle = Subscription::new(move || abort.abort());
    let finished = handle.clone();
    let spawned = self.spawn_local(async move {
      let _ = future.await;
      finished.unsubscribe();
    });
    if let Err(err) = spawned {
      tracing::error!(error = %err, "local spawner failed to spawn a future");
      handle.unsubscribe();
    }
    handle
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use futures::executor::LocalPool;

  use super::*;

  #[test]
  fn delayed_tasks_run_in_order() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let log = Rc::new(RefCell::new(vec![]));

    let c_log = log.clone();
    spawner.schedule(Duration::from_millis(20), Box::new(move || c_log.borrow_mut().push(2)));
    let c_log = log.clone();
    spawner.schedule(Duration::from_millis(1), Box::new(move || c_log.borrow_mut().push(1)));
    let c_log = log.clone();
    let cancelled =
      spawner.schedule(Duration::from_millis(5), Box::new(move || c_log.borrow_mut().push(3)));
    cancelled.unsubscribe();

    pool.run();
    assert_eq!(*log.borrow(), vec![1, 2]);
  }

  #[test]
  fn handle_closes_when_done() {
    let mut pool = LocalPool::new();
    let handle = pool.spawner().schedule(Duration::ZERO, Box::new(|| {}));
    assert!(!handle.is_closed());
    pool.run();
    assert!(handle.is_closed());
  }
}
