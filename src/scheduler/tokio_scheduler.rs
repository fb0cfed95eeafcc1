use futures::future::LocalBoxFuture;

use super::{Duration, Instant, Scheduler};
use crate::subscription::{Subscription, SubscriptionLike};

/// Runs tasks on the current tokio `LocalSet`.
///
/// Every `schedule`/`spawn` call must happen inside `LocalSet::run_until` (or
/// a task spawned on the set), the same requirement as
/// `tokio::task::spawn_local`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioLocalScheduler;

impl Scheduler for TokioLocalScheduler {
  fn now(&self) -> Instant { tokio::time::Instant::now().into_std() }

  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription {
    self.spawn(Box::pin(async move {
      tokio::time::sleep(delay).await;
      task();
    }))
  }

  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> Subscription {
    let handle = Subscription::default();
    let finished = handle.clone();
    let join = tokio::task::spawn_local(async move {
      future.await;
      finished.unsubscribe();
    });
    handle.add_fn(move || join.abort());
    handle
  }
}
