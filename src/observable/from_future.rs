use futures::{Future, FutureExt};

use crate::{
  error::RxError, observable::Observable, scheduler::Scheduler, subscriber::Subscriber,
  subscription::Subscription,
};

/// Converts a `Future` to an observable sequence that emits the future's
/// output then completes.
///
/// The future is polled at most once to completion, like a promise, no matter
/// how many subscribers attach: every subscription spawns a task on
/// `scheduler` waiting for the shared result. A future that never resolves
/// gives an observable that never emits.
///
/// ```
/// use futures::future;
/// use rxlite::prelude::*;
///
/// let scheduler = TestScheduler::default();
/// observable::from_future(future::ready(1), scheduler.clone())
///   .subscribe(|v| println!("{v}"));
/// scheduler.run_until_stalled();
/// ```
///
/// If the future resolves to a `Result` whose `Err` should go to the error
/// channel, use [`from_future_result`].
pub fn from_future<F, S>(future: F, scheduler: S) -> Observable<F::Output>
where
  F: Future + 'static,
  F::Output: Clone + 'static,
  S: Scheduler,
{
  let shared = future.shared();
  Observable::new(move |subscriber| settle(shared.clone().map(Ok), subscriber, &scheduler))
}

/// Like [`from_future`], but `Ok` is emitted as a value and `Err` is
/// delivered as an error, the way a rejected promise is.
pub fn from_future_result<F, S, Item, E>(future: F, scheduler: S) -> Observable<Item>
where
  F: Future<Output = Result<Item, E>> + 'static,
  Item: Clone + 'static,
  E: Into<RxError>,
  S: Scheduler,
{
  let shared = future.map(|r| r.map_err(Into::into)).shared();
  Observable::new(move |subscriber| settle(shared.clone(), subscriber, &scheduler))
}

/// Spawns a task that forwards the outcome of `future` to `subscriber`. The
/// returned subscription drops the task.
pub(crate) fn settle<Item, Fut, S>(
  future: Fut,
  subscriber: Subscriber<Item>,
  scheduler: &S,
) -> Subscription
where
  Item: 'static,
  Fut: Future<Output = Result<Item, RxError>> + 'static,
  S: Scheduler,
{
  scheduler.spawn(Box::pin(async move {
    match future.await {
      Ok(value) => {
        subscriber.next(value);
        subscriber.complete();
      }
      Err(err) => subscriber.error(err),
    }
  }))
}
