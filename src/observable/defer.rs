use futures::Future;

use crate::{
  error::RxError,
  observable::{from_future::settle, Observable},
  scheduler::Scheduler,
  subscriber::Subscriber,
};

/// Creates an observable that will on subscription defer to another observable
/// that is supplied by a supplier-function which will be run once at each
/// subscription
///
/// ```rust
/// # use rxlite::prelude::*;
///
/// observable::defer(|| {
///   println!("Hi!");
///   observable::of(["Hello!"])
/// })
/// .subscribe(move |v| {
///   println!("{}", v);
/// });
/// // Prints: Hi!\nHello!\n
/// ```
pub fn defer<F, Item>(factory: F) -> Observable<Item>
where
  F: Fn() -> Observable<Item> + 'static,
  Item: 'static,
{
  Observable::new(move |subscriber| factory().actual_subscribe(subscriber))
}

/// Like [`defer`], but the factory may fail; the failure is delivered as an
/// error to that subscriber.
pub fn try_defer<F, Item>(factory: F) -> Observable<Item>
where
  F: Fn() -> Result<Observable<Item>, RxError> + 'static,
  Item: 'static,
{
  Observable::try_new(move |subscriber| Ok(factory()?.actual_subscribe(subscriber)))
}

/// Calls `factory` for every subscription and mirrors the future it returns:
/// `Ok` is emitted then the stream completes, `Err` becomes the error.
///
/// Unlike [`from_future`](crate::observable::from_future) nothing is shared:
/// every subscriber gets its own future.
pub fn defer_future<F, Fut, Item, S>(factory: F, scheduler: S) -> Observable<Item>
where
  F: Fn() -> Fut + 'static,
  Fut: Future<Output = Result<Item, RxError>> + 'static,
  Item: 'static,
  S: Scheduler,
{
  Observable::new(move |subscriber: Subscriber<Item>| settle(factory(), subscriber, &scheduler))
}
