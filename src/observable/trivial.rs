use crate::{error::RxError, observable::Observable, subscription::Subscription};

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw_error<Item: 'static>(err: RxError) -> Observable<Item> {
  Observable::new(move |subscriber| {
    subscriber.error(err.clone());
    Subscription::closed()
  })
}

/// Like [`throw_error`], but builds a fresh error for every subscription.
pub fn throw_error_with<Item, F>(factory: F) -> Observable<Item>
where
  Item: 'static,
  F: Fn() -> RxError + 'static,
{
  Observable::new(move |subscriber| {
    subscriber.error(factory());
    Subscription::closed()
  })
}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::empty().subscribe(|v: i32| println!("{},", v));
/// // Result: nothing printed
/// ```
pub fn empty<Item: 'static>() -> Observable<Item> {
  Observable::new(|subscriber| {
    subscriber.complete();
    Subscription::closed()
  })
}

/// Creates an observable that never emits anything.
///
/// Neither emits a value, nor completes, nor emits an error; the execution
/// stays open until it is unsubscribed.
pub fn never<Item: 'static>() -> Observable<Item> { Observable::new(|_| Subscription::default()) }
