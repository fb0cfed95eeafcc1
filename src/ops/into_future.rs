//! Bridges from an observable back to a single awaited value.
//!
//! | function                  | resolves with               | empty source           |
//! |---------------------------|-----------------------------|------------------------|
//! | [`first_value_from`]      | the first value             | `Err(EmptyError)`      |
//! | [`first_value_from_or`]   | the first value             | `Ok(default)`          |
//! | [`last_value_from`]       | the last value              | `Err(EmptyError)`      |
//! | [`last_value_from_or`]    | the last value              | `Ok(default)`          |
//!
//! An error from the source always rejects the future with that error, even
//! when a default was supplied or values were already seen.
//!
//! The source is subscribed eagerly, when the function is called, so fully
//! synchronous sources are already settled before the first poll. Dropping
//! the [`ValueFuture`] unsubscribes from the source.
//!
//! ```
//! use rxlite::prelude::*;
//!
//! let first = futures::executor::block_on(first_value_from(observable::of([1, 2, 3])));
//! assert_eq!(first, Ok(1));
//!
//! let last = futures::executor::block_on(last_value_from_or(observable::empty(), 42));
//! assert_eq!(last, Ok(42));
//! ```

use std::{
  cell::RefCell,
  future::Future,
  pin::Pin,
  rc::Rc,
  task::{Context, Poll, Waker},
};

use crate::{
  error::{EmptyError, RxError},
  observable::Observable,
  observer::Observer,
  subscription::SubscriptionGuard,
};

/// Shared state between the future and the observer feeding it.
struct SharedState<Item> {
  result: Option<Result<Item, RxError>>,
  waker: Option<Waker>,
}

/// A future resolving with a value taken from an observable.
#[must_use = "futures do nothing unless polled; dropping it unsubscribes the source"]
pub struct ValueFuture<Item> {
  shared: Rc<RefCell<SharedState<Item>>>,
  _guard: SubscriptionGuard,
}

impl<Item> Future for ValueFuture<Item> {
  type Output = Result<Item, RxError>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut shared = self.shared.borrow_mut();
    match shared.result.take() {
      Some(result) => Poll::Ready(result),
      None => {
        shared.waker = Some(cx.waker().clone());
        Poll::Pending
      }
    }
  }
}

/// Keeps the latest value and settles the shared state on termination.
struct ValueObserver<Item> {
  shared: Rc<RefCell<SharedState<Item>>>,
  latest: Option<Item>,
  default: Option<Item>,
}

impl<Item> ValueObserver<Item> {
  fn settle(&mut self, result: Result<Item, RxError>) {
    let waker = {
      let mut shared = self.shared.borrow_mut();
      shared.result = Some(result);
      shared.waker.take()
    };
    if let Some(waker) = waker {
      waker.wake();
    }
  }
}

impl<Item> Observer<Item> for ValueObserver<Item> {
  fn next(&mut self, value: Item) { self.latest = Some(value); }

  fn error(&mut self, err: RxError) { self.settle(Err(err)) }

  fn complete(&mut self) {
    let result = self
      .latest
      .take()
      .or_else(|| self.default.take())
      .ok_or_else(|| EmptyError.into());
    self.settle(result);
  }
}

fn value_from<Item: 'static>(source: Observable<Item>, default: Option<Item>) -> ValueFuture<Item> {
  let shared = Rc::new(RefCell::new(SharedState { result: None, waker: None }));
  let observer = ValueObserver { shared: shared.clone(), latest: None, default };
  let guard = source.subscribe_with(observer).unsubscribe_when_dropped();
  ValueFuture { shared, _guard: guard }
}

/// Resolves with the first value emitted by `source`, then unsubscribes it.
/// Rejects with [`EmptyError`] if `source` completes without emitting.
pub fn first_value_from<Item: 'static>(source: Observable<Item>) -> ValueFuture<Item> {
  value_from(source.take(1), None)
}

/// Like [`first_value_from`], resolving with `default` for an empty source.
pub fn first_value_from_or<Item: 'static>(
  source: Observable<Item>,
  default: Item,
) -> ValueFuture<Item> {
  value_from(source.take(1), Some(default))
}

/// Resolves with the last value emitted by `source` once it completes.
/// Rejects with [`EmptyError`] if `source` completes without emitting.
pub fn last_value_from<Item: 'static>(source: Observable<Item>) -> ValueFuture<Item> {
  value_from(source, None)
}

/// Like [`last_value_from`], resolving with `default` for an empty source.
pub fn last_value_from_or<Item: 'static>(
  source: Observable<Item>,
  default: Item,
) -> ValueFuture<Item> {
  value_from(source, Some(default))
}

#[cfg(test)]
mod test {
  use std::{cell::Cell, future::Future, rc::Rc};

  use futures::executor::block_on;

  use crate::prelude::*;

  #[test]
  fn first_value() {
    assert_eq!(block_on(first_value_from(observable::of([1, 2, 3]))), Ok(1));
  }

  #[test]
  fn first_value_unsubscribes_infinite_source() {
    assert_eq!(block_on(first_value_from(observable::from_iter(7..))), Ok(7));
  }

  #[test]
  fn first_value_of_empty() {
    let result = block_on(first_value_from(observable::empty::<i32>()));
    assert!(result.is_err_and(|e| e.is_empty()));
    assert_eq!(block_on(first_value_from_or(observable::empty(), 5)), Ok(5));
  }

  #[test]
  fn last_value() {
    assert_eq!(block_on(last_value_from(observable::of([1, 2, 3]))), Ok(3));
    assert_eq!(block_on(last_value_from_or(observable::of([1, 2, 3]), 0)), Ok(3));
  }

  #[test]
  fn last_value_of_empty() {
    let result = block_on(last_value_from(observable::empty::<i32>()));
    assert_eq!(result, Err(RxError::from(EmptyError)));
    assert_eq!(block_on(last_value_from_or(observable::empty(), 42)), Ok(42));
  }

  #[test]
  fn error_wins_over_default() {
    let subject = Subject::<i32>::default();
    let future = last_value_from_or(subject.as_observable(), 42);
    subject.next(1);
    subject.next(2);
    subject.next(3);
    subject.error(RxError::msg("broken"));
    assert_eq!(block_on(future), Err(RxError::msg("broken")));
  }

  #[test]
  fn async_source() {
    let scheduler = TestScheduler::default();
    let source = observable::timer(Duration::from_millis(10), None, scheduler.clone());
    let mut future = Box::pin(last_value_from(source));
    let waker = futures::task::noop_waker();
    let mut cx = std::task::Context::from_waker(&waker);
    assert!(future.as_mut().poll(&mut cx).is_pending());
    scheduler.advance_by(Duration::from_millis(10));
    assert_eq!(future.as_mut().poll(&mut cx), std::task::Poll::Ready(Ok(0)));
  }

  #[test]
  fn dropping_future_unsubscribes() {
    let closed = Rc::new(Cell::new(false));
    let c_closed = closed.clone();
    let future = last_value_from(observable::never::<i32>().finalize(move || c_closed.set(true)));
    assert!(!closed.get());
    drop(future);
    assert!(closed.get());
  }
}
