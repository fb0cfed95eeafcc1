//! The `Observable` type and the creation functions.
//!
//! An [`Observable`] is an immutable handle around a subscribe function. Every
//! call to `subscribe` runs that function anew with a fresh [`Subscriber`], so
//! executions never share per-subscription state unless an operator such as
//! [`share`](Observable::share) explicitly multiplexes them.

use std::rc::Rc;

use crate::{
  error::RxError,
  observer::{unhandled_error, Observer, ObserverAll},
  subscriber::Subscriber,
  subscription::Subscription,
};

mod combine;
mod defer;
mod from_future;
mod from_iter;
mod timer;
mod trivial;

pub use combine::*;
pub use defer::*;
pub use from_future::*;
pub use from_iter::*;
pub use timer::*;
pub use trivial::*;

type SubscribeFn<Item> = dyn Fn(Subscriber<Item>) -> Subscription;

/// A representation of any set of values over any amount of time. This is the
/// most basic building block of rxlite.
pub struct Observable<Item> {
  subscribe_fn: Rc<SubscribeFn<Item>>,
}

impl<Item> Clone for Observable<Item> {
  fn clone(&self) -> Self { Observable { subscribe_fn: self.subscribe_fn.clone() } }
}

impl<Item: 'static> Observable<Item> {
  /// param `subscribe`: the function that is called when the Observable is
  /// subscribed to. It is given a [`Subscriber`], to which new values can be
  /// `next`ed, or an `error` method can be called to raise an error, or
  /// `complete` can be called to notify of a successful completion. The
  /// returned [`Subscription`] is the teardown of this execution: it is
  /// unsubscribed exactly once, either when the consumer unsubscribes or
  /// right after the execution terminates.
  pub fn new<F>(subscribe: F) -> Self
  where
    F: Fn(Subscriber<Item>) -> Subscription + 'static,
  {
    Observable { subscribe_fn: Rc::new(subscribe) }
  }

  /// Like [`Observable::new`], but the subscribe function may fail while
  /// setting up. The failure is delivered on the error channel instead of
  /// being returned to the caller of `subscribe`.
  pub fn try_new<F>(subscribe: F) -> Self
  where
    F: Fn(Subscriber<Item>) -> Result<Subscription, RxError> + 'static,
  {
    Observable::new(move |subscriber: Subscriber<Item>| match subscribe(subscriber.clone()) {
      Ok(teardown) => teardown,
      Err(err) => {
        subscriber.error(err);
        Subscription::closed()
      }
    })
  }

  /// Runs the subscribe function with an already normalised subscriber and
  /// returns the subscriber's subscription, which now owns the teardown.
  pub fn actual_subscribe(&self, subscriber: Subscriber<Item>) -> Subscription {
    let subscription = subscriber.subscription().clone();
    let teardown = (self.subscribe_fn)(subscriber);
    subscription.add(teardown);
    subscription
  }

  /// Subscribes `observer` as a dependant of `parent`: closing `parent`
  /// closes this execution as well, even while it is still emitting
  /// synchronously.
  pub(crate) fn subscribe_child<O>(&self, observer: O, parent: &Subscription) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    self.actual_subscribe(Subscriber::with_subscription(observer, parent.child()))
  }

  /// Subscribes with a `next` handler only. Errors are reported through
  /// `tracing` and otherwise dropped.
  pub fn subscribe<N>(&self, next: N) -> Subscription
  where
    N: FnMut(Item) + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, unhandled_error, || {}))
  }

  pub fn subscribe_err<N, E>(&self, next: N, error: E) -> Subscription
  where
    N: FnMut(Item) + 'static,
    E: FnMut(RxError) + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, error, || {}))
  }

  pub fn subscribe_complete<N, C>(&self, next: N, complete: C) -> Subscription
  where
    N: FnMut(Item) + 'static,
    C: FnMut() + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, unhandled_error, complete))
  }

  pub fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Item) + 'static,
    E: FnMut(RxError) + 'static,
    C: FnMut() + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  /// Subscribes a full [`Observer`].
  pub fn subscribe_with<O>(&self, observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    self.actual_subscribe(Subscriber::new(observer))
  }

  /// Applies an operator written as a plain function.
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// fn doubled(source: Observable<i32>) -> Observable<i32> { source.map(|v| v * 2) }
  ///
  /// let mut out = vec![];
  /// observable::of([1, 2]).pipe(doubled).subscribe(move |v| out.push(v));
  /// ```
  #[inline]
  pub fn pipe<R, Op>(self, operator: Op) -> Observable<R>
  where
    Op: FnOnce(Observable<Item>) -> Observable<R>,
  {
    operator(self)
  }

  /// True when both handles run the same subscribe function.
  #[inline]
  pub fn ptr_eq(&self, other: &Observable<Item>) -> bool {
    Rc::ptr_eq(&self.subscribe_fn, &other.subscribe_fn)
  }
}

/// Composes operators left to right. `pipe!(source)` is `source` itself.
///
/// ```
/// use rxlite::{pipe, prelude::*};
///
/// let source = observable::of([1, 2, 3]);
/// let same = pipe!(source.clone());
/// assert!(same.ptr_eq(&source));
///
/// let piped = pipe!(
///   source,
///   |o: Observable<i32>| o.map(|v| v + 1),
///   |o: Observable<i32>| o.take(2)
/// );
/// ```
#[macro_export]
macro_rules! pipe {
  ($source:expr $(,)?) => { $source };
  ($source:expr, $($op:expr),+ $(,)?) => {{
    let source = $source;
    $(let source = source.pipe($op);)+
    source
  }};
}

#[cfg(test)]
mod test {
  use std::cell::{Cell, RefCell};

  use super::*;
  use crate::subscription::SubscriptionLike;

  #[test]
  fn proxy_call() {
    let next = Rc::new(Cell::new(0));
    let err = Rc::new(Cell::new(0));
    let complete = Rc::new(Cell::new(0));

    let (c_next, c_err, c_complete) = (next.clone(), err.clone(), complete.clone());
    Observable::new(|subscriber| {
      subscriber.next(1);
      subscriber.next(2);
      subscriber.next(3);
      subscriber.complete();
      subscriber.next(3);
      subscriber.error("never dispatch error".into());
      Subscription::default()
    })
    .subscribe_all(
      move |_: i32| c_next.set(c_next.get() + 1),
      move |_| c_err.set(c_err.get() + 1),
      move || c_complete.set(c_complete.get() + 1),
    );

    assert_eq!(next.get(), 3);
    assert_eq!(complete.get(), 1);
    assert_eq!(err.get(), 0);
  }

  #[test]
  fn each_subscription_is_independent() {
    let runs = Rc::new(Cell::new(0));
    let c_runs = runs.clone();
    let o = Observable::new(move |subscriber| {
      let mut local = 0;
      c_runs.set(c_runs.get() + 1);
      for _ in 0..3 {
        local += 1;
        subscriber.next(local);
      }
      subscriber.complete();
      Subscription::default()
    });
    let sum1 = Rc::new(Cell::new(0));
    let sum2 = Rc::new(Cell::new(0));
    let (s1, s2) = (sum1.clone(), sum2.clone());
    o.subscribe(move |v| s1.set(s1.get() + v));
    o.subscribe(move |v| s2.set(s2.get() + v));

    assert_eq!(runs.get(), 2);
    assert_eq!(sum1.get(), 6);
    assert_eq!(sum2.get(), 6);
  }

  #[test]
  fn teardown_runs_after_complete() {
    let teardowns = Rc::new(Cell::new(0));
    let c_teardowns = teardowns.clone();
    let subscription = Observable::new(move |subscriber: Subscriber<i32>| {
      subscriber.complete();
      let c_teardowns = c_teardowns.clone();
      Subscription::new(move || c_teardowns.set(c_teardowns.get() + 1))
    })
    .subscribe(|_| {});

    assert_eq!(teardowns.get(), 1);
    subscription.unsubscribe();
    assert_eq!(teardowns.get(), 1);
  }

  #[test]
  fn teardown_runs_once_on_unsubscribe() {
    let teardowns = Rc::new(Cell::new(0));
    let c_teardowns = teardowns.clone();
    let subscription = Observable::new(move |_: Subscriber<i32>| {
      let c_teardowns = c_teardowns.clone();
      Subscription::new(move || c_teardowns.set(c_teardowns.get() + 1))
    })
    .subscribe(|_| {});

    assert_eq!(teardowns.get(), 0);
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(teardowns.get(), 1);
  }

  #[test]
  fn failing_setup_is_delivered_as_error() {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let c_errors = errors.clone();
    Observable::<i32>::try_new(|_| Err(RxError::msg("setup failed")))
      .subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));

    assert_eq!(*errors.borrow(), vec![RxError::msg("setup failed")]);
  }

  #[test]
  fn unhandled_error_does_not_panic() {
    let subscription = throw_error::<i32>("nobody listens".into()).subscribe(|_| {});
    assert!(subscription.is_closed());
  }

  #[test]
  fn pipe_identity_and_composition() {
    let source = of([1, 2, 3]);
    let same = crate::pipe!(source.clone());
    assert!(same.ptr_eq(&source));

    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    crate::pipe!(source, |o: Observable<i32>| o.map(|v| v * 10), |o: Observable<i32>| o.skip(1))
      .subscribe(move |v| c_out.borrow_mut().push(v));
    assert_eq!(*out.borrow(), vec![20, 30]);
  }
}
