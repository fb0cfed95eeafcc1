//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use crate::error::RxError;

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable. Implementations never have to guard against calls after a
/// terminal notification: the [`Subscriber`](crate::subscriber::Subscriber)
/// wrapping them latches the terminal state.
pub trait Observer<Item> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable. No more notifications follow.
  fn error(&mut self, err: RxError);

  /// Handle completion of the observable. No more notifications follow.
  fn complete(&mut self);
}

pub type BoxedObserver<Item> = Box<dyn Observer<Item>>;

impl<Item, O> Observer<Item> for Box<O>
where
  O: Observer<Item> + ?Sized,
{
  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: RxError) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }
}

/// Observer built from three closures.
///
/// This is the canonical shape every `subscribe*` flavour is normalised into.
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  #[inline]
  pub fn new(next: N, error: E, complete: C) -> Self { ObserverAll { next, error, complete } }
}

impl<Item, N, E, C> Observer<Item> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnMut(RxError),
  C: FnMut(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(&mut self, err: RxError) { (self.error)(err) }

  #[inline]
  fn complete(&mut self) { (self.complete)() }
}

/// Error handler used when a subscriber supplies none.
///
/// Unhandled errors are reported through `tracing` and otherwise dropped, so
/// a failing stream never takes the process down.
pub(crate) fn unhandled_error(err: RxError) {
  tracing::error!(error = %err, "observable errored without an error handler");
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  #[test]
  fn observer_all_dispatches() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    let mut observer = ObserverAll::new(
      move |v: i32| l1.borrow_mut().push(format!("next {v}")),
      move |e: RxError| l2.borrow_mut().push(format!("error {e}")),
      move || l3.borrow_mut().push("complete".to_string()),
    );
    observer.next(1);
    observer.error("boom".into());
    observer.complete();

    assert_eq!(*log.borrow(), vec!["next 1", "error boom", "complete"]);
  }

  #[test]
  fn boxed_observer() {
    let sum = Rc::new(RefCell::new(0));
    let c_sum = sum.clone();
    let mut boxed: BoxedObserver<i32> =
      Box::new(ObserverAll::new(move |v| *c_sum.borrow_mut() += v, |_| {}, || {}));
    boxed.next(2);
    boxed.next(3);
    assert_eq!(*sum.borrow(), 5);
  }
}
