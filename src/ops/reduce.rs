use std::rc::Rc;

use super::scan::Accumulate;
use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct ReduceObserver<Acc, S, F> {
  observer: Subscriber<Acc>,
  state: Accumulate<Acc, S, F>,
  default: Option<Acc>,
}

impl<Item, Acc, S, F> Observer<Item> for ReduceObserver<Acc, S, F>
where
  S: Fn(Item) -> Result<Acc, RxError>,
  F: Fn(Acc, Item) -> Result<Acc, RxError>,
{
  fn next(&mut self, value: Item) {
    if let Err(err) = self.state.fold(value) {
      self.observer.error(err);
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) {
    if let Some(acc) = self.state.take().or_else(|| self.default.take()) {
      self.observer.next(acc);
    }
    self.observer.complete();
  }
}

impl<Item: 'static> Observable<Item> {
  /// Like `scan`, but emits only the final accumulated value, when the source
  /// completes. An empty source completes without emitting.
  pub fn reduce<F>(self, f: F) -> Observable<Item>
  where
    F: Fn(Item, Item) -> Item + 'static,
  {
    self.try_reduce(move |acc, v| Ok(f(acc, v)))
  }

  pub fn try_reduce<F>(self, f: F) -> Observable<Item>
  where
    F: Fn(Item, Item) -> Result<Item, RxError> + 'static,
  {
    let (start, func) = (Rc::new(Ok::<Item, RxError>), Rc::new(f));
    self.lift(move |observer| ReduceObserver {
      observer,
      state: Accumulate::new(start.clone(), func.clone()),
      default: None,
    })
  }

  /// `reduce` starting from `seed`. An empty source emits the seed.
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// observable::of([1, 1, 1, 1, 1])
  ///   .reduce_initial(100, |acc, v| acc + v)
  ///   .subscribe(|v| assert_eq!(v, 105));
  /// ```
  pub fn reduce_initial<Acc, F>(self, seed: Acc, f: F) -> Observable<Acc>
  where
    Acc: Clone + 'static,
    F: Fn(Acc, Item) -> Acc + 'static,
  {
    self.try_reduce_initial(seed, move |acc, v| Ok(f(acc, v)))
  }

  pub fn try_reduce_initial<Acc, F>(self, seed: Acc, f: F) -> Observable<Acc>
  where
    Acc: Clone + 'static,
    F: Fn(Acc, Item) -> Result<Acc, RxError> + 'static,
  {
    let func = Rc::new(f);
    let c_func = func.clone();
    let c_seed = seed.clone();
    let start = Rc::new(move |v| c_func(c_seed.clone(), v));
    self.lift(move |observer| ReduceObserver {
      observer,
      state: Accumulate::new(start.clone(), func.clone()),
      default: Some(seed.clone()),
    })
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::{prelude::*, subscriber::Notification};

  fn record<T: 'static>(o: Observable<T>) -> Rc<RefCell<Vec<Notification<T>>>> {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    o.subscribe_all(
      move |v| l1.borrow_mut().push(Notification::Next(v)),
      move |e| l2.borrow_mut().push(Notification::Error(e)),
      move || l3.borrow_mut().push(Notification::Complete),
    );
    log
  }

  #[test]
  fn reduce_initial() {
    let log = record(observable::of([1, 1, 1, 1, 1]).reduce_initial(100, |acc, v| acc + v));
    assert_eq!(*log.borrow(), vec![Notification::Next(105), Notification::Complete]);
  }

  #[test]
  fn reduce_initial_on_empty_observable() {
    let log = record(observable::empty().reduce_initial(100, |acc, v: i32| acc + v));
    assert_eq!(*log.borrow(), vec![Notification::Next(100), Notification::Complete]);
  }

  #[test]
  fn reduce() {
    let log = record(observable::of([3, 1, 4]).reduce(|acc, v| acc.max(v)));
    assert_eq!(*log.borrow(), vec![Notification::Next(4), Notification::Complete]);
  }

  #[test]
  fn reduce_on_empty_observable() {
    let log = record(observable::empty::<i32>().reduce(|acc, v| acc + v));
    assert_eq!(*log.borrow(), vec![Notification::Complete]);
  }

  #[test]
  fn reduce_failure() {
    let log = record(observable::of([1, 2]).try_reduce(|_, _| Err(RxError::msg("no"))));
    assert_eq!(*log.borrow(), vec![Notification::Error(RxError::msg("no"))]);
  }
}
