use std::rc::Rc;

use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

/// Accumulator state shared by `scan` and `reduce`: `start` turns the first
/// value into an accumulator, `func` folds every later value into it.
pub(crate) struct Accumulate<Acc, S, F> {
  acc: Option<Acc>,
  start: Rc<S>,
  func: Rc<F>,
}

impl<Acc, S, F> Accumulate<Acc, S, F> {
  pub(crate) fn new(start: Rc<S>, func: Rc<F>) -> Self { Accumulate { acc: None, start, func } }

  pub(crate) fn take(&mut self) -> Option<Acc> { self.acc.take() }

  pub(crate) fn current(&self) -> Option<&Acc> { self.acc.as_ref() }

  pub(crate) fn fold<Item>(&mut self, value: Item) -> Result<(), RxError>
  where
    S: Fn(Item) -> Result<Acc, RxError>,
    F: Fn(Acc, Item) -> Result<Acc, RxError>,
  {
    let acc = match self.acc.take() {
      Some(acc) => (self.func)(acc, value)?,
      None => (self.start)(value)?,
    };
    self.acc = Some(acc);
    Ok(())
  }
}

pub struct ScanObserver<Acc, S, F> {
  observer: Subscriber<Acc>,
  state: Accumulate<Acc, S, F>,
}

impl<Item, Acc, S, F> Observer<Item> for ScanObserver<Acc, S, F>
where
  Acc: Clone,
  S: Fn(Item) -> Result<Acc, RxError>,
  F: Fn(Acc, Item) -> Result<Acc, RxError>,
{
  fn next(&mut self, value: Item) {
    if let Err(err) = self.state.fold(value) {
      self.observer.error(err);
      return;
    }
    if let Some(acc) = self.state.current() {
      self.observer.next(acc.clone());
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

impl<Item: 'static> Observable<Item> {
  /// The Scan operator applies a function to the first item emitted by the
  /// source observable and then emits the result of that function as its
  /// own first emission. It also feeds the result of the function back into
  /// the function along with the second item emitted by the source
  /// observable in order to generate its second emission. It continues to
  /// feed back its own subsequent emissions along with the subsequent
  /// emissions from the source Observable in order to create the rest of its
  /// sequence.
  ///
  /// Without a seed the first value is emitted as is.
  pub fn scan<F>(self, f: F) -> Observable<Item>
  where
    Item: Clone,
    F: Fn(Item, Item) -> Item + 'static,
  {
    self.try_scan(move |acc, v| Ok(f(acc, v)))
  }

  pub fn try_scan<F>(self, f: F) -> Observable<Item>
  where
    Item: Clone,
    F: Fn(Item, Item) -> Result<Item, RxError> + 'static,
  {
    self.accumulate_each(Rc::new(Ok::<Item, RxError>), Rc::new(f))
  }

  /// `scan` starting from `seed`, which is cloned for every subscription.
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// observable::of([1, 1, 1, 1, 1])
  ///   .scan_initial(100, |acc, v| acc + v)
  ///   .subscribe(|v| println!("{v}"));
  /// // 101 102 103 104 105
  /// ```
  pub fn scan_initial<Acc, F>(self, seed: Acc, f: F) -> Observable<Acc>
  where
    Acc: Clone + 'static,
    F: Fn(Acc, Item) -> Acc + 'static,
  {
    self.try_scan_initial(seed, move |acc, v| Ok(f(acc, v)))
  }

  pub fn try_scan_initial<Acc, F>(self, seed: Acc, f: F) -> Observable<Acc>
  where
    Acc: Clone + 'static,
    F: Fn(Acc, Item) -> Result<Acc, RxError> + 'static,
  {
    let func = Rc::new(f);
    let c_func = func.clone();
    self.accumulate_each(Rc::new(move |v| c_func(seed.clone(), v)), func)
  }

  fn accumulate_each<Acc, S, F>(self, start: Rc<S>, func: Rc<F>) -> Observable<Acc>
  where
    Acc: Clone + 'static,
    S: Fn(Item) -> Result<Acc, RxError> + 'static,
    F: Fn(Acc, Item) -> Result<Acc, RxError> + 'static,
  {
    self.lift(move |observer| ScanObserver {
      observer,
      state: Accumulate::new(start.clone(), func.clone()),
    })
  }
}
