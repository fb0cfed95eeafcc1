use std::rc::Rc;

use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct MapObserver<B, F> {
  observer: Subscriber<B>,
  func: Rc<F>,
  index: usize,
}

impl<Item, B, F> Observer<Item> for MapObserver<B, F>
where
  F: Fn(Item, usize) -> Result<B, RxError>,
{
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.index += 1;
    match (self.func)(value, index) {
      Ok(mapped) => self.observer.next(mapped),
      Err(err) => self.observer.error(err),
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

impl<Item: 'static> Observable<Item> {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  pub fn map<B, F>(self, f: F) -> Observable<B>
  where
    B: 'static,
    F: Fn(Item) -> B + 'static,
  {
    self.try_map_indexed(move |v, _| Ok(f(v)))
  }

  /// Like [`map`](Observable::map), but the closure also receives the
  /// zero-based index of the value within this subscription.
  pub fn map_indexed<B, F>(self, f: F) -> Observable<B>
  where
    B: 'static,
    F: Fn(Item, usize) -> B + 'static,
  {
    self.try_map_indexed(move |v, i| Ok(f(v, i)))
  }

  /// A fallible `map`: an `Err` from the closure is delivered as the stream
  /// error and the source is unsubscribed.
  pub fn try_map<B, F>(self, f: F) -> Observable<B>
  where
    B: 'static,
    F: Fn(Item) -> Result<B, RxError> + 'static,
  {
    self.try_map_indexed(move |v, _| f(v))
  }

  pub fn try_map_indexed<B, F>(self, f: F) -> Observable<B>
  where
    B: 'static,
    F: Fn(Item, usize) -> Result<B, RxError> + 'static,
  {
    let func = Rc::new(f);
    self.lift(move |observer| MapObserver { observer, func: func.clone(), index: 0 })
  }
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[test]
  fn primitive_type() {
    let i = Rc::new(Cell::new(0));
    let c_i = i.clone();
    observable::from_iter(100..101).map(|v| v * 2).subscribe(move |v| c_i.set(c_i.get() + v));
    assert_eq!(i.get(), 200);
  }

  #[test]
  fn map_types_mixed() {
    let i = Rc::new(Cell::new(0));
    let c_i = i.clone();
    observable::from_iter(vec!['a', 'b', 'c'])
      .map(|_v| 1)
      .subscribe(move |v| c_i.set(c_i.get() + v));
    assert_eq!(i.get(), 3);
  }

  #[test]
  fn index_restarts_per_subscription() {
    let source = observable::of(["a", "b"]).map_indexed(|v, i| format!("{v}{i}"));
    for _ in 0..2 {
      let out = Rc::new(RefCell::new(vec![]));
      let c_out = out.clone();
      source.subscribe(move |v| c_out.borrow_mut().push(v));
      assert_eq!(*out.borrow(), vec!["a0", "b1"]);
    }
  }

  #[test]
  fn failure_becomes_error_and_stops_source() {
    let produced = Rc::new(Cell::new(0));
    let c_produced = produced.clone();
    let values = Rc::new(RefCell::new(vec![]));
    let err = Rc::new(RefCell::new(None));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_err, c_completed) = (values.clone(), err.clone(), completed.clone());

    observable::from_iter(0..)
      .tap(move |_| c_produced.set(c_produced.get() + 1))
      .try_map(|v| if v < 2 { Ok(v * 10) } else { Err(RxError::msg("too big")) })
      .subscribe_all(
        move |v| c_values.borrow_mut().push(v),
        move |e| *c_err.borrow_mut() = Some(e),
        move || c_completed.set(true),
      );

    assert_eq!(*values.borrow(), vec![0, 10]);
    assert_eq!(*err.borrow(), Some(RxError::msg("too big")));
    assert!(!completed.get());
    assert_eq!(produced.get(), 3);
  }
}
