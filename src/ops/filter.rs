use std::rc::Rc;

use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct FilterObserver<Item, F> {
  observer: Subscriber<Item>,
  predicate: Rc<F>,
  index: usize,
}

impl<Item, F> Observer<Item> for FilterObserver<Item, F>
where
  F: Fn(&Item, usize) -> Result<bool, RxError>,
{
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.index += 1;
    match (self.predicate)(&value, index) {
      Ok(true) => self.observer.next(value),
      Ok(false) => {}
      Err(err) => self.observer.error(err),
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

pub struct FilterMapObserver<B, F> {
  observer: Subscriber<B>,
  func: Rc<F>,
}

impl<Item, B, F> Observer<Item> for FilterMapObserver<B, F>
where
  F: Fn(Item) -> Option<B>,
{
  fn next(&mut self, value: Item) {
    if let Some(mapped) = (self.func)(value) {
      self.observer.next(mapped)
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

impl<Item: 'static> Observable<Item> {
  /// Emit only those items from an Observable that pass a predicate test
  /// # Example
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// observable::from_iter(0..10)
  ///   .filter(|v| *v % 2 == 0)
  ///   .subscribe(move |v| println!("{v}"));
  /// ```
  pub fn filter<F>(self, predicate: F) -> Observable<Item>
  where
    F: Fn(&Item) -> bool + 'static,
  {
    self.try_filter_indexed(move |v, _| Ok(predicate(v)))
  }

  /// `filter` whose predicate also receives the zero-based index of the
  /// value within this subscription.
  pub fn filter_indexed<F>(self, predicate: F) -> Observable<Item>
  where
    F: Fn(&Item, usize) -> bool + 'static,
  {
    self.try_filter_indexed(move |v, i| Ok(predicate(v, i)))
  }

  /// A fallible `filter`: an `Err` from the predicate errors the stream.
  pub fn try_filter<F>(self, predicate: F) -> Observable<Item>
  where
    F: Fn(&Item) -> Result<bool, RxError> + 'static,
  {
    self.try_filter_indexed(move |v, _| predicate(v))
  }

  pub fn try_filter_indexed<F>(self, predicate: F) -> Observable<Item>
  where
    F: Fn(&Item, usize) -> Result<bool, RxError> + 'static,
  {
    let predicate = Rc::new(predicate);
    self.lift(move |observer| FilterObserver { observer, predicate: predicate.clone(), index: 0 })
  }

  /// Filters and maps in one step: `Some` values are emitted, `None` are
  /// dropped.
  pub fn filter_map<B, F>(self, f: F) -> Observable<B>
  where
    B: 'static,
    F: Fn(Item) -> Option<B> + 'static,
  {
    let func = Rc::new(f);
    self.lift(move |observer| FilterMapObserver { observer, func: func.clone() })
  }
}
