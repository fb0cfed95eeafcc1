use std::rc::Rc;

use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct TakeWhileObserver<Item, F> {
  observer: Subscriber<Item>,
  predicate: Rc<F>,
  inclusive: bool,
}

impl<Item, F> Observer<Item> for TakeWhileObserver<Item, F>
where
  F: Fn(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.observer.next(value);
    } else {
      if self.inclusive {
        self.observer.next(value);
      }
      self.observer.complete();
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

impl<Item: 'static> Observable<Item> {
  /// Emits values while `predicate` holds and completes on the first value
  /// that fails it. With `inclusive` the failing value is emitted before
  /// completing.
  pub fn take_while<F>(self, predicate: F, inclusive: bool) -> Observable<Item>
  where
    F: Fn(&Item) -> bool + 'static,
  {
    let predicate = Rc::new(predicate);
    self.lift(move |observer| TakeWhileObserver {
      observer,
      predicate: predicate.clone(),
      inclusive,
    })
  }
}
