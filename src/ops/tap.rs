use std::rc::Rc;

use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct TapObserver<Item, N, E, C> {
  observer: Subscriber<Item>,
  on_next: Rc<N>,
  on_error: Rc<E>,
  on_complete: Rc<C>,
}

impl<Item, N, E, C> Observer<Item> for TapObserver<Item, N, E, C>
where
  N: Fn(&Item),
  E: Fn(&RxError),
  C: Fn(),
{
  fn next(&mut self, value: Item) {
    (self.on_next)(&value);
    self.observer.next(value);
  }

  fn error(&mut self, err: RxError) {
    (self.on_error)(&err);
    self.observer.error(err);
  }

  fn complete(&mut self) {
    (self.on_complete)();
    self.observer.complete();
  }
}

impl<Item: 'static> Observable<Item> {
  /// Invokes `f` for every value before passing it on unchanged.
  pub fn tap<F>(self, f: F) -> Observable<Item>
  where
    F: Fn(&Item) + 'static,
  {
    self.tap_all(f, |_| {}, || {})
  }

  /// Side effects for all three channels. Each callback runs before the
  /// notification is forwarded downstream.
  pub fn tap_all<N, E, C>(self, on_next: N, on_error: E, on_complete: C) -> Observable<Item>
  where
    N: Fn(&Item) + 'static,
    E: Fn(&RxError) + 'static,
    C: Fn() + 'static,
  {
    let (on_next, on_error, on_complete) =
      (Rc::new(on_next), Rc::new(on_error), Rc::new(on_complete));
    self.lift(move |observer| TapObserver {
      observer,
      on_next: on_next.clone(),
      on_error: on_error.clone(),
      on_complete: on_complete.clone(),
    })
  }
}
