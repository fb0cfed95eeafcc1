use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct SkipObserver<Item> {
  observer: Subscriber<Item>,
  remaining: usize,
}

impl<Item> Observer<Item> for SkipObserver<Item> {
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      self.observer.next(value);
    } else {
      self.remaining -= 1;
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

impl<Item: 'static> Observable<Item> {
  /// Ignore the first `count` values emitted by the source Observable.
  pub fn skip(self, count: usize) -> Observable<Item> {
    self.lift(move |observer| SkipObserver { observer, remaining: count })
  }
}
