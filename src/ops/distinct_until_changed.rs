use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct DistinctUntilChangedObserver<Item> {
  observer: Subscriber<Item>,
  last: Option<Item>,
}

impl<Item: PartialEq + Clone> Observer<Item> for DistinctUntilChangedObserver<Item> {
  fn next(&mut self, value: Item) {
    if self.last.as_ref() != Some(&value) {
      self.last = Some(value.clone());
      self.observer.next(value);
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

impl<Item: PartialEq + Clone + 'static> Observable<Item> {
  /// Drops every value equal to the one emitted right before it.
  pub fn distinct_until_changed(self) -> Observable<Item> {
    self.lift(|observer| DistinctUntilChangedObserver { observer, last: None })
  }
}
