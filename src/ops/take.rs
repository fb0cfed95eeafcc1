use crate::{
  error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber,
  subscription::Subscription,
};

pub struct TakeObserver<Item> {
  observer: Subscriber<Item>,
  remaining: usize,
}

impl<Item> Observer<Item> for TakeObserver<Item> {
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      return;
    }
    self.remaining -= 1;
    self.observer.next(value);
    if self.remaining == 0 {
      self.observer.complete();
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

impl<Item: 'static> Observable<Item> {
  /// Emits only the first `count` values emitted by the source, then
  /// completes and unsubscribes the source. `take(0)` completes right away
  /// without subscribing to the source at all.
  pub fn take(self, count: usize) -> Observable<Item> {
    if count == 0 {
      return Observable::new(|subscriber: Subscriber<Item>| {
        subscriber.complete();
        Subscription::closed()
      });
    }
    self.lift(move |observer| TakeObserver { observer, remaining: count })
  }
}
