use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
};

pub struct DelayObserver<Item, S> {
  observer: Subscriber<Item>,
  delay: Duration,
  scheduler: S,
}

impl<Item, S> DelayObserver<Item, S>
where
  Item: 'static,
  S: Scheduler,
{
  fn schedule(&self, task: impl FnOnce(Subscriber<Item>) + 'static) {
    let observer = self.observer.clone();
    let handle = self.scheduler.schedule(self.delay, Box::new(move || task(observer)));
    self.observer.subscription().add(handle);
  }
}

impl<Item, S> Observer<Item> for DelayObserver<Item, S>
where
  Item: 'static,
  S: Scheduler,
{
  fn next(&mut self, value: Item) { self.schedule(move |observer| observer.next(value)) }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) { self.schedule(|observer| observer.complete()) }
}

impl<Item: 'static> Observable<Item> {
  /// Shifts every value, and the completion, `delay` later in time on
  /// `scheduler`. Relative order is kept. Errors are forwarded immediately
  /// and drop the values still in flight.
  pub fn delay<S: Scheduler>(self, delay: Duration, scheduler: S) -> Observable<Item> {
    self.lift(move |observer| DelayObserver { observer, delay, scheduler: scheduler.clone() })
  }
}
