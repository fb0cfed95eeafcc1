use std::{cell::RefCell, rc::Rc};

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

pub struct DebounceObserver<Item, S> {
  observer: Subscriber<Item>,
  duration: Duration,
  scheduler: S,
  pending: Rc<RefCell<Option<Item>>>,
  handle: Option<Subscription>,
}

impl<Item, S> DebounceObserver<Item, S> {
  fn cancel(&mut self) {
    if let Some(handle) = self.handle.take() {
      handle.unsubscribe();
    }
  }
}

impl<Item: 'static, S: Scheduler> Observer<Item> for DebounceObserver<Item, S> {
  fn next(&mut self, value: Item) {
    self.cancel();
    *self.pending.borrow_mut() = Some(value);
    let (observer, pending) = (self.observer.clone(), self.pending.clone());
    let handle = self.scheduler.schedule(
      self.duration,
      Box::new(move || {
        let value = pending.borrow_mut().take();
        if let Some(value) = value {
          observer.next(value);
        }
      }),
    );
    self.observer.subscription().add(handle.clone());
    self.handle = Some(handle);
  }

  fn error(&mut self, err: RxError) {
    self.cancel();
    self.pending.borrow_mut().take();
    self.observer.error(err);
  }

  fn complete(&mut self) {
    self.cancel();
    let last = self.pending.borrow_mut().take();
    if let Some(last) = last {
      self.observer.next(last);
    }
    self.observer.complete();
  }
}

impl<Item: 'static> Observable<Item> {
  /// Emits a value only once `duration` passed without the source emitting
  /// another one. On completion the pending value, if any, is emitted right
  /// away before completing. Errors are forwarded immediately and drop the
  /// pending value.
  pub fn debounce_time<S: Scheduler>(self, duration: Duration, scheduler: S) -> Observable<Item> {
    self.lift(move |observer| DebounceObserver {
      observer,
      duration,
      scheduler: scheduler.clone(),
      pending: Rc::new(RefCell::new(None)),
      handle: None,
    })
  }
}
