use std::{cell::RefCell, rc::Rc};

use crate::{
  error::{RxError, TimeoutError},
  observable::Observable,
  observer::Observer,
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

pub struct TimeoutObserver<Item, S> {
  observer: Subscriber<Item>,
  after: Duration,
  scheduler: S,
  timer: Rc<RefCell<Option<Subscription>>>,
}

impl<Item: 'static, S: Scheduler> TimeoutObserver<Item, S> {
  fn cancel(&self) {
    let timer = self.timer.borrow_mut().take();
    if let Some(timer) = timer {
      timer.unsubscribe();
    }
  }

  fn arm(&self) {
    self.cancel();
    let (observer, after) = (self.observer.clone(), self.after);
    let handle = self.scheduler.schedule(
      after,
      Box::new(move || {
        tracing::debug!(?after, "timeout fired");
        observer.error(TimeoutError { after }.into());
      }),
    );
    self.observer.subscription().add(handle.clone());
    *self.timer.borrow_mut() = Some(handle);
  }
}

impl<Item: 'static, S: Scheduler> Observer<Item> for TimeoutObserver<Item, S> {
  fn next(&mut self, value: Item) {
    self.arm();
    self.observer.next(value);
  }

  fn error(&mut self, err: RxError) {
    self.cancel();
    self.observer.error(err);
  }

  fn complete(&mut self) {
    self.cancel();
    self.observer.complete();
  }
}

impl<Item: 'static> Observable<Item> {
  /// Errors with [`TimeoutError`] when the source lets `after` pass without
  /// emitting, measured from the subscription and then from every value.
  /// The source is unsubscribed when the timeout fires; a completion or an
  /// error of the source cancels the timer.
  pub fn timeout<S: Scheduler>(self, after: Duration, scheduler: S) -> Observable<Item> {
    Observable::new(move |subscriber: Subscriber<Item>| {
      let parent = subscriber.subscription().clone();
      let observer = TimeoutObserver {
        observer: subscriber,
        after,
        scheduler: scheduler.clone(),
        timer: Rc::new(RefCell::new(None)),
      };
      observer.arm();
      self.subscribe_child(observer, &parent);
      Subscription::closed()
    })
  }
}
