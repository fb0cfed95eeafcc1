use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
  rc::{Rc, Weak},
};

use crate::{
  error::RxError,
  observer::{BoxedObserver, Observer},
  subscription::{Subscription, SubscriptionLike},
};

/// A single notification travelling down a stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<Item> {
  Next(Item),
  Error(RxError),
  Complete,
}

struct Inner<Item> {
  observer: RefCell<Option<BoxedObserver<Item>>>,
  pending: RefCell<VecDeque<Notification<Item>>>,
  emitting: Cell<bool>,
  stopped: Cell<bool>,
}

/// Implements the Observer trait and Subscription trait. While the Observer is
/// the public API for consuming the values of an Observable, all Observers get
/// converted to a Subscriber, in order to provide Subscription capabilities.
///
/// A subscriber enforces the observer contract for the observer it wraps:
/// - once `error` or `complete` is accepted nothing else is delivered;
/// - notifications pushed while the observer is still handling a previous one
///   (re-entrant emission) are queued and delivered in order afterwards;
/// - after the terminal notification is delivered the subscription is
///   unsubscribed, which releases every teardown of the execution.
pub struct Subscriber<Item> {
  inner: Rc<Inner<Item>>,
  subscription: Subscription,
}

impl<Item> Clone for Subscriber<Item> {
  fn clone(&self) -> Self {
    Subscriber { inner: self.inner.clone(), subscription: self.subscription.clone() }
  }
}

impl<Item: 'static> Subscriber<Item> {
  pub fn new(observer: impl Observer<Item> + 'static) -> Self {
    Self::with_subscription(observer, Subscription::default())
  }

  /// Wraps `observer` so that it stops receiving notifications as soon as
  /// `subscription` is closed.
  pub fn with_subscription(
    observer: impl Observer<Item> + 'static,
    subscription: Subscription,
  ) -> Self {
    let inner = Rc::new(Inner {
      observer: RefCell::new(Some(Box::new(observer) as BoxedObserver<Item>)),
      pending: RefCell::new(VecDeque::new()),
      emitting: Cell::new(false),
      stopped: Cell::new(false),
    });
    let weak: Weak<Inner<Item>> = Rc::downgrade(&inner);
    subscription.add_fn(move || {
      if let Some(inner) = weak.upgrade() {
        inner.stopped.set(true);
        // Busy means the observer is on the stack; it is released once the
        // current delivery returns.
        if let Ok(mut observer) = inner.observer.try_borrow_mut() {
          observer.take();
        }
      }
    });
    Subscriber { inner, subscription }
  }
}

impl<Item> Subscriber<Item> {
  pub fn next(&self, value: Item) {
    if !self.is_closed() {
      self.dispatch(Notification::Next(value));
    }
  }

  pub fn error(&self, err: RxError) {
    if !self.is_closed() {
      self.inner.stopped.set(true);
      self.dispatch(Notification::Error(err));
    }
  }

  pub fn complete(&self) {
    if !self.is_closed() {
      self.inner.stopped.set(true);
      self.dispatch(Notification::Complete);
    }
  }

  /// Forwards a materialized notification.
  pub fn notify(&self, notification: Notification<Item>) {
    match notification {
      Notification::Next(value) => self.next(value),
      Notification::Error(err) => self.error(err),
      Notification::Complete => self.complete(),
    }
  }

  /// True once a terminal notification was accepted or the subscription was
  /// closed. Sources should stop producing when this turns true.
  #[inline]
  pub fn is_closed(&self) -> bool { self.inner.stopped.get() || self.subscription.is_closed() }

  #[inline]
  pub fn subscription(&self) -> &Subscription { &self.subscription }

  #[inline]
  pub fn unsubscribe(&self) { self.subscription.unsubscribe() }

  fn dispatch(&self, notification: Notification<Item>) {
    if self.inner.emitting.get() {
      self.inner.pending.borrow_mut().push_back(notification);
      return;
    }

    self.inner.emitting.set(true);
    let mut current = Some(notification);
    while let Some(notification) = current {
      self.deliver(notification);
      current = self.inner.pending.borrow_mut().pop_front();
    }
    self.inner.emitting.set(false);

    if self.subscription.is_closed() {
      let released = self.inner.observer.borrow_mut().take();
      drop(released);
    }
  }

  fn deliver(&self, notification: Notification<Item>) {
    match notification {
      Notification::Next(value) => {
        if self.subscription.is_closed() {
          return;
        }
        if let Some(observer) = self.inner.observer.borrow_mut().as_mut() {
          observer.next(value);
        }
      }
      Notification::Error(err) => {
        let observer = self.inner.observer.borrow_mut().take();
        if let Some(mut observer) = observer {
          observer.error(err);
        }
        self.subscription.unsubscribe();
      }
      Notification::Complete => {
        let observer = self.inner.observer.borrow_mut().take();
        if let Some(mut observer) = observer {
          observer.complete();
        }
        self.subscription.unsubscribe();
      }
    }
  }
}

impl<Item> Observer<Item> for Subscriber<Item> {
  #[inline]
  fn next(&mut self, value: Item) { Subscriber::next(self, value) }

  #[inline]
  fn error(&mut self, err: RxError) { Subscriber::error(self, err) }

  #[inline]
  fn complete(&mut self) { Subscriber::complete(self) }
}
