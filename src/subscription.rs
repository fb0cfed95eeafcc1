use std::{
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use smallvec::SmallVec;

/// Subscription returns from `Observable::subscribe` to allow unsubscribing.
pub trait SubscriptionLike {
  /// This allows deregistering a stream before it has finished receiving all
  /// events (i.e. before `complete` is called).
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

enum Teardown {
  Fn(Box<dyn FnOnce()>),
  Child(Subscription),
}

impl Teardown {
  fn run(self) {
    match self {
      Teardown::Fn(f) => f(),
      Teardown::Child(child) => child.unsubscribe(),
    }
  }

  fn is_closed(&self) -> bool {
    match self {
      Teardown::Fn(_) => false,
      Teardown::Child(child) => child.is_closed(),
    }
  }
}

struct Inner {
  closed: bool,
  teardown: SmallVec<[Teardown; 1]>,
}

impl Default for Inner {
  fn default() -> Self { Inner { closed: false, teardown: SmallVec::new() } }
}

/// A disposable handle over one running execution.
///
/// A subscription owns a list of teardowns: closures and child
/// subscriptions. `unsubscribe` closes it and runs every teardown exactly
/// once; further calls are no-ops. A teardown added to an already closed
/// subscription runs immediately.
///
/// Clones share state, so any clone can close the execution.
#[derive(Clone, Default)]
pub struct Subscription(Rc<RefCell<Inner>>);

impl Subscription {
  /// Creates an open subscription whose only teardown is `teardown`.
  pub fn new(teardown: impl FnOnce() + 'static) -> Self {
    let subscription = Subscription::default();
    subscription.add_fn(teardown);
    subscription
  }

  /// A subscription that is already closed.
  pub fn closed() -> Self {
    let subscription = Subscription::default();
    subscription.0.borrow_mut().closed = true;
    subscription
  }

  /// Registers `subscription` to be unsubscribed together with `self`.
  pub fn add(&self, subscription: Subscription) {
    if self.is_same(&subscription) {
      return;
    }
    self.push(Teardown::Child(subscription));
  }

  /// Registers a closure run when `self` is unsubscribed.
  pub fn add_fn(&self, teardown: impl FnOnce() + 'static) {
    self.push(Teardown::Fn(Box::new(teardown)));
  }

  /// Creates a new subscription that is closed when `self` closes.
  pub fn child(&self) -> Subscription {
    let child = Subscription::default();
    self.add(child.clone());
    child
  }

  /// Activates RAII behavior: the returned guard unsubscribes when dropped.
  ///
  /// **Attention:** if the return value is not bound to a variable, the
  /// subscription is closed immediately.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard::new(self) }

  #[inline]
  pub fn is_same(&self, other: &Subscription) -> bool { Rc::ptr_eq(&self.0, &other.0) }

  /// Number of teardowns currently registered.
  pub fn teardown_size(&self) -> usize { self.0.borrow().teardown.len() }

  fn push(&self, teardown: Teardown) {
    let mut inner = self.0.borrow_mut();
    if inner.closed {
      drop(inner);
      teardown.run();
    } else {
      inner.teardown.retain(|t| !t.is_closed());
      inner.teardown.push(teardown);
    }
  }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&self) {
    // Teardowns may re-enter this subscription, so none of them run while
    // the cell is borrowed.
    let teardown = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for t in teardown {
      t.run();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().closed }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.borrow();
    f.debug_struct("Subscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Option<Subscription>);

impl SubscriptionGuard {
  pub fn new(subscription: Subscription) -> SubscriptionGuard {
    SubscriptionGuard(Some(subscription))
  }

  /// Gives the subscription back without unsubscribing it.
  pub fn into_inner(mut self) -> Subscription { self.0.take().unwrap_or_default() }
}

impl SubscriptionLike for SubscriptionGuard {
  fn unsubscribe(&self) {
    if let Some(subscription) = &self.0 {
      subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.as_ref().is_none_or(|s| s.is_closed()) }
}

impl Drop for SubscriptionGuard {
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }
}

#[cfg(test)]
mod test {
  use std::cell::Cell;

  use super::*;

  #[test]
  fn add_remove() {
    let local = Subscription::default();
    let l1 = Subscription::default();
    let l2 = Subscription::default();
    let l3 = Subscription::default();
    local.add(l1);
    assert_eq!(local.teardown_size(), 1);
    local.add(l2.clone());
    assert_eq!(local.teardown_size(), 2);
    l2.unsubscribe();
    local.add(l3);
    assert_eq!(local.teardown_size(), 2);
  }

  #[test]
  fn self_is_not_added() {
    let local = Subscription::default();
    local.add(local.clone());
    assert_eq!(local.teardown_size(), 0);
  }

  #[test]
  fn teardown_runs_once() {
    let hits = Rc::new(Cell::new(0));
    let c_hits = hits.clone();
    let subscription = Subscription::new(move || c_hits.set(c_hits.get() + 1));

    subscription.unsubscribe();
    subscription.unsubscribe();
    subscription.clone().unsubscribe();

    assert_eq!(hits.get(), 1);
    assert!(subscription.is_closed());
  }

  #[test]
  fn add_after_close_runs_immediately() {
    let hits = Rc::new(Cell::new(0));
    let subscription = Subscription::closed();
    let c_hits = hits.clone();
    subscription.add_fn(move || c_hits.set(c_hits.get() + 1));
    assert_eq!(hits.get(), 1);

    let child = Subscription::default();
    subscription.add(child.clone());
    assert!(child.is_closed());
  }

  #[test]
  fn child_closes_with_parent() {
    let parent = Subscription::default();
    let child = parent.child();
    let grandchild = child.child();
    parent.unsubscribe();
    assert!(child.is_closed());
    assert!(grandchild.is_closed());
  }

  #[test]
  fn reentrant_unsubscribe() {
    let subscription = Subscription::default();
    let c_subscription = subscription.clone();
    subscription.add_fn(move || c_subscription.unsubscribe());
    subscription.unsubscribe();
    assert!(subscription.is_closed());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let hits = Rc::new(Cell::new(0));
    let c_hits = hits.clone();
    {
      let _guard =
        Subscription::new(move || c_hits.set(c_hits.get() + 1)).unsubscribe_when_dropped();
    }
    assert_eq!(hits.get(), 1);
  }

  #[test]
  fn guard_into_inner_keeps_open() {
    let guard = Subscription::default().unsubscribe_when_dropped();
    let subscription = guard.into_inner();
    assert!(!subscription.is_closed());
  }
}
