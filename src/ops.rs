//! Operators.
//!
//! Every operator is an inherent method of [`Observable`] returning a new
//! observable; subscribing to the result subscribes to the source and
//! unsubscribing it tears down the source together with any inner
//! subscription the operator started.

use crate::{
  observable::Observable, observer::Observer, subscriber::Subscriber, subscription::Subscription,
};

pub mod catch_error;
pub mod debounce;
pub mod delay;
pub mod distinct_until_changed;
pub mod filter;
pub mod finalize;
pub mod into_future;
pub mod map;
pub mod merge_map;
pub mod reduce;
pub mod retry;
pub mod scan;
pub mod share;
pub mod skip;
pub mod start_with;
pub mod switch_map;
pub mod take;
pub mod take_until;
pub mod take_while;
pub mod tap;
pub mod timeout;

impl<Item: 'static> Observable<Item> {
  /// Builds an operator out of an observer adapter: for every downstream
  /// subscriber, `adapt` creates the observer subscribed to `self`.
  ///
  /// The source runs as a child of the downstream subscription, so when the
  /// adapter terminates the downstream subscriber the source is torn down
  /// right away, even while it is still emitting synchronously.
  pub(crate) fn lift<R, O, F>(self, adapt: F) -> Observable<R>
  where
    R: 'static,
    O: Observer<Item> + 'static,
    F: Fn(Subscriber<R>) -> O + 'static,
  {
    Observable::new(move |subscriber: Subscriber<R>| {
      let parent = subscriber.subscription().clone();
      self.subscribe_child(adapt(subscriber), &parent);
      Subscription::closed()
    })
  }
}
