use std::rc::Rc;

use crate::{observable::Observable, subscriber::Subscriber, subscription::Subscription};

impl<Item: 'static> Observable<Item> {
  /// Calls `func` once per subscription when it ends, whether by
  /// completion, error or unsubscribe. The call happens after the terminal
  /// notification was delivered downstream and after the source was torn
  /// down.
  pub fn finalize<F>(self, func: F) -> Observable<Item>
  where
    F: Fn() + 'static,
  {
    let func = Rc::new(func);
    Observable::new(move |subscriber: Subscriber<Item>| {
      let parent = subscriber.subscription().clone();
      self.subscribe_child(subscriber, &parent);
      let func = func.clone();
      parent.add_fn(move || func());
      Subscription::closed()
    })
  }
}
