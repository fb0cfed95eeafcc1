use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  subject::Subject,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

struct ShareState<Item> {
  subject: Option<Subject<Item>>,
  connection: Option<Subscription>,
  ref_count: usize,
}

impl<Item: Clone + 'static> Observable<Item> {
  /// Multicasts one execution of the source to every concurrent subscriber.
  ///
  /// The first subscriber connects to the source; later subscribers join the
  /// running execution and only see what it emits after they joined. When
  /// the last subscriber leaves, the source is unsubscribed, and the next
  /// subscriber starts a fresh execution. A source that terminated is
  /// likewise subscribed again by the next subscriber.
  ///
  /// ```
  /// use std::{cell::Cell, rc::Rc};
  ///
  /// use rxlite::prelude::*;
  ///
  /// let runs = Rc::new(Cell::new(0));
  /// let c_runs = runs.clone();
  /// let shared = observable::defer(move || {
  ///   c_runs.set(c_runs.get() + 1);
  ///   observable::never::<i32>()
  /// })
  /// .share();
  ///
  /// let a = shared.subscribe(|_| {});
  /// let b = shared.subscribe(|_| {});
  /// assert_eq!(runs.get(), 1);
  /// # a.unsubscribe();
  /// # b.unsubscribe();
  /// ```
  pub fn share(self) -> Observable<Item> {
    let state = Rc::new(RefCell::new(ShareState { subject: None, connection: None, ref_count: 0 }));
    Observable::new(move |subscriber: Subscriber<Item>| {
      let (subject, connect) = {
        let mut state = state.borrow_mut();
        state.ref_count += 1;
        match &state.subject {
          Some(subject) if !subject.is_stopped() => (subject.clone(), false),
          _ => {
            let subject = Subject::default();
            state.subject = Some(subject.clone());
            (subject, true)
          }
        }
      };

      let downstream = subscriber.subscription().clone();
      subject.as_observable().actual_subscribe(subscriber);

      // Registered before connecting: a synchronous source may drop the last
      // subscriber while it is still emitting.
      let c_state = state.clone();
      downstream.add_fn(move || {
        let connection = {
          let mut state = c_state.borrow_mut();
          state.ref_count -= 1;
          if state.ref_count > 0 {
            return;
          }
          state.subject = None;
          state.connection.take()
        };
        if let Some(connection) = connection {
          tracing::debug!("share disconnecting from source");
          connection.unsubscribe();
        }
      });

      if connect && !downstream.is_closed() {
        let connection = Subscription::default();
        state.borrow_mut().connection = Some(connection.clone());
        tracing::debug!("share connecting to source");
        self.actual_subscribe(Subscriber::with_subscription(subject, connection));
      }
      Subscription::closed()
    })
  }
}
