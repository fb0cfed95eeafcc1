use crate::{
  observable::Observable, observer::ObserverAll, subscriber::Subscriber, subscription::Subscription,
};

impl<Item: 'static> Observable<Item> {
  /// Emits the values of the source until `notifier` emits its first value,
  /// then completes. An error from `notifier` is forwarded; its completion
  /// without a value is ignored.
  ///
  /// `notifier` is subscribed before the source, so a notifier that emits
  /// synchronously completes the stream before the source starts.
  pub fn take_until<N: 'static>(self, notifier: Observable<N>) -> Observable<Item> {
    Observable::new(move |subscriber: Subscriber<Item>| {
      let parent = subscriber.subscription().clone();
      let (on_next, on_error) = (subscriber.clone(), subscriber.clone());
      notifier.subscribe_child(
        ObserverAll::new(move |_| on_next.complete(), move |err| on_error.error(err), || {}),
        &parent,
      );
      if !subscriber.is_closed() {
        self.subscribe_child(subscriber, &parent);
      }
      Subscription::closed()
    })
  }
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[test]
  fn base_function() {
    let source = Subject::<i32>::default();
    let notifier = Subject::<()>::default();
    let out = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_out, c_completed) = (out.clone(), completed.clone());

    source
      .as_observable()
      .take_until(notifier.as_observable())
      .subscribe_complete(move |v| c_out.borrow_mut().push(v), move || c_completed.set(true));

    source.next(1);
    source.next(2);
    notifier.next(());
    source.next(3);

    assert_eq!(*out.borrow(), vec![1, 2]);
    assert!(completed.get());
    assert_eq!(source.observer_count(), 0);
    assert_eq!(notifier.observer_count(), 0);
  }

  #[test]
  fn synchronous_notifier_skips_source() {
    let subscribed = Rc::new(Cell::new(false));
    let c_subscribed = subscribed.clone();
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    observable::defer(move || {
      c_subscribed.set(true);
      observable::of([1])
    })
    .take_until(observable::of([()]))
    .subscribe_complete(|_| panic!("no value expected"), move || c_completed.set(true));

    assert!(!subscribed.get());
    assert!(completed.get());
  }

  #[test]
  fn notifier_error_is_forwarded() {
    let notifier = Subject::<()>::default();
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    observable::never::<i32>()
      .take_until(notifier.as_observable())
      .subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));
    notifier.error(RxError::msg("stop"));
    assert_eq!(*errors.borrow(), vec![RxError::msg("stop")]);
  }

  #[test]
  fn notifier_completion_is_ignored() {
    let source = Subject::<i32>::default();
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    source
      .as_observable()
      .take_until(observable::empty::<()>())
      .subscribe(move |v| c_out.borrow_mut().push(v));
    source.next(1);
    assert_eq!(*out.borrow(), vec![1]);
  }
}
