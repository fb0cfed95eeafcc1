use std::{cell::RefCell, rc::Rc};

use crate::{
  error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

#[derive(Default)]
struct SwitchState {
  inner: Option<Subscription>,
  outer_done: bool,
}

pub struct SwitchMapObserver<Out, F> {
  observer: Subscriber<Out>,
  project: Rc<F>,
  index: usize,
  state: Rc<RefCell<SwitchState>>,
}

struct SwitchInnerObserver<Out> {
  observer: Subscriber<Out>,
  state: Rc<RefCell<SwitchState>>,
  subscription: Subscription,
}

impl<Item, Out, F> Observer<Item> for SwitchMapObserver<Out, F>
where
  Out: 'static,
  F: Fn(Item, usize) -> Observable<Out>,
{
  fn next(&mut self, value: Item) {
    let previous = self.state.borrow_mut().inner.take();
    if let Some(previous) = previous {
      previous.unsubscribe();
    }

    let inner = (self.project)(value, self.index);
    self.index += 1;
    let subscription = self.observer.subscription().child();
    self.state.borrow_mut().inner = Some(subscription.clone());
    let observer = SwitchInnerObserver {
      observer: self.observer.clone(),
      state: self.state.clone(),
      subscription: subscription.clone(),
    };
    inner.actual_subscribe(Subscriber::with_subscription(observer, subscription));
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) {
    let idle = {
      let mut state = self.state.borrow_mut();
      state.outer_done = true;
      state.inner.is_none()
    };
    if idle {
      self.observer.complete();
    }
  }
}

impl<Out> Observer<Out> for SwitchInnerObserver<Out> {
  #[inline]
  fn next(&mut self, value: Out) { self.observer.next(value) }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) {
    let done = {
      let mut state = self.state.borrow_mut();
      if state.inner.as_ref().is_some_and(|s| s.is_same(&self.subscription)) {
        state.inner = None;
      }
      state.outer_done && state.inner.is_none()
    };
    if done {
      self.observer.complete();
    }
  }
}

impl<Item: 'static> Observable<Item> {
  /// Maps every value to an inner observable and mirrors only the most
  /// recent one: the previous inner subscription is unsubscribed before the
  /// next inner observable is subscribed.
  ///
  /// Completes once the source and the latest inner observable have both
  /// completed. An error from either side errors the result.
  pub fn switch_map<Out, F>(self, project: F) -> Observable<Out>
  where
    Out: 'static,
    F: Fn(Item) -> Observable<Out> + 'static,
  {
    self.switch_map_indexed(move |v, _| project(v))
  }

  /// [`switch_map`](Observable::switch_map) whose projection also receives
  /// the zero-based index of the source value.
  pub fn switch_map_indexed<Out, F>(self, project: F) -> Observable<Out>
  where
    Out: 'static,
    F: Fn(Item, usize) -> Observable<Out> + 'static,
  {
    let project = Rc::new(project);
    self.lift(move |observer| SwitchMapObserver {
      observer,
      project: project.clone(),
      index: 0,
      state: Rc::new(RefCell::new(SwitchState::default())),
    })
  }
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::{prelude::*, subscriber::Notification};

  #[test]
  fn only_latest_inner_runs() {
    let scheduler = TestScheduler::default();
    let log = Rc::new(RefCell::new(vec![]));
    let torn_down = Rc::new(RefCell::new(vec![]));

    let (c_log, c_torn_down, c_scheduler) = (log.clone(), torn_down.clone(), scheduler.clone());
    let c_log2 = log.clone();
    observable::of([1, 2, 3])
      .switch_map(move |outer| {
        let c_torn_down = c_torn_down.clone();
        let c_log = c_log2.clone();
        observable::timer(Duration::from_millis(10), None, c_scheduler.clone())
          .map(move |_| outer * 10)
          .finalize(move || {
            c_log.borrow_mut().push(format!("teardown {outer}"));
            c_torn_down.borrow_mut().push(outer);
          })
      })
      .subscribe_complete(move |v| c_log.borrow_mut().push(format!("next {v}")), || {});

    assert_eq!(*torn_down.borrow(), vec![1, 2]);
    scheduler.advance_by(Duration::from_millis(10));
    assert_eq!(*log.borrow(), vec!["teardown 1", "teardown 2", "next 30", "teardown 3"]);
  }

  #[test]
  fn completes_after_outer_and_latest_inner() {
    let outer = Subject::<i32>::default();
    let inner = Subject::<i32>::default();
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    let c_inner = inner.clone();
    outer.as_observable().switch_map(move |_| c_inner.as_observable()).subscribe_all(
      move |v| l1.borrow_mut().push(Notification::Next(v)),
      move |e| l2.borrow_mut().push(Notification::Error(e)),
      move || l3.borrow_mut().push(Notification::Complete),
    );

    outer.next(1);
    inner.next(7);
    outer.complete();
    assert_eq!(*log.borrow(), vec![Notification::Next(7)]);
    inner.complete();
    assert_eq!(*log.borrow(), vec![Notification::Next(7), Notification::Complete]);
  }

  #[test]
  fn synchronous_inners() {
    let out = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_out, c_completed) = (out.clone(), completed.clone());
    observable::of([1, 2])
      .switch_map(|v| observable::of([v, v * 10]))
      .subscribe_complete(move |v| c_out.borrow_mut().push(v), move || c_completed.set(true));
    assert_eq!(*out.borrow(), vec![1, 10, 2, 20]);
    assert!(completed.get());
  }

  #[test]
  fn indexed_projection_counts_per_subscription() {
    let shared = observable::of([5, 6]).switch_map_indexed(|v, i| observable::of([(v, i)]));
    for _ in 0..2 {
      let out = Rc::new(RefCell::new(vec![]));
      let c_out = out.clone();
      shared.subscribe(move |v| c_out.borrow_mut().push(v));
      assert_eq!(*out.borrow(), vec![(5, 0), (6, 1)]);
    }
  }

  #[test]
  fn inner_error_terminates() {
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    let outer = Subject::<i32>::default();
    outer
      .as_observable()
      .switch_map(|_| observable::throw_error::<i32>("inner".into()))
      .subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));
    outer.next(1);
    assert_eq!(*errors.borrow(), vec![RxError::msg("inner")]);
    assert_eq!(outer.observer_count(), 0);
  }

  #[test]
  fn unsubscribe_tears_down_inner() {
    let inner = Subject::<i32>::default();
    let c_inner = inner.clone();
    let subscription =
      observable::of([1]).switch_map(move |_| c_inner.as_observable()).subscribe(|_| {});
    assert_eq!(inner.observer_count(), 1);
    subscription.unsubscribe();
    assert_eq!(inner.observer_count(), 0);
  }
}
