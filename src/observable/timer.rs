use crate::{
  observable::Observable,
  scheduler::{schedule_repeating, Duration, Instant, Scheduler},
  subscriber::Subscriber,
};

/// Emits `0` once `delay` has elapsed.
///
/// Without a `period` the observable completes right after that emission.
/// With one it keeps emitting `1`, `2`, ... every `period` and never
/// completes. Every subscription owns its own timer, cancelled on
/// unsubscribe.
///
/// ```
/// use rxlite::prelude::*;
///
/// let scheduler = TestScheduler::default();
/// observable::timer(Duration::from_millis(10), None, scheduler.clone())
///   .subscribe(|v| println!("fired {v}"));
/// scheduler.advance_by(Duration::from_millis(10));
/// ```
pub fn timer<S: Scheduler>(
  delay: Duration,
  period: Option<Duration>,
  scheduler: S,
) -> Observable<usize> {
  Observable::new(move |subscriber: Subscriber<usize>| match period {
    None => {
      let c_subscriber = subscriber.clone();
      scheduler.schedule(
        delay,
        Box::new(move || {
          c_subscriber.next(0);
          c_subscriber.complete();
        }),
      )
    }
    Some(period) => schedule_repeating(&scheduler, delay, period, move |seq| subscriber.next(seq)),
  })
}

/// Like [`timer`], but the first emission happens at `at`. An instant that
/// already passed fires on the next scheduler turn.
pub fn timer_at<S: Scheduler>(
  at: Instant,
  period: Option<Duration>,
  scheduler: S,
) -> Observable<usize> {
  let delay = at.saturating_duration_since(scheduler.now());
  timer(delay, period, scheduler)
}

/// Creates an observable which will fire at `period` time into the future,
/// and will repeat every `period` interval after. Same as
/// `timer(period, Some(period), scheduler)`.
pub fn interval<S: Scheduler>(period: Duration, scheduler: S) -> Observable<usize> {
  timer(period, Some(period), scheduler)
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[test]
  fn one_shot_timer() {
    let scheduler = TestScheduler::default();
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());

    observable::timer(Duration::from_millis(50), None, scheduler.clone())
      .subscribe_complete(move |v| c_values.borrow_mut().push(v), move || c_completed.set(true));

    scheduler.advance_by(Duration::from_millis(49));
    assert!(values.borrow().is_empty());
    scheduler.advance_by(Duration::from_millis(1));
    assert_eq!(*values.borrow(), vec![0]);
    assert!(completed.get());
    assert!(scheduler.is_empty());
  }

  #[test]
  fn zero_delay_is_not_synchronous() {
    let scheduler = TestScheduler::default();
    let hit = Rc::new(Cell::new(false));
    let c_hit = hit.clone();
    observable::timer(Duration::ZERO, None, scheduler.clone()).subscribe(move |_| c_hit.set(true));
    assert!(!hit.get());
    scheduler.advance_by(Duration::ZERO);
    assert!(hit.get());
  }

  #[test]
  fn periodic_timer_never_completes() {
    let scheduler = TestScheduler::default();
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());

    let subscription = observable::timer(
      Duration::from_millis(100),
      Some(Duration::from_millis(10)),
      scheduler.clone(),
    )
    .subscribe_complete(move |v| c_values.borrow_mut().push(v), move || c_completed.set(true));

    scheduler.advance_by(Duration::from_millis(130));
    assert_eq!(*values.borrow(), vec![0, 1, 2, 3]);
    assert!(!completed.get());

    subscription.unsubscribe();
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(values.borrow().len(), 4);
    assert!(scheduler.is_empty());
  }

  #[test]
  fn interval_first_emission_is_delayed() {
    let scheduler = TestScheduler::default();
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    let subscription = observable::interval(Duration::from_millis(20), scheduler.clone())
      .subscribe(move |v| c_values.borrow_mut().push(v));

    scheduler.advance_by(Duration::from_millis(19));
    assert!(values.borrow().is_empty());
    scheduler.advance_by(Duration::from_millis(41));
    assert_eq!(*values.borrow(), vec![0, 1, 2]);
    subscription.unsubscribe();
  }

  #[test]
  fn each_subscription_owns_its_timer() {
    let scheduler = TestScheduler::default();
    let source = observable::interval(Duration::from_millis(10), scheduler.clone());
    let (a, b) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
    let (c_a, c_b) = (a.clone(), b.clone());

    let first = source.subscribe(move |_| c_a.set(c_a.get() + 1));
    scheduler.advance_by(Duration::from_millis(5));
    let second = source.subscribe(move |_| c_b.set(c_b.get() + 1));
    scheduler.advance_by(Duration::from_millis(10));
    first.unsubscribe();
    scheduler.advance_by(Duration::from_millis(20));

    assert_eq!(a.get(), 1);
    assert_eq!(b.get(), 3);
    second.unsubscribe();
  }

  #[test]
  fn timer_at_past_instant_fires_next_turn() {
    let scheduler = TestScheduler::default();
    scheduler.advance_by(Duration::from_millis(10));
    let past = scheduler.now() - Duration::from_millis(5);
    let hit = Rc::new(Cell::new(false));
    let c_hit = hit.clone();
    observable::timer_at(past, None, scheduler.clone()).subscribe(move |_| c_hit.set(true));
    scheduler.advance_by(Duration::ZERO);
    assert!(hit.get());
  }
}
