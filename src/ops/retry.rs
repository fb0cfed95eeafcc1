//! Resubscribing to a source after it errored.
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//!
//! use rxlite::prelude::*;
//!
//! let attempts = Rc::new(Cell::new(0));
//! let c_attempts = attempts.clone();
//! let source = observable::defer(move || {
//!   c_attempts.set(c_attempts.get() + 1);
//!   if c_attempts.get() < 3 {
//!     observable::throw_error("flaky".into())
//!   } else {
//!     observable::of([1])
//!   }
//! });
//!
//! source.retry(3).subscribe(|v| assert_eq!(v, 1));
//! assert_eq!(attempts.get(), 3);
//! ```
//!
//! A [`RetryConfig`] adds a delay between attempts (honoured by
//! [`retry_on`](Observable::retry_on)) and can reset the attempt counter once
//! the source emits again.

use std::{cell::Cell, rc::Rc};

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
  subscription::Subscription,
};

/// Decides whether, and after which delay, an errored source is subscribed
/// again.
///
/// ```
/// use rxlite::{ops::retry::RetryPolicy, prelude::*};
///
/// struct OnlyTimeouts;
///
/// impl RetryPolicy for OnlyTimeouts {
///   fn should_retry(&self, err: &RxError, attempt: usize) -> Option<Duration> {
///     (err.is_timeout() && attempt < 5).then_some(Duration::ZERO)
///   }
/// }
/// ```
pub trait RetryPolicy: 'static {
  /// `attempt` is the number of retries already made: 0 on the first error.
  ///
  /// Returns the delay before resubscribing, or `None` to give up and
  /// forward `err`.
  fn should_retry(&self, err: &RxError, attempt: usize) -> Option<Duration>;

  /// Whether a value emitted by the source resets the attempt counter.
  fn reset_on_success(&self) -> bool { false }
}

/// A plain count: retry that many times, without delay.
impl RetryPolicy for usize {
  fn should_retry(&self, _err: &RxError, attempt: usize) -> Option<Duration> {
    (attempt < *self).then_some(Duration::ZERO)
  }
}

/// Builder for the common retry policies.
///
/// ```
/// use rxlite::{ops::retry::RetryConfig, scheduler::Duration};
///
/// let config = RetryConfig::new().count(5).delay(Duration::from_secs(1)).reset_on_success();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryConfig {
  count: Option<usize>,
  delay: Option<Duration>,
  reset_on_success: bool,
}

impl RetryConfig {
  /// Retries forever, without delay.
  pub fn new() -> Self { Self::default() }

  /// Maximum number of retries; `count(3)` allows 4 subscriptions in total.
  pub fn count(mut self, count: usize) -> Self {
    self.count = Some(count);
    self
  }

  pub fn delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  /// Resets the attempt counter whenever the source emits a value.
  pub fn reset_on_success(mut self) -> Self {
    self.reset_on_success = true;
    self
  }
}

impl RetryPolicy for RetryConfig {
  fn should_retry(&self, _err: &RxError, attempt: usize) -> Option<Duration> {
    match self.count {
      Some(count) if attempt >= count => None,
      _ => Some(self.delay.unwrap_or(Duration::ZERO)),
    }
  }

  fn reset_on_success(&self) -> bool { self.reset_on_success }
}

type ScheduleFn = dyn Fn(Duration, Box<dyn FnOnce()>) -> Subscription;

struct RetryCore<Item, P> {
  source: Observable<Item>,
  policy: Rc<P>,
  observer: Subscriber<Item>,
  attempts: Cell<usize>,
  schedule: Option<Rc<ScheduleFn>>,
  draining: Cell<bool>,
  resubscribe: Cell<bool>,
}

pub struct RetryObserver<Item, P>(Rc<RetryCore<Item, P>>);

/// Subscribes the source again. An attempt that errors synchronously while
/// the loop runs only raises `resubscribe`; the loop picks it up.
fn subscribe_source<Item: 'static, P: RetryPolicy>(core: &Rc<RetryCore<Item, P>>) {
  core.resubscribe.set(true);
  if core.draining.replace(true) {
    return;
  }
  while core.resubscribe.replace(false) {
    if core.observer.is_closed() {
      break;
    }
    let parent = core.observer.subscription().clone();
    core.source.subscribe_child(RetryObserver(core.clone()), &parent);
  }
  core.draining.set(false);
}

impl<Item: 'static, P: RetryPolicy> Observer<Item> for RetryObserver<Item, P> {
  fn next(&mut self, value: Item) {
    if self.0.policy.reset_on_success() {
      self.0.attempts.set(0);
    }
    self.0.observer.next(value);
  }

  fn error(&mut self, err: RxError) {
    let attempt = self.0.attempts.get();
    let Some(delay) = self.0.policy.should_retry(&err, attempt) else {
      self.0.observer.error(err);
      return;
    };
    self.0.attempts.set(attempt + 1);
    tracing::debug!(error = %err, attempt = attempt + 1, ?delay, "retrying source");

    match &self.0.schedule {
      _ if delay.is_zero() => subscribe_source(&self.0),
      Some(schedule) => {
        let core = self.0.clone();
        let handle = schedule(delay, Box::new(move || subscribe_source(&core)));
        self.0.observer.subscription().add(handle);
      }
      None => {
        tracing::warn!(?delay, "retry ignores the policy delay, use retry_on to wait");
        subscribe_source(&self.0);
      }
    }
  }

  #[inline]
  fn complete(&mut self) { self.0.observer.complete() }
}

impl<Item: 'static> Observable<Item> {
  /// Subscribes to the source again, right away, each time it errors and
  /// `policy` allows another attempt. Once the policy gives up the last
  /// error is forwarded. A non-zero delay returned by the policy is not
  /// waited for; it is reported with `tracing::warn!`. Use
  /// [`retry_on`](Observable::retry_on) to honour delays.
  pub fn retry<P: RetryPolicy>(self, policy: P) -> Observable<Item> {
    self.retry_with(policy, None)
  }

  /// Like [`retry`](Observable::retry), waiting on `scheduler` for the delay
  /// the policy returns before each new attempt.
  pub fn retry_on<P, S>(self, policy: P, scheduler: S) -> Observable<Item>
  where
    P: RetryPolicy,
    S: Scheduler,
  {
    let schedule: Rc<ScheduleFn> = Rc::new(move |delay, task| scheduler.schedule(delay, task));
    self.retry_with(policy, Some(schedule))
  }

  fn retry_with<P: RetryPolicy>(
    self,
    policy: P,
    schedule: Option<Rc<ScheduleFn>>,
  ) -> Observable<Item> {
    let policy = Rc::new(policy);
    Observable::new(move |observer: Subscriber<Item>| {
      let core = Rc::new(RetryCore {
        source: self.clone(),
        policy: policy.clone(),
        observer,
        attempts: Cell::new(0),
        schedule: schedule.clone(),
        draining: Cell::new(false),
        resubscribe: Cell::new(false),
      });
      subscribe_source(&core);
      Subscription::closed()
    })
  }
}
