//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioLocalScheduler;
pub use crate::{
  error::{EmptyError, RxError, TimeoutError},
  observable::{self, Observable},
  observer::{Observer, ObserverAll},
  ops::{
    into_future::{
      first_value_from, first_value_from_or, last_value_from, last_value_from_or, ValueFuture,
    },
    retry::{RetryConfig, RetryPolicy},
  },
  scheduler::{schedule_repeating, Duration, Instant, Scheduler, TestScheduler},
  subject::{AsyncSubject, BehaviorSubject, ReplaySubject, Subject, SubjectCore},
  subscriber::{Notification, Subscriber},
  subscription::{Subscription, SubscriptionGuard, SubscriptionLike},
};
