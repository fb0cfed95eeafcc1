//! # rxlite: a single-threaded Reactive Extensions core
//!
//! Lazy, push-based streams of values over time, composed with operators and
//! multicast through subjects.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A cold source: every `subscribe` starts a new execution |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` notifications |
//! | [`Subscriber`] | The observer handed to a subscribe function; enforces the observer contract |
//! | [`Subscription`] | Handle to cancel an active execution |
//! | [`Subject`] | An observable that is also an observer, multicasting to its subscribers |
//! | [`Scheduler`] | Decides when timed work runs |
//!
//! Everything runs on the current thread: shared state is reference counted
//! with `Rc`, and nothing in the API is `Send`.
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** + **`timer`** (default): implements [`Scheduler`]
//!   for `futures::executor::LocalSpawner`.
//! - **`tokio-scheduler`**: adds `TokioLocalScheduler`, running on a tokio
//!   `LocalSet`.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscriber`]: subscriber::Subscriber
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`Scheduler`]: scheduler::Scheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
