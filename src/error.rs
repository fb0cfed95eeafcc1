//! Error values carried on the error channel.
//!
//! Every observable in this crate errors with [`RxError`]. Two error kinds are
//! raised by the library itself: [`EmptyError`] from
//! [`first_value_from`](crate::ops::into_future::first_value_from) /
//! [`last_value_from`](crate::ops::into_future::last_value_from), and
//! [`TimeoutError`] from the `timeout` operator. Everything else is a user
//! error wrapped with [`RxError::msg`] or [`RxError::custom`].

use std::{error::Error, sync::Arc};

use crate::scheduler::Duration;

/// Raised when a source completes without emitting and no default value was
/// supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no elements in sequence")]
pub struct EmptyError;

/// Raised by the `timeout` operator when the source stays silent for too long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("timeout has occurred after {after:?}")]
pub struct TimeoutError {
  pub after: Duration,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RxError {
  #[error(transparent)]
  Empty(#[from] EmptyError),

  #[error(transparent)]
  Timeout(#[from] TimeoutError),

  #[error("{0}")]
  Message(String),

  #[error("{0}")]
  Custom(Arc<dyn Error + Send + Sync + 'static>),
}

impl RxError {
  /// Creates an error carrying only a message.
  pub fn msg(message: impl Into<String>) -> Self { RxError::Message(message.into()) }

  /// Wraps any error value.
  pub fn custom<E>(err: E) -> Self
  where
    E: Error + Send + Sync + 'static,
  {
    RxError::Custom(Arc::new(err))
  }

  #[inline]
  pub fn is_empty(&self) -> bool { matches!(self, RxError::Empty(_)) }

  #[inline]
  pub fn is_timeout(&self) -> bool { matches!(self, RxError::Timeout(_)) }

  /// Attempts to view a [`RxError::Custom`] payload as a concrete error type.
  pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
    match self {
      RxError::Custom(err) => err.downcast_ref::<E>(),
      _ => None,
    }
  }
}

impl PartialEq for RxError {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (RxError::Empty(_), RxError::Empty(_)) => true,
      (RxError::Timeout(a), RxError::Timeout(b)) => a == b,
      (RxError::Message(a), RxError::Message(b)) => a == b,
      (RxError::Custom(a), RxError::Custom(b)) => Arc::ptr_eq(a, b),
      _ => false,
    }
  }
}

impl From<&str> for RxError {
  fn from(message: &str) -> Self { RxError::msg(message) }
}

impl From<String> for RxError {
  fn from(message: String) -> Self { RxError::Message(message) }
}
