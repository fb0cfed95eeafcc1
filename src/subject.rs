//! Multicast hubs.
//!
//! Every subject is a [`SubjectCore`] parameterised by a [`SubjectPolicy`]
//! that controls what a new subscriber receives immediately and what `next`
//! and `complete` do to the remembered state:
//!
//! | alias               | replayed to new subscribers            |
//! |---------------------|----------------------------------------|
//! | [`Subject`]         | nothing                                |
//! | [`BehaviorSubject`] | the current value                      |
//! | [`ReplaySubject`]   | the buffered history                   |
//! | [`AsyncSubject`]    | the last value, once completed         |

mod async_subject;
mod behavior_subject;
mod replay_subject;
mod subject_core;

pub use async_subject::{AsyncLast, AsyncSubject};
pub use behavior_subject::{Behavior, BehaviorSubject};
pub use replay_subject::{Replay, ReplaySubject};
pub use subject_core::{Publish, Subject, SubjectCore, SubjectPolicy, Terminal};
