use std::{collections::VecDeque, rc::Rc};

use super::subject_core::{SubjectCore, SubjectPolicy, Terminal};
use crate::scheduler::{Duration, Instant, Scheduler};

type Clock = Rc<dyn Fn() -> Instant>;

/// Keeps a bounded history of values for late subscribers.
pub struct Replay<Item> {
  buffer: VecDeque<(Option<Instant>, Item)>,
  buffer_size: usize,
  window: Option<(Duration, Clock)>,
}

impl<Item> Default for Replay<Item> {
  fn default() -> Self { Replay { buffer: VecDeque::new(), buffer_size: usize::MAX, window: None } }
}

impl<Item> Replay<Item> {
  fn trim(&mut self) {
    while self.buffer.len() > self.buffer_size {
      self.buffer.pop_front();
    }
    if let Some((window, clock)) = &self.window {
      let now = clock();
      while let Some((Some(at), _)) = self.buffer.front() {
        if now.saturating_duration_since(*at) <= *window {
          break;
        }
        self.buffer.pop_front();
      }
    }
  }
}

impl<Item: Clone + 'static> SubjectPolicy<Item> for Replay<Item> {
  fn replay(&mut self, _: Option<&Terminal>) -> Vec<Item> {
    self.trim();
    self.buffer.iter().map(|(_, v)| v.clone()).collect()
  }

  fn on_next(&mut self, value: &Item) -> bool {
    let at = self.window.as_ref().map(|(_, clock)| clock());
    self.buffer.push_back((at, value.clone()));
    self.trim();
    true
  }
}

/// A subject that replays past values to new subscribers.
///
/// New subscribers receive the buffered values in their original order
/// before any live value; if the subject already ended, the buffer is
/// followed by the terminal notification. Eviction is first-in first-out,
/// by count and, for [`with_window`](Self::with_window), by age.
pub type ReplaySubject<Item> = SubjectCore<Item, Replay<Item>>;

impl<Item: Clone + 'static> SubjectCore<Item, Replay<Item>> {
  /// A replay subject with an unbounded buffer.
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Keeps the last `buffer_size` values. A size of zero is treated as one.
  pub fn with_buffer_size(buffer_size: usize) -> Self {
    SubjectCore::with_policy(Replay { buffer_size: buffer_size.max(1), ..Replay::default() })
  }

  /// Keeps at most `buffer_size` values that are not older than `window`,
  /// measured with the clock of `scheduler`. Pass `usize::MAX` to bound by
  /// age only.
  pub fn with_window<S: Scheduler>(buffer_size: usize, window: Duration, scheduler: S) -> Self {
    let clock: Clock = Rc::new(move || scheduler.now());
    SubjectCore::with_policy(Replay {
      buffer: VecDeque::new(),
      buffer_size: buffer_size.max(1),
      window: Some((window, clock)),
    })
  }
}
