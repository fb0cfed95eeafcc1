use super::subject_core::{SubjectCore, SubjectPolicy, Terminal};

/// Holds back every value until completion, then releases the last one.
#[derive(Debug, Clone)]
pub struct AsyncLast<Item> {
  last: Option<Item>,
}

impl<Item> Default for AsyncLast<Item> {
  fn default() -> Self { AsyncLast { last: None } }
}

impl<Item: Clone + 'static> SubjectPolicy<Item> for AsyncLast<Item> {
  fn replay(&mut self, terminal: Option<&Terminal>) -> Vec<Item> {
    match terminal {
      Some(Terminal::Completed) => self.last.iter().cloned().collect(),
      _ => Vec::new(),
    }
  }

  fn on_next(&mut self, value: &Item) -> bool {
    self.last = Some(value.clone());
    false
  }

  fn on_complete(&mut self) -> Option<Item> { self.last.clone() }
}

/// A subject that emits only its last value, and only once it completes.
///
/// Nothing is broadcast on `next`. On `complete` every subscriber receives
/// the latest value, if there was one, followed by completion; subscribers
/// attaching after that get the same pair. An error discards the value.
pub type AsyncSubject<Item> = SubjectCore<Item, AsyncLast<Item>>;
