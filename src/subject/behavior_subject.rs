use super::subject_core::{SubjectCore, SubjectPolicy, Terminal};

/// Remembers the latest value and hands it to every new subscriber.
#[derive(Debug, Clone)]
pub struct Behavior<Item> {
  value: Item,
}

impl<Item: Clone + 'static> SubjectPolicy<Item> for Behavior<Item> {
  fn replay(&mut self, terminal: Option<&Terminal>) -> Vec<Item> {
    match terminal {
      None => vec![self.value.clone()],
      Some(_) => Vec::new(),
    }
  }

  fn on_next(&mut self, value: &Item) -> bool {
    self.value = value.clone();
    true
  }
}

/// A subject with a current value.
///
/// A subscriber receives the current value synchronously when it subscribes,
/// then every later value. Once the subject has ended, new subscribers only
/// receive the terminal notification.
pub type BehaviorSubject<Item> = SubjectCore<Item, Behavior<Item>>;

impl<Item: Clone + 'static> SubjectCore<Item, Behavior<Item>> {
  #[inline]
  pub fn new(value: Item) -> Self { SubjectCore::with_policy(Behavior { value }) }

  /// The current value. Always available, since a behavior subject starts
  /// with one.
  pub fn value(&self) -> Item { self.with_state(|policy| policy.value.clone()) }
}
