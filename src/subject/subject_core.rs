use std::{
  cell::RefCell,
  rc::{Rc, Weak},
};

use smallvec::SmallVec;

use crate::{
  error::RxError,
  observable::Observable,
  observer::{Observer, ObserverAll},
  subscriber::Subscriber,
  subscription::Subscription,
};

/// How a subject ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminal {
  Completed,
  Errored(RxError),
}

/// Decides what a subject remembers and what late subscribers receive.
///
/// The broadcast machinery lives in [`SubjectCore`]; a policy only answers
/// three questions:
/// - what does a new subscriber receive synchronously on subscribe,
/// - does a `next` reach the current subscribers,
/// - is a value emitted right before completion.
pub trait SubjectPolicy<Item>: 'static {
  /// Values replayed to a subscriber that attaches now. `terminal` is the
  /// terminal state of the subject, if it already ended; the terminal
  /// notification itself is delivered by the core after these values.
  fn replay(&mut self, terminal: Option<&Terminal>) -> Vec<Item>;

  /// Records `value`. Returns `false` to keep it from current subscribers.
  fn on_next(&mut self, value: &Item) -> bool;

  /// A final value delivered to every subscriber right before `complete`.
  fn on_complete(&mut self) -> Option<Item> { None }
}

/// Plain multicast: no memory, nothing replayed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Publish;

impl<Item> SubjectPolicy<Item> for Publish {
  fn replay(&mut self, _: Option<&Terminal>) -> Vec<Item> { Vec::new() }

  fn on_next(&mut self, _: &Item) -> bool { true }
}

struct State<Item, P> {
  observers: Vec<(usize, Subscriber<Item>)>,
  next_id: usize,
  terminal: Option<Terminal>,
  policy: P,
}

/// Subject: A hot observable that multicasts values to many observers.
///
/// `SubjectCore` acts as both an [`Observer`] and a source of
/// [`Observable`]s. It keeps the list of current subscribers and broadcasts
/// every notification it receives to all of them. Clones share the same
/// subscriber list.
///
/// # Broadcast semantics
///
/// - Every `next`/`error`/`complete` iterates over a snapshot of the
///   subscribers taken when the call starts. A subscriber added by a handler
///   during a broadcast misses that broadcast; one removed during a broadcast
///   is skipped for the rest of it.
/// - Emitting on a subject from inside one of its own handlers is allowed; a
///   subscriber that is still handling a value gets the nested one right after
///   it returns.
/// - After `error` or `complete` the subject is stopped: further notifications
///   are ignored and new subscribers receive what the policy replays followed
///   by the terminal notification.
///
/// The variants are aliases over a [`SubjectPolicy`]: [`Subject`],
/// [`BehaviorSubject`](crate::subject::BehaviorSubject),
/// [`ReplaySubject`](crate::subject::ReplaySubject) and
/// [`AsyncSubject`](crate::subject::AsyncSubject).
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxlite::prelude::*;
///
/// let subject = Subject::<i32>::default();
/// let results = Rc::new(RefCell::new(vec![]));
/// let c_results = results.clone();
///
/// subject.subscribe(move |v| c_results.borrow_mut().push(v));
///
/// subject.next(1);
/// subject.next(2);
/// assert_eq!(*results.borrow(), vec![1, 2]);
/// ```
pub struct SubjectCore<Item, P> {
  state: Rc<RefCell<State<Item, P>>>,
}

/// A subject that only forwards what it receives while subscribed.
pub type Subject<Item> = SubjectCore<Item, Publish>;

impl<Item, P> Clone for SubjectCore<Item, P> {
  fn clone(&self) -> Self { SubjectCore { state: self.state.clone() } }
}

impl<Item, P: Default> Default for SubjectCore<Item, P> {
  fn default() -> Self { Self::with_policy(P::default()) }
}

impl<Item, P> SubjectCore<Item, P> {
  pub(crate) fn with_policy(policy: P) -> Self {
    SubjectCore {
      state: Rc::new(RefCell::new(State {
        observers: Vec::new(),
        next_id: 0,
        terminal: None,
        policy,
      })),
    }
  }

  /// Number of subscribers currently attached.
  pub fn observer_count(&self) -> usize { self.state.borrow().observers.len() }

  /// True once `error` or `complete` was called.
  pub fn is_stopped(&self) -> bool { self.state.borrow().terminal.is_some() }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.state, &other.state) }

  pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
    f(&mut self.state.borrow_mut().policy)
  }
}

impl<Item, P> SubjectCore<Item, P>
where
  Item: Clone + 'static,
  P: SubjectPolicy<Item>,
{
  pub fn next(&self, value: Item) {
    let targets = {
      let mut state = self.state.borrow_mut();
      if state.terminal.is_some() || !state.policy.on_next(&value) {
        return;
      }
      snapshot(&state.observers)
    };
    broadcast_value(targets, value);
  }

  pub fn error(&self, err: RxError) {
    let targets = {
      let mut state = self.state.borrow_mut();
      if state.terminal.is_some() {
        return;
      }
      state.terminal = Some(Terminal::Errored(err.clone()));
      std::mem::take(&mut state.observers)
    };
    tracing::debug!(error = %err, subscribers = targets.len(), "subject errored");
    for (_, subscriber) in targets {
      subscriber.error(err.clone());
    }
  }

  pub fn complete(&self) {
    let (targets, last) = {
      let mut state = self.state.borrow_mut();
      if state.terminal.is_some() {
        return;
      }
      state.terminal = Some(Terminal::Completed);
      let last = state.policy.on_complete();
      (std::mem::take(&mut state.observers), last)
    };
    tracing::debug!(subscribers = targets.len(), "subject completed");
    for (_, subscriber) in targets {
      if let Some(last) = &last {
        subscriber.next(last.clone());
      }
      subscriber.complete();
    }
  }

  /// An observable view of this subject. Subscribing to it registers a new
  /// subscriber on the subject.
  pub fn as_observable(&self) -> Observable<Item> {
    let subject = self.clone();
    Observable::new(move |subscriber| subject.add_subscriber(subscriber))
  }

  pub fn subscribe<N>(&self, next: N) -> Subscription
  where
    N: FnMut(Item) + 'static,
  {
    self.as_observable().subscribe(next)
  }

  pub fn subscribe_err<N, E>(&self, next: N, error: E) -> Subscription
  where
    N: FnMut(Item) + 'static,
    E: FnMut(RxError) + 'static,
  {
    self.as_observable().subscribe_err(next, error)
  }

  pub fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Item) + 'static,
    E: FnMut(RxError) + 'static,
    C: FnMut() + 'static,
  {
    self.as_observable().subscribe_with(ObserverAll::new(next, error, complete))
  }

  pub fn subscribe_with<O>(&self, observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    self.as_observable().subscribe_with(observer)
  }

  fn add_subscriber(&self, subscriber: Subscriber<Item>) -> Subscription {
    let (replay, terminal, id) = {
      let mut state = self.state.borrow_mut();
      let terminal = state.terminal.clone();
      let replay = state.policy.replay(terminal.as_ref());
      let id = match terminal {
        Some(_) => None,
        None => {
          let id = state.next_id;
          state.next_id += 1;
          state.observers.push((id, subscriber.clone()));
          Some(id)
        }
      };
      (replay, terminal, id)
    };

    for value in replay {
      if subscriber.is_closed() {
        break;
      }
      subscriber.next(value);
    }
    match terminal {
      Some(Terminal::Errored(err)) => subscriber.error(err),
      Some(Terminal::Completed) => subscriber.complete(),
      None => {}
    }

    match id {
      Some(id) => {
        let weak: Weak<RefCell<State<Item, P>>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
          if let Some(state) = weak.upgrade() {
            state.borrow_mut().observers.retain(|(i, _)| *i != id);
          }
        })
      }
      None => Subscription::closed(),
    }
  }
}

fn snapshot<Item>(observers: &[(usize, Subscriber<Item>)]) -> SmallVec<[Subscriber<Item>; 2]> {
  observers.iter().map(|(_, s)| s.clone()).collect()
}

/// The last subscriber receives the moved value instead of a clone.
fn broadcast_value<Item: Clone>(targets: SmallVec<[Subscriber<Item>; 2]>, value: Item) {
  let mut iter = targets.into_iter().peekable();
  while let Some(subscriber) = iter.next() {
    if iter.peek().is_some() {
      subscriber.next(value.clone());
    } else {
      subscriber.next(value);
      break;
    }
  }
}

impl<Item, P> Observer<Item> for SubjectCore<Item, P>
where
  Item: Clone + 'static,
  P: SubjectPolicy<Item>,
{
  #[inline]
  fn next(&mut self, value: Item) { SubjectCore::next(self, value) }

  #[inline]
  fn error(&mut self, err: RxError) { SubjectCore::error(self, err) }

  #[inline]
  fn complete(&mut self) { SubjectCore::complete(self) }
}

impl<Item, P> From<SubjectCore<Item, P>> for Observable<Item>
where
  Item: Clone + 'static,
  P: SubjectPolicy<Item>,
{
  fn from(subject: SubjectCore<Item, P>) -> Self { subject.as_observable() }
}
