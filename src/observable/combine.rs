use std::{cell::Cell, rc::Rc};

use crate::{
  error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber,
  subscription::Subscription,
};

/// Subscribes to each source in order, moving on to the next one only after
/// the previous one completed. An error from any source ends the whole
/// sequence; later sources are never subscribed.
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::concat([observable::of([1, 2]), observable::of([3, 4])])
///   .subscribe(|v| print!("{v} "));
/// // 1 2 3 4
/// ```
pub fn concat<Item, I>(sources: I) -> Observable<Item>
where
  Item: 'static,
  I: IntoIterator<Item = Observable<Item>>,
{
  let sources: Rc<[Observable<Item>]> = sources.into_iter().collect();
  Observable::new(move |subscriber| {
    let core = Rc::new(ConcatCore {
      subscriber,
      sources: sources.clone(),
      index: Cell::new(0),
      draining: Cell::new(false),
      advance: Cell::new(false),
    });
    core.subscribe_next();
    Subscription::closed()
  })
}

struct ConcatCore<Item> {
  subscriber: Subscriber<Item>,
  sources: Rc<[Observable<Item>]>,
  index: Cell<usize>,
  draining: Cell<bool>,
  advance: Cell<bool>,
}

struct ConcatObserver<Item>(Rc<ConcatCore<Item>>);

impl<Item: 'static> ConcatCore<Item> {
  /// Moves on to the next source. A source completing synchronously while
  /// the loop runs only raises `advance`; the loop picks it up.
  fn subscribe_next(self: &Rc<Self>) {
    self.advance.set(true);
    if self.draining.replace(true) {
      return;
    }
    while self.advance.replace(false) {
      if self.subscriber.is_closed() {
        break;
      }
      let index = self.index.get();
      self.index.set(index + 1);
      match self.sources.get(index).cloned() {
        Some(source) => {
          source.subscribe_child(ConcatObserver(self.clone()), self.subscriber.subscription());
        }
        None => self.subscriber.complete(),
      }
    }
    self.draining.set(false);
  }
}

impl<Item: 'static> Observer<Item> for ConcatObserver<Item> {
  fn next(&mut self, value: Item) { self.0.subscriber.next(value) }

  fn error(&mut self, err: RxError) { self.0.subscriber.error(err) }

  fn complete(&mut self) { self.0.subscribe_next() }
}

/// Subscribes to every source at once and forwards values as they arrive.
///
/// Completes after all sources completed; the first error from any source
/// errors the result straight away and unsubscribes the others. Values of
/// different sources interleave in arrival order.
pub fn merge<Item, I>(sources: I) -> Observable<Item>
where
  Item: 'static,
  I: IntoIterator<Item = Observable<Item>>,
{
  let sources: Rc<[Observable<Item>]> = sources.into_iter().collect();
  Observable::new(move |subscriber: Subscriber<Item>| {
    if sources.is_empty() {
      subscriber.complete();
      return Subscription::closed();
    }
    let active = Rc::new(Cell::new(sources.len()));
    for source in sources.iter() {
      if subscriber.is_closed() {
        break;
      }
      let observer = MergeObserver { subscriber: subscriber.clone(), active: active.clone() };
      source.subscribe_child(observer, subscriber.subscription());
    }
    Subscription::closed()
  })
}

struct MergeObserver<Item> {
  subscriber: Subscriber<Item>,
  active: Rc<Cell<usize>>,
}

impl<Item> Observer<Item> for MergeObserver<Item> {
  fn next(&mut self, value: Item) { self.subscriber.next(value) }

  fn error(&mut self, err: RxError) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let remaining = self.active.get() - 1;
    self.active.set(remaining);
    if remaining == 0 {
      self.subscriber.complete();
    }
  }
}
