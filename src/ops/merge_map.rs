use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
  rc::Rc,
};

use crate::{
  error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber,
};

struct MergeState<Item> {
  active: usize,
  outer_done: bool,
  buffer: VecDeque<Item>,
}

struct MergeCore<Item, Out, F> {
  observer: Subscriber<Out>,
  project: Rc<F>,
  concurrent: usize,
  state: RefCell<MergeState<Item>>,
  index: Cell<usize>,
  draining: Cell<bool>,
}

pub struct MergeMapObserver<Item, Out, F>(Rc<MergeCore<Item, Out, F>>);

struct MergeInnerObserver<Item, Out, F>(Rc<MergeCore<Item, Out, F>>);

fn subscribe_inner<Item, Out, F>(core: &Rc<MergeCore<Item, Out, F>>, value: Item)
where
  Item: 'static,
  Out: 'static,
  F: Fn(Item, usize) -> Observable<Out> + 'static,
{
  let index = core.index.get();
  core.index.set(index + 1);
  let inner = (core.project)(value, index);
  inner.subscribe_child(MergeInnerObserver(core.clone()), core.observer.subscription());
}

/// Starts buffered values while slots are free, then completes if nothing is
/// left. Inner observables completing synchronously inside the loop only
/// free their slot; the running loop picks up the next buffered value.
fn drain<Item, Out, F>(core: &Rc<MergeCore<Item, Out, F>>)
where
  Item: 'static,
  Out: 'static,
  F: Fn(Item, usize) -> Observable<Out> + 'static,
{
  if core.draining.replace(true) {
    return;
  }
  loop {
    if core.observer.is_closed() {
      break;
    }
    let queued = {
      let mut state = core.state.borrow_mut();
      if state.active < core.concurrent {
        let value = state.buffer.pop_front();
        if value.is_some() {
          state.active += 1;
        }
        value
      } else {
        None
      }
    };
    match queued {
      Some(value) => subscribe_inner(core, value),
      None => break,
    }
  }
  core.draining.set(false);

  let done = {
    let state = core.state.borrow();
    state.outer_done && state.active == 0
  };
  if done {
    core.observer.complete();
  }
}

impl<Item, Out, F> Observer<Item> for MergeMapObserver<Item, Out, F>
where
  Item: 'static,
  Out: 'static,
  F: Fn(Item, usize) -> Observable<Out> + 'static,
{
  fn next(&mut self, value: Item) {
    {
      let mut state = self.0.state.borrow_mut();
      if state.active >= self.0.concurrent || !state.buffer.is_empty() {
        state.buffer.push_back(value);
        return;
      }
      state.active += 1;
    }
    subscribe_inner(&self.0, value);
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.0.observer.error(err) }

  fn complete(&mut self) {
    let idle = {
      let mut state = self.0.state.borrow_mut();
      state.outer_done = true;
      state.active == 0
    };
    if idle {
      self.0.observer.complete();
    }
  }
}

impl<Item, Out, F> Observer<Out> for MergeInnerObserver<Item, Out, F>
where
  Item: 'static,
  Out: 'static,
  F: Fn(Item, usize) -> Observable<Out> + 'static,
{
  #[inline]
  fn next(&mut self, value: Out) { self.0.observer.next(value) }

  #[inline]
  fn error(&mut self, err: RxError) { self.0.observer.error(err) }

  fn complete(&mut self) {
    self.0.state.borrow_mut().active -= 1;
    drain(&self.0);
  }
}

impl<Item: 'static> Observable<Item> {
  /// Maps every value to an inner observable and mirrors all of them
  /// concurrently. Completes once the source and every inner observable
  /// completed.
  pub fn merge_map<Out, F>(self, project: F) -> Observable<Out>
  where
    Out: 'static,
    F: Fn(Item) -> Observable<Out> + 'static,
  {
    self.merge_map_indexed_with_concurrency(move |v, _| project(v), usize::MAX)
  }

  /// [`merge_map`](Observable::merge_map) whose projection also receives the
  /// zero-based index of the source value.
  pub fn merge_map_indexed<Out, F>(self, project: F) -> Observable<Out>
  where
    Out: 'static,
    F: Fn(Item, usize) -> Observable<Out> + 'static,
  {
    self.merge_map_indexed_with_concurrency(project, usize::MAX)
  }

  /// Like [`merge_map`](Observable::merge_map), but keeps at most
  /// `concurrent` inner subscriptions alive. Source values arriving while
  /// the limit is reached are buffered and projected in arrival order once a
  /// slot frees up. A limit of zero is treated as one.
  pub fn merge_map_with_concurrency<Out, F>(
    self,
    project: F,
    concurrent: usize,
  ) -> Observable<Out>
  where
    Out: 'static,
    F: Fn(Item) -> Observable<Out> + 'static,
  {
    self.merge_map_indexed_with_concurrency(move |v, _| project(v), concurrent)
  }

  fn merge_map_indexed_with_concurrency<Out, F>(
    self,
    project: F,
    concurrent: usize,
  ) -> Observable<Out>
  where
    Out: 'static,
    F: Fn(Item, usize) -> Observable<Out> + 'static,
  {
    let project = Rc::new(project);
    let concurrent = concurrent.max(1);
    self.lift(move |observer| {
      MergeMapObserver(Rc::new(MergeCore {
        observer,
        project: project.clone(),
        concurrent,
        state: RefCell::new(MergeState {
          active: 0,
          outer_done: false,
          buffer: VecDeque::new(),
        }),
        index: Cell::new(0),
        draining: Cell::new(false),
      }))
    })
  }

  /// Maps every value to an inner observable and mirrors them one after the
  /// other: the next inner observable is subscribed only after the current
  /// one completed.
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// let mut out = vec![];
  /// observable::of([1, 2])
  ///   .concat_map(|v| observable::of([v, v]))
  ///   .subscribe(move |v| out.push(v));
  /// // 1 1 2 2
  /// ```
  pub fn concat_map<Out, F>(self, project: F) -> Observable<Out>
  where
    Out: 'static,
    F: Fn(Item) -> Observable<Out> + 'static,
  {
    self.merge_map_indexed_with_concurrency(move |v, _| project(v), 1)
  }

  /// [`concat_map`](Observable::concat_map) whose projection also receives
  /// the zero-based index of the source value.
  pub fn concat_map_indexed<Out, F>(self, project: F) -> Observable<Out>
  where
    Out: 'static,
    F: Fn(Item, usize) -> Observable<Out> + 'static,
  {
    self.merge_map_indexed_with_concurrency(project, 1)
  }
}
