use std::rc::Rc;

use crate::{
  error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber,
  subscription::Subscription,
};

pub struct CatchErrorObserver<Item, F> {
  observer: Subscriber<Item>,
  selector: Rc<F>,
  caught: Observable<Item>,
}

impl<Item, F> Observer<Item> for CatchErrorObserver<Item, F>
where
  Item: 'static,
  F: Fn(RxError, Observable<Item>) -> Observable<Item>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: RxError) {
    let fallback = (self.selector)(err, self.caught.clone());
    let parent = self.observer.subscription().clone();
    fallback.subscribe_child(self.observer.clone(), &parent);
  }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

fn catch_with<Item, F>(source: Observable<Item>, selector: Rc<F>) -> Observable<Item>
where
  Item: 'static,
  F: Fn(RxError, Observable<Item>) -> Observable<Item> + 'static,
{
  Observable::new(move |subscriber: Subscriber<Item>| {
    let parent = subscriber.subscription().clone();
    let observer = CatchErrorObserver {
      observer: subscriber,
      selector: selector.clone(),
      caught: catch_with(source.clone(), selector.clone()),
    };
    source.subscribe_child(observer, &parent);
    Subscription::closed()
  })
}

impl<Item: 'static> Observable<Item> {
  /// Recovers from an error of the source: the errored source is
  /// unsubscribed and the observable returned by `selector` takes its
  /// place.
  ///
  /// `selector` also receives `caught`, this very operator applied to the
  /// source again, so returning it restarts the source.
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// observable::throw_error::<i32>("boom".into())
  ///   .catch_error(|_, _| observable::of([0]))
  ///   .subscribe(|v| assert_eq!(v, 0));
  /// ```
  pub fn catch_error<F>(self, selector: F) -> Observable<Item>
  where
    F: Fn(RxError, Observable<Item>) -> Observable<Item> + 'static,
  {
    catch_with(self, Rc::new(selector))
  }
}
