use crate::{observable::Observable, subscription::Subscription};

/// Creates an observable that produces values from an iterator.
///
/// Each subscription iterates a fresh clone of `iter`, emitting every element
/// synchronously inside `subscribe`, then completes. Emission stops early as
/// soon as the subscriber is closed, so infinite iterators are fine behind
/// `take`.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter(0..10).subscribe(|v| println!("{},", v));
/// observable::from_iter(vec![0, 1, 2, 3]).subscribe(|v| println!("{},", v));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> Observable<Iter::Item>
where
  Iter: IntoIterator + Clone + 'static,
  Iter::Item: 'static,
{
  Observable::new(move |subscriber| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        return Subscription::closed();
      }
      subscriber.next(v);
    }
    subscriber.complete();
    Subscription::closed()
  })
}

/// Emits the given values in order, then completes, all within `subscribe`.
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::of([1, 2, 3]).subscribe(|v| println!("{}", v));
/// ```
pub fn of<Item, I>(values: I) -> Observable<Item>
where
  I: IntoIterator<Item = Item>,
  Item: Clone + 'static,
{
  let values: Vec<Item> = values.into_iter().collect();
  from_iter(values)
}

/// Emits `count` consecutive integers starting at `start`, then completes.
/// A `count` of zero or less completes without emitting.
pub fn range(start: i64, count: i64) -> Observable<i64> {
  let end = if count <= 0 { start } else { start.saturating_add(count) };
  from_iter(start..end)
}
