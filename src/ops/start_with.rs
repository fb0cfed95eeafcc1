use crate::observable::{concat, of, Observable};

impl<Item: Clone + 'static> Observable<Item> {
  /// Emits `values`, in order, synchronously on subscribe, then mirrors the
  /// source.
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// observable::of([3, 4]).start_with([1, 2]).subscribe(|v| print!("{v} "));
  /// // 1 2 3 4
  /// ```
  pub fn start_with<I>(self, values: I) -> Observable<Item>
  where
    I: IntoIterator<Item = Item>,
  {
    concat([of(values), self])
  }
}
