//! A cursor that flattens nested cursors into one sequence.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
  Cursor,
  Item,
  Key,
};

/// Walks an ordered mapping of [`Item`]s.
///
/// Plain values are single elements keyed by their outer key. Cursor items
/// are walked to exhaustion in place, yielding their own keys and values,
/// before the outer walk moves on. Cursor items that have nothing to yield
/// are skipped.
#[derive(Debug, Clone, Default)]
pub struct FlatteningCursor {
  items: IndexMap<Key, Item>,
  index: usize,
}

impl FlatteningCursor {
  pub fn new(items: impl IntoIterator<Item = (Key, Item)>) -> Self {
    let mut cursor = Self {
      items: items.into_iter().collect(),
      index: 0,
    };
    cursor.reset();
    cursor
  }

  /// Creates a cursor over `items` keyed by their position.
  pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
    Self::new(
      items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| (Key::from(idx), item)),
    )
  }

  /// Appends `item` under the next free positional key. Once `i64::MAX` is
  /// taken, the item replaces the one stored there.
  pub fn push(&mut self, item: Item) {
    let next = self
      .items
      .keys()
      .filter_map(Key::as_index)
      .max()
      .map_or(0, |idx| idx.checked_add(1).unwrap_or(idx));
    self.insert(Key::Index(next), item);
  }

  /// Inserts `item` under `key`, replacing an existing item in place.
  ///
  /// Replacing the current item restarts it, moving on when it has nothing
  /// to yield.
  pub fn insert(&mut self, key: Key, item: Item) {
    let was_valid = self.is_valid();
    let (idx, _) = self.items.insert_full(key, item);
    if !was_valid || idx == self.index {
      self.move_to_valid();
    }
  }

  pub fn items(&self) -> &IndexMap<Key, Item> {
    &self.items
  }

  pub fn into_items(self) -> IndexMap<Key, Item> {
    self.items
  }

  /// Key of the current element. For nested cursors this is the nested key.
  pub fn key(&self) -> Option<Key> {
    let (key, item) = self.items.get_index(self.index)?;
    match item {
      Item::Value(_) => Some(key.clone()),
      Item::Cursor(cursor) => cursor.key(),
    }
  }

  /// Outer key of the current element, regardless of nesting.
  pub fn origin_key(&self) -> Option<&Key> {
    self.items.get_index(self.index).map(|(key, _)| key)
  }

  pub fn current(&self) -> Option<Value> {
    match self.items.get_index(self.index)?.1 {
      Item::Value(value) => Some(value.clone()),
      Item::Cursor(cursor) => cursor.current(),
    }
  }

  pub fn is_valid(&self) -> bool {
    self.index < self.items.len()
  }

  /// Returns true while the outer position is on the first item. Every
  /// element of a nested cursor in that slot counts as first.
  pub fn is_at_first(&self) -> bool {
    self.is_valid() && self.index == 0
  }

  /// Returns true while the outer position is on the last item.
  pub fn is_at_last(&self) -> bool {
    self.is_valid() && self.index + 1 == self.items.len()
  }

  pub fn advance(&mut self) {
    let Some((_, item)) = self.items.get_index_mut(self.index) else {
      return;
    };
    if let Item::Cursor(cursor) = item {
      cursor.advance();
      if cursor.is_valid() {
        return;
      }
    }
    self.index += 1;
    self.move_to_valid();
  }

  /// Restarts the walk, rewinding every nested cursor on the way.
  pub fn reset(&mut self) {
    self.index = 0;
    self.move_to_valid();
  }

  /// Settles on the first item from the current one that yields something.
  fn move_to_valid(&mut self) {
    while let Some((_, item)) = self.items.get_index_mut(self.index) {
      match item {
        Item::Value(_) => return,
        Item::Cursor(cursor) => {
          cursor.reset();
          if cursor.is_valid() {
            return;
          }
        },
      }
      self.index += 1;
    }
  }

  /// Number of elements the full walk yields.
  pub fn count(&self) -> usize {
    self
      .items
      .values()
      .map(|item| {
        match item {
          Item::Value(_) => 1,
          Item::Cursor(cursor) => cursor.count_elements(),
        }
      })
      .sum()
  }

  /// Collects the full walk by key. A key yielded twice keeps its first
  /// slot and its last value.
  pub fn to_ordered_mapping(&self) -> IndexMap<Key, Value> {
    self.clone().walk().collect()
  }

  /// Collects the values of the full walk.
  pub fn to_vec(&self) -> Vec<Value> {
    self.clone().walk().map(|(_, value)| value).collect()
  }

  /// Restarts the walk and yields `(key, value)` pairs until exhausted.
  pub fn walk(&mut self) -> Walk<'_> {
    self.reset();
    Walk { cursor: self }
  }
}

/// Iterator returned by [`FlatteningCursor::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
  cursor: &'a mut FlatteningCursor,
}

impl Iterator for Walk<'_> {
  type Item = (Key, Value);

  fn next(&mut self) -> Option<Self::Item> {
    let item = (self.cursor.key()?, self.cursor.current()?);
    self.cursor.advance();
    Some(item)
  }
}

impl Cursor for FlatteningCursor {
  fn key(&self) -> Option<Key> {
    FlatteningCursor::key(self)
  }

  fn current(&self) -> Option<Value> {
    FlatteningCursor::current(self)
  }

  fn advance(&mut self) {
    FlatteningCursor::advance(self);
  }

  fn reset(&mut self) {
    FlatteningCursor::reset(self);
  }

  fn is_valid(&self) -> bool {
    FlatteningCursor::is_valid(self)
  }

  fn known_count(&self) -> Option<usize> {
    Some(self.count())
  }

  fn boxed_clone(&self) -> Box<dyn Cursor> {
    Box::new(self.clone())
  }
}

impl FromIterator<Item> for FlatteningCursor {
  fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
    Self::from_items(iter)
  }
}

impl FromIterator<(Key, Item)> for FlatteningCursor {
  fn from_iter<I: IntoIterator<Item = (Key, Item)>>(iter: I) -> Self {
    Self::new(iter)
  }
}
