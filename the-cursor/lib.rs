//! Restartable cursors over numeric progressions and heterogeneous
//! collections.
//!
//! A [`Cursor`] is a stateful position over a finite sequence of keyed
//! values. [`RangeCursor`] walks an arithmetic progression (a "diapason"),
//! [`FlatteningCursor`] walks an ordered mapping of [`Item`]s and transparently
//! descends into items that are cursors themselves. The [`series`] module
//! builds both from loosely typed input such as `"1, 4-8:2, 12"`, and
//! breaks delimited text into lists of numbers and sizes.

pub mod flatten;
pub mod range;
pub mod series;

use std::fmt;

use serde_json::Value;

pub use crate::{
  flatten::FlatteningCursor,
  range::RangeCursor,
  series::{
    SIZE_SEPARATORS,
    Split,
    ToDiapason,
    parse_diapason,
    parse_series,
    to_linear_vec,
    to_nested_vec,
    to_number_vec,
    to_size_pairs,
    to_sizes,
  },
};

/// Key of a cursor element, either positional or named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
  Index(i64),
  Name(String),
}

impl Key {
  pub fn as_index(&self) -> Option<i64> {
    match self {
      Self::Index(idx) => Some(*idx),
      Self::Name(_) => None,
    }
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Index(idx) => write!(f, "{idx}"),
      Self::Name(name) => f.write_str(name),
    }
  }
}

impl From<i64> for Key {
  fn from(idx: i64) -> Self {
    Self::Index(idx)
  }
}

impl From<usize> for Key {
  fn from(idx: usize) -> Self {
    Self::Index(i64::try_from(idx).unwrap_or(i64::MAX))
  }
}

impl From<&str> for Key {
  fn from(name: &str) -> Self {
    Self::Name(name.to_string())
  }
}

impl From<String> for Key {
  fn from(name: String) -> Self {
    Self::Name(name)
  }
}

/// A stateful position over a finite, restartable sequence.
///
/// `key` and `current` are `None` exactly when the cursor is not valid.
pub trait Cursor: fmt::Debug {
  fn key(&self) -> Option<Key>;

  fn current(&self) -> Option<Value>;

  fn advance(&mut self);

  /// Rewinds to the first element.
  fn reset(&mut self);

  fn is_valid(&self) -> bool;

  /// Element count when it is known without walking the cursor.
  fn known_count(&self) -> Option<usize> {
    None
  }

  fn boxed_clone(&self) -> Box<dyn Cursor>;

  /// Element count, walking a disposable copy when no fast count exists.
  fn count_elements(&self) -> usize {
    if let Some(count) = self.known_count() {
      return count;
    }

    let mut copy = self.boxed_clone();
    copy.reset();
    let mut count = 0;
    while copy.is_valid() {
      count += 1;
      copy.advance();
    }
    count
  }
}

impl Clone for Box<dyn Cursor> {
  fn clone(&self) -> Self {
    self.boxed_clone()
  }
}

/// A single entry of a [`FlatteningCursor`].
#[derive(Debug, Clone)]
pub enum Item {
  Value(Value),
  Cursor(Box<dyn Cursor>),
}

impl Item {
  pub fn is_cursor(&self) -> bool {
    matches!(self, Self::Cursor(_))
  }

  pub fn as_value(&self) -> Option<&Value> {
    match self {
      Self::Value(value) => Some(value),
      Self::Cursor(_) => None,
    }
  }
}

impl From<Value> for Item {
  fn from(value: Value) -> Self {
    Self::Value(value)
  }
}

impl From<RangeCursor> for Item {
  fn from(cursor: RangeCursor) -> Self {
    Self::Cursor(Box::new(cursor))
  }
}

impl From<FlatteningCursor> for Item {
  fn from(cursor: FlatteningCursor) -> Self {
    Self::Cursor(Box::new(cursor))
  }
}

impl From<Box<dyn Cursor>> for Item {
  fn from(cursor: Box<dyn Cursor>) -> Self {
    Self::Cursor(cursor)
  }
}
