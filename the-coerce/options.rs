//! A keyed bag of loosely typed options.
//!
//! [`Options`] wraps a JSON object and reads its entries through the
//! coercion helpers of this crate, so `"yes"`, `1` and `true` all read as
//! the same flag. An entry holding `null` is treated as missing.

use std::ops::Index;

use serde::{
  Deserialize,
  Serialize,
};
use serde_json::{
  Map,
  Value,
};

use crate::{
  can_be_string,
  is_truthy,
  to_integer,
  to_text,
  try_parse_bool,
  try_parse_float,
};

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
  data: Map<String, Value>,
}

impl Options {
  pub fn new(data: Map<String, Value>) -> Self {
    Self { data }
  }

  /// Wraps `value` if it is an object. Arrays are keyed by index.
  pub fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Object(data) => Some(Self::new(data)),
      Value::Array(values) => {
        Some(
          values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| (idx.to_string(), value))
            .collect(),
        )
      },
      _ => None,
    }
  }

  pub fn data(&self) -> &Map<String, Value> {
    &self.data
  }

  pub fn set_data(&mut self, data: Map<String, Value>) -> &mut Self {
    self.data = data;
    self
  }

  pub fn into_data(self) -> Map<String, Value> {
    self.data
  }

  /// Raw entry under `key`, `None` when missing or `null`.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.data.get(key).filter(|value| !value.is_null())
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
    self.data.insert(key.into(), value.into());
    self
  }

  pub fn remove(&mut self, key: &str) -> Option<Value> {
    self.data.shift_remove(key)
  }

  /// Returns true if the entry exists and is not `null`.
  pub fn has(&self, key: &str) -> bool {
    self.get(key).is_some()
  }

  /// Returns true if the entry exists and is truthy, see [`is_truthy`].
  pub fn is(&self, key: &str) -> bool {
    self.get(key).is_some_and(is_truthy)
  }

  /// Returns true if the entry is missing or falsy.
  pub fn not(&self, key: &str) -> bool {
    !self.is(key)
  }

  /// Options over the nested object (or array) under `key`.
  pub fn branch(&self, key: &str) -> Option<Self> {
    self.get(key).cloned().and_then(Self::from_value)
  }

  pub fn get_bool(&self, key: &str) -> Option<bool> {
    self.get(key).and_then(try_parse_bool)
  }

  /// The entry as text. Booleans and numbers are rendered, lists and
  /// objects yield `None`.
  pub fn get_string(&self, key: &str) -> Option<String> {
    self
      .get(key)
      .filter(|value| can_be_string(value))
      .and_then(to_text)
      .map(String::from)
  }

  /// The trimmed entry text, `None` unless something is left of it.
  pub fn get_useful_string(&self, key: &str) -> Option<String> {
    self
      .get(key)
      .filter(|value| is_truthy(value) && can_be_string(value))
      .and_then(to_text)
      .map(|text| text.trim().to_string())
      .filter(|text| !text.is_empty())
  }

  /// The entry as an integer, truncating fractions (`77.8` reads as `77`).
  pub fn get_integer(&self, key: &str) -> Option<i64> {
    self.get(key).and_then(to_integer)
  }

  pub fn get_float(&self, key: &str) -> Option<f64> {
    self
      .get(key)
      .and_then(|value| try_parse_float(value, None, None))
  }
}

impl From<Map<String, Value>> for Options {
  fn from(data: Map<String, Value>) -> Self {
    Self::new(data)
  }
}

impl FromIterator<(String, Value)> for Options {
  fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
    Self::new(iter.into_iter().collect())
  }
}

/// Yields `null` for missing keys, like indexing a [`Value`].
impl Index<&str> for Options {
  type Output = Value;

  fn index(&self, key: &str) -> &Value {
    self.data.get(key).unwrap_or(&NULL)
  }
}
