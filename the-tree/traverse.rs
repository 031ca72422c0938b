//! Reading and writing nested values along a [`TreePath`].
//!
//! Objects are entered by key, arrays by decimal index (`0`, `1`, ...).
//! With [`Traversal::WILDCARDS`] every segment is a [`Wildcard`] compared
//! against the keys of the current level in order; array levels are matched
//! against their decimal indices.

use bitflags::bitflags;
use serde::{
  Deserialize,
  Serialize,
};
use serde_json::{
  Map,
  Value,
};

use crate::{
  TreePath,
  Wildcard,
};

/// Key consulted by [`Traversal::FALLBACK`].
pub const FALLBACK_KEY: &str = "*";

bitflags! {
  /// How a [`TreePath`] walks a tree.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
  pub struct Traversal: u8 {
    /// Treat segments as wildcards and take the first matching key.
    const WILDCARDS = 0b0000_0010;
    /// When writing with wildcards, write through every matching key.
    const COVERAGE  = 0b0000_0100;
    /// When a segment is missing, resolve to the `*` entry of that level.
    const FALLBACK  = 0b0000_1000;
  }
}

impl Default for Traversal {
  fn default() -> Self {
    Self::empty()
  }
}

impl TreePath {
  /// Walks `source` segment by segment and returns the value reached.
  ///
  /// Without wildcards a segment must name an existing, non-null entry.
  /// When a segment cannot be resolved and [`Traversal::FALLBACK`] is set,
  /// the non-null `*` entry of the current level is returned as is, without
  /// applying the remaining segments. The empty path resolves to `source`.
  pub fn traverse<'a>(&self, source: &'a Value, options: Traversal) -> Option<&'a Value> {
    let mut node = source;

    for segment in self.iter() {
      let next = if options.contains(Traversal::WILDCARDS) {
        let wildcard = Wildcard::lenient(segment);
        entries(node).find_map(|(key, child)| wildcard.is_match(&key).then_some(child))
      } else {
        child(node, segment).filter(|child| !child.is_null())
      };

      match next {
        Some(next) => node = next,
        None => {
          if options.contains(Traversal::FALLBACK)
            && let Some(fallback) = child(node, FALLBACK_KEY).filter(|value| !value.is_null())
          {
            tracing::trace!(path = %self, segment, "resolved to fallback");
            return Some(fallback);
          }
          tracing::trace!(path = %self, segment, "segment not found");
          return None;
        },
      }
    }

    Some(node)
  }

  /// Like [`traverse`](Self::traverse), returning a copy of the value
  /// reached or `default`.
  pub fn read(&self, source: &Value, default: Value, options: Traversal) -> Value {
    self.traverse(source, options).cloned().unwrap_or(default)
  }

  /// Stores `value` at the end of the path and returns the number of values
  /// written.
  ///
  /// Missing object entries on the way are created as empty objects, and a
  /// null entry is replaced by one. A branch that runs into any other
  /// non-container value, or into an array index past the end, is
  /// abandoned. With [`Traversal::WILDCARDS`] the value is written through
  /// the first matching key of every level; adding [`Traversal::COVERAGE`]
  /// writes through every matching key, so the count can exceed one.
  pub fn write(&self, destination: &mut Value, value: Value, options: Traversal) -> usize {
    let written = write_at(destination, self.segments(), &value, options);
    tracing::trace!(path = %self, written, "write finished");
    written
  }
}

fn write_at(node: &mut Value, segments: &[String], value: &Value, options: Traversal) -> usize {
  let Some((segment, rest)) = segments.split_first() else {
    *node = value.clone();
    return 1;
  };

  if !options.contains(Traversal::WILDCARDS) {
    return match child_mut(node, segment, !rest.is_empty()) {
      Some(child) => write_at(child, rest, value, options),
      None => {
        tracing::debug!(segment, "write branch abandoned");
        0
      },
    };
  }

  let wildcard = Wildcard::lenient(segment);
  let mut written = 0;
  for (key, child) in entries_mut(node) {
    if !wildcard.is_match(&key) {
      continue;
    }
    written += write_at(child, rest, value, options);
    if !options.contains(Traversal::COVERAGE) {
      break;
    }
  }
  written
}

/// Parses an array index written in plain decimal form.
fn array_index(segment: &str) -> Option<usize> {
  match segment.as_bytes() {
    [b'0'] => Some(0),
    [b'1'..=b'9', rest @ ..] if rest.iter().all(u8::is_ascii_digit) => segment.parse().ok(),
    _ => None,
  }
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
  match node {
    Value::Object(map) => map.get(segment),
    Value::Array(values) => values.get(array_index(segment)?),
    _ => None,
  }
}

/// Entry for `segment` inside `node`, created if `node` is an object.
/// Entries that are descended into further are turned into objects when
/// missing or null.
fn child_mut<'a>(node: &'a mut Value, segment: &str, descend: bool) -> Option<&'a mut Value> {
  let child = match node {
    Value::Object(map) => map.entry(segment).or_insert(Value::Null),
    Value::Array(values) => values.get_mut(array_index(segment)?)?,
    _ => return None,
  };
  if descend && child.is_null() {
    *child = Value::Object(Map::new());
  }
  Some(child)
}

fn entries(node: &Value) -> Box<dyn Iterator<Item = (String, &Value)> + '_> {
  match node {
    Value::Object(map) => Box::new(map.iter().map(|(key, value)| (key.clone(), value))),
    Value::Array(values) => {
      Box::new(
        values
          .iter()
          .enumerate()
          .map(|(idx, value)| (idx.to_string(), value)),
      )
    },
    _ => Box::new(std::iter::empty()),
  }
}

fn entries_mut(node: &mut Value) -> Box<dyn Iterator<Item = (String, &mut Value)> + '_> {
  match node {
    Value::Object(map) => Box::new(map.iter_mut().map(|(key, value)| (key.clone(), value))),
    Value::Array(values) => {
      Box::new(
        values
          .iter_mut()
          .enumerate()
          .map(|(idx, value)| (idx.to_string(), value)),
      )
    },
    _ => Box::new(std::iter::empty()),
  }
}

#[cfg(test)]
mod test {
  use serde_json::json;

  use super::*;

  fn data() -> Value {
    json!({
      "foo": {
        "bar": 123,
        "sub": { "zero": 0 },
        "bor": 777,
        "bir": 111,
        "*": "fallback",
      }
    })
  }

  #[test]
  fn test_read() {
    let data = data();

    assert_eq!(
      TreePath::new("foo/bar").read(&data, Value::Null, Traversal::empty()),
      json!(123)
    );

    let missing = TreePath::new("foo/bar2");
    assert_eq!(missing.read(&data, Value::Null, Traversal::empty()), Value::Null);
    assert_eq!(missing.read(&data, json!(123), Traversal::empty()), json!(123));
    assert_eq!(
      missing.read(&data, Value::Null, Traversal::FALLBACK),
      json!("fallback")
    );

    assert_eq!(
      TreePath::new("foo/bo?").read(&data, Value::Null, Traversal::WILDCARDS),
      json!(777)
    );
    assert_eq!(
      TreePath::new("foo/b*").read(&data, Value::Null, Traversal::WILDCARDS),
      json!(123)
    );
  }

  #[test]
  fn test_traverse() {
    let data = data();

    assert_eq!(
      TreePath::new("foo/sub/zero").traverse(&data, Traversal::empty()),
      Some(&json!(0))
    );
    assert_eq!(TreePath::new("").traverse(&data, Traversal::empty()), Some(&data));
    assert_eq!(
      TreePath::new("foo/bar/deeper").traverse(&data, Traversal::empty()),
      None
    );
    assert_eq!(
      TreePath::new("foo/nope/deeper").traverse(&data, Traversal::FALLBACK),
      Some(&json!("fallback"))
    );
    assert_eq!(
      TreePath::new("foo/x*").traverse(&data, Traversal::WILDCARDS | Traversal::FALLBACK),
      Some(&json!("fallback"))
    );
    assert_eq!(TreePath::new("nope").traverse(&data, Traversal::FALLBACK), None);
  }

  #[test]
  fn test_null_counts_as_missing() {
    let data = json!({ "a": null, "*": 1 });
    assert_eq!(TreePath::new("a").traverse(&data, Traversal::empty()), None);
    assert_eq!(TreePath::new("a").traverse(&data, Traversal::FALLBACK), Some(&json!(1)));
    assert_eq!(
      TreePath::new("a").traverse(&data, Traversal::WILDCARDS),
      Some(&Value::Null)
    );
  }

  #[test]
  fn test_arrays() {
    let data = json!({ "list": [10, { "name": "x" }, 30] });
    assert_eq!(
      TreePath::new("list/1/name").traverse(&data, Traversal::empty()),
      Some(&json!("x"))
    );
    assert_eq!(TreePath::new("list/01").traverse(&data, Traversal::empty()), None);
    assert_eq!(TreePath::new("list/3").traverse(&data, Traversal::empty()), None);
    assert_eq!(
      TreePath::new("list/?").read(&data, Value::Null, Traversal::WILDCARDS),
      json!(10)
    );

    let mut data = data;
    assert_eq!(TreePath::new("list/2").write(&mut data, json!(3), Traversal::empty()), 1);
    assert_eq!(TreePath::new("list/3").write(&mut data, json!(4), Traversal::empty()), 0);
    let coverage = Traversal::WILDCARDS | Traversal::COVERAGE;
    assert_eq!(TreePath::new("list/*").write(&mut data, json!(0), coverage), 3);
    assert_eq!(data, json!({ "list": [0, 0, 0] }));
  }

  #[test]
  fn test_write() {
    let mut data = data();
    let wildcards = Traversal::WILDCARDS;
    let coverage = Traversal::WILDCARDS | Traversal::COVERAGE;

    assert_eq!(TreePath::new("foo/bar").write(&mut data, json!(456), Traversal::empty()), 1);
    assert_eq!(data["foo"]["bar"], json!(456));

    assert_eq!(TreePath::new("foo/new").write(&mut data, json!(123), Traversal::empty()), 1);
    assert_eq!(data["foo"]["new"], json!(123));

    assert_eq!(TreePath::new("foo/new/bad").write(&mut data, json!(123), Traversal::empty()), 0);
    assert_eq!(data["foo"]["new"], json!(123));

    assert_eq!(TreePath::new("foo/b*").write(&mut data, json!(222), wildcards), 1);
    assert_eq!(data["foo"]["bar"], json!(222));
    assert_eq!(data["foo"]["bor"], json!(777));

    assert_eq!(TreePath::new("foo/b*").write(&mut data, json!(333), coverage), 3);
    assert_eq!(data["foo"]["bar"], json!(333));
    assert_eq!(data["foo"]["bor"], json!(333));
    assert_eq!(data["foo"]["bir"], json!(333));
    assert_eq!(data["foo"]["*"], json!("fallback"));

    data["foo"]["sup"] = json!({ "ignore": "me" });

    assert_eq!(TreePath::new("foo/s*/z*").write(&mut data, json!(333), coverage), 1);
    assert_eq!(data["foo"]["sub"]["zero"], json!(333));

    assert_eq!(TreePath::new("foo/s*/*").write(&mut data, json!(111), coverage), 2);
    assert_eq!(data["foo"]["sub"]["zero"], json!(111));
    assert_eq!(data["foo"]["sup"]["ignore"], json!(111));
  }

  #[test]
  fn test_write_creates_levels() {
    let mut data = json!({ "a": null });

    assert_eq!(TreePath::new("a/b/c").write(&mut data, json!(1), Traversal::empty()), 1);
    assert_eq!(TreePath::new("x/y").write(&mut data, json!(2), Traversal::empty()), 1);
    assert_eq!(data, json!({ "a": { "b": { "c": 1 } }, "x": { "y": 2 } }));

    assert_eq!(TreePath::new("q*/z").write(&mut data, json!(3), Traversal::WILDCARDS), 0);
    assert_eq!(TreePath::new("").write(&mut data, json!("root"), Traversal::empty()), 1);
    assert_eq!(data, json!("root"));

    assert_eq!(TreePath::new("a").write(&mut data, json!(1), Traversal::empty()), 0);
  }

  #[test]
  fn test_write_first_match_only() {
    let mut data = json!({ "ab": 5, "ac": { "d": 1 } });
    assert_eq!(TreePath::new("a*/d").write(&mut data, json!(2), Traversal::WILDCARDS), 0);
    assert_eq!(data["ac"]["d"], json!(1));
  }

  #[test]
  fn test_invalid_wildcard_compares_literally() {
    let data = json!({ "[x": 1, "x": 2 });
    assert_eq!(
      TreePath::new("[x").traverse(&data, Traversal::WILDCARDS),
      Some(&json!(1))
    );
  }

  #[test]
  fn test_options_serde() {
    let options = Traversal::WILDCARDS | Traversal::FALLBACK;
    let json = serde_json::to_value(options).unwrap();
    assert_eq!(serde_json::from_value::<Traversal>(json).unwrap(), options);
    assert_eq!(Traversal::default(), Traversal::empty());
  }

  quickcheck::quickcheck! {
    fn written_values_read_back(keys: Vec<String>, value: i64) -> bool {
      let path: TreePath = keys
        .into_iter()
        .map(|key| key.replace('/', ""))
        .filter(|key| !key.trim().is_empty() && key.trim() == key)
        .collect();
      let mut data = json!({});
      path.write(&mut data, json!(value), Traversal::empty()) == 1
        && path.read(&data, Value::Null, Traversal::empty()) == json!(value)
    }
  }
}
