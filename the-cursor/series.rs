//! Parsing of integer series and diapasons from loosely typed input.
//!
//! A diapason is written `start[(+|-)end[:step]]`, for example `1-9:3`
//! (1, 4, 7), `2+4:2` (2 to 6 by 2) or `-8 - -12`. Whitespace is allowed
//! anywhere, even between a sign and its digits. The step is an unsigned
//! number; anything else fails the whole diapason.
//!
//! A series is a comma separated list (or an array) of integers and
//! diapasons, parsed into a [`FlatteningCursor`] that yields every integer
//! in order.
//!
//! The list helpers at the bottom break delimited text into flat or nested
//! lists of numbers and sizes (`"640x480, 800x600"`).

use once_cell::sync::Lazy;
use regex_automata::meta::Regex;
use serde_json::Value;
use the_coerce::{
  to_integer,
  try_parse_float,
  try_parse_integer,
};

use crate::{
  FlatteningCursor,
  Item,
  RangeCursor,
};

/// Conversion into a [`RangeCursor`].
pub trait ToDiapason {
  fn to_diapason(&self) -> Option<RangeCursor>;
}

/// Parses `data` as a diapason.
///
/// Integer-like scalars become single value diapasons. Strings follow the
/// diapason grammar. Arrays are read positionally as `[start, end, step]`;
/// objects by the `start`, `end` and `step` keys with the positional keys
/// `"0"`, `"1"` and `"2"` as fallback. Only `start` is required: a missing
/// or non-integer `end` collapses the diapason to `start`, and a missing or
/// non-integer `step` becomes 1.
pub fn parse_diapason<T: ToDiapason + ?Sized>(data: &T) -> Option<RangeCursor> {
  data.to_diapason()
}

/// Parses `data` as a series of integers and diapasons.
///
/// Strings are split on commas, trimmed and stripped of empty parts before
/// being read as an array. Every element that is integer-like becomes an
/// integer, every element that parses as a diapason becomes a nested
/// [`RangeCursor`]. Other elements are kept as they are when `allow_mixed`
/// is set and dropped otherwise.
///
/// A lone integer-like value yields a one element series, holding the raw
/// value when `allow_mixed` is set and it is not already a number. Any other
/// non-array input yields `None` unless `allow_mixed` is set.
pub fn parse_series(data: &Value, allow_mixed: bool) -> Option<FlatteningCursor> {
  if let Some(int) = to_integer(data) {
    let item = if allow_mixed && !data.is_number() {
      data.clone()
    } else {
      Value::from(int)
    };
    return Some(FlatteningCursor::from_items([Item::Value(item)]));
  }

  match data {
    Value::String(text) => {
      let parts = text
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Value::String(part.to_string()));
      Some(collect_series(parts, allow_mixed))
    },
    Value::Array(values) => Some(collect_series(values.iter().cloned(), allow_mixed)),
    Value::Object(map) => Some(collect_series(map.values().cloned(), allow_mixed)),
    _ if allow_mixed => Some(FlatteningCursor::from_items([Item::Value(data.clone())])),
    _ => {
      tracing::debug!(?data, "input is not a series");
      None
    },
  }
}

fn collect_series(values: impl Iterator<Item = Value>, allow_mixed: bool) -> FlatteningCursor {
  let mut series = FlatteningCursor::default();
  for value in values {
    if let Some(int) = to_integer(&value) {
      series.push(Item::Value(Value::from(int)));
    } else if let Some(diapason) = value.to_diapason() {
      series.push(Item::from(diapason));
    } else if allow_mixed {
      series.push(Item::Value(value));
    } else {
      tracing::debug!(?value, "dropping series element");
    }
  }
  series.reset();
  series
}

static DIAPASON_REGEX: Lazy<Regex> = Lazy::new(|| {
  Regex::builder()
    .build(r"^\s*(-?\s*\d+)\s*(?:([-+])\s*(-?\s*\d+)\s*(?::\s*(\d+))?\s*)*$")
    .expect("diapason regex should compile")
});

fn parse_grammar(text: &str) -> Option<RangeCursor> {
  let mut caps = DIAPASON_REGEX.create_captures();
  DIAPASON_REGEX.captures(text, &mut caps);
  if !caps.is_match() {
    tracing::trace!(text, "not a diapason");
    return None;
  }

  let number = |group: usize| {
    caps.get_group(group).map(|span| {
      let digits: String = text[span.range()]
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect();
      digits.parse::<i64>().ok()
    })
  };

  let start = number(1)??;
  let end = match number(3) {
    None => start,
    Some(end) => {
      let end = end?;
      match caps.get_group(2).map(|span| &text[span.range()]) {
        Some("+") => start.checked_add(end)?,
        _ => end,
      }
    },
  };
  let step = number(4).unwrap_or(Some(1))?;

  Some(RangeCursor::new(start, end, step))
}

fn parse_bounds(
  start: Option<&Value>,
  end: Option<&Value>,
  step: Option<&Value>,
) -> Option<RangeCursor> {
  let integer = |value: Option<&Value>| value.and_then(to_integer);

  let Some(start) = integer(start) else {
    tracing::trace!("diapason without an integer start");
    return None;
  };
  let end = integer(end).unwrap_or(start);
  let step = integer(step).unwrap_or(1);

  Some(RangeCursor::new(start, end, step))
}

impl ToDiapason for RangeCursor {
  fn to_diapason(&self) -> Option<RangeCursor> {
    Some(self.clone())
  }
}

impl ToDiapason for i64 {
  fn to_diapason(&self) -> Option<RangeCursor> {
    Some(RangeCursor::new(*self, *self, 1))
  }
}

impl ToDiapason for str {
  fn to_diapason(&self) -> Option<RangeCursor> {
    match to_integer(&Value::from(self)) {
      Some(int) => int.to_diapason(),
      None => parse_grammar(self),
    }
  }
}

impl ToDiapason for Value {
  fn to_diapason(&self) -> Option<RangeCursor> {
    match self {
      Value::Number(_) => to_integer(self).and_then(|int| int.to_diapason()),
      Value::String(text) => text.as_str().to_diapason(),
      Value::Array(values) => parse_bounds(values.first(), values.get(1), values.get(2)),
      Value::Object(map) => {
        let field = |name: &str, idx: &str| {
          map
            .get(name)
            .filter(|value| !value.is_null())
            .or_else(|| map.get(idx))
            .filter(|value| !value.is_null())
        };
        parse_bounds(field("start", "0"), field("end", "1"), field("step", "2"))
      },
      Value::Null | Value::Bool(_) => None,
    }
  }
}

/// Separators of `"640x480, 800x600"` style size lists.
pub const SIZE_SEPARATORS: [&str; 2] = [",", "x"];

/// Decides what [`to_nested_vec`] does with a part before it is split again.
#[derive(Debug, Clone, PartialEq)]
pub enum Split {
  /// Split the part at the next separator.
  Descend(Value),
  /// Keep the part whole.
  Keep(Value),
}

/// Flattens `data` into a list.
///
/// `null` yields nothing and arrays and objects yield their values. Text is
/// split on `separator` when one is given (an empty separator does not
/// split). Anything else is a single element. `visit` maps every element,
/// dropping those it maps to `None`. With `unique` only the first of equal
/// elements is kept.
pub fn to_linear_vec<F>(data: &Value, separator: Option<&str>, unique: bool, visit: F) -> Vec<Value>
where
  F: FnMut(Value) -> Option<Value>,
{
  let parts = match data {
    Value::Null => Vec::new(),
    Value::String(text) => {
      match separator {
        Some(separator) if !separator.is_empty() => {
          text.split(separator).map(Value::from).collect()
        },
        _ => vec![data.clone()],
      }
    },
    Value::Array(values) => values.clone(),
    Value::Object(map) => map.values().cloned().collect(),
    Value::Bool(_) | Value::Number(_) => vec![data.clone()],
  };

  let values = parts.into_iter().filter_map(visit);
  if unique {
    dedup(values)
  } else {
    values.collect()
  }
}

/// Breaks `data` into a nested list, one level per separator.
///
/// Levels count down: parts split at the first separator are at level
/// `separators.len() - 1`, parts split at the last one at level 0. `before`
/// sees every part as it comes out of its split and decides whether it is
/// split further. `after` sees the finished part (a list above level 0)
/// and may map it or drop it with `None`.
pub fn to_nested_vec<B, A>(
  data: &Value,
  separators: &[&str],
  mut before: B,
  mut after: A,
) -> Vec<Value>
where
  B: FnMut(Value, &str, usize) -> Split,
  A: FnMut(Value, &str, usize) -> Option<Value>,
{
  nest(data, separators, &mut before, &mut after)
}

fn nest(
  data: &Value,
  separators: &[&str],
  before: &mut dyn FnMut(Value, &str, usize) -> Split,
  after: &mut dyn FnMut(Value, &str, usize) -> Option<Value>,
) -> Vec<Value> {
  let Some((&separator, rest)) = separators.split_first() else {
    return Vec::new();
  };
  let level = rest.len();

  to_linear_vec(data, Some(separator), false, |part| {
    let part = match before(part, separator, level) {
      Split::Descend(part) if level > 0 => {
        Value::Array(nest(&part, rest, &mut *before, &mut *after))
      },
      Split::Descend(part) | Split::Keep(part) => part,
    };
    after(part, separator, level)
  })
}

/// Reads a list of numbers within the optional bounds.
///
/// Whole numbers come out as integers (`"3.0"` becomes `3`), the rest as
/// floats. Elements that are not numbers are dropped.
pub fn to_number_vec(
  data: &Value,
  separator: Option<&str>,
  unique: bool,
  min: Option<f64>,
  max: Option<f64>,
) -> Vec<Value> {
  to_linear_vec(data, separator, unique, |value| {
    try_parse_float(&value, min, max).map(number_value)
  })
}

/// Reads a nested list of `[width, height]` pairs, see [`SIZE_SEPARATORS`].
///
/// Both sides must be integers within the optional bounds, and every
/// innermost group must hold exactly two of them. Other groups are dropped.
/// Extra separators in front add outer levels, e.g. `["|", ",", "x"]` reads
/// `"1x2, 3x4 | 5x6"` as two lists of sizes.
pub fn to_sizes(
  data: &Value,
  separators: &[&str],
  unique: bool,
  min: Option<i64>,
  max: Option<i64>,
) -> Vec<Value> {
  let sizes = to_nested_vec(
    data,
    separators,
    |part, _, _| Split::Descend(part),
    |part, _, level| {
      match level {
        0 => try_parse_integer(&part, min, max).map(Value::from),
        1 => part.as_array().is_some_and(|pair| pair.len() == 2).then_some(part),
        _ => Some(part),
      }
    },
  );

  if unique { dedup(sizes) } else { sizes }
}

/// [`to_sizes`] over [`SIZE_SEPARATORS`], as `(width, height)` tuples.
pub fn to_size_pairs(
  data: &Value,
  unique: bool,
  min: Option<i64>,
  max: Option<i64>,
) -> Vec<(i64, i64)> {
  to_sizes(data, &SIZE_SEPARATORS, unique, min, max)
    .iter()
    .filter_map(|size| {
      match size.as_array()?.as_slice() {
        [width, height] => Some((width.as_i64()?, height.as_i64()?)),
        _ => None,
      }
    })
    .collect()
}

fn number_value(float: f64) -> Value {
  let value = Value::from(float);
  match to_integer(&value) {
    Some(int) if float.fract() == 0.0 => Value::from(int),
    _ => value,
  }
}

fn dedup(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
  let mut out: Vec<Value> = Vec::new();
  for value in values {
    if !out.contains(&value) {
      out.push(value);
    }
  }
  out
}

#[cfg(test)]
mod test {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_diapason_grammar() {
    assert_eq!(parse_diapason("1-9:3"), Some(RangeCursor::new(1, 9, 3)));
    assert_eq!(parse_diapason("2 + 4 : 2"), Some(RangeCursor::new(2, 6, 2)));
    assert_eq!(parse_diapason(" 12 - 1 "), Some(RangeCursor::new(12, 1, 1)));
    assert_eq!(
      parse_diapason(" - 8  - - 12 :  2  "),
      Some(RangeCursor::new(-8, -12, 2))
    );
    assert_eq!(
      parse_diapason(" -8 - -12 : 2 "),
      Some(RangeCursor::new(-8, -12, 2))
    );
    assert_eq!(parse_diapason(" 20 - 4 : -2 "), None);
    assert_eq!(parse_diapason(" 20 - 4 : - 2 "), None);
    assert_eq!(parse_diapason("4"), Some(RangeCursor::new(4, 4, 1)));
    assert_eq!(parse_diapason("-3"), Some(RangeCursor::new(-3, -3, 1)));
    assert_eq!(parse_diapason("foo"), None);
    assert_eq!(parse_diapason(""), None);
    assert_eq!(parse_diapason("1-"), None);
  }

  #[test]
  fn test_diapason_grammar_overflow() {
    assert_eq!(parse_diapason("99999999999999999999-1"), None);
    assert_eq!(parse_diapason("9223372036854775807+1"), None);
  }

  #[test]
  fn test_diapason_from_values() {
    assert_eq!(
      parse_diapason(&json!([1, 9, 3])),
      Some(RangeCursor::new(1, 9, 3))
    );
    assert_eq!(
      parse_diapason(&json!({ "start": 1, "end": 10, "step": 2 })),
      Some(RangeCursor::new(1, 10, 2))
    );
    assert_eq!(
      parse_diapason(&json!({ "0": 12, "end": 1, "step": "foo" })),
      Some(RangeCursor::new(12, 1, 1))
    );
    assert_eq!(
      parse_diapason(&json!({ "0": -8, "step": 2, "1": -12 })),
      Some(RangeCursor::new(-8, -12, 2))
    );
    assert_eq!(
      parse_diapason(&json!([4.5, 5.06])),
      Some(RangeCursor::new(4, 5, 1))
    );
    assert_eq!(parse_diapason(&json!([12])), Some(RangeCursor::new(12, 12, 1)));
    assert_eq!(parse_diapason(&json!(7)), Some(RangeCursor::new(7, 7, 1)));
    assert_eq!(parse_diapason(&json!(" 1 - 3 ")), Some(RangeCursor::new(1, 3, 1)));
    assert_eq!(parse_diapason(&json!({ "end": 3 })), None);
    assert_eq!(parse_diapason(&json!(["foo", 3])), None);
    assert_eq!(parse_diapason(&json!(null)), None);
    assert_eq!(parse_diapason(&json!(true)), None);
  }

  #[test]
  fn test_diapason_passthrough() {
    let cursor = RangeCursor::new(1, 5, 2).with_position(1);
    let parsed = parse_diapason(&cursor).unwrap();
    assert_eq!(parsed, cursor);
    assert_eq!(parsed.position(), 1);
    assert_eq!(parse_diapason(&5i64), Some(RangeCursor::new(5, 5, 1)));
  }

  #[test]
  fn test_series() {
    let series = parse_series(&json!("1, 2, 3"), false).unwrap();
    assert_eq!(series.to_vec(), vec![json!(1), json!(2), json!(3)]);

    let series = parse_series(&json!([1, 2, 3]), false).unwrap();
    assert_eq!(series.to_vec(), vec![json!(1), json!(2), json!(3)]);

    let series = parse_series(&json!("1-3"), false).unwrap();
    assert_eq!(series.count(), 3);
    assert_eq!(series.to_vec(), vec![json!(1), json!(2), json!(3)]);
  }

  #[test]
  fn test_series_mixed() {
    let series = parse_series(&json!("5, 1-9:4, foo,, 0"), false).unwrap();
    assert_eq!(series.to_vec(), vec![
      json!(5),
      json!(1),
      json!(5),
      json!(9),
      json!(0)
    ]);

    let series = parse_series(&json!("5, foo"), true).unwrap();
    assert_eq!(series.to_vec(), vec![json!(5), json!("foo")]);

    let series = parse_series(&json!([2.5, { "start": 7, "end": 6 }, null]), true).unwrap();
    assert_eq!(series.to_vec(), vec![json!(2), json!(7), json!(6), json!(null)]);
  }

  #[test]
  fn test_series_scalars() {
    let series = parse_series(&json!(" 42 "), false).unwrap();
    assert_eq!(series.to_vec(), vec![json!(42)]);

    let series = parse_series(&json!(" 42 "), true).unwrap();
    assert_eq!(series.to_vec(), vec![json!(" 42 ")]);

    let series = parse_series(&json!(7.0), true).unwrap();
    assert_eq!(series.to_vec(), vec![json!(7)]);

    assert!(parse_series(&json!(true), false).is_none());
    assert_eq!(
      parse_series(&json!(true), true).unwrap().to_vec(),
      vec![json!(true)]
    );
    assert_eq!(parse_series(&json!(""), false).unwrap().count(), 0);
  }

  #[test]
  fn test_number_vec() {
    assert_eq!(to_number_vec(&json!("100"), None, false, None, None), vec![json!(100)]);
    assert_eq!(to_number_vec(&json!("33.3"), None, false, None, None), vec![json!(33.3)]);
    assert_eq!(
      to_number_vec(&json!([100, 33.3, 100]), None, true, None, None),
      vec![json!(100), json!(33.3)]
    );
    assert_eq!(
      to_number_vec(&json!("1|2|foo|3.0|2.0|1.1"), Some("|"), false, None, None),
      vec![json!(1), json!(2), json!(3), json!(2), json!(1.1)]
    );
    assert_eq!(
      to_number_vec(&json!("100, -200, 33.3, 100"), Some(","), true, None, None),
      vec![json!(100), json!(-200), json!(33.3)]
    );
    assert_eq!(
      to_number_vec(&json!("5, 50, 500"), Some(","), false, Some(10.0), Some(100.0)),
      vec![json!(50)]
    );
    assert!(to_number_vec(&json!(null), Some(","), false, None, None).is_empty());
  }

  #[test]
  fn test_sizes() {
    let sizes = |text: &str, unique: bool, min: Option<i64>, max: Option<i64>| {
      to_sizes(&json!(text), &SIZE_SEPARATORS, unique, min, max)
    };

    assert_eq!(sizes("100x200, 300x500, foo, bar", false, None, None), vec![
      json!([100, 200]),
      json!([300, 500])
    ]);
    assert_eq!(sizes("100x200x300, 300x500, fooxbar", false, None, None), vec![
      json!([300, 500])
    ]);
    assert_eq!(sizes("100x200, 300x500, 100x200", true, None, None), vec![
      json!([100, 200]),
      json!([300, 500])
    ]);
    assert_eq!(sizes("100x200, 300x500, 400x200", false, Some(100), Some(300)), vec![
      json!([100, 200])
    ]);

    let data = json!("100x200, 300x500 | 2x2, 4x4");
    let grouped = to_sizes(&data, &["|", ",", "x"], false, None, None);
    assert_eq!(grouped, vec![
      json!([[100, 200], [300, 500]]),
      json!([[2, 2], [4, 4]])
    ]);

    assert_eq!(
      to_size_pairs(&json!("640x480, 800 x 600, 640x480"), true, None, None),
      vec![(640, 480), (800, 600)]
    );
  }

  #[test]
  fn test_linear_vec() {
    assert_eq!(to_linear_vec(&json!("300,500,foo, bar "), Some(","), false, Some), vec![
      json!("300"),
      json!("500"),
      json!("foo"),
      json!(" bar ")
    ]);
    assert_eq!(to_linear_vec(&json!("foo"), None, false, Some), vec![json!("foo")]);
    assert_eq!(to_linear_vec(&json!("a,b"), Some(""), false, Some), vec![json!("a,b")]);
    assert_eq!(to_linear_vec(&json!({ "x": 1, "y": 2 }), None, false, Some), vec![
      json!(1),
      json!(2)
    ]);

    let shaped = to_linear_vec(&json!("300,500,foo,500, bar "), Some(","), true, |value| {
      let text = value.as_str()?.trim();
      Some(the_coerce::parse_float(text).map_or_else(|| json!(text), number_value))
    });
    assert_eq!(shaped, vec![json!(300), json!(500), json!("foo"), json!("bar")]);
  }

  #[test]
  fn test_nested_vec() {
    let nested = to_nested_vec(
      &json!("100,200| foo , bar | 1 - 4"),
      &["|", ","],
      |part, _, level| {
        let Some((from, to)) = part.as_str().and_then(|text| text.split_once('-')) else {
          return Split::Descend(part);
        };
        match (from.trim().parse::<i64>(), to.trim().parse::<i64>()) {
          (Ok(from), Ok(to)) if level == 1 => Split::Keep((from..=to).collect()),
          _ => Split::Descend(part),
        }
      },
      |part, _, level| {
        if level != 0 {
          return Some(part);
        }
        let text = part.as_str()?.trim();
        Some(the_coerce::parse_float(text).map_or_else(|| json!(text), number_value))
      },
    );

    assert_eq!(nested, vec![
      json!([100, 200]),
      json!(["foo", "bar"]),
      json!([1, 2, 3, 4])
    ]);

    let unsplit = to_nested_vec(
      &json!("a,b"),
      &[],
      |part, _, _| Split::Descend(part),
      |part, _, _| Some(part),
    );
    assert!(unsplit.is_empty());
  }
}
