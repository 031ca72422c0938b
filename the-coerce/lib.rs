//! Lenient value coercion.
//!
//! Values arrive as [`serde_json::Value`] (or plain text) from configuration,
//! query strings and similar loosely typed sources. The helpers here decide
//! whether such a value can stand for an integer, a float, a boolean or a
//! string, and convert it when it can. Nothing in this crate panics or
//! returns an error: a value that does not fit is simply `None`.
//!
//! Text is trimmed before parsing. Integers follow the strict decimal form
//! (`-12`, `0`, but not `007` or `1.0`), optionally `0x` hexadecimal where
//! noted. Floats accept the usual decimal and exponent forms but not `inf`
//! or `NaN`. Booleans are never treated as numbers.

pub mod options;

use std::borrow::Cow;

use serde_json::Value;

pub use crate::options::Options;

/// Parses an integer, honoring the optional inclusive bounds.
///
/// Whole floats (`3.0`) are accepted, fractional ones (`6.7`) are not. Text
/// may use `0x` hexadecimal notation.
pub fn try_parse_integer(value: &Value, min: Option<i64>, max: Option<i64>) -> Option<i64> {
  let parsed = match value {
    Value::Number(number) => {
      number
        .as_i64()
        .or_else(|| number.as_f64().filter(|float| float.fract() == 0.0).and_then(truncate))
    },
    Value::String(text) => parse_integer(text, true),
    _ => None,
  }?;
  within(parsed, min, max).then_some(parsed)
}

/// Like [`try_parse_integer`], rejecting negative values.
pub fn try_parse_unsigned(value: &Value, min: Option<i64>, max: Option<i64>) -> Option<u64> {
  try_parse_integer(value, min, max).and_then(|int| u64::try_from(int).ok())
}

/// Parses a float, honoring the optional inclusive bounds.
pub fn try_parse_float(value: &Value, min: Option<f64>, max: Option<f64>) -> Option<f64> {
  let parsed = match value {
    Value::Number(number) => number.as_f64(),
    Value::String(text) => parse_float(text),
    _ => None,
  }?;
  within(parsed, min, max).then_some(parsed)
}

/// Parses a boolean.
///
/// `true`, `on`, `yes` and `1` are true; `false`, `off`, `no`, `0` and the
/// empty string are false, regardless of case. `null` is false.
pub fn try_parse_bool(value: &Value) -> Option<bool> {
  match value {
    Value::Bool(flag) => Some(*flag),
    Value::Null => Some(false),
    Value::Number(number) => {
      match number.as_i64() {
        Some(1) => Some(true),
        Some(0) => Some(false),
        _ => None,
      }
    },
    Value::String(text) => parse_bool(text),
    _ => None,
  }
}

/// Returns true if `value` can safely stand for an integer.
///
/// In lenient mode any number or float-shaped text qualifies (`42.5`,
/// `"00"`, `" -10 "`). In strict mode only whole values in the strict
/// decimal form do.
pub fn can_be_integer(value: &Value, strict: bool) -> bool {
  match value {
    Value::Number(_) if strict => try_parse_integer(value, None, None).is_some(),
    Value::Number(_) => true,
    Value::String(text) if strict => parse_integer(text, false).is_some(),
    Value::String(text) => parse_float(text).is_some(),
    _ => false,
  }
}

pub fn can_be_float(value: &Value) -> bool {
  match value {
    Value::Number(_) => true,
    Value::String(text) => parse_float(text).is_some(),
    _ => false,
  }
}

/// Loose truthiness: `null`, `false`, zero, `""`, `"0"` and empty arrays or
/// objects are false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(flag) => *flag,
    Value::Number(number) => number.as_f64().is_some_and(|float| float != 0.0),
    Value::String(text) => !text.is_empty() && text != "0",
    Value::Array(values) => !values.is_empty(),
    Value::Object(map) => !map.is_empty(),
  }
}

/// Returns true for anything but arrays and objects.
pub fn can_be_string(value: &Value) -> bool {
  !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Converts an integer-like value (see [`can_be_integer`] in lenient mode)
/// to an integer, truncating any fraction toward zero.
pub fn to_integer(value: &Value) -> Option<i64> {
  match value {
    Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(truncate)),
    Value::String(text) => {
      parse_integer(text, false).or_else(|| parse_float(text).and_then(truncate))
    },
    _ => None,
  }
}

/// String form of a scalar value. Booleans render as `"1"` and `""`, null as
/// the empty string.
pub fn to_text(value: &Value) -> Option<Cow<'_, str>> {
  match value {
    Value::String(text) => Some(Cow::Borrowed(text)),
    Value::Number(number) => Some(Cow::Owned(number.to_string())),
    Value::Bool(true) => Some(Cow::Borrowed("1")),
    Value::Bool(false) | Value::Null => Some(Cow::Borrowed("")),
    Value::Array(_) | Value::Object(_) => None,
  }
}

/// Keeps the values that parse as integers within the bounds, in order.
pub fn to_integer_vec(
  values: &[Value],
  unique: bool,
  min: Option<i64>,
  max: Option<i64>,
) -> Vec<i64> {
  collect_filtered(
    values.iter().filter_map(|value| try_parse_integer(value, min, max)),
    unique,
  )
}

/// Keeps the values that parse as floats within the bounds, in order.
pub fn to_float_vec(
  values: &[Value],
  unique: bool,
  min: Option<f64>,
  max: Option<f64>,
) -> Vec<f64> {
  collect_filtered(
    values.iter().filter_map(|value| try_parse_float(value, min, max)),
    unique,
  )
}

/// Parses text in the strict integer form: an optional sign followed by
/// digits without leading zeros, or `0x` hexadecimal when `allow_hex` is set.
pub fn parse_integer(text: &str, allow_hex: bool) -> Option<i64> {
  let text = text.trim();

  if allow_hex
    && let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
  {
    if hex.is_empty() || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
      return None;
    }
    return i64::from_str_radix(hex, 16).ok();
  }

  let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
  let well_formed = match digits.as_bytes() {
    [] => false,
    [b'0'] => true,
    [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
    _ => false,
  };
  if !well_formed {
    return None;
  }
  text.parse().ok()
}

/// Parses text in decimal float form (`1`, `-2.5`, `.5`, `3.`, `1e-3`).
pub fn parse_float(text: &str) -> Option<f64> {
  let text = text.trim();
  if !is_float_literal(text.as_bytes()) {
    return None;
  }
  text.parse::<f64>().ok().filter(|float| float.is_finite())
}

pub fn parse_bool(text: &str) -> Option<bool> {
  match text.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "on" | "yes" => Some(true),
    "0" | "false" | "off" | "no" | "" => Some(false),
    _ => None,
  }
}

fn is_float_literal(bytes: &[u8]) -> bool {
  let digits = |from: usize| {
    bytes[from.min(bytes.len())..]
      .iter()
      .take_while(|byte| byte.is_ascii_digit())
      .count()
  };

  let mut idx = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
  let int_digits = digits(idx);
  idx += int_digits;

  let mut frac_digits = 0;
  if bytes.get(idx) == Some(&b'.') {
    idx += 1;
    frac_digits = digits(idx);
    idx += frac_digits;
  }
  if int_digits + frac_digits == 0 {
    return false;
  }

  if matches!(bytes.get(idx), Some(b'e' | b'E')) {
    idx += 1;
    if matches!(bytes.get(idx), Some(b'+' | b'-')) {
      idx += 1;
    }
    let exp_digits = digits(idx);
    if exp_digits == 0 {
      return false;
    }
    idx += exp_digits;
  }

  idx == bytes.len()
}

fn truncate(float: f64) -> Option<i64> {
  let float = float.trunc();
  // i64::MAX is not representable, the bound below is 2^63
  (float.is_finite() && float >= i64::MIN as f64 && float < i64::MAX as f64)
    .then_some(float as i64)
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
  min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

fn collect_filtered<T: PartialEq>(values: impl Iterator<Item = T>, unique: bool) -> Vec<T> {
  let mut out = Vec::new();
  for value in values {
    if !unique || !out.contains(&value) {
      out.push(value);
    }
  }
  out
}
