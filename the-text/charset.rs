//! The string classification capability.
//!
//! A [`Charset`] decides what a single text unit is, how it is classified and
//! how it is case mapped. Higher level helpers (see [`crate::case`]) are
//! generic over it so the same algorithm can run with ASCII or Unicode rules.

use std::{
  borrow::Cow,
  ops::Range,
};

use crate::Tendril;

pub trait Charset {
  fn is_alphabetic_char(ch: char) -> bool;

  fn is_alphanumeric_char(ch: char) -> bool;

  fn push_upper(ch: char, buf: &mut Tendril);

  fn push_lower(ch: char, buf: &mut Tendril);

  /// Number of units in `text`.
  fn length(text: &str) -> usize;

  /// Takes `len` units starting at unit `start`.
  ///
  /// A negative `start` counts from the end of the text. A missing `len`
  /// takes everything up to the end, a negative one stops that many units
  /// before the end. Windows falling outside the text produce an empty
  /// string.
  fn substring(text: &str, start: isize, len: Option<isize>) -> Cow<'_, str>;

  /// Returns true if `text` is non-empty and every unit is alphabetic.
  fn is_alphabetic(text: &str) -> bool {
    !text.is_empty() && text.chars().all(Self::is_alphabetic_char)
  }

  /// Returns true if `text` is non-empty and every unit is alphanumeric.
  fn is_alphanumeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(Self::is_alphanumeric_char)
  }

  fn to_upper(text: &str) -> Tendril {
    let mut buf = Tendril::new();
    text.chars().for_each(|ch| Self::push_upper(ch, &mut buf));
    buf
  }

  fn to_lower(text: &str) -> Tendril {
    let mut buf = Tendril::new();
    text.chars().for_each(|ch| Self::push_lower(ch, &mut buf));
    buf
  }

  /// Returns true if upper casing leaves `text` unchanged. Empty text and
  /// text without letters count as upper case.
  fn is_upper(text: &str) -> bool {
    Self::to_upper(text).as_str() == text
  }

  /// Returns true if lower casing leaves `text` unchanged.
  fn is_lower(text: &str) -> bool {
    Self::to_lower(text).as_str() == text
  }
}

/// ASCII classification with byte offsets.
///
/// Non-ASCII characters are neither alphabetic nor case mapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleByte;

/// Unicode classification with code point offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiByte;

impl Charset for SingleByte {
  #[inline]
  fn is_alphabetic_char(ch: char) -> bool {
    ch.is_ascii_alphabetic()
  }

  #[inline]
  fn is_alphanumeric_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
  }

  fn push_upper(ch: char, buf: &mut Tendril) {
    buf.push(ch.to_ascii_uppercase());
  }

  fn push_lower(ch: char, buf: &mut Tendril) {
    buf.push(ch.to_ascii_lowercase());
  }

  fn length(text: &str) -> usize {
    text.len()
  }

  fn substring(text: &str, start: isize, len: Option<isize>) -> Cow<'_, str> {
    let window = unit_window(text.len(), start, len);
    match text.get(window.clone()) {
      Some(sub) => Cow::Borrowed(sub),
      // the window splits a multi-byte sequence
      None => String::from_utf8_lossy(&text.as_bytes()[window]),
    }
  }
}

impl Charset for MultiByte {
  #[inline]
  fn is_alphabetic_char(ch: char) -> bool {
    ch.is_alphabetic()
  }

  #[inline]
  fn is_alphanumeric_char(ch: char) -> bool {
    ch.is_alphanumeric()
  }

  fn push_upper(ch: char, buf: &mut Tendril) {
    buf.extend(ch.to_uppercase());
  }

  fn push_lower(ch: char, buf: &mut Tendril) {
    buf.extend(ch.to_lowercase());
  }

  fn length(text: &str) -> usize {
    text.chars().count()
  }

  fn substring(text: &str, start: isize, len: Option<isize>) -> Cow<'_, str> {
    let window = unit_window(Self::length(text), start, len);
    if window.is_empty() {
      return Cow::Borrowed("");
    }

    let byte_at = |char_idx: usize| {
      text
        .char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(idx, _)| idx)
    };
    Cow::Borrowed(&text[byte_at(window.start)..byte_at(window.end)])
  }
}

/// Resolves a `start`/`len` pair against a text of `total` units.
fn unit_window(total: usize, start: isize, len: Option<isize>) -> Range<usize> {
  let total = total as isize;
  let start = if start < 0 {
    total.saturating_add(start).max(0)
  } else {
    start
  };
  if start >= total {
    return 0..0;
  }

  let end = match len {
    None => total,
    Some(len) if len < 0 => total.saturating_add(len),
    Some(len) => start.saturating_add(len).min(total),
  };
  if end <= start {
    return 0..0;
  }

  start as usize..end as usize
}
