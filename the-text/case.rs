//! Case shaping helpers.
//!
//! Every helper is generic over a [`Charset`], which decides what counts as a
//! letter and how letters are case mapped. Use [`SingleByte`](crate::SingleByte)
//! for ASCII input and [`MultiByte`](crate::MultiByte) for anything else.

use crate::{
  Charset,
  Tendril,
};

/// Characters that split words when building an acronym.
const ACRONYM_DELIMITERS: &str = "._ -+=!@#$%^&*()~`\"'?<>,/\\;:";

pub fn to_camel_case<C: Charset>(text: &str, separators: &str) -> Tendril {
  let mut res = Tendril::new();
  to_camel_case_with::<C>(text, separators, &mut res);
  res
}

/// Lower cases `text`, splits it on spaces and any of `separators`, then
/// joins the words upper casing the first unit of every word but the first.
pub fn to_camel_case_with<C: Charset>(text: &str, separators: &str, buf: &mut Tendril) {
  let lowered = C::to_lower(text);
  let mut words = lowered
    .split(|ch: char| ch == ' ' || separators.contains(ch))
    .filter(|word| !word.is_empty());

  if let Some(first) = words.next() {
    buf.push_str(first);
  }
  for word in words {
    buf.push_str(&C::to_upper(&C::substring(word, 0, Some(1))));
    buf.push_str(&C::substring(word, 1, None));
  }
}

pub fn to_snake_case<C: Charset>(text: &str, separator: char) -> Tendril {
  let mut res = Tendril::new();
  to_snake_case_with::<C>(text, separator, &mut res);
  res
}

/// Converts `text` to snake case joined by `separator`.
///
/// Spaces are dropped but start a new word. Upper case letters start a word
/// unless they continue an acronym; the last letter of an acronym followed
/// by a lower case letter starts the next word ("XMLHttp" -> "xml_http").
/// Other characters are kept as they are.
pub fn to_snake_case_with<C: Charset>(text: &str, separator: char, buf: &mut Tendril) {
  let text = text.trim();
  let origin = buf.len();

  // The previous unit is held back so that the end of an acronym can still
  // get a separator in front of it.
  let mut pending = Tendril::new();
  let mut acronym = 0usize;
  let mut solid = true;

  for ch in text.chars() {
    let mut unit = Tendril::new();
    if ch == ' ' {
      acronym = 0;
      solid = true;
    } else if ch == separator {
      unit.push(ch);
      acronym = 0;
      solid = false;
    } else if C::is_alphabetic_char(ch) || pending.is_empty() {
      if is_upper_char::<C>(ch) {
        if acronym > 0 {
          acronym += 1;
        } else if solid {
          if buf.len() > origin {
            unit.push(separator);
          }
          acronym = 1;
        }
        C::push_lower(ch, &mut unit);
      } else {
        if acronym > 1 {
          pending.insert(0, separator);
        }
        acronym = 0;
        unit.push(ch);
      }
      solid = true;
    } else {
      solid = C::is_alphanumeric_char(ch);
      unit.push(ch);
    }

    buf.push_str(&pending);
    pending = unit;
  }
  buf.push_str(&pending);
}

/// Builds an acronym from the first unit of every word. Numeric words are
/// kept whole ("Need 4 Speed" -> "N4S").
pub fn to_acronym<C: Charset>(text: &str, letter_case: Option<bool>) -> Tendril {
  let mut words = text
    .split(|ch: char| ACRONYM_DELIMITERS.contains(ch))
    .filter(|word| !word.is_empty());

  let mut res = Tendril::new();
  if let Some(first) = words.next() {
    res.push_str(&C::substring(first, 0, Some(1)));
  }
  for word in words {
    if word.bytes().all(|byte| byte.is_ascii_digit()) {
      res.push_str(word);
    } else {
      res.push_str(&C::substring(word, 0, Some(1)));
    }
  }

  match letter_case {
    None => res,
    Some(true) => C::to_upper(&res),
    Some(false) => C::to_lower(&res),
  }
}

/// Upper cases the first letter of every word.
///
/// Words that already contain an upper case letter or start with a digit
/// are left untouched, and an apostrophe directly after a letter does not
/// start a new word ("rock'n'roll" -> "Rock'n'roll").
pub fn capitalize<C: Charset>(text: &str) -> Tendril {
  let mut res = Tendril::new();
  let mut word = Word::default();
  let mut last_was_letter = false;

  for ch in text.chars() {
    if C::is_alphanumeric_char(ch) {
      last_was_letter = true;
      word.push::<C>(ch);
      continue;
    }

    word.flush_into::<C>(&mut res);
    word.capitalize = ch != '\'' || !last_was_letter;
    last_was_letter = false;
    res.push(ch);
  }

  word.flush_into::<C>(&mut res);
  res
}

struct Word {
  first:      Option<char>,
  rest:       Tendril,
  capitalize: bool,
}

impl Default for Word {
  fn default() -> Self {
    Self {
      first:      None,
      rest:       Tendril::new(),
      capitalize: true,
    }
  }
}

impl Word {
  fn push<C: Charset>(&mut self, ch: char) {
    if self.first.is_none() {
      if ch.is_ascii_digit() {
        self.capitalize = false;
      }
      self.first = Some(ch);
    } else {
      self.rest.push(ch);
    }
    if self.capitalize && is_upper_char::<C>(ch) {
      self.capitalize = false;
    }
  }

  fn flush_into<C: Charset>(&mut self, buf: &mut Tendril) {
    let Some(first) = self.first.take() else {
      return;
    };
    if self.capitalize {
      C::push_upper(first, buf);
    } else {
      buf.push(first);
    }
    buf.push_str(&self.rest);
    self.rest.clear();
  }
}

/// Trims `text` and collapses every run of whitespace into a single space.
pub fn compact(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims `text`, returning `None` when nothing is left.
pub fn clarify(text: Option<&str>) -> Option<&str> {
  text.map(str::trim).filter(|text| !text.is_empty())
}

fn is_upper_char<C: Charset>(ch: char) -> bool {
  let mut upper = Tendril::new();
  C::push_upper(ch, &mut upper);
  upper.chars().eq(std::iter::once(ch))
}
