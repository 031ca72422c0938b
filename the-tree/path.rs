//! Segment lists addressing nodes of a tree.

use std::{
  borrow::Cow,
  convert::Infallible,
  fmt,
  ops::Index,
  str::FromStr,
};

use bitflags::bitflags;
use regex_automata::meta::Regex;
use serde::{
  Deserialize,
  Serialize,
};
use serde_json::Value;
use smallvec::SmallVec;
use the_text::{
  Charset,
  SingleByte,
};

use crate::{
  PathError,
  Result,
};

pub const DELIMITER_DOT: &str = ".";
pub const DELIMITER_COMMA: &str = ",";
pub const DELIMITER_SLASH: &str = "/";
pub const DELIMITER_BACKSLASH: &str = "\\";

pub const DEFAULT_DELIMITER: &str = DELIMITER_SLASH;

bitflags! {
  /// How a path source is split into segments.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
  pub struct PathOptions: u8 {
    /// Trim whitespace around every segment.
    const TRIM            = 0b0000_0001;
    /// Drop empty segments.
    const CLEAN           = 0b0000_0010;
    /// Lower case ASCII letters in every segment.
    const LOWER_CASE      = 0b0000_0100;
    /// Treat the delimiter as a regular expression.
    const REGEX_DELIMITER = 0b0001_0000;

    const DEFAULT = Self::TRIM.bits() | Self::CLEAN.bits();
    const UNIFIED = Self::DEFAULT.bits() | Self::LOWER_CASE.bits();
  }
}

impl Default for PathOptions {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Anything a [`TreePath`] can be built from.
#[derive(Debug, Clone)]
pub enum Source<'a> {
  /// Delimited text.
  Text(&'a str),
  /// Segments that are normalized but not split.
  Segments(Vec<Cow<'a, str>>),
  /// An existing path, taken as it is.
  Path(&'a TreePath),
}

impl<'a> From<&'a str> for Source<'a> {
  fn from(text: &'a str) -> Self {
    Self::Text(text)
  }
}

impl<'a> From<&'a String> for Source<'a> {
  fn from(text: &'a String) -> Self {
    Self::Text(text)
  }
}

impl<'a> From<&'a [&'a str]> for Source<'a> {
  fn from(segments: &'a [&'a str]) -> Self {
    Self::Segments(segments.iter().map(|segment| Cow::Borrowed(*segment)).collect())
  }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for Source<'a> {
  fn from(segments: &'a [&'a str; N]) -> Self {
    Self::from(segments.as_slice())
  }
}

impl From<Vec<String>> for Source<'_> {
  fn from(segments: Vec<String>) -> Self {
    Self::Segments(segments.into_iter().map(Cow::Owned).collect())
  }
}

impl<'a> From<&'a TreePath> for Source<'a> {
  fn from(path: &'a TreePath) -> Self {
    Self::Path(path)
  }
}

/// Strings are split, arrays and objects contribute their scalar elements
/// as segments. Anything else is an empty path.
impl<'a> From<&'a Value> for Source<'a> {
  fn from(value: &'a Value) -> Self {
    match value {
      Value::String(text) => Self::Text(text),
      Value::Array(values) => {
        Self::Segments(values.iter().filter_map(the_coerce::to_text).collect())
      },
      Value::Object(map) => {
        Self::Segments(map.values().filter_map(the_coerce::to_text).collect())
      },
      Value::Number(_) | Value::Bool(true) => {
        Self::Segments(the_coerce::to_text(value).into_iter().collect())
      },
      Value::Null | Value::Bool(false) => Self::Segments(Vec::new()),
    }
  }
}

type Segments = SmallVec<[String; 4]>;

/// An ordered list of path segments.
///
/// The index based methods are bounds checked: [`get`](Self::get) out of
/// range yields `None` and writes out of range do nothing. Indexing with
/// `path[idx]` panics out of range, like slice indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath {
  segments: Segments,
}

impl TreePath {
  /// Splits `source` on [`DEFAULT_DELIMITER`] with [`PathOptions::DEFAULT`].
  pub fn new<'a>(source: impl Into<Source<'a>>) -> Self {
    Self {
      segments: normalize_literal(source.into(), DEFAULT_DELIMITER, PathOptions::DEFAULT),
    }
  }

  /// Splits `source` on `delimiter`. An empty delimiter keeps text whole.
  ///
  /// Fails only if [`PathOptions::REGEX_DELIMITER`] is set and the delimiter
  /// is not a valid regular expression.
  pub fn with_options<'a>(
    source: impl Into<Source<'a>>,
    delimiter: &str,
    options: PathOptions,
  ) -> Result<Self> {
    Ok(Self {
      segments: normalize(source.into(), delimiter, options)?,
    })
  }

  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  pub fn iter(&self) -> std::slice::Iter<'_, String> {
    self.segments.iter()
  }

  pub fn len(&self) -> usize {
    self.segments.len()
  }

  pub fn is_empty(&self) -> bool {
    self.segments.is_empty()
  }

  pub fn contains_index(&self, idx: usize) -> bool {
    idx < self.segments.len()
  }

  pub fn get(&self, idx: usize) -> Option<&str> {
    self.segments.get(idx).map(String::as_str)
  }

  pub fn first(&self) -> Option<&str> {
    self.get(0)
  }

  pub fn last(&self) -> Option<&str> {
    self.segments.last().map(String::as_str)
  }

  /// Index of the first segment equal to `segment`.
  pub fn index_of(&self, segment: &str) -> Option<usize> {
    self.segments.iter().position(|item| item.as_str() == segment)
  }

  pub fn join(&self, delimiter: &str) -> String {
    self.segments.join(delimiter)
  }

  /// Replaces the segment at `idx` if there is one.
  pub fn set(&mut self, idx: usize, segment: impl Into<String>) -> &mut Self {
    if let Some(item) = self.segments.get_mut(idx) {
      *item = segment.into();
    }
    self
  }

  pub fn append(&mut self, segment: impl Into<String>) -> &mut Self {
    self.segments.push(segment.into());
    self
  }

  pub fn prepend(&mut self, segment: impl Into<String>) -> &mut Self {
    self.segments.insert(0, segment.into());
    self
  }

  /// Inserts before `idx`, appending when `idx` is past the end.
  pub fn insert_at(&mut self, idx: usize, segment: impl Into<String>) -> &mut Self {
    let idx = idx.min(self.segments.len());
    self.segments.insert(idx, segment.into());
    self
  }

  pub fn remove_at(&mut self, idx: usize) -> &mut Self {
    self.take_at(idx);
    self
  }

  /// Removes and returns the segment at `idx`.
  pub fn take_at(&mut self, idx: usize) -> Option<String> {
    self
      .contains_index(idx)
      .then(|| self.segments.remove(idx))
  }

  pub fn remove_first(&mut self) -> &mut Self {
    self.remove_at(0)
  }

  pub fn remove_last(&mut self) -> &mut Self {
    self.segments.pop();
    self
  }

  /// Removes the first segment equal to `segment`.
  pub fn remove(&mut self, segment: &str) -> &mut Self {
    if let Some(idx) = self.index_of(segment) {
      self.segments.remove(idx);
    }
    self
  }

  /// Removes every segment equal to `segment`.
  pub fn remove_all(&mut self, segment: &str) -> &mut Self {
    self.segments.retain(|item| item.as_str() != segment);
    self
  }

  /// Copies out a run of segments.
  ///
  /// A negative `offset` counts from the end. A missing `length` runs to
  /// the end, a negative one stops that many segments before it.
  pub fn slice(&self, offset: isize, length: Option<isize>) -> TreePath {
    let len = self.segments.len() as isize;
    let start = if offset < 0 {
      (len + offset).max(0)
    } else {
      offset.min(len)
    };
    let end = match length {
      None => len,
      Some(length) if length < 0 => len + length,
      Some(length) => start.saturating_add(length).min(len),
    };

    let segments = if end > start {
      self.segments[start as usize..end as usize].iter().cloned().collect()
    } else {
      Segments::new()
    };
    TreePath { segments }
  }

  /// Replaces every segment with the ones parsed from `source`.
  pub fn set_path<'a>(
    &mut self,
    source: impl Into<Source<'a>>,
    delimiter: &str,
    options: PathOptions,
  ) -> Result<&mut Self> {
    self.segments = normalize(source.into(), delimiter, options)?;
    Ok(self)
  }

  pub fn append_path<'a>(
    &mut self,
    source: impl Into<Source<'a>>,
    delimiter: &str,
    options: PathOptions,
  ) -> Result<&mut Self> {
    let segments = normalize(source.into(), delimiter, options)?;
    self.segments.extend(segments);
    Ok(self)
  }

  pub fn prepend_path<'a>(
    &mut self,
    source: impl Into<Source<'a>>,
    delimiter: &str,
    options: PathOptions,
  ) -> Result<&mut Self> {
    let segments = normalize(source.into(), delimiter, options)?;
    self.segments.insert_many(0, segments);
    Ok(self)
  }
}

fn normalize(source: Source<'_>, delimiter: &str, options: PathOptions) -> Result<Segments> {
  if !options.contains(PathOptions::REGEX_DELIMITER) || delimiter.is_empty() {
    return Ok(normalize_literal(source, delimiter, options));
  }

  let Source::Text(text) = source else {
    return Ok(normalize_literal(source, delimiter, options));
  };

  let regex = Regex::new(delimiter).map_err(|source| {
    PathError::Delimiter {
      delimiter: delimiter.to_string(),
      source:    Box::new(source),
    }
  })?;
  let parts = regex.split(text).map(|span| &text[span.range()]);
  Ok(clean(parts, options))
}

fn normalize_literal(source: Source<'_>, delimiter: &str, options: PathOptions) -> Segments {
  match source {
    Source::Path(path) => path.segments.clone(),
    Source::Segments(segments) => clean(segments.iter().map(|segment| segment.as_ref()), options),
    Source::Text("") => Segments::new(),
    Source::Text(text) if delimiter.is_empty() => clean(std::iter::once(text), options),
    Source::Text(text) => clean(text.split(delimiter), options),
  }
}

fn clean<'a>(parts: impl Iterator<Item = &'a str>, options: PathOptions) -> Segments {
  parts
    .map(|part| {
      if options.contains(PathOptions::TRIM) {
        part.trim()
      } else {
        part
      }
    })
    .filter(|part| !(options.contains(PathOptions::CLEAN) && part.is_empty()))
    .map(|part| {
      if options.contains(PathOptions::LOWER_CASE) {
        SingleByte::to_lower(part).to_string()
      } else {
        part.to_string()
      }
    })
    .collect()
}

/// Panics if `idx` is out of range.
impl Index<usize> for TreePath {
  type Output = str;

  fn index(&self, idx: usize) -> &str {
    &self.segments[idx]
  }
}

impl<'a> IntoIterator for &'a TreePath {
  type Item = &'a String;
  type IntoIter = std::slice::Iter<'a, String>;

  fn into_iter(self) -> Self::IntoIter {
    self.segments.iter()
  }
}

impl<S: Into<String>> FromIterator<S> for TreePath {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self {
      segments: iter.into_iter().map(Into::into).collect(),
    }
  }
}

impl<S: Into<String>> Extend<S> for TreePath {
  fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
    self.segments.extend(iter.into_iter().map(Into::into));
  }
}

/// Joins the segments with [`DEFAULT_DELIMITER`].
impl fmt::Display for TreePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.join(DEFAULT_DELIMITER))
  }
}

impl FromStr for TreePath {
  type Err = Infallible;

  fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
    Ok(Self::new(text))
  }
}
