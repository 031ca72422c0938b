//! Path addressed access to nested [`serde_json::Value`] trees.
//!
//! A [`TreePath`] is an ordered list of segments such as `foo/bar/baz`. It
//! supports list style editing and can [`traverse`](TreePath::traverse),
//! [`read`](TreePath::read) and [`write`](TreePath::write) nested objects and
//! arrays, optionally treating segments as shell wildcards.

pub mod path;
pub mod pattern;
pub mod traverse;

use thiserror::Error;

pub use crate::{
  path::{
    DEFAULT_DELIMITER,
    DELIMITER_BACKSLASH,
    DELIMITER_COMMA,
    DELIMITER_DOT,
    DELIMITER_SLASH,
    PathOptions,
    Source,
    TreePath,
  },
  pattern::Wildcard,
  traverse::Traversal,
};

#[derive(Debug, Error)]
pub enum PathError {
  #[error("invalid delimiter pattern '{delimiter}'")]
  Delimiter {
    delimiter: String,
    #[source]
    source:    Box<regex_automata::meta::BuildError>,
  },
  #[error("invalid wildcard pattern '{pattern}'")]
  Pattern {
    pattern: String,
    #[source]
    source:  globset::Error,
  },
}

pub type Result<T> = std::result::Result<T, PathError>;
