//! Shell style wildcard matching of tree keys.

use globset::{
  GlobBuilder,
  GlobMatcher,
};

use crate::{
  PathError,
  Result,
};

/// A compiled key pattern.
///
/// `*` matches any run of characters (including none), `?` a single
/// character, `[...]` a character class, and a backslash escapes the next
/// character. Everything else is literal.
#[derive(Debug, Clone)]
pub struct Wildcard {
  pattern: String,
  matcher: Option<GlobMatcher>,
}

impl Wildcard {
  pub fn new(pattern: &str) -> Result<Self> {
    let glob = GlobBuilder::new(pattern)
      .literal_separator(false)
      .backslash_escape(true)
      .build()
      .map_err(|source| {
        PathError::Pattern {
          pattern: pattern.to_string(),
          source,
        }
      })?;

    Ok(Self {
      pattern: pattern.to_string(),
      matcher: Some(glob.compile_matcher()),
    })
  }

  /// Like [`Wildcard::new`], but a pattern that does not compile matches
  /// only the key equal to it.
  pub fn lenient(pattern: &str) -> Self {
    Self::new(pattern).unwrap_or_else(|err| {
      tracing::debug!(%err, "comparing keys literally");
      Self {
        pattern: pattern.to_string(),
        matcher: None,
      }
    })
  }

  pub fn pattern(&self) -> &str {
    &self.pattern
  }

  pub fn is_literal(&self) -> bool {
    self.matcher.is_none()
  }

  pub fn is_match(&self, key: &str) -> bool {
    match &self.matcher {
      Some(matcher) => matcher.is_match(key),
      None => self.pattern == key,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_wildcards() {
    let pattern = Wildcard::new("b*").unwrap();
    assert!(pattern.is_match("bar"));
    assert!(pattern.is_match("b"));
    assert!(!pattern.is_match("sub"));
    assert!(!pattern.is_match("*"));

    let pattern = Wildcard::new("bo?").unwrap();
    assert!(pattern.is_match("bor"));
    assert!(!pattern.is_match("bo"));
    assert!(!pattern.is_match("boar"));

    let pattern = Wildcard::new("*").unwrap();
    assert!(pattern.is_match(""));
    assert!(pattern.is_match("a/b"));

    let pattern = Wildcard::new("b[io]r").unwrap();
    assert!(pattern.is_match("bir"));
    assert!(!pattern.is_match("bar"));
  }

  #[test]
  fn test_escapes() {
    let pattern = Wildcard::new(r"\*").unwrap();
    assert!(pattern.is_match("*"));
    assert!(!pattern.is_match("foo"));
  }

  #[test]
  fn test_invalid_pattern() {
    assert!(matches!(
      Wildcard::new("[oops"),
      Err(PathError::Pattern { .. })
    ));

    let pattern = Wildcard::lenient("[oops");
    assert!(pattern.is_literal());
    assert!(pattern.is_match("[oops"));
    assert!(!pattern.is_match("oops"));
  }
}
