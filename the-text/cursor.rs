//! Restartable cursors over the units of a text.

/// Walks a text one byte at a time.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
  text:  &'a str,
  index: usize,
}

impl<'a> ByteCursor<'a> {
  pub fn new(text: &'a str) -> Self {
    Self { text, index: 0 }
  }

  pub fn text(&self) -> &'a str {
    self.text
  }

  /// Index of the current byte.
  pub fn index(&self) -> usize {
    self.index
  }

  pub fn current(&self) -> Option<u8> {
    self.text.as_bytes().get(self.index).copied()
  }

  pub fn is_valid(&self) -> bool {
    self.index < self.text.len()
  }

  pub fn advance(&mut self) {
    if self.is_valid() {
      self.index += 1;
    }
  }

  pub fn reset(&mut self) {
    self.index = 0;
  }
}

impl Iterator for ByteCursor<'_> {
  type Item = (usize, u8);

  fn next(&mut self) -> Option<Self::Item> {
    let item = (self.index, self.current()?);
    self.advance();
    Some(item)
  }
}

/// Walks a text one code point at a time, keeping both the unit index and
/// the byte offset of the current code point.
#[derive(Debug, Clone)]
pub struct CharCursor<'a> {
  text:     &'a str,
  index:    usize,
  position: usize,
}

impl<'a> CharCursor<'a> {
  pub fn new(text: &'a str) -> Self {
    Self {
      text,
      index: 0,
      position: 0,
    }
  }

  pub fn text(&self) -> &'a str {
    self.text
  }

  /// Index of the current code point.
  pub fn index(&self) -> usize {
    self.index
  }

  /// Byte offset of the current code point.
  pub fn position(&self) -> usize {
    self.position
  }

  pub fn current(&self) -> Option<char> {
    self.text[self.position..].chars().next()
  }

  /// The current code point as a slice of the text.
  pub fn current_str(&self) -> Option<&'a str> {
    let ch = self.current()?;
    Some(&self.text[self.position..self.position + ch.len_utf8()])
  }

  pub fn is_valid(&self) -> bool {
    self.position < self.text.len()
  }

  pub fn advance(&mut self) {
    if let Some(ch) = self.current() {
      self.position += ch.len_utf8();
      self.index += 1;
    }
  }

  pub fn reset(&mut self) {
    self.index = 0;
    self.position = 0;
  }
}

impl Iterator for CharCursor<'_> {
  type Item = (usize, char);

  fn next(&mut self) -> Option<Self::Item> {
    let item = (self.index, self.current()?);
    self.advance();
    Some(item)
  }
}
