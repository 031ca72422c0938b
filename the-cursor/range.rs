//! Cursor over an inclusive arithmetic progression.

use serde::{
  Deserialize,
  Serialize,
};
use serde_json::Value;

use crate::{
  Cursor,
  Key,
};

/// An arithmetic progression from `start` towards `end` by `step`, together
/// with a position in it.
///
/// The progression is inclusive of `start` and stops at the last value that
/// does not pass `end`, so `RangeCursor::new(5, 0, 3)` walks `5, 2`. The
/// position runs from `0` to [`total_steps`](Self::total_steps), the latter
/// being the exhausted state.
///
/// Serializes as `{ "start": .., "end": .., "step": .. }`; the position is
/// not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Bounds", into = "Bounds")]
pub struct RangeCursor {
  start:       i64,
  end:         i64,
  step:        u64,
  total_steps: usize,
  position:    usize,
}

#[derive(Serialize, Deserialize)]
struct Bounds {
  start: i64,
  end:   i64,
  #[serde(default = "default_step")]
  step:  i64,
}

fn default_step() -> i64 {
  1
}

impl From<Bounds> for RangeCursor {
  fn from(bounds: Bounds) -> Self {
    Self::new(bounds.start, bounds.end, bounds.step)
  }
}

impl From<RangeCursor> for Bounds {
  fn from(cursor: RangeCursor) -> Self {
    Self {
      start: cursor.start,
      end:   cursor.end,
      step:  i64::try_from(cursor.step).unwrap_or(i64::MAX),
    }
  }
}

impl RangeCursor {
  /// Creates a cursor positioned at `start`. A `step` below 1 is raised to 1.
  pub fn new(start: i64, end: i64, step: i64) -> Self {
    let step = step.max(1) as u64;
    let total_steps = usize::try_from(end.abs_diff(start) / step)
      .unwrap_or(usize::MAX)
      .saturating_add(1);

    Self {
      start,
      end,
      step,
      total_steps,
      position: 0,
    }
  }

  /// Moves to `position`, clamped into the valid range.
  pub fn with_position(mut self, position: usize) -> Self {
    self.position = position.min(self.total_steps);
    self
  }

  pub fn start(&self) -> i64 {
    self.start
  }

  pub fn end(&self) -> i64 {
    self.end
  }

  pub fn step(&self) -> u64 {
    self.step
  }

  /// Number of values in the progression, never below 1. Saturates at
  /// `usize::MAX` for progressions spanning almost all of `i64`.
  pub fn total_steps(&self) -> usize {
    self.total_steps
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn is_reversed(&self) -> bool {
    self.end < self.start
  }

  /// Value at the current position.
  ///
  /// Past the last value this keeps extrapolating the progression, saturating
  /// at the bounds of `i64`.
  pub fn value(&self) -> i64 {
    self.value_at(self.position)
  }

  /// Distance travelled from `start`.
  pub fn progress(&self) -> u64 {
    self.step.saturating_mul(self.position as u64)
  }

  /// Distance between `start` and `end`.
  pub fn range(&self) -> u64 {
    self.end.abs_diff(self.start)
  }

  /// Distance from `start` to the last value of the progression.
  pub fn max_progress(&self) -> u64 {
    self.step.saturating_mul((self.total_steps - 1) as u64)
  }

  pub fn lower_boundary(&self) -> i64 {
    self.start.min(self.end)
  }

  pub fn upper_boundary(&self) -> i64 {
    self.start.max(self.end)
  }

  /// Smallest value the progression actually reaches.
  pub fn lowest_value(&self) -> i64 {
    if self.is_reversed() {
      self.value_at(self.total_steps - 1)
    } else {
      self.start
    }
  }

  /// Largest value the progression actually reaches.
  pub fn highest_value(&self) -> i64 {
    if self.is_reversed() {
      self.start
    } else {
      self.value_at(self.total_steps - 1)
    }
  }

  pub fn is_exhausted(&self) -> bool {
    self.position == self.total_steps
  }

  pub fn is_at_first(&self) -> bool {
    self.position == 0
  }

  pub fn is_at_last(&self) -> bool {
    self.position == self.total_steps - 1
  }

  /// Returns true if the current value is exactly `end`. Progressions whose
  /// step overshoots `end` never get there.
  pub fn is_at_boundary_value(&self) -> bool {
    self.value() == self.end
  }

  pub fn advance(&mut self) {
    self.seek_by(1);
  }

  pub fn retreat(&mut self) {
    self.seek_by(-1);
  }

  /// Moves the position by `delta`, clamped into `[0, total_steps]`.
  pub fn seek_by(&mut self, delta: isize) {
    self.position = self
      .position
      .saturating_add_signed(delta)
      .min(self.total_steps);
  }

  pub fn reset(&mut self) {
    self.position = 0;
  }

  /// Share of the values visited including the current one, in percent
  /// rounded to two decimals.
  pub fn progress_fraction(&self) -> f64 {
    round_percent((self.position as f64 + 1.0) / self.total_steps as f64)
  }

  /// Share of the distance to `end` travelled, in percent rounded to two
  /// decimals. Zero for single value progressions.
  pub fn distance_fraction(&self) -> f64 {
    match self.range() {
      0 => 0.0,
      range => round_percent(self.progress() as f64 / range as f64),
    }
  }

  /// Every value of the progression, regardless of the position.
  pub fn materialize(&self) -> Vec<i64> {
    (0..self.total_steps).map(|idx| self.value_at(idx)).collect()
  }

  fn value_at(&self, position: usize) -> i64 {
    let offset = i128::from(self.step) * position as i128;
    let value = if self.is_reversed() {
      i128::from(self.start) - offset
    } else {
      i128::from(self.start) + offset
    };
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
  }
}

fn round_percent(ratio: f64) -> f64 {
  (ratio * 100.0 * 100.0).round() / 100.0
}

/// Yields `(position, value)` pairs from the current position on. Call
/// [`RangeCursor::reset`] to walk the progression again.
impl Iterator for RangeCursor {
  type Item = (usize, i64);

  fn next(&mut self) -> Option<Self::Item> {
    if self.is_exhausted() {
      return None;
    }
    let item = (self.position, self.value());
    self.advance();
    Some(item)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = self.total_steps - self.position;
    (remaining, Some(remaining))
  }
}

impl ExactSizeIterator for RangeCursor {}

impl Cursor for RangeCursor {
  fn key(&self) -> Option<Key> {
    (!self.is_exhausted()).then(|| Key::from(self.position))
  }

  fn current(&self) -> Option<Value> {
    (!self.is_exhausted()).then(|| Value::from(self.value()))
  }

  fn advance(&mut self) {
    RangeCursor::advance(self);
  }

  fn reset(&mut self) {
    RangeCursor::reset(self);
  }

  fn is_valid(&self) -> bool {
    !self.is_exhausted()
  }

  fn known_count(&self) -> Option<usize> {
    Some(self.total_steps)
  }

  fn boxed_clone(&self) -> Box<dyn Cursor> {
    Box::new(self.clone())
  }
}
