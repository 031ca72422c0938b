//! Text classification and shaping helpers.
//!
//! Everything here is expressed against the [`Charset`] capability, which has
//! two implementations: [`SingleByte`] (ASCII rules, byte offsets) and
//! [`MultiByte`] (Unicode rules, code point offsets).

use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod case;
pub mod charset;
pub mod cursor;

pub use charset::{
  Charset,
  MultiByte,
  SingleByte,
};

pub type Tendril = SmartString<LazyCompact>;
