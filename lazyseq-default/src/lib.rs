//! An insertion-ordered map that supplies a default for missing keys.
//!
//! The default is either a fixed value, cloned for each miss, or a factory
//! called for each miss. Which one is used is decided when the map is built,
//! not by inspecting the default at lookup time.

mod default_map;

pub use default_map::{DefaultMap, DefaultValue};
