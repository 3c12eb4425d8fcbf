//! Shared utility functions.
//!
//! - `format`: human-readable sizes and fixed-place rounding

mod format;

pub use format::{format_size, round_to};
