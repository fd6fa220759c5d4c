//! Wire constants and timestamp helpers.

pub mod constants;
pub mod time;

pub use constants::*;
pub use time::*;
