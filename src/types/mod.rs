//! Type definitions for usagetally

mod error;
mod usage;

pub use error::*;
pub use usage::*;
