//! Core types used across the Genesis kit.

mod document;
mod field_set;
mod value;

pub use document::*;
pub use field_set::*;
pub use value::*;
