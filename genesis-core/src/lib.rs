//! Genesis core library.
//!
//! This library provides the request-independent machinery shared by every
//! Genesis gateway request and response:
//!
//! - [`types`]: the ordered [`FieldSet`](types::FieldSet) tree and the
//!   [`WireDocument`](types::WireDocument) it is encoded to.
//! - [`tree`]: pruning of empty branches into a [`SanitizedTree`](tree::SanitizedTree).
//! - [`requirements`]: flat, conditional, group and one-of requirement rules.
//! - [`codec`]: XML encoding and decoding.
//! - [`errors`]: the error type returned by all of the above.

pub mod codec;
pub mod errors;
pub mod requirements;
pub mod tree;
pub mod types;
