//! # Genesis Kit
//!
//! Genesis Kit builds, validates and encodes requests for the Genesis payment
//! gateway, decodes its replies and verifies the notifications it posts back.
//!
//! The kit performs no I/O. Sending a request means handing an
//! [`OutboundRequest`](pipeline::OutboundRequest) to a [`Transport`](pipeline::Transport)
//! you implement with the HTTP client of your choice.
//!
//! ## Core Components Overview
//!
//! ### Shared machinery (re-exported from `genesis-core`)
//!
//! - **[`types`]**: the ordered [`FieldSet`](types::FieldSet) tree and the wire document.
//! - **[`tree`]**: pruning of empty branches before encoding.
//! - **[`requirements`]**: requirement rules and per-field validators.
//! - **[`codec`]**: XML encoding and decoding.
//! - **[`errors`]**: the error type returned across the kit.
//!
//! ### Gateway client
//!
//! - **[`config`]**: credentials, environment and endpoint URLs.
//! - **[`request`]**: the [`Request`](request::Request) trait and endpoints.
//! - **[`attributes`]**: field bundles shared by request types.
//! - **[`requests`]**: concrete request types.
//! - **[`pipeline`]**: validate, sanitize, encode and send.
//! - **[`response`]**: synchronous reply decoding and classification.
//! - **[`notification`]**: notification signature verification and acknowledgment.
//!
//! ## Sending A Request
//!
//! ```
//! use genesis_kit::{
//!     config::Config,
//!     errors::Error,
//!     pipeline::{OutboundRequest, Prepared, Transport},
//!     requests::Credit,
//! };
//!
//! struct Canned;
//!
//! impl Transport for Canned {
//!     type Error = std::io::Error;
//!
//!     fn send(&self, request: &OutboundRequest) -> Result<Vec<u8>, Self::Error> {
//!         assert!(request.body.as_str().contains("<transaction_type>credit</transaction_type>"));
//!         Ok(b"<payment_response><status>approved</status><response_code>00</response_code></payment_response>".to_vec())
//!     }
//! }
//!
//! let config = Config::builder()
//!     .username("merchant")
//!     .password("secret")
//!     .token("terminal-token")
//!     .build();
//!
//! let credit = Credit::new()
//!     .transaction_id("credit-1")
//!     .remote_ip("245.253.2.12")
//!     .reference_id("44177a21403427eb96664a6d7e5d5d48")
//!     .amount("5000")
//!     .currency("USD");
//!
//! let response = Prepared::new(credit).send(&config, &Canned)?;
//! assert!(response.is_approved());
//! # Ok::<(), Error>(())
//! ```

pub mod types {
    pub use genesis_core::types::*;
}

pub mod tree {
    pub use genesis_core::tree::*;
}

pub mod requirements {
    pub use genesis_core::requirements::*;
}

pub mod codec {
    pub use genesis_core::codec::*;
}

pub mod errors {
    pub use genesis_core::errors::*;
}

pub mod attributes;
pub mod config;
pub mod notification;
pub mod pipeline;
pub mod request;
pub mod requests;
pub mod response;
