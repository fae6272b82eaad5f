//! [`WireDocument`] is the serialized XML exchanged with the gateway.

use std::fmt::Display;

/// An encoded XML document with a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireDocument(pub(crate) String);

impl WireDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<[u8]> for WireDocument {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Display for WireDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
