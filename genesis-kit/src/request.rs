//! The [`Request`] trait every gateway request type implements, and the
//! [`Attributes`] bundles request types compose their field trees from.

use crate::{
    config::SubDomain,
    requirements::{FieldValidators, Requirements},
    types::FieldSet,
};

/// Where a request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub sub_domain: SubDomain,
    pub path: &'static str,
    /// Whether the terminal token is appended to the path.
    pub append_token: bool,
}

impl Endpoint {
    pub const fn gateway(path: &'static str, append_token: bool) -> Self {
        Endpoint {
            sub_domain: SubDomain::Gateway,
            path,
            append_token,
        }
    }

    pub const fn wpf(path: &'static str, append_token: bool) -> Self {
        Endpoint {
            sub_domain: SubDomain::Wpf,
            path,
            append_token,
        }
    }
}

/// A gateway request type.
///
/// Implementors expose their current field tree and the rules that tree
/// must satisfy; turning it into a document is left to the
/// [`pipeline`](crate::pipeline).
pub trait Request {
    /// Gateway service and path this request is posted to.
    fn endpoint(&self) -> Endpoint;

    /// The unsanitized field tree, in document order.
    fn structure(&self) -> FieldSet;

    /// Obligations checked before the tree is encoded.
    fn requirements(&self) -> Requirements;

    /// Format checks run after the requirement rules pass.
    fn validators(&self) -> FieldValidators {
        FieldValidators::new()
    }
}

/// A reusable group of fields shared by several request types.
pub trait Attributes {
    /// Entries contributed to the enclosing request's tree.
    fn structure(&self) -> FieldSet;

    /// Rules contributed to the enclosing request.
    fn requirements(&self) -> Requirements {
        Requirements::new()
    }
}

/// Normalizes a setter argument: surrounding whitespace is dropped.
pub(crate) fn trimmed(value: impl Into<String>) -> String {
    let value = value.into();
    if value.trim().len() == value.len() {
        value
    } else {
        value.trim().to_string()
    }
}

/// Generates chainable setters for optional string fields.
macro_rules! string_setters {
    ($($(#[$meta:meta])* $field:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $field(mut self, value: impl Into<String>) -> Self {
                self.$field = Some($crate::request::trimmed(value));
                self
            }
        )*
    };
}

pub(crate) use string_setters;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_drops_surrounding_whitespace() {
        assert_eq!(trimmed("  5000 "), "5000");
        assert_eq!(trimmed("USD"), "USD");
        assert_eq!(trimmed("   "), "");
    }

    #[test]
    fn endpoint_constructors() {
        let endpoint = Endpoint::wpf("wpf", false);
        assert_eq!(endpoint.sub_domain, SubDomain::Wpf);
        assert!(!endpoint.append_token);

        let endpoint = Endpoint::gateway("process", true);
        assert_eq!(endpoint.sub_domain, SubDomain::Gateway);
        assert_eq!(endpoint.path, "process");
    }
}
