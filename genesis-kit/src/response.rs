//! Decoded gateway replies and notification payloads.

use std::fmt::Display;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    codec,
    errors::Result,
    types::{FieldSet, FieldValue},
};

/// The gateway's canonical success code.
pub const SUCCESS: i64 = 0;

/// Transaction status reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Approved,
    Declined,
    Pending,
    PendingAsync,
    InProgress,
    Error,
    Refunded,
    Voided,
    New,
    Unknown,
    /// A status this library does not know about, kept verbatim.
    Other(String),
}

impl TransactionStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "approved" => TransactionStatus::Approved,
            "declined" => TransactionStatus::Declined,
            "pending" => TransactionStatus::Pending,
            "pending_async" => TransactionStatus::PendingAsync,
            "in_progress" => TransactionStatus::InProgress,
            "error" => TransactionStatus::Error,
            "refunded" => TransactionStatus::Refunded,
            "voided" => TransactionStatus::Voided,
            "new" => TransactionStatus::New,
            "" | "unknown" => TransactionStatus::Unknown,
            other => TransactionStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Approved => "approved",
            TransactionStatus::Declined => "declined",
            TransactionStatus::Pending => "pending",
            TransactionStatus::PendingAsync => "pending_async",
            TransactionStatus::InProgress => "in_progress",
            TransactionStatus::Error => "error",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::Voided => "voided",
            TransactionStatus::New => "new",
            TransactionStatus::Unknown => "unknown",
            TransactionStatus::Other(other) => other,
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The standard synchronous payment reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentResponse {
    pub transaction_type: Option<String>,
    pub status: Option<String>,
    pub authorization_code: Option<String>,
    pub response_code: Option<String>,
    pub unique_id: Option<String>,
    pub transaction_id: Option<String>,
    pub technical_message: Option<String>,
    pub message: Option<String>,
    pub mode: Option<String>,
    pub timestamp: Option<String>,
    pub descriptor: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub sent_to_acquirer: Option<String>,
}

/// A decoded reply: the fields of the response document, or of a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseObject {
    fields: FieldSet,
}

impl ResponseObject {
    /// Decodes the body of a synchronous gateway reply.
    pub fn decode_synchronous(raw: &[u8]) -> Result<Self> {
        Ok(ResponseObject {
            fields: codec::decode(raw)?,
        })
    }

    /// Builds a flat response from notification key/value pairs.
    ///
    /// Every value is URL-decoded (`+` is a space) and trimmed.
    pub fn decode_notification<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| (name, url_decode(value).trim().to_string()))
            .collect();
        ResponseObject { fields }
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.get_text(name)
    }

    pub fn status(&self) -> TransactionStatus {
        TransactionStatus::parse(self.get_text("status").unwrap_or_default())
    }

    /// The numeric response code, if present and numeric.
    pub fn response_code(&self) -> Option<i64> {
        self.get_text("response_code")?.trim().parse().ok()
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.get_text("unique_id")
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.get_text("transaction_id")
    }

    pub fn message(&self) -> Option<&str> {
        self.get_text("message")
    }

    pub fn technical_message(&self) -> Option<&str> {
        self.get_text("technical_message")
    }

    /// Approved status with the [`SUCCESS`] response code.
    ///
    /// A missing or non-numeric code is never a success.
    pub fn is_approved(&self) -> bool {
        self.status() == TransactionStatus::Approved && self.response_code() == Some(SUCCESS)
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.fields)?)
    }

    /// Deserializes the fields into `T`, e.g. [`PaymentResponse`].
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_json()?)?)
    }
}

fn url_decode(value: &str) -> String {
    let spaced = value.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
