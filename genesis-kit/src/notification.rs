//! Verification of asynchronous gateway notifications.
//!
//! The gateway signs every notification with `digest(unique_id || secret)`,
//! hex encoded, where `secret` is the merchant's API password. The digest is
//! SHA-512 when the signature is 128 characters long and SHA-1 otherwise.
//!
//! ```
//! use genesis_kit::notification::{Notification, NotificationEnvelope, SignatureAlgorithm};
//!
//! let signature = SignatureAlgorithm::Sha1.digest_hex("ABC123", "secret");
//! let envelope = NotificationEnvelope::from_pairs([
//!     ("unique_id", "ABC123"),
//!     ("status", "approved"),
//!     ("signature", signature.as_str()),
//! ]);
//!
//! let notification = Notification::parse(envelope).unwrap();
//! assert!(notification.is_authentic("secret"));
//! assert!(!notification.is_authentic("wrong"));
//! ```

use sha1::Sha1;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use crate::{
    codec,
    config::Config,
    errors::{Error, Result},
    response::{ResponseObject, TransactionStatus},
    tree::SanitizedTree,
    types::{FieldSet, WireDocument},
};

/// Value of `notification_type` sent for hosted payment form notifications.
pub const WPF_NOTIFICATION: &str = "wpf";

/// Root element of the acknowledgment document.
pub const ECHO_ROOT: &str = "notification_echo";

/// Raw notification key/value pairs, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationEnvelope {
    pairs: Vec<(String, String)>,
}

impl NotificationEnvelope {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Parses an `application/x-www-form-urlencoded` body.
    pub fn from_form(body: &[u8]) -> Self {
        url::form_urlencoded::parse(body)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// The last value sent under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NotificationEnvelope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        NotificationEnvelope {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Digest used for a notification signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha512,
}

impl SignatureAlgorithm {
    /// Picks the digest from the signature length: 128 hex characters is
    /// SHA-512, any other length is SHA-1.
    pub fn for_signature(signature: &str) -> Self {
        match signature.len() {
            128 => SignatureAlgorithm::Sha512,
            _ => SignatureAlgorithm::Sha1,
        }
    }

    /// Lowercase hex digest of `unique_id` followed by `secret`.
    pub fn digest_hex(&self, unique_id: &str, secret: &str) -> String {
        match self {
            SignatureAlgorithm::Sha1 => hex::encode(
                Sha1::new()
                    .chain_update(unique_id)
                    .chain_update(secret)
                    .finalize(),
            ),
            SignatureAlgorithm::Sha512 => hex::encode(
                Sha512::new()
                    .chain_update(unique_id)
                    .chain_update(secret)
                    .finalize(),
            ),
        }
    }
}

/// A parsed notification, ready to be verified and acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    unique_id: String,
    signature: String,
    wpf: bool,
    response: ResponseObject,
}

impl Notification {
    /// Decodes `envelope` and extracts the identifier to verify.
    ///
    /// Hosted payment form notifications are identified by `wpf_unique_id`,
    /// all others by `unique_id`. A missing identifier is an
    /// [`Error::InvalidArgument`].
    pub fn parse(envelope: NotificationEnvelope) -> Result<Self> {
        let response = ResponseObject::decode_notification(envelope.iter());
        let wpf = response.get_text("notification_type") == Some(WPF_NOTIFICATION);
        let id_field = if wpf { "wpf_unique_id" } else { "unique_id" };

        let unique_id = response
            .get_text(id_field)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::InvalidArgument(format!("notification has no {id_field}")))?
            .to_string();
        let signature = response.get_text("signature").unwrap_or_default().to_string();

        #[cfg(feature = "tracing")]
        tracing::debug!(%unique_id, wpf, "Parsed notification");

        Ok(Notification {
            unique_id,
            signature,
            wpf,
            response,
        })
    }

    /// The identifier the signature covers.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn is_wpf(&self) -> bool {
        self.wpf
    }

    pub fn response(&self) -> &ResponseObject {
        &self.response
    }

    /// Whether the signature matches `secret` and the transaction was approved.
    pub fn is_authentic(&self, secret: &str) -> bool {
        let algorithm = SignatureAlgorithm::for_signature(&self.signature);
        let expected = algorithm.digest_hex(&self.unique_id, secret);
        let signature_matches: bool = expected.as_bytes().ct_eq(self.signature.as_bytes()).into();

        let approved = ["status", "wpf_status"].iter().any(|field| {
            self.response
                .get_text(field)
                .is_some_and(|status| TransactionStatus::parse(status) == TransactionStatus::Approved)
        });

        if !signature_matches || !approved {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                unique_id = %self.unique_id,
                signature_matches,
                approved,
                ?algorithm,
                "Rejected notification"
            );
            return false;
        }
        true
    }

    /// [`Notification::is_authentic`] with the password of `config`.
    pub fn is_authentic_for(&self, config: &Config) -> bool {
        self.is_authentic(&config.password)
    }

    /// The echo document the gateway expects in reply.
    pub fn acknowledge(&self) -> WireDocument {
        let tree = SanitizedTree::build(FieldSet::new().with("unique_id", self.unique_id.as_str()));
        codec::encode_with_root(ECHO_ROOT, &tree)
    }
}

/// Checks `envelope` against `secret` in one step.
///
/// Returns `false` for envelopes without an identifier.
pub fn verify(envelope: NotificationEnvelope, secret: &str) -> bool {
    Notification::parse(envelope).is_ok_and(|notification| notification.is_authentic(secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "b5af4c9cf497662e00b78550fd87e65eb415f42f";

    fn envelope(unique_id: &str, status: &str, signature: &str) -> NotificationEnvelope {
        NotificationEnvelope::from_pairs([
            ("unique_id", unique_id),
            ("status", status),
            ("signature", signature),
        ])
    }

    #[test]
    fn algorithm_follows_signature_length() {
        assert_eq!(SignatureAlgorithm::for_signature(&"a".repeat(40)), SignatureAlgorithm::Sha1);
        assert_eq!(SignatureAlgorithm::for_signature(&"a".repeat(128)), SignatureAlgorithm::Sha512);
        assert_eq!(SignatureAlgorithm::for_signature(&"a".repeat(64)), SignatureAlgorithm::Sha1);
        assert_eq!(SignatureAlgorithm::for_signature(""), SignatureAlgorithm::Sha1);
    }

    #[test]
    fn known_digests() {
        assert_eq!(
            SignatureAlgorithm::Sha1.digest_hex("ab", "c"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            SignatureAlgorithm::Sha512.digest_hex("ab", "c"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn sha1_signature() {
        let signature = SignatureAlgorithm::Sha1.digest_hex("ABC123", SECRET);
        assert_eq!(signature.len(), 40);

        assert!(verify(envelope("ABC123", "approved", &signature), SECRET));
        assert!(!verify(envelope("ABC123", "approved", &signature), "other-secret"));
        assert!(!verify(envelope("ABC124", "approved", &signature), SECRET));
    }

    #[test]
    fn sha512_signature() {
        let signature = SignatureAlgorithm::Sha512.digest_hex("ABC123", SECRET);
        assert_eq!(signature.len(), 128);

        assert!(verify(envelope("ABC123", "approved", &signature), SECRET));
        assert!(!verify(envelope("ABC123", "approved", &signature), "other-secret"));
    }

    #[test]
    fn other_lengths_are_checked_as_sha1() {
        let sha256_like = "0".repeat(64);
        assert!(!verify(envelope("ABC123", "approved", &sha256_like), SECRET));
    }

    #[test]
    fn requires_approved_status() {
        let signature = SignatureAlgorithm::Sha1.digest_hex("ABC123", SECRET);

        assert!(!verify(envelope("ABC123", "declined", &signature), SECRET));
        assert!(!verify(envelope("ABC123", "", &signature), SECRET));
    }

    #[test]
    fn wpf_notifications_use_wpf_unique_id() {
        let signature = SignatureAlgorithm::Sha1.digest_hex("WPF-9", SECRET);
        let envelope = NotificationEnvelope::from_pairs([
            ("notification_type", "wpf"),
            ("wpf_unique_id", "WPF-9"),
            ("wpf_status", "approved"),
            ("signature", signature.as_str()),
            ("unique_id", "ignored"),
        ]);

        let notification = Notification::parse(envelope).unwrap();
        assert!(notification.is_wpf());
        assert_eq!(notification.unique_id(), "WPF-9");
        assert!(notification.is_authentic(SECRET));
    }

    #[test]
    fn missing_identifier() {
        let envelope = NotificationEnvelope::from_pairs([("status", "approved"), ("signature", "x")]);
        assert!(matches!(
            Notification::parse(envelope.clone()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(!verify(envelope, SECRET));

        let wpf_without_id =
            NotificationEnvelope::from_pairs([("notification_type", "wpf"), ("unique_id", "ABC123")]);
        assert!(Notification::parse(wpf_without_id).is_err());
    }

    #[test]
    fn acknowledgment_document() {
        let notification = Notification::parse(envelope("ABC123", "approved", "")).unwrap();
        assert_eq!(
            notification.acknowledge().as_str(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <notification_echo><unique_id>ABC123</unique_id></notification_echo>"
        );
    }

    #[test]
    fn form_body() {
        let envelope = NotificationEnvelope::from_form(
            b"unique_id=ABC123&status=approved&message=Transaction+successful%21",
        );

        assert_eq!(envelope.get("status"), Some("approved"));
        assert_eq!(envelope.get("message"), Some("Transaction successful!"));
    }

    #[test]
    fn authentic_for_config_password() {
        let config = Config::builder().username("merchant").password(SECRET).build();
        let signature = SignatureAlgorithm::Sha1.digest_hex("ABC123", SECRET);
        let notification = Notification::parse(envelope("ABC123", "approved", &signature)).unwrap();

        assert!(notification.is_authentic_for(&config));
    }
}
