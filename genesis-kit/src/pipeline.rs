//! Turns a request into its wire document and hands it to a transport.
//!
//! The steps always run in the same order: requirement rules are checked
//! against the unsanitized tree, field validators run next, then the tree is
//! sanitized and encoded. A failure at any step yields no document.

use std::{cell::OnceCell, time::Duration};

use url::Url;

use crate::{
    codec,
    config::Config,
    errors::{Error, Result},
    request::Request,
    requirements::{FieldValidators, Requirements},
    response::ResponseObject,
    tree::SanitizedTree,
    types::{FieldSet, WireDocument},
};

/// Validates, sanitizes and encodes `fields`.
pub fn build_document(fields: FieldSet, requirements: &Requirements) -> Result<WireDocument> {
    build_document_with(fields, requirements, &FieldValidators::new())
}

/// [`build_document`] with per-field format checks.
pub fn build_document_with(
    fields: FieldSet,
    requirements: &Requirements,
    validators: &FieldValidators,
) -> Result<WireDocument> {
    requirements.validate(&fields)?;
    validators.validate(&fields)?;
    Ok(codec::encode(&SanitizedTree::build(fields)))
}

/// A request frozen for sending.
///
/// The request is owned, so its fields cannot change once the document has
/// been produced; the document is built on first use and reused afterwards.
///
/// ```
/// use genesis_kit::{pipeline::Prepared, requests::DateRange};
///
/// let prepared = Prepared::new(DateRange::new().start_date("2024-01-01"));
/// let first = prepared.document().unwrap().as_str().to_string();
/// assert_eq!(prepared.document().unwrap().as_str(), first);
/// ```
#[derive(Debug)]
pub struct Prepared<R> {
    request: R,
    document: OnceCell<WireDocument>,
}

impl<R: Request> Prepared<R> {
    pub fn new(request: R) -> Self {
        Prepared {
            request,
            document: OnceCell::new(),
        }
    }

    pub fn request(&self) -> &R {
        &self.request
    }

    /// The wire document, built on the first call.
    pub fn document(&self) -> Result<&WireDocument> {
        if let Some(document) = self.document.get() {
            return Ok(document);
        }

        let document = build_document_with(
            self.request.structure(),
            &self.request.requirements(),
            &self.request.validators(),
        )?;

        #[cfg(feature = "tracing")]
        tracing::debug!(bytes = document.len(), "Built request document");

        Ok(self.document.get_or_init(|| document))
    }

    /// Endpoint URL of the request under `config`.
    pub fn url(&self, config: &Config) -> Result<Url> {
        config.request_url(&self.request.endpoint())
    }

    /// Builds the outbound call for `config` without sending it.
    pub fn outbound(&self, config: &Config) -> Result<OutboundRequest> {
        config.validate()?;
        Ok(OutboundRequest {
            url: self.url(config)?,
            method: "POST",
            content_type: "text/xml",
            authorization: config.basic_auth(),
            user_agent: config.user_agent(),
            body: self.document()?.clone(),
            timeout: config.network_timeout(),
        })
    }

    /// Sends the request through `transport` and decodes the synchronous reply.
    ///
    /// Transport failures are returned unchanged as [`Error::Transport`].
    pub fn send<T: Transport>(&self, config: &Config, transport: &T) -> Result<ResponseObject> {
        let outbound = self.outbound(config)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(url = %outbound.url, "Sending request to gateway");

        let raw = transport
            .send(&outbound)
            .map_err(|err| Error::Transport(Box::new(err)))?;

        let response = ResponseObject::decode_synchronous(&raw)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(status = %response.status(), "Gateway replied");

        Ok(response)
    }
}

/// Everything a transport needs to perform one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: Url,
    pub method: &'static str,
    pub content_type: &'static str,
    /// `Authorization` header value.
    pub authorization: String,
    pub user_agent: String,
    pub body: WireDocument,
    pub timeout: Duration,
}

/// Performs the network exchange. Implementations bring their own HTTP client.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Posts `request` and returns the raw response body.
    fn send(&self, request: &OutboundRequest) -> std::result::Result<Vec<u8>, Self::Error>;
}
