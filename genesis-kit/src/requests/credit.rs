use crate::{
    request::{Endpoint, Request, string_setters},
    requests::TransactionType,
    requirements::Requirements,
    types::FieldSet,
};

/// Refunds a settled transaction to the card it was charged on, in full or
/// in part.
///
/// ```
/// use genesis_kit::{pipeline, request::Request, requests::Credit};
///
/// let credit = Credit::new()
///     .transaction_id("credit-1")
///     .remote_ip("245.253.2.12")
///     .reference_id("44177a21403427eb96664a6d7e5d5d48")
///     .amount("5000")
///     .currency("USD");
///
/// let document = pipeline::build_document(credit.structure(), &credit.requirements()).unwrap();
/// assert!(document.as_str().contains("<transaction_type>credit</transaction_type>"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credit {
    pub transaction_id: Option<String>,
    pub usage: Option<String>,
    pub remote_ip: Option<String>,
    /// Unique id of the transaction being credited.
    pub reference_id: Option<String>,
    /// Amount in minor currency units.
    pub amount: Option<String>,
    pub currency: Option<String>,
}

impl Credit {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters!(transaction_id, usage, remote_ip, reference_id, amount, currency);
}

impl Request for Credit {
    fn endpoint(&self) -> Endpoint {
        Endpoint::gateway("process", true)
    }

    fn structure(&self) -> FieldSet {
        FieldSet::new().with(
            "payment_transaction",
            FieldSet::new()
                .with("transaction_type", TransactionType::Credit)
                .with("transaction_id", self.transaction_id.clone())
                .with("usage", self.usage.clone())
                .with("remote_ip", self.remote_ip.clone())
                .with("reference_id", self.reference_id.clone())
                .with("amount", self.amount.clone())
                .with("currency", self.currency.clone()),
        )
    }

    fn requirements(&self) -> Requirements {
        Requirements::required([
            "transaction_id",
            "remote_ip",
            "reference_id",
            "amount",
            "currency",
        ])
    }
}
