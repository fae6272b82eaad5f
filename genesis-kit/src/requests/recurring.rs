use crate::{
    attributes::{ASYNC_URL_FIELDS, AddressInfo, AsyncUrls, MpiParams, RiskParams},
    request::{Attributes, Endpoint, Request, string_setters},
    requests::TransactionType,
    requirements::{FieldValidators, RequirementRule, Requirements},
    types::FieldSet,
};

/// Starts a 3-D Secure recurring sale; later charges reference its unique id.
///
/// The cardholder is authenticated either asynchronously, through the
/// [`AsyncUrls`] redirect flow, or synchronously with the result of a
/// merchant-side MPI ([`MpiParams`]). One of the two must be provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitRecurringSale3D {
    pub transaction_id: Option<String>,
    pub usage: Option<String>,
    pub moto: Option<bool>,
    pub remote_ip: Option<String>,
    pub card_holder: Option<String>,
    pub card_number: Option<String>,
    pub cvv: Option<String>,
    pub expiration_month: Option<String>,
    pub expiration_year: Option<String>,
    /// Amount in minor currency units; zero is accepted.
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub document_id: Option<String>,
    pub async_urls: AsyncUrls,
    pub address_info: AddressInfo,
    pub mpi_params: MpiParams,
    pub risk_params: RiskParams,
}

impl InitRecurringSale3D {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters!(
        transaction_id,
        usage,
        remote_ip,
        card_holder,
        card_number,
        cvv,
        expiration_month,
        expiration_year,
        amount,
        currency,
        document_id,
    );

    /// Flags a mail or telephone order.
    pub fn moto(mut self, moto: bool) -> Self {
        self.moto = Some(moto);
        self
    }

    pub fn async_urls(mut self, urls: AsyncUrls) -> Self {
        self.async_urls = urls;
        self
    }

    pub fn address_info(mut self, info: AddressInfo) -> Self {
        self.address_info = info;
        self
    }

    pub fn mpi_params(mut self, mpi: MpiParams) -> Self {
        self.mpi_params = mpi;
        self
    }

    pub fn risk_params(mut self, risk: RiskParams) -> Self {
        self.risk_params = risk;
        self
    }
}

impl Request for InitRecurringSale3D {
    fn endpoint(&self) -> Endpoint {
        Endpoint::gateway("process", true)
    }

    fn structure(&self) -> FieldSet {
        let mut transaction = FieldSet::new()
            .with("transaction_type", TransactionType::InitRecurringSale3D)
            .with("transaction_id", self.transaction_id.clone())
            .with("usage", self.usage.clone())
            .with("moto", self.moto)
            .with("remote_ip", self.remote_ip.clone())
            .with("card_holder", self.card_holder.clone())
            .with("card_number", self.card_number.clone())
            .with("cvv", self.cvv.clone())
            .with("expiration_month", self.expiration_month.clone())
            .with("expiration_year", self.expiration_year.clone())
            .with("amount", self.amount.clone())
            .with("currency", self.currency.clone());
        transaction.merge(self.async_urls.structure());
        transaction.merge(self.address_info.contact_structure());
        transaction.insert("document_id", self.document_id.clone());
        transaction.merge(self.address_info.address_structure());
        transaction.merge(self.mpi_params.structure());
        transaction.merge(self.risk_params.structure());

        FieldSet::new().with("payment_transaction", transaction)
    }

    fn requirements(&self) -> Requirements {
        let mut rules = Requirements::required([
            "transaction_id",
            "card_holder",
            "card_number",
            "expiration_month",
            "expiration_year",
            "amount",
            "currency",
        ]);
        rules.extend(self.async_urls.requirements());
        rules.extend(self.mpi_params.requirements());
        rules.push(RequirementRule::one_of(
            ASYNC_URL_FIELDS.into_iter().chain(["eci"]),
        ));
        rules
    }

    fn validators(&self) -> FieldValidators {
        FieldValidators::new()
            .with("card_number", |value: &str| digits_between(value, 13, 19))
            .with("cvv", |value: &str| digits_between(value, 3, 4))
            .with("expiration_month", |value: &str| {
                digits_between(value, 1, 2)
                    && value.parse::<u8>().is_ok_and(|month| (1..=12).contains(&month))
            })
            .with("expiration_year", |value: &str| digits_between(value, 4, 4))
    }
}

fn digits_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attributes::Address,
        errors::{BlankRequiredField, Error, RequirementKind},
        pipeline,
        types::FieldValue,
    };

    fn card_payment() -> InitRecurringSale3D {
        InitRecurringSale3D::new()
            .transaction_id("recurring-1")
            .card_holder("Travis Pastrana")
            .card_number("4200000000000000")
            .cvv("123")
            .expiration_month("12")
            .expiration_year("2030")
            .amount("0")
            .currency("EUR")
    }

    fn build(request: &InitRecurringSale3D) -> crate::errors::Result<FieldSet> {
        let document = pipeline::build_document_with(
            request.structure(),
            &request.requirements(),
            &request.validators(),
        )?;
        crate::codec::decode(document.as_bytes())
    }

    #[test]
    fn needs_async_urls_or_mpi_data() {
        match build(&card_payment()) {
            Err(Error::BlankRequiredField(err)) => {
                assert_eq!(err.kind(), RequirementKind::OneOf);
                assert_eq!(
                    err.field(),
                    "notification_url, return_success_url, return_failure_url, eci"
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let with_mpi = card_payment().mpi_params(
            MpiParams::new()
                .eci("05")
                .cavv("AAACAgSRBklmQCFgMpEGAAAAAAA="),
        );
        let fields = build(&with_mpi).unwrap();
        assert_eq!(fields.find("mpi_params.eci"), Some(&FieldValue::from("05")));
    }

    #[test]
    fn partial_async_urls_fail_as_conditional() {
        let request = card_payment()
            .async_urls(AsyncUrls::new().notification_url("https://example.com/notify"));

        match build(&request) {
            Err(Error::BlankRequiredField(BlankRequiredField::Conditional { name, .. })) => {
                assert_eq!(name, "notification_url")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn async_flow_document() {
        let request = card_payment()
            .moto(false)
            .async_urls(
                AsyncUrls::new()
                    .notification_url("https://example.com/notify")
                    .return_success_url("https://example.com/ok")
                    .return_failure_url("https://example.com/fail"),
            )
            .address_info(
                AddressInfo::new()
                    .customer_email("travis@example.com")
                    .billing_address(Address::builder().first_name("Travis").country("US").build()),
            );

        let fields = build(&request).unwrap();
        assert_eq!(fields.get_text("transaction_type"), Some("init_recurring_sale3d"));
        assert_eq!(fields.get_text("moto"), Some("false"));
        assert_eq!(fields.find("billing_address.country"), Some(&FieldValue::from("US")));
        assert!(fields.get("shipping_address").is_none());
        assert!(fields.get("mpi_params").is_none());
        assert!(fields.get("risk_params").is_none());
    }

    #[test]
    fn document_id_sits_between_contact_details_and_addresses() {
        let request = card_payment()
            .document_id("ID-4417")
            .mpi_params(MpiParams::new().eci("05"))
            .address_info(
                AddressInfo::new()
                    .customer_email("travis@example.com")
                    .customer_phone("+1987987987987")
                    .billing_address(Address::builder().country("US").build())
                    .shipping_address(Address::builder().country("CA").build()),
            );

        let fields = build(&request).unwrap();
        let keys = fields.keys().collect::<Vec<_>>();
        let tail = &keys[keys.len() - 6..];
        assert_eq!(
            tail,
            [
                "customer_email",
                "customer_phone",
                "document_id",
                "billing_address",
                "shipping_address",
                "mpi_params",
            ]
        );
    }

    #[test]
    fn card_validators() {
        let urls = AsyncUrls::new()
            .notification_url("https://example.com/notify")
            .return_success_url("https://example.com/ok")
            .return_failure_url("https://example.com/fail");

        let invalid = [
            card_payment().card_number("47123jj"),
            card_payment().expiration_month("13"),
            card_payment().expiration_month("+5"),
            card_payment().expiration_month("012"),
            card_payment().expiration_year("201"),
            card_payment().cvv("12345"),
        ];
        for request in invalid {
            let request = request.async_urls(urls.clone());
            assert!(
                matches!(build(&request), Err(Error::InvalidParameter(_))),
                "expected {request:?} to be rejected"
            );
        }

        let padded_month = card_payment().expiration_month("05").async_urls(urls);
        assert!(build(&padded_month).is_ok());
    }
}
