use crate::{
    attributes::{AddressInfo, AsyncUrls},
    request::{Attributes, Endpoint, Request, string_setters},
    requests::TransactionType,
    requirements::Requirements,
    types::FieldSet,
};

/// Creates a hosted payment form session.
///
/// The customer is redirected to the returned form and may pay with any of
/// the transaction types added through [`WpfCreate::add_transaction_type`].
///
/// ```
/// use genesis_kit::{request::Request, requests::{TransactionType, WpfCreate}};
///
/// let wpf = WpfCreate::new()
///     .add_transaction_type(TransactionType::Sale)
///     .add_transaction_type(TransactionType::Authorize3D);
///
/// let fields = wpf.structure();
/// let types = fields.find("wpf_payment.transaction_types.transaction_type").unwrap();
/// assert_eq!(types.as_list().map(<[_]>::len), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WpfCreate {
    pub transaction_id: Option<String>,
    pub usage: Option<String>,
    /// Shown to the customer on the payment form.
    pub description: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub return_cancel_url: Option<String>,
    /// Minutes the form stays valid.
    pub lifetime: Option<u32>,
    pub async_urls: AsyncUrls,
    pub address_info: AddressInfo,
    pub transaction_types: Vec<TransactionType>,
}

impl WpfCreate {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters!(
        transaction_id,
        usage,
        description,
        amount,
        currency,
        /// Redirect target when the customer abandons the form.
        return_cancel_url,
    );

    pub fn lifetime(mut self, minutes: u32) -> Self {
        self.lifetime = Some(minutes);
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

    /// Offers one more transaction type on the form.
    pub fn add_transaction_type(mut self, kind: TransactionType) -> Self {
        self.transaction_types.push(kind);
        self
    }
}

impl Request for WpfCreate {
    fn endpoint(&self) -> Endpoint {
        Endpoint::wpf("wpf", false)
    }

    fn structure(&self) -> FieldSet {
        let mut types = FieldSet::new();
        for kind in &self.transaction_types {
            types.append("transaction_type", *kind);
        }

        let mut payment = FieldSet::new()
            .with("transaction_id", self.transaction_id.clone())
            .with("usage", self.usage.clone())
            .with("description", self.description.clone())
            .with("amount", self.amount.clone())
            .with("currency", self.currency.clone());
        payment.merge(self.address_info.structure());
        payment.merge(self.async_urls.structure());
        payment.insert("return_cancel_url", self.return_cancel_url.clone());
        payment.insert("lifetime", self.lifetime);
        payment.insert("transaction_types", types);

        FieldSet::new().with("wpf_payment", payment)
    }

    fn requirements(&self) -> Requirements {
        Requirements::required([
            "transaction_id",
            "amount",
            "currency",
            "description",
            "notification_url",
            "return_success_url",
            "return_failure_url",
            "return_cancel_url",
            "transaction_types",
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Config, SubDomain},
        errors::{BlankRequiredField, Error},
        pipeline,
    };

    fn form() -> WpfCreate {
        WpfCreate::new()
            .transaction_id("wpf-1")
            .description("Subscription")
            .amount("100")
            .currency("EUR")
            .return_cancel_url("https://example.com/cancel")
            .async_urls(
                AsyncUrls::new()
                    .notification_url("https://example.com/notify")
                    .return_success_url("https://example.com/ok")
                    .return_failure_url("https://example.com/fail"),
            )
    }

    #[test]
    fn at_least_one_transaction_type() {
        let request = form();
        match pipeline::build_document(request.structure(), &request.requirements()) {
            Err(Error::BlankRequiredField(BlankRequiredField::Field { name })) => {
                assert_eq!(name, "transaction_types")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn repeated_transaction_types() {
        let request = form()
            .add_transaction_type(TransactionType::Sale)
            .add_transaction_type(TransactionType::InitRecurringSale3D);

        let document = pipeline::build_document(request.structure(), &request.requirements()).unwrap();
        assert!(document.as_str().contains(
            "<transaction_types><transaction_type>sale</transaction_type>\
             <transaction_type>init_recurring_sale3d</transaction_type></transaction_types>"
        ));
        assert!(document.as_str().starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><wpf_payment><transaction_id>wpf-1</transaction_id>"
        ));
    }

    #[test]
    fn posts_to_wpf_without_token() {
        let config = Config::builder().username("u").password("p").build();
        let url = config.request_url(&form().endpoint()).unwrap();

        assert_eq!(form().endpoint().sub_domain, SubDomain::Wpf);
        assert_eq!(url.as_str(), "https://staging.wpf.e-comprocessing.net/wpf");
    }
}
