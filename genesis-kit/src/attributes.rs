//! Field bundles shared across request types.
//!
//! Each bundle contributes a slice of the request tree and, where the
//! gateway demands it, requirement rules. Request types compose them
//! instead of repeating the same fields.

use bon::Builder;

use crate::{
    request::{Attributes, string_setters},
    requirements::{RequirementRule, Requirements},
    types::FieldSet,
};

/// Redirect and callback URLs of an asynchronous transaction.
///
/// Setting any of the three makes the other two mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsyncUrls {
    pub notification_url: Option<String>,
    pub return_success_url: Option<String>,
    pub return_failure_url: Option<String>,
}

pub(crate) const ASYNC_URL_FIELDS: [&str; 3] =
    ["notification_url", "return_success_url", "return_failure_url"];

impl AsyncUrls {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters!(
        /// URL the gateway posts the transaction notification to.
        notification_url,
        /// Redirect target after a successful payment.
        return_success_url,
        /// Redirect target after a failed payment.
        return_failure_url,
    );
}

impl Attributes for AsyncUrls {
    fn structure(&self) -> FieldSet {
        FieldSet::new()
            .with("notification_url", self.notification_url.clone())
            .with("return_success_url", self.return_success_url.clone())
            .with("return_failure_url", self.return_failure_url.clone())
    }

    fn requirements(&self) -> Requirements {
        ASYNC_URL_FIELDS
            .iter()
            .map(|field| {
                let others = ASYNC_URL_FIELDS.iter().filter(|other| *other != field).copied();
                RequirementRule::conditional(*field, others)
            })
            .collect()
    }
}

/// A postal address.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    #[builder(into)]
    pub first_name: Option<String>,
    #[builder(into)]
    pub last_name: Option<String>,
    #[builder(into)]
    pub address1: Option<String>,
    #[builder(into)]
    pub address2: Option<String>,
    #[builder(into)]
    pub zip_code: Option<String>,
    #[builder(into)]
    pub city: Option<String>,
    #[builder(into)]
    pub state: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[builder(into)]
    pub country: Option<String>,
}

impl Address {
    fn structure(&self) -> FieldSet {
        FieldSet::new()
            .with("first_name", self.first_name.clone())
            .with("last_name", self.last_name.clone())
            .with("address1", self.address1.clone())
            .with("address2", self.address2.clone())
            .with("zip_code", self.zip_code.clone())
            .with("city", self.city.clone())
            .with("state", self.state.clone())
            .with("country", self.country.clone())
    }
}

/// Customer contact details with billing and shipping addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInfo {
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub billing_address: Address,
    pub shipping_address: Address,
}

impl AddressInfo {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters!(customer_email, customer_phone);

    pub fn billing_address(mut self, address: Address) -> Self {
        self.billing_address = address;
        self
    }

    pub fn shipping_address(mut self, address: Address) -> Self {
        self.shipping_address = address;
        self
    }

    /// `customer_email` and `customer_phone`, for requests that place their
    /// own fields between the contact details and the addresses.
    pub fn contact_structure(&self) -> FieldSet {
        FieldSet::new()
            .with("customer_email", self.customer_email.clone())
            .with("customer_phone", self.customer_phone.clone())
    }

    /// The nested `billing_address` and `shipping_address` groups.
    pub fn address_structure(&self) -> FieldSet {
        FieldSet::new()
            .with("billing_address", self.billing_address.structure())
            .with("shipping_address", self.shipping_address.structure())
    }
}

impl Attributes for AddressInfo {
    fn structure(&self) -> FieldSet {
        let mut fields = self.contact_structure();
        fields.merge(self.address_structure());
        fields
    }
}

/// Results of a 3-D Secure authentication performed by the merchant's own MPI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MpiParams {
    pub cavv: Option<String>,
    pub eci: Option<String>,
    pub xid: Option<String>,
    pub protocol_version: Option<String>,
    pub directory_server_id: Option<String>,
}

impl MpiParams {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters!(
        cavv,
        /// Electronic commerce indicator.
        eci,
        xid,
        /// 3-D Secure protocol version, e.g. `2`.
        protocol_version,
        directory_server_id,
    );
}

impl Attributes for MpiParams {
    fn structure(&self) -> FieldSet {
        FieldSet::new().with(
            "mpi_params",
            FieldSet::new()
                .with("cavv", self.cavv.clone())
                .with("eci", self.eci.clone())
                .with("xid", self.xid.clone())
                .with("protocol_version", self.protocol_version.clone())
                .with("directory_server_id", self.directory_server_id.clone()),
        )
    }

    fn requirements(&self) -> Requirements {
        Requirements::new().with(RequirementRule::conditional(
            "protocol_version",
            ["directory_server_id"],
        ))
    }
}

/// Fraud screening hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskParams {
    pub ssn: Option<String>,
    pub mac_address: Option<String>,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub user_level: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub remote_ip: Option<String>,
    pub serial_number: Option<String>,
}

impl RiskParams {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters!(
        ssn,
        mac_address,
        session_id,
        user_id,
        user_level,
        email,
        phone,
        remote_ip,
        serial_number,
    );
}

impl Attributes for RiskParams {
    fn structure(&self) -> FieldSet {
        FieldSet::new().with(
            "risk_params",
            FieldSet::new()
                .with("ssn", self.ssn.clone())
                .with("mac_address", self.mac_address.clone())
                .with("session_id", self.session_id.clone())
                .with("user_id", self.user_id.clone())
                .with("user_level", self.user_level.clone())
                .with("email", self.email.clone())
                .with("phone", self.phone.clone())
                .with("remote_ip", self.remote_ip.clone())
                .with("serial_number", self.serial_number.clone()),
        )
    }
}
