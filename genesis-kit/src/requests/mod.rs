//! Concrete gateway request types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{errors::Error, types::FieldValue};

pub mod credit;
pub mod recurring;
pub mod retrieval;
pub mod wpf;

pub use credit::Credit;
pub use recurring::InitRecurringSale3D;
pub use retrieval::DateRange;
pub use wpf::WpfCreate;

/// Gateway transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Authorize,
    #[serde(rename = "authorize3d")]
    Authorize3D,
    Sale,
    #[serde(rename = "sale3d")]
    Sale3D,
    InitRecurringSale,
    #[serde(rename = "init_recurring_sale3d")]
    InitRecurringSale3D,
    RecurringSale,
    Capture,
    Refund,
    Void,
    Credit,
    Payout,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Authorize => "authorize",
            TransactionType::Authorize3D => "authorize3d",
            TransactionType::Sale => "sale",
            TransactionType::Sale3D => "sale3d",
            TransactionType::InitRecurringSale => "init_recurring_sale",
            TransactionType::InitRecurringSale3D => "init_recurring_sale3d",
            TransactionType::RecurringSale => "recurring_sale",
            TransactionType::Capture => "capture",
            TransactionType::Refund => "refund",
            TransactionType::Void => "void",
            TransactionType::Credit => "credit",
            TransactionType::Payout => "payout",
        }
    }

    const ALL: [TransactionType; 12] = [
        TransactionType::Authorize,
        TransactionType::Authorize3D,
        TransactionType::Sale,
        TransactionType::Sale3D,
        TransactionType::InitRecurringSale,
        TransactionType::InitRecurringSale3D,
        TransactionType::RecurringSale,
        TransactionType::Capture,
        TransactionType::Refund,
        TransactionType::Void,
        TransactionType::Credit,
        TransactionType::Payout,
    ];
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown transaction type: {value}")))
    }
}

impl From<TransactionType> for FieldValue {
    fn from(kind: TransactionType) -> Self {
        FieldValue::Text(kind.as_str().to_string())
    }
}
