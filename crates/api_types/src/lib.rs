use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod profile {
    use super::*;

    /// Symbolic due-date trigger codes shared with the CRM backend.
    ///
    /// `after_delivery` and `custom` expect a `dueDays` offset next to them;
    /// the other codes stand alone.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DueType {
        #[default]
        ContractDate,
        SetupStart,
        EventDelivery,
        AfterDelivery,
        Custom,
    }

    impl DueType {
        /// Returns the canonical code string used on the wire.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::ContractDate => "contract_date",
                Self::SetupStart => "setup_start",
                Self::EventDelivery => "event_delivery",
                Self::AfterDelivery => "after_delivery",
                Self::Custom => "custom",
            }
        }
    }

    /// One payment row of a stored profile.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfilePayment {
        /// 1-based position within the profile.
        pub order: u32,
        pub percentage: u8,
        pub due_type: DueType,
        pub due_days: Option<u32>,
    }

    /// A stored payment profile, as returned by `GET /api/payment-profiles`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentProfile {
        pub id: Uuid,
        pub name: String,
        /// RFC3339 creation timestamp, when the backend provides one.
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
        pub payments: Vec<ProfilePayment>,
    }

    /// Request body for `POST /api/payment-profiles`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfileNew {
        pub name: String,
        pub payments: Vec<ProfilePayment>,
    }
}

pub mod bank {
    use super::*;

    /// A company bank account, as returned by `GET /api/settings/banks`.
    ///
    /// The currency is a plain code string: accounts for foreign exhibitors
    /// may be denominated in currencies the editor itself never prices in.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BankAccount {
        pub id: Uuid,
        pub bank_name: String,
        pub account_name: String,
        pub iban: String,
        pub currency: String,
    }
}
