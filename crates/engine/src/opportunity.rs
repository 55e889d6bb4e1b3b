use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar dates supplied by the sales opportunity a proposal belongs to.
///
/// This is read-only external context: the CRM records these dates (some
/// systems fill the newer `*_start` fields, older records only the legacy
/// ones), and due-date triggers resolve against them. Every field may be
/// absent; that is a valid state, not an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityDates {
    #[serde(default)]
    pub contract_date: Option<NaiveDate>,
    #[serde(default)]
    pub setup_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub setup_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_end_date: Option<NaiveDate>,
}

impl OpportunityDates {
    /// Contract signing date.
    #[must_use]
    pub fn contract(&self) -> Option<NaiveDate> {
        self.contract_date
    }

    /// Setup start, falling back to the legacy setup date.
    #[must_use]
    pub fn setup_start(&self) -> Option<NaiveDate> {
        self.setup_start_date.or(self.setup_date)
    }

    /// Event start, falling back to the legacy event date.
    #[must_use]
    pub fn event_start(&self) -> Option<NaiveDate> {
        self.event_start_date.or(self.event_date)
    }

    /// Delivery date, falling back to the event end date.
    #[must_use]
    pub fn delivery(&self) -> Option<NaiveDate> {
        self.delivery_date.or(self.event_end_date)
    }
}
