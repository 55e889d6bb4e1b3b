//! Due-date triggers and the resolver mapping them to calendar dates.
use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, OpportunityDates};

/// Symbolic due-date trigger codes, as stored in payment profiles and on the
/// wire (`contract_date`, `setup_start`, ...).
///
/// A kind alone is not always enough to build a schedule entry:
/// [`AfterDelivery`](DueKind::AfterDelivery) and [`Custom`](DueKind::Custom)
/// also need a day offset. [`DueTrigger`] is the validated combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueKind {
    #[default]
    ContractDate,
    SetupStart,
    EventDelivery,
    AfterDelivery,
    Custom,
}

impl DueKind {
    /// All kinds, in the order the editor cycles through them.
    pub const ALL: [DueKind; 5] = [
        DueKind::ContractDate,
        DueKind::SetupStart,
        DueKind::EventDelivery,
        DueKind::AfterDelivery,
        DueKind::Custom,
    ];

    /// Wire code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            DueKind::ContractDate => "contract_date",
            DueKind::SetupStart => "setup_start",
            DueKind::EventDelivery => "event_delivery",
            DueKind::AfterDelivery => "after_delivery",
            DueKind::Custom => "custom",
        }
    }

    /// Short human label used in choice lists.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DueKind::ContractDate => "On contract signing",
            DueKind::SetupStart => "At setup start",
            DueKind::EventDelivery => "On event delivery",
            DueKind::AfterDelivery => "After delivery",
            DueKind::Custom => "After contract (custom)",
        }
    }

    /// Whether entries of this kind need a day offset to resolve.
    #[must_use]
    pub const fn requires_days(self) -> bool {
        matches!(self, DueKind::AfterDelivery | DueKind::Custom)
    }
}

impl fmt::Display for DueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for DueKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "contract_date" => Ok(DueKind::ContractDate),
            "setup_start" => Ok(DueKind::SetupStart),
            "event_delivery" => Ok(DueKind::EventDelivery),
            "after_delivery" => Ok(DueKind::AfterDelivery),
            "custom" => Ok(DueKind::Custom),
            other => Err(EngineError::InvalidTrigger(format!(
                "unknown due type: {other}"
            ))),
        }
    }
}

/// A fully specified due-date trigger.
///
/// The day offset is part of the variant exactly where it is meaningful, so a
/// trigger can never be in the "offset required but missing" state once
/// constructed. Drafts and wire payloads, where the offset may still be
/// absent, use ([`DueKind`], `Option<u32>`) pairs and go through
/// [`DueTrigger::from_parts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DueTrigger {
    ContractDate,
    SetupStart,
    EventDelivery,
    AfterDelivery { days: u32 },
    Custom { days: u32 },
}

impl DueTrigger {
    /// Builds a trigger from its wire parts, rejecting a missing offset for
    /// the kinds that need one. A stale offset on the other kinds is ignored.
    pub fn from_parts(kind: DueKind, days: Option<u32>) -> Result<Self, EngineError> {
        match kind {
            DueKind::ContractDate => Ok(DueTrigger::ContractDate),
            DueKind::SetupStart => Ok(DueTrigger::SetupStart),
            DueKind::EventDelivery => Ok(DueTrigger::EventDelivery),
            DueKind::AfterDelivery => days
                .map(|days| DueTrigger::AfterDelivery { days })
                .ok_or_else(|| EngineError::MissingDays("after delivery".to_string())),
            DueKind::Custom => days
                .map(|days| DueTrigger::Custom { days })
                .ok_or_else(|| EngineError::MissingDays("after contract".to_string())),
        }
    }

    /// The trigger's kind code.
    #[must_use]
    pub const fn kind(self) -> DueKind {
        match self {
            DueTrigger::ContractDate => DueKind::ContractDate,
            DueTrigger::SetupStart => DueKind::SetupStart,
            DueTrigger::EventDelivery => DueKind::EventDelivery,
            DueTrigger::AfterDelivery { .. } => DueKind::AfterDelivery,
            DueTrigger::Custom { .. } => DueKind::Custom,
        }
    }

    /// The day offset, for the kinds that carry one.
    #[must_use]
    pub const fn days(self) -> Option<u32> {
        match self {
            DueTrigger::AfterDelivery { days } | DueTrigger::Custom { days } => Some(days),
            _ => None,
        }
    }

    /// Derived human description of the trigger.
    #[must_use]
    pub fn description(self) -> String {
        match self {
            DueTrigger::AfterDelivery { days } => format!("{days} days after delivery"),
            DueTrigger::Custom { days } => format!("{days} days after contract signing"),
            other => other.kind().label().to_string(),
        }
    }

    /// Resolves the trigger against the opportunity context.
    #[must_use]
    pub fn resolve(self, opportunity: Option<&OpportunityDates>) -> Option<NaiveDate> {
        resolve_due_date(self.kind(), self.days(), opportunity)
    }
}

/// Maps a trigger (kind + optional day offset) to a concrete calendar date.
///
/// Pure and total: missing context, missing source dates or a missing offset
/// yield `None`, never an error. The warning classifier explains *why* a date
/// did not resolve; this function only answers *what* the date is.
#[must_use]
pub fn resolve_due_date(
    kind: DueKind,
    days: Option<u32>,
    opportunity: Option<&OpportunityDates>,
) -> Option<NaiveDate> {
    let opp = opportunity?;
    match kind {
        DueKind::ContractDate => opp.contract(),
        DueKind::SetupStart => opp.setup_start(),
        DueKind::EventDelivery => opp.event_start(),
        DueKind::AfterDelivery => add_days(opp.delivery()?, days?),
        DueKind::Custom => add_days(opp.contract()?, days?),
    }
}

fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn opportunity() -> OpportunityDates {
        OpportunityDates {
            contract_date: Some(date("2025-03-01")),
            delivery_date: Some(date("2025-01-01")),
            ..OpportunityDates::default()
        }
    }

    #[test]
    fn after_delivery_adds_offset_to_delivery_date() {
        let opp = opportunity();
        assert_eq!(
            resolve_due_date(DueKind::AfterDelivery, Some(30), Some(&opp)),
            Some(date("2025-01-31"))
        );
    }

    #[test]
    fn after_delivery_without_offset_stays_unresolved() {
        let opp = opportunity();
        assert_eq!(resolve_due_date(DueKind::AfterDelivery, None, Some(&opp)), None);
    }

    #[test]
    fn contract_date_with_empty_opportunity_stays_unresolved() {
        let opp = OpportunityDates::default();
        assert_eq!(resolve_due_date(DueKind::ContractDate, None, Some(&opp)), None);
    }

    #[test]
    fn custom_adds_offset_to_contract_date() {
        let opp = opportunity();
        assert_eq!(
            resolve_due_date(DueKind::Custom, Some(15), Some(&opp)),
            Some(date("2025-03-16"))
        );
    }

    #[test]
    fn missing_opportunity_resolves_nothing() {
        for kind in DueKind::ALL {
            assert_eq!(resolve_due_date(kind, Some(10), None), None);
        }
    }

    #[test]
    fn after_delivery_falls_back_to_event_end() {
        let opp = OpportunityDates {
            event_end_date: Some(date("2025-06-12")),
            ..OpportunityDates::default()
        };
        assert_eq!(
            resolve_due_date(DueKind::AfterDelivery, Some(10), Some(&opp)),
            Some(date("2025-06-22"))
        );
    }

    #[test]
    fn from_parts_requires_offset_only_where_meaningful() {
        assert!(DueTrigger::from_parts(DueKind::AfterDelivery, None).is_err());
        assert!(DueTrigger::from_parts(DueKind::Custom, None).is_err());
        assert_eq!(
            DueTrigger::from_parts(DueKind::AfterDelivery, Some(30)).unwrap(),
            DueTrigger::AfterDelivery { days: 30 }
        );
        // A stale offset on a plain kind is tolerated and dropped.
        assert_eq!(
            DueTrigger::from_parts(DueKind::ContractDate, Some(7)).unwrap(),
            DueTrigger::ContractDate
        );
    }

    #[test]
    fn descriptions_embed_the_offset() {
        assert_eq!(
            DueTrigger::AfterDelivery { days: 30 }.description(),
            "30 days after delivery"
        );
        assert_eq!(DueTrigger::ContractDate.description(), "On contract signing");
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in DueKind::ALL {
            assert_eq!(DueKind::try_from(kind.code()).unwrap(), kind);
        }
        assert!(DueKind::try_from("next_full_moon").is_err());
    }
}
