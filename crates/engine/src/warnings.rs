use crate::{DueKind, OpportunityDates, due::resolve_due_date};

/// Advisory classification of one schedule entry's due date.
///
/// Drives the colored banners next to an installment; it never blocks a save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DueStatus {
    Resolved,
    NeedsDays,
    NeedsOpportunity,
    NeedsSourceDate,
    Unresolved,
}

impl DueStatus {
    /// Short badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DueStatus::Resolved => "ok",
            DueStatus::NeedsDays => "needs days",
            DueStatus::NeedsOpportunity => "no opportunity",
            DueStatus::NeedsSourceDate => "missing date",
            DueStatus::Unresolved => "unresolved",
        }
    }

    /// Banner message explaining what is missing.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            DueStatus::Resolved => "due date resolved",
            DueStatus::NeedsDays => "enter the day offset to compute the due date",
            DueStatus::NeedsOpportunity => "no opportunity context; due dates cannot be resolved",
            DueStatus::NeedsSourceDate => "the opportunity is missing the source date",
            DueStatus::Unresolved => "due date could not be computed",
        }
    }

    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, DueStatus::Resolved)
    }
}

/// Classifies a schedule entry into exactly one [`DueStatus`].
///
/// Check order matters and mirrors what the editor surfaces first: a missing
/// day offset beats everything (the user can fix it locally), then the
/// absence of any opportunity, then the specific source date required by the
/// kind. `Unresolved` covers an entry whose inputs are all present but whose
/// date still did not compute.
#[must_use]
pub fn classify(
    kind: DueKind,
    days: Option<u32>,
    opportunity: Option<&OpportunityDates>,
) -> DueStatus {
    if kind.requires_days() && days.is_none() {
        return DueStatus::NeedsDays;
    }
    let Some(opp) = opportunity else {
        return DueStatus::NeedsOpportunity;
    };
    let source = match kind {
        DueKind::ContractDate | DueKind::Custom => opp.contract(),
        DueKind::SetupStart => opp.setup_start(),
        DueKind::EventDelivery => opp.event_start(),
        DueKind::AfterDelivery => opp.delivery(),
    };
    if source.is_none() {
        return DueStatus::NeedsSourceDate;
    }
    if resolve_due_date(kind, days, Some(opp)).is_some() {
        DueStatus::Resolved
    } else {
        DueStatus::Unresolved
    }
}
