//! Reusable payment profiles and the draft builder that creates them.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DueTrigger, EngineError, Percentage, ResultEngine,
    due::DueKind,
    util::{normalize_display, normalize_name_key},
};

/// A reusable payment schedule template stored by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProfile {
    pub id: Uuid,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub payments: Vec<ProfilePayment>,
}

impl PaymentProfile {
    /// Sum of the payment percentages.
    #[must_use]
    pub fn total_percentage(&self) -> u32 {
        total_percentage(&self.payments)
    }
}

/// One template row: a percentage share plus due-trigger parts.
///
/// The day offset stays optional at this level; committing the row into a
/// plan validates the pairing through
/// [`DueTrigger::from_parts`](crate::DueTrigger::from_parts).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePayment {
    pub percentage: Percentage,
    pub kind: DueKind,
    #[serde(default)]
    pub days: Option<u32>,
}

impl ProfilePayment {
    /// Human description of the trigger, tolerating an incomplete row.
    #[must_use]
    pub fn describe(&self) -> String {
        match DueTrigger::from_parts(self.kind, self.days) {
            Ok(due) => due.description(),
            Err(_) => format!("{} (days missing)", self.kind.label()),
        }
    }
}

/// An in-progress profile being assembled in the builder form.
///
/// Rows follow the same defaulting and capping rules as plan installments.
/// Nothing here talks to the network: [`validate`](Self::validate) gates the
/// save, and any failure leaves the draft untouched so the user can fix it
/// and retry.
#[derive(Clone, Debug, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub payments: Vec<ProfilePayment>,
}

impl ProfileDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total_percentage(&self) -> u32 {
        total_percentage(&self.payments)
    }

    #[must_use]
    pub fn remaining_percentage(&self) -> u32 {
        100u32.saturating_sub(self.total_percentage())
    }

    /// Name as it would be stored: trimmed, inner whitespace collapsed.
    #[must_use]
    pub fn display_name(&self) -> String {
        normalize_display(&self.name).unwrap_or_default()
    }

    /// Appends a payment of `min(remaining, 10)` percent on contract signing.
    pub fn add_payment(&mut self) -> ResultEngine<()> {
        let remaining = self.remaining_percentage();
        if remaining == 0 {
            return Err(EngineError::PlanFull);
        }
        self.payments.push(ProfilePayment {
            percentage: Percentage::try_new(remaining.min(10) as u8)?,
            kind: DueKind::ContractDate,
            days: None,
        });
        Ok(())
    }

    /// Replaces the payment at `index` (0-based) wholesale.
    pub fn set_payment(&mut self, index: usize, payment: ProfilePayment) -> ResultEngine<()> {
        match self.payments.get_mut(index) {
            Some(slot) => {
                *slot = payment;
                Ok(())
            }
            None => Err(EngineError::KeyNotFound(format!("payment {}", index + 1))),
        }
    }

    pub fn remove_payment(&mut self, index: usize) -> ResultEngine<ProfilePayment> {
        if index >= self.payments.len() {
            return Err(EngineError::KeyNotFound(format!("payment {}", index + 1)));
        }
        Ok(self.payments.remove(index))
    }

    /// Save-readiness checks, in order: non-blank name, at least one payment,
    /// percentages summing to exactly 100, day offsets present where the
    /// trigger needs one. Each failure carries its own message.
    pub fn validate(&self) -> ResultEngine<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::ProfileNameRequired);
        }
        if self.payments.is_empty() {
            return Err(EngineError::ProfileEmpty);
        }
        let total = self.total_percentage();
        if total != 100 {
            return Err(EngineError::ProfilePercentage(total));
        }
        for payment in &self.payments {
            if payment.kind.requires_days() && payment.days.is_none() {
                return Err(EngineError::MissingDays(payment.kind.label().to_string()));
            }
        }
        Ok(())
    }

    /// Rejects a draft whose normalized name collides with an already stored
    /// profile. The backend stays authoritative; this only catches the
    /// obvious duplicate before a round trip.
    pub fn ensure_unique_name(&self, existing: &[PaymentProfile]) -> ResultEngine<()> {
        let Some(key) = normalize_name_key(&self.name) else {
            return Ok(());
        };
        let clash = existing
            .iter()
            .any(|profile| normalize_name_key(&profile.name).as_deref() == Some(key.as_str()));
        if clash {
            return Err(EngineError::ExistingKey(self.display_name()));
        }
        Ok(())
    }
}

fn total_percentage(payments: &[ProfilePayment]) -> u32 {
    payments
        .iter()
        .map(|payment| u32::from(payment.percentage.value()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(value: u8) -> Percentage {
        Percentage::try_new(value).unwrap()
    }

    fn payment(value: u8, kind: DueKind, days: Option<u32>) -> ProfilePayment {
        ProfilePayment {
            percentage: pct(value),
            kind,
            days,
        }
    }

    fn stored(name: &str) -> PaymentProfile {
        PaymentProfile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: None,
            payments: vec![payment(100, DueKind::ContractDate, None)],
        }
    }

    #[test]
    fn blank_name_reported_first() {
        let draft = ProfileDraft {
            name: String::from("   "),
            payments: Vec::new(),
        };
        assert_eq!(draft.validate(), Err(EngineError::ProfileNameRequired));
    }

    #[test]
    fn payments_required_after_name() {
        let draft = ProfileDraft {
            name: String::from("Standart Plan"),
            payments: Vec::new(),
        };
        assert_eq!(draft.validate(), Err(EngineError::ProfileEmpty));
    }

    #[test]
    fn percentages_must_total_100() {
        let draft = ProfileDraft {
            name: String::from("Standart Plan"),
            payments: vec![payment(50, DueKind::ContractDate, None)],
        };
        assert_eq!(draft.validate(), Err(EngineError::ProfilePercentage(50)));

        let over = ProfileDraft {
            name: String::from("Standart Plan"),
            payments: vec![
                payment(60, DueKind::ContractDate, None),
                payment(50, DueKind::EventDelivery, None),
            ],
        };
        assert_eq!(over.validate(), Err(EngineError::ProfilePercentage(110)));
    }

    #[test]
    fn day_offsets_checked_last() {
        let draft = ProfileDraft {
            name: String::from("Standart Plan"),
            payments: vec![
                payment(50, DueKind::ContractDate, None),
                payment(50, DueKind::AfterDelivery, None),
            ],
        };
        assert_eq!(
            draft.validate(),
            Err(EngineError::MissingDays(String::from("After delivery")))
        );
    }

    #[test]
    fn complete_draft_passes() {
        let draft = ProfileDraft {
            name: String::from("Standart Plan"),
            payments: vec![
                payment(50, DueKind::ContractDate, None),
                payment(50, DueKind::AfterDelivery, Some(30)),
            ],
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn add_payment_caps_like_a_plan() {
        let mut draft = ProfileDraft::new();
        draft.add_payment().unwrap();
        assert_eq!(draft.payments[0].percentage.value(), 10);

        draft
            .set_payment(0, payment(95, DueKind::ContractDate, None))
            .unwrap();
        draft.add_payment().unwrap();
        assert_eq!(draft.payments[1].percentage.value(), 5);
        assert_eq!(draft.add_payment(), Err(EngineError::PlanFull));
    }

    #[test]
    fn duplicate_names_collide_on_normalized_key() {
        let existing = vec![stored("Standart Plan")];
        let draft = ProfileDraft {
            name: String::from("  standart   PLAN "),
            payments: Vec::new(),
        };
        assert_eq!(
            draft.ensure_unique_name(&existing),
            Err(EngineError::ExistingKey(String::from("standart PLAN")))
        );

        let fresh = ProfileDraft {
            name: String::from("Fuar Özel"),
            payments: Vec::new(),
        };
        assert!(fresh.ensure_unique_name(&existing).is_ok());
    }

    #[test]
    fn describe_tolerates_missing_days() {
        assert_eq!(
            payment(50, DueKind::AfterDelivery, Some(30)).describe(),
            "30 days after delivery"
        );
        assert_eq!(
            payment(50, DueKind::AfterDelivery, None).describe(),
            "After delivery (days missing)"
        );
    }
}
