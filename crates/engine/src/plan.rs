//! The payment plan state container and its mutation operations.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, DueStatus, DueTrigger, EngineError, Money, OpportunityDates, Percentage,
    ResultEngine, due::DueKind, warnings::classify,
};

/// One scheduled partial payment: a share of the total tied to a due trigger.
///
/// Everything else the schedule shows for it (order, amount, due date,
/// description) is derived from plan context on read, so an installment can
/// never carry a stale cached value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Installment {
    pub id: Uuid,
    pub percentage: Percentage,
    pub due: DueTrigger,
}

impl Installment {
    #[must_use]
    pub fn new(percentage: Percentage, due: DueTrigger) -> Self {
        Self {
            id: Uuid::new_v4(),
            percentage,
            due,
        }
    }
}

/// Partial update for one installment. `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstallmentUpdate {
    pub percentage: Option<Percentage>,
    pub due: Option<DueTrigger>,
}

/// Identity of the reusable profile a plan was instantiated from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
    pub id: Uuid,
    pub name: String,
}

/// Denormalized copy of a backend bank account, frozen at selection time.
///
/// The currency code is kept verbatim from the backend; a foreign account may
/// use a currency the plan itself does not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountSnapshot {
    pub id: Uuid,
    pub bank_name: String,
    pub account_name: String,
    pub iban: String,
    pub currency: String,
}

/// Fully derived view of one installment, used by the schedule table and by
/// the exported plan payload. Amounts are integer minor units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentRow {
    pub id: Uuid,
    pub order: u32,
    pub percentage: u8,
    pub amount_minor: i64,
    pub currency: Currency,
    pub due_type: DueKind,
    pub due_days: Option<u32>,
    pub due_date: Option<NaiveDate>,
    pub description: String,
}

/// Serializable materialization of the whole plan, produced on export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub title: String,
    pub intro_text: String,
    pub currency: Currency,
    pub total_amount_minor: i64,
    pub total_percentage: u32,
    pub profile_id: Option<Uuid>,
    pub profile_name: Option<String>,
    pub installments: Vec<InstallmentRow>,
    pub bank_account_id: Option<Uuid>,
    pub bank_account: Option<BankAccountSnapshot>,
    pub show_bank_details: bool,
}

/// The canonical payment schedule of one proposal-editing session.
///
/// Owns the installments and every invariant around them; all collaborators
/// mutate the plan through these operations only. The percentage sum may
/// exceed 100 transiently while editing (the frontend warns), but
/// [`ensure_complete`](PaymentPlan::ensure_complete) gates any save/export.
///
/// A plan instantiated from a profile stays linked to it until the first
/// manual installment edit, at which point the link is dropped (divergence)
/// without ever touching the stored profile.
#[derive(Clone, Debug)]
pub struct PaymentPlan {
    pub title: String,
    pub intro_text: String,
    currency: Currency,
    total_amount: Money,
    opportunity: Option<OpportunityDates>,
    profile: Option<ProfileRef>,
    installments: Vec<Installment>,
    bank_account: Option<BankAccountSnapshot>,
    show_bank_details: bool,
}

impl PaymentPlan {
    #[must_use]
    pub fn new(
        title: String,
        intro_text: String,
        currency: Currency,
        total_amount: Money,
        opportunity: Option<OpportunityDates>,
    ) -> Self {
        Self {
            title,
            intro_text,
            currency,
            total_amount,
            opportunity,
            profile: None,
            installments: Vec::new(),
            bank_account: None,
            show_bank_details: false,
        }
    }

    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    #[must_use]
    pub fn opportunity(&self) -> Option<&OpportunityDates> {
        self.opportunity.as_ref()
    }

    #[must_use]
    pub fn profile(&self) -> Option<&ProfileRef> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn installments(&self) -> &[Installment] {
        &self.installments
    }

    #[must_use]
    pub fn bank_account(&self) -> Option<&BankAccountSnapshot> {
        self.bank_account.as_ref()
    }

    #[must_use]
    pub const fn show_bank_details(&self) -> bool {
        self.show_bank_details
    }

    /// Sum of the installment percentages.
    #[must_use]
    pub fn total_percentage(&self) -> u32 {
        self.installments
            .iter()
            .map(|installment| u32::from(installment.percentage.value()))
            .sum()
    }

    /// Percentage still unallocated, floored at 0.
    #[must_use]
    pub fn remaining_percentage(&self) -> u32 {
        100u32.saturating_sub(self.total_percentage())
    }

    /// A plan is complete when it has installments and they sum to exactly 100%.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.installments.is_empty() && self.total_percentage() == 100
    }

    /// Typed save-readiness check.
    pub fn ensure_complete(&self) -> ResultEngine<()> {
        if self.installments.is_empty() {
            return Err(EngineError::EmptyPlan);
        }
        let total = self.total_percentage();
        if total != 100 {
            return Err(EngineError::IncompletePercentage(total));
        }
        Ok(())
    }

    /// Appends a new installment with the default trigger and a percentage of
    /// `min(remaining, 10)`.
    ///
    /// Rejected once the schedule already allocates 100% or more. Like every
    /// manual installment edit, this detaches the plan from its profile.
    pub fn add_installment(&mut self) -> ResultEngine<Uuid> {
        let remaining = self.remaining_percentage();
        if remaining == 0 {
            return Err(EngineError::PlanFull);
        }
        let percentage = Percentage::try_new(remaining.min(10) as u8)?;
        let installment = Installment::new(percentage, DueTrigger::ContractDate);
        let id = installment.id;
        self.installments.push(installment);
        self.detach_profile();
        Ok(id)
    }

    /// Applies a partial update to the installment with the given id.
    ///
    /// Percentage sums above 100 are accepted here; they only surface as a
    /// warning and block completeness.
    pub fn update_installment(
        &mut self,
        id: Uuid,
        update: InstallmentUpdate,
    ) -> ResultEngine<&Installment> {
        let index = self
            .installments
            .iter()
            .position(|installment| installment.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

        let installment = &mut self.installments[index];
        if let Some(percentage) = update.percentage {
            installment.percentage = percentage;
        }
        if let Some(due) = update.due {
            installment.due = due;
        }
        self.detach_profile();
        Ok(&self.installments[index])
    }

    /// Removes the installment with the given id. Orders being positional,
    /// the remaining entries re-sequence to `1..=n` by construction.
    pub fn delete_installment(&mut self, id: Uuid) -> ResultEngine<Installment> {
        match self
            .installments
            .iter()
            .position(|installment| installment.id == id)
        {
            Some(index) => {
                let removed = self.installments.remove(index);
                self.detach_profile();
                Ok(removed)
            }
            None => Err(EngineError::KeyNotFound(id.to_string())),
        }
    }

    /// Replaces the whole schedule with the profile's payments and links the
    /// plan to that profile.
    ///
    /// Each stored payment is re-validated on the way in; a malformed
    /// template (for example an offset-less `after_delivery` saved by some
    /// other client) is rejected without touching the current schedule.
    pub fn apply_profile(&mut self, profile: &crate::PaymentProfile) -> ResultEngine<()> {
        let mut installments = Vec::with_capacity(profile.payments.len());
        for payment in &profile.payments {
            let due = DueTrigger::from_parts(payment.kind, payment.days)?;
            installments.push(Installment::new(payment.percentage, due));
        }
        self.installments = installments;
        self.profile = Some(ProfileRef {
            id: profile.id,
            name: profile.name.clone(),
        });
        Ok(())
    }

    /// Resets the schedule and the profile link to the empty state.
    pub fn clear_profile(&mut self) {
        self.installments.clear();
        self.profile = None;
    }

    /// Single entry point for the externally owned total (subtotal + tax).
    ///
    /// Amounts being derived, storing the new total is all that is needed;
    /// percentages and due dates are untouched.
    pub fn recalculate_amounts(&mut self, total: Money) {
        self.total_amount = total;
    }

    /// Swaps the opportunity context; due dates re-derive on read.
    pub fn set_opportunity(&mut self, opportunity: Option<OpportunityDates>) {
        self.opportunity = opportunity;
    }

    /// Freezes the given account into the plan.
    pub fn select_bank_account(&mut self, account: BankAccountSnapshot) {
        self.bank_account = Some(account);
    }

    pub fn clear_bank_account(&mut self) {
        self.bank_account = None;
    }

    pub fn set_show_bank_details(&mut self, show: bool) {
        self.show_bank_details = show;
    }

    /// Per-installment amounts, aligned with [`installments`](Self::installments).
    ///
    /// Each amount is the half-up rounded percentage share of the total. When
    /// the plan is complete the last installment absorbs the rounding
    /// residual, so a complete schedule always sums exactly to the total.
    #[must_use]
    pub fn amounts(&self) -> Vec<Money> {
        let mut amounts: Vec<Money> = self
            .installments
            .iter()
            .map(|installment| self.total_amount.percent(installment.percentage.value()))
            .collect();

        if self.total_percentage() == 100
            && let Some(last) = amounts.len().checked_sub(1)
        {
            let allocated: i64 = amounts[..last].iter().map(|amount| amount.minor()).sum();
            amounts[last] = Money::new(self.total_amount.minor() - allocated);
        }

        amounts
    }

    /// Due date of one installment under the current opportunity context.
    #[must_use]
    pub fn due_date_for(&self, installment: &Installment) -> Option<NaiveDate> {
        installment.due.resolve(self.opportunity.as_ref())
    }

    /// Advisory due-date status of one installment.
    #[must_use]
    pub fn status_for(&self, installment: &Installment) -> DueStatus {
        classify(
            installment.due.kind(),
            installment.due.days(),
            self.opportunity.as_ref(),
        )
    }

    /// Derived view of the whole schedule, one row per installment.
    #[must_use]
    pub fn rows(&self) -> Vec<InstallmentRow> {
        let amounts = self.amounts();
        self.installments
            .iter()
            .zip(amounts)
            .enumerate()
            .map(|(index, (installment, amount))| InstallmentRow {
                id: installment.id,
                order: index as u32 + 1,
                percentage: installment.percentage.value(),
                amount_minor: amount.minor(),
                currency: self.currency,
                due_type: installment.due.kind(),
                due_days: installment.due.days(),
                due_date: self.due_date_for(installment),
                description: installment.due.description(),
            })
            .collect()
    }

    /// Materializes the full plan for export into the proposal payload.
    #[must_use]
    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            title: self.title.clone(),
            intro_text: self.intro_text.clone(),
            currency: self.currency,
            total_amount_minor: self.total_amount.minor(),
            total_percentage: self.total_percentage(),
            profile_id: self.profile.as_ref().map(|profile| profile.id),
            profile_name: self.profile.as_ref().map(|profile| profile.name.clone()),
            installments: self.rows(),
            bank_account_id: self.bank_account.as_ref().map(|account| account.id),
            bank_account: self.bank_account.clone(),
            show_bank_details: self.show_bank_details,
        }
    }

    // Any manual installment mutation severs the profile link.
    fn detach_profile(&mut self) {
        self.profile = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PaymentProfile, ProfilePayment};

    fn plan() -> PaymentPlan {
        PaymentPlan::new(
            String::from("Fair stand"),
            String::new(),
            Currency::Try,
            Money::from_major(100_000),
            None,
        )
    }

    fn pct(value: u8) -> Percentage {
        Percentage::try_new(value).unwrap()
    }

    fn profile_50_50() -> PaymentProfile {
        PaymentProfile {
            id: Uuid::new_v4(),
            name: String::from("Half and half"),
            created_at: None,
            payments: vec![
                ProfilePayment {
                    percentage: pct(50),
                    kind: DueKind::ContractDate,
                    days: None,
                },
                ProfilePayment {
                    percentage: pct(50),
                    kind: DueKind::EventDelivery,
                    days: None,
                },
            ],
        }
    }

    #[test]
    fn add_installment_uses_defaults() {
        let mut plan = plan();
        plan.add_installment().unwrap();

        let installment = &plan.installments()[0];
        assert_eq!(installment.percentage.value(), 10);
        assert_eq!(installment.due, DueTrigger::ContractDate);
        assert_eq!(plan.total_percentage(), 10);
    }

    #[test]
    fn add_installment_caps_at_remaining() {
        let mut plan = plan();
        let id = plan.add_installment().unwrap();
        plan.update_installment(
            id,
            InstallmentUpdate {
                percentage: Some(pct(95)),
                due: None,
            },
        )
        .unwrap();

        plan.add_installment().unwrap();
        assert_eq!(plan.installments()[1].percentage.value(), 5);
        assert_eq!(plan.total_percentage(), 100);
        assert_eq!(plan.add_installment(), Err(EngineError::PlanFull));
    }

    #[test]
    #[should_panic(expected = "PlanFull")]
    fn fail_add_installment_when_full() {
        let mut plan = plan();
        let id = plan.add_installment().unwrap();
        plan.update_installment(
            id,
            InstallmentUpdate {
                percentage: Some(pct(100)),
                due: None,
            },
        )
        .unwrap();
        plan.add_installment().unwrap();
    }

    #[test]
    fn update_unknown_installment_fails() {
        let mut plan = plan();
        let ghost = Uuid::new_v4();
        assert_eq!(
            plan.update_installment(ghost, InstallmentUpdate::default()),
            Err(EngineError::KeyNotFound(ghost.to_string()))
        );
    }

    #[test]
    fn delete_resequences_orders() {
        let mut plan = plan();
        plan.add_installment().unwrap();
        let second = plan.add_installment().unwrap();
        plan.add_installment().unwrap();

        plan.delete_installment(second).unwrap();
        let orders: Vec<u32> = plan.rows().iter().map(|row| row.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn amounts_follow_percentages() {
        let mut plan = plan();
        let shares = [40u8, 30, 30];
        for share in shares {
            let id = plan.add_installment().unwrap();
            plan.update_installment(
                id,
                InstallmentUpdate {
                    percentage: Some(pct(share)),
                    due: None,
                },
            )
            .unwrap();
        }

        assert_eq!(plan.total_percentage(), 100);
        assert_eq!(
            plan.amounts(),
            vec![
                Money::from_major(40_000),
                Money::from_major(30_000),
                Money::from_major(30_000)
            ]
        );
        assert!(plan.ensure_complete().is_ok());
    }

    #[test]
    fn complete_plan_absorbs_rounding_residual_in_last_amount() {
        let mut plan = PaymentPlan::new(
            String::from("Odd total"),
            String::new(),
            Currency::Try,
            Money::new(999),
            None,
        );
        for share in [35u8, 35, 30] {
            let id = plan.add_installment().unwrap();
            plan.update_installment(
                id,
                InstallmentUpdate {
                    percentage: Some(pct(share)),
                    due: None,
                },
            )
            .unwrap();
        }

        // Plain shares would be 350 + 350 + 300 = 1000; the last row absorbs
        // the extra minor unit.
        assert_eq!(
            plan.amounts(),
            vec![Money::new(350), Money::new(350), Money::new(299)]
        );
        let total: i64 = plan.amounts().iter().map(|amount| amount.minor()).sum();
        assert_eq!(total, 999);
    }

    #[test]
    fn recalculate_amounts_rederives_every_share() {
        let mut plan = plan();
        let id = plan.add_installment().unwrap();
        plan.update_installment(
            id,
            InstallmentUpdate {
                percentage: Some(pct(50)),
                due: None,
            },
        )
        .unwrap();

        plan.recalculate_amounts(Money::from_major(20_000));
        assert_eq!(plan.amounts(), vec![Money::from_major(10_000)]);
        assert_eq!(plan.total_amount(), Money::from_major(20_000));
    }

    #[test]
    fn manual_edits_detach_the_profile() {
        let profile = profile_50_50();
        let mut plan = plan();
        plan.apply_profile(&profile).unwrap();
        assert_eq!(plan.profile().map(|p| p.id), Some(profile.id));
        assert_eq!(plan.total_percentage(), 100);

        let first = plan.installments()[0].id;
        plan.update_installment(
            first,
            InstallmentUpdate {
                percentage: Some(pct(60)),
                due: None,
            },
        )
        .unwrap();

        assert!(plan.profile().is_none());
        assert_eq!(plan.total_percentage(), 110);
        assert_eq!(plan.ensure_complete(), Err(EngineError::IncompletePercentage(110)));
    }

    #[test]
    fn clear_profile_resets_schedule() {
        let mut plan = plan();
        plan.apply_profile(&profile_50_50()).unwrap();
        plan.clear_profile();

        assert!(plan.installments().is_empty());
        assert!(plan.profile().is_none());
        assert_eq!(plan.ensure_complete(), Err(EngineError::EmptyPlan));
    }

    #[test]
    fn snapshot_mirrors_plan_state() {
        let mut plan = plan();
        plan.apply_profile(&profile_50_50()).unwrap();
        plan.select_bank_account(BankAccountSnapshot {
            id: Uuid::new_v4(),
            bank_name: String::from("Ziraat"),
            account_name: String::from("Caparra Fuar A.Ş."),
            iban: String::from("TR330006100519786457841326"),
            currency: String::from("TRY"),
        });
        plan.set_show_bank_details(true);

        let snapshot = plan.snapshot();
        assert_eq!(snapshot.total_percentage, 100);
        assert_eq!(snapshot.total_amount_minor, Money::from_major(100_000).minor());
        assert_eq!(snapshot.installments.len(), 2);
        assert_eq!(snapshot.installments[0].order, 1);
        assert_eq!(snapshot.installments[0].amount_minor, Money::from_major(50_000).minor());
        assert_eq!(
            snapshot.bank_account_id,
            snapshot.bank_account.as_ref().map(|account| account.id)
        );
        assert!(snapshot.show_bank_details);
    }
}
