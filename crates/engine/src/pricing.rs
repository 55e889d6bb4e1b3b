//! Order pricing and the tax math that feeds the plan total.
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, PaymentPlan, ResultEngine};

/// Pricing summary of the order behind the proposal.
///
/// The plan never computes its own total. Subtotal and tax combine here, and
/// [`apply_to`](Self::apply_to) is the only path pushing the result into a
/// plan, so the schedule can never drift from the priced order by accident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    subtotal: Money,
    tax_rate: u8,
}

impl Pricing {
    pub fn new(subtotal: Money, tax_rate: u8) -> ResultEngine<Self> {
        Self::validate_rate(tax_rate)?;
        Ok(Self { subtotal, tax_rate })
    }

    #[must_use]
    pub const fn subtotal(&self) -> Money {
        self.subtotal
    }

    #[must_use]
    pub const fn tax_rate(&self) -> u8 {
        self.tax_rate
    }

    pub fn set_subtotal(&mut self, subtotal: Money) {
        self.subtotal = subtotal;
    }

    pub fn set_tax_rate(&mut self, tax_rate: u8) -> ResultEngine<()> {
        Self::validate_rate(tax_rate)?;
        self.tax_rate = tax_rate;
        Ok(())
    }

    /// Tax due on the subtotal, rounded half away from zero.
    #[must_use]
    pub fn tax_amount(&self) -> Money {
        self.subtotal.percent(self.tax_rate)
    }

    /// Subtotal plus tax.
    #[must_use]
    pub fn grand_total(&self) -> Money {
        self.subtotal + self.tax_amount()
    }

    /// Pushes the grand total into the plan; installment amounts re-derive
    /// from it on read.
    pub fn apply_to(&self, plan: &mut PaymentPlan) {
        plan.recalculate_amounts(self.grand_total());
    }

    fn validate_rate(tax_rate: u8) -> ResultEngine<()> {
        if tax_rate > 100 {
            return Err(EngineError::InvalidPercentage(format!(
                "tax rate must be between 0 and 100, got {tax_rate}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    #[test]
    fn tax_amount_rounds_half_away_from_zero() {
        let pricing = Pricing::new(Money::new(999), 20).unwrap();
        // 999 * 20% = 199.8, rounds to 200.
        assert_eq!(pricing.tax_amount(), Money::new(200));
        assert_eq!(pricing.grand_total(), Money::new(1199));
    }

    #[test]
    fn zero_rate_means_no_tax() {
        let pricing = Pricing::new(Money::from_major(50_000), 0).unwrap();
        assert_eq!(pricing.tax_amount(), Money::ZERO);
        assert_eq!(pricing.grand_total(), Money::from_major(50_000));
    }

    #[test]
    fn rates_above_100_are_rejected() {
        assert!(Pricing::new(Money::ZERO, 101).is_err());
        let mut pricing = Pricing::new(Money::ZERO, 20).unwrap();
        assert!(pricing.set_tax_rate(255).is_err());
        assert_eq!(pricing.tax_rate(), 20);
    }

    #[test]
    fn apply_to_updates_the_plan_total() {
        let mut plan = PaymentPlan::new(
            String::from("Fair stand"),
            String::new(),
            Currency::Try,
            Money::ZERO,
            None,
        );
        let id = plan.add_installment().unwrap();
        plan.update_installment(
            id,
            crate::InstallmentUpdate {
                percentage: Some(crate::Percentage::try_new(100).unwrap()),
                due: None,
            },
        )
        .unwrap();

        let pricing = Pricing::new(Money::from_major(100_000), 20).unwrap();
        pricing.apply_to(&mut plan);

        assert_eq!(plan.total_amount(), Money::from_major(120_000));
        assert_eq!(plan.amounts(), vec![Money::from_major(120_000)]);
    }
}
