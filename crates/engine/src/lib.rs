pub use currency::Currency;
pub use due::{DueKind, DueTrigger, resolve_due_date};
pub use error::EngineError;
pub use money::Money;
pub use opportunity::OpportunityDates;
pub use percentage::Percentage;
pub use plan::{
    BankAccountSnapshot, Installment, InstallmentRow, InstallmentUpdate, PaymentPlan,
    PlanSnapshot, ProfileRef,
};
pub use pricing::Pricing;
pub use profile::{PaymentProfile, ProfileDraft, ProfilePayment};
pub use warnings::{DueStatus, classify};

mod currency;
mod due;
mod error;
mod money;
mod opportunity;
mod percentage;
mod plan;
mod pricing;
mod profile;
mod util;
mod warnings;

pub type ResultEngine<T> = Result<T, EngineError>;
