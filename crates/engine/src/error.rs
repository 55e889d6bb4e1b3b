//! The module contains the errors the engine can return.
//!
//! Every error carries the message shown inline by the frontend, so the
//! variants double as the validation taxonomy:
//!
//! - [`PlanFull`] returned when adding to a fully allocated schedule.
//! - [`KeyNotFound`] returned when an installment id is unknown.
//! - [`ProfileNameRequired`], [`ProfileEmpty`] and [`ProfilePercentage`]
//!   block a profile save, each with its own message.
//!
//!  [`PlanFull`]: EngineError::PlanFull
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ProfileNameRequired`]: EngineError::ProfileNameRequired
//!  [`ProfileEmpty`]: EngineError::ProfileEmpty
//!  [`ProfilePercentage`]: EngineError::ProfilePercentage
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("schedule already allocates 100%")]
    PlanFull,
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("invalid percentage: {0}")]
    InvalidPercentage(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid due trigger: {0}")]
    InvalidTrigger(String),
    #[error("day offset required: {0}")]
    MissingDays(String),
    #[error("profile name is required")]
    ProfileNameRequired,
    #[error("profile has no payments")]
    ProfileEmpty,
    #[error("payment percentages must equal 100% (currently {0}%)")]
    ProfilePercentage(u32),
    #[error("schedule has no installments")]
    EmptyPlan,
    #[error("installment percentages must equal 100% (currently {0}%)")]
    IncompletePercentage(u32),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::PlanFull, Self::PlanFull) => true,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidPercentage(a), Self::InvalidPercentage(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidTrigger(a), Self::InvalidTrigger(b)) => a == b,
            (Self::MissingDays(a), Self::MissingDays(b)) => a == b,
            (Self::ProfileNameRequired, Self::ProfileNameRequired) => true,
            (Self::ProfileEmpty, Self::ProfileEmpty) => true,
            (Self::ProfilePercentage(a), Self::ProfilePercentage(b)) => a == b,
            (Self::EmptyPlan, Self::EmptyPlan) => true,
            (Self::IncompletePercentage(a), Self::IncompletePercentage(b)) => a == b,
            _ => false,
        }
    }
}
