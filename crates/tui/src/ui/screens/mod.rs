pub mod bank;
pub mod profiles;
pub mod schedule;
pub mod totals;
