use thiserror::Error;

pub mod math;
pub mod parlay;

pub use math::{american_to_decimal, decimal_to_american, payout};
pub use parlay::{combine, CombinedOdds, MIN_PARLAY_LEGS};

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum OddsError {
    #[error("invalid American odds: {0}")]
    InvalidAmerican(i32),

    #[error("invalid decimal odds: {0} (must be a finite value above 1.0)")]
    InvalidDecimal(f64),

    #[error("parlay requires at least {min} legs, got {got}")]
    InsufficientLegs { min: usize, got: usize },
}

pub type OddsResult<T> = Result<T, OddsError>;
