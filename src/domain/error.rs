//! Validation errors for the calculation engine.
//!
//! Every engine entry point validates its whole input before computing
//! anything, so a caller either gets a complete result or exactly one of
//! these errors. "No arbitrage" is not represented here: it is a valid
//! answer carried by [`StakeOutcome::NoArbitrage`](super::StakeOutcome).
//!
//! # Examples
//!
//! ```
//! use layline::domain::{CalcError, Odds};
//!
//! let result = Odds::new(1.0);
//! assert!(matches!(result, Err(CalcError::InvalidOddsFormat { .. })));
//! ```

use thiserror::Error;

/// Errors raised when engine inputs violate a domain invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Odds could not be parsed, or converted to decimal odds <= 1.0.
    #[error("invalid odds '{input}': {reason}")]
    InvalidOddsFormat {
        /// The raw input as the caller supplied it.
        input: String,
        /// Why the input was rejected.
        reason: &'static str,
    },

    /// Commission rate outside `[0, 1)`.
    #[error("commission must be in [0, 1), got {rate}")]
    InvalidCommission {
        /// The rejected rate.
        rate: f64,
    },

    /// Stake, target profit or bankroll that is not strictly positive.
    #[error("{field} must be greater than zero, got {amount}")]
    InvalidStakeAmount {
        /// Which amount was rejected.
        field: &'static str,
        /// The rejected amount.
        amount: f64,
    },

    /// Fewer than two legs with valid odds.
    #[error("at least 2 legs with valid odds are required, got {valid}")]
    InsufficientLegs {
        /// Number of usable legs supplied.
        valid: usize,
    },

    /// Probability, fraction or tolerance outside its allowed range.
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Which input was rejected.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A two-sided calculation was given a leg without a lay price.
    #[error("leg '{leg}' has no lay odds")]
    MissingLayOdds {
        /// Identifier of the offending leg.
        leg: String,
    },

    /// A leg id that is unknown to, or duplicated within, the leg set.
    #[error("unknown or duplicate leg '{leg}'")]
    UnknownLeg {
        /// Identifier of the offending leg.
        leg: String,
    },
}

impl CalcError {
    pub(crate) fn stake(field: &'static str, amount: f64) -> Self {
        Self::InvalidStakeAmount { field, amount }
    }
}

/// Reject a non-positive or non-finite amount.
pub(crate) fn require_positive(field: &'static str, amount: f64) -> Result<f64, CalcError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(CalcError::stake(field, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_positive_accepts_positive() {
        assert_eq!(require_positive("stake", 10.0), Ok(10.0));
    }

    #[test]
    fn require_positive_rejects_zero_negative_and_nan() {
        assert!(require_positive("stake", 0.0).is_err());
        assert!(require_positive("stake", -1.0).is_err());
        assert!(require_positive("stake", f64::NAN).is_err());
        assert!(require_positive("stake", f64::INFINITY).is_err());
    }

    #[test]
    fn error_display_messages() {
        assert_eq!(
            CalcError::InsufficientLegs { valid: 1 }.to_string(),
            "at least 2 legs with valid odds are required, got 1"
        );
        assert_eq!(
            CalcError::InvalidCommission { rate: 1.0 }.to_string(),
            "commission must be in [0, 1), got 1"
        );
        assert_eq!(
            CalcError::stake("total stake", 0.0).to_string(),
            "total stake must be greater than zero, got 0"
        );
    }
}
