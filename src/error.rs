use thiserror::Error;

use crate::models::BetCandidate;

/// Engine error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// Budget below the minimum betting unit
    #[error("Budget must be at least {min} yen, got {budget}")]
    InvalidBudget { budget: i64, min: i64 },

    /// Candidate with non-positive odds or an empty selection
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    /// Bet kind label not recognised
    #[error("Unknown bet kind: {0}")]
    UnknownBetKind(String),

    /// Published payout strings that cannot be paired up
    #[error("Malformed payout: {0}")]
    MalformedPayout(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Validation functions
pub fn validate_budget(budget: i64, min_unit: i64) -> Result<(), AllocationError> {
    if budget <= 0 || budget < min_unit {
        return Err(AllocationError::InvalidBudget {
            budget,
            min: min_unit,
        });
    }
    Ok(())
}

pub fn validate_odds(odds: f64) -> Result<(), AllocationError> {
    if !odds.is_finite() || odds <= 0.0 {
        return Err(AllocationError::InvalidCandidate(format!(
            "Odds must be positive, got {}",
            odds
        )));
    }
    Ok(())
}

pub fn validate_numbers(numbers: &[u32]) -> Result<(), AllocationError> {
    if numbers.is_empty() {
        return Err(AllocationError::InvalidCandidate(
            "Selection must contain at least one number".to_string(),
        ));
    }
    if numbers.contains(&0) {
        return Err(AllocationError::InvalidCandidate(format!(
            "Numbers must be positive, got {:?}",
            numbers
        )));
    }
    Ok(())
}

pub fn validate_expected_return(expected_return: f64) -> Result<(), AllocationError> {
    if !expected_return.is_finite() || expected_return < 0.0 {
        return Err(AllocationError::InvalidCandidate(format!(
            "Expected return must be non-negative, got {}",
            expected_return
        )));
    }
    Ok(())
}

/// Validate every candidate of a pool, reporting the first failure
pub fn validate_pool(pool: &[BetCandidate]) -> Result<(), AllocationError> {
    pool.iter().try_for_each(BetCandidate::validate)
}
