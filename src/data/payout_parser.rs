//! Published payout string parsing
//!
//! Result pages publish each bet kind as two comma-separated strings:
//!
//! ```text
//! numbers: "2-3, 3-5, 2-5"
//! payout:  "2,120円, 760円, 660円"
//! ```
//!
//! Amounts use thousands separators, so they are delimited by 円 rather than
//! by commas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::error::AllocationError;
use crate::models::{BetKind, PayoutEntry, PayoutLedger, PayoutRecord};

/// Payout of one bet kind as published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPayout {
    pub numbers: String,
    pub payout: String,
}

/// Split "2-3, 3-5" into ["2-3", "3-5"]
pub fn parse_payout_numbers(numbers: &str) -> Vec<String> {
    numbers
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse "2,120円, 760円" into [2120, 760]
pub fn parse_payout_amounts(payout: &str) -> Result<Vec<i64>, AllocationError> {
    let mut amounts = Vec::new();

    for piece in payout.split('円') {
        let piece = piece.trim_matches(|c: char| c == ',' || c == '、' || c.is_whitespace());
        if piece.is_empty() {
            continue;
        }

        let digits: String = piece.chars().filter(char::is_ascii_digit).collect();
        let amount: i64 = digits.parse().map_err(|_| {
            AllocationError::MalformedPayout(format!("no amount in {:?}", piece))
        })?;
        if amount <= 0 {
            return Err(AllocationError::MalformedPayout(format!(
                "payout must be positive, got {}",
                amount
            )));
        }
        amounts.push(amount);
    }

    Ok(amounts)
}

/// Pair published numbers with their amounts
pub fn parse_payout_record(
    kind: BetKind,
    published: &PublishedPayout,
) -> Result<PayoutRecord, AllocationError> {
    let numbers = parse_payout_numbers(&published.numbers);
    let amounts = parse_payout_amounts(&published.payout)?;

    if numbers.len() != amounts.len() {
        return Err(AllocationError::MalformedPayout(format!(
            "{}: {} combinations but {} amounts",
            kind,
            numbers.len(),
            amounts.len()
        )));
    }

    let entries = numbers
        .into_iter()
        .zip(amounts)
        .map(|(n, a)| PayoutEntry::new(n, a))
        .collect();

    Ok(PayoutRecord::new(kind, entries))
}

/// Build a ledger from published payouts keyed by label
///
/// Labels that do not name a supported bet kind (枠連 and the like) are
/// skipped, and so are rows whose strings cannot be parsed. A skipped kind
/// settles as a miss.
pub fn build_ledger(payouts: &HashMap<String, PublishedPayout>) -> PayoutLedger {
    let mut ledger = PayoutLedger::new();

    for (label, published) in payouts {
        let kind = match label.parse::<BetKind>() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(label = %label, "Skipping unsupported payout kind");
                continue;
            }
        };
        match parse_payout_record(kind, published) {
            Ok(record) => ledger.insert(record),
            Err(e) => warn!(kind = %kind, error = %e, "Skipping malformed payout row"),
        }
    }

    ledger
}
