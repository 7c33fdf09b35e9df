//! Race document loading and payout parsing

pub mod payout_parser;
pub mod race_loader;

// Re-export commonly used types
pub use payout_parser::{build_ledger, parse_payout_amounts, parse_payout_record, PublishedPayout};
pub use race_loader::{
    find_race, load_races, parse_races, RaceDocument, RaceInfo, RaceResults, RaceStatus, Strategy,
};
