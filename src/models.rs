use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{
    validate_expected_return, validate_numbers, validate_odds, AllocationError,
};

/// Bet kind (券種)
///
/// Serialized as the published Japanese label. Order sensitivity decides how
/// a selection is compared against the payout ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BetKind {
    /// 単勝
    Win,
    /// 複勝
    Place,
    /// 馬連 (unordered pair, 1st and 2nd)
    Quinella,
    /// ワイド (unordered pair, any two of the top 3)
    Wide,
    /// 馬単 (ordered pair)
    Exacta,
    /// 3連複 (unordered triple)
    Trio,
    /// 3連単 (ordered triple)
    Trifecta,
}

impl BetKind {
    pub const ALL: [BetKind; 7] = [
        BetKind::Win,
        BetKind::Place,
        BetKind::Quinella,
        BetKind::Wide,
        BetKind::Exacta,
        BetKind::Trio,
        BetKind::Trifecta,
    ];

    /// Published label
    pub fn label(&self) -> &'static str {
        match self {
            BetKind::Win => "単勝",
            BetKind::Place => "複勝",
            BetKind::Quinella => "馬連",
            BetKind::Wide => "ワイド",
            BetKind::Exacta => "馬単",
            BetKind::Trio => "3連複",
            BetKind::Trifecta => "3連単",
        }
    }

    /// Whether the order of `numbers` is part of the selection
    pub fn order_sensitive(&self) -> bool {
        match self {
            BetKind::Win | BetKind::Place | BetKind::Exacta | BetKind::Trifecta => true,
            BetKind::Quinella | BetKind::Wide | BetKind::Trio => false,
        }
    }

    /// Comparison key for a selection: hyphen-joined, sorted ascending for
    /// order-insensitive kinds
    pub fn selection_key(&self, numbers: &[u32]) -> String {
        if self.order_sensitive() {
            join_numbers(numbers)
        } else {
            let mut sorted = numbers.to_vec();
            sorted.sort_unstable();
            join_numbers(&sorted)
        }
    }
}

impl fmt::Display for BetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BetKind {
    type Err = AllocationError;

    /// Accepts the published label, optionally followed by an annotation such
    /// as `単勝(穴)`, or an English alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, _) = split_annotation(s);

        let kind = match base {
            "単勝" | "win" => BetKind::Win,
            "複勝" | "place" => BetKind::Place,
            "馬連" | "quinella" | "exacta_unordered" | "exacta-unordered" => BetKind::Quinella,
            "ワイド" | "wide" => BetKind::Wide,
            "馬単" | "exacta" | "exacta_ordered" | "exacta-ordered" => BetKind::Exacta,
            "3連複" | "trio" | "trio_unordered" | "trio-unordered" => BetKind::Trio,
            "3連単" | "trifecta" | "trio_ordered" | "trio-ordered" => BetKind::Trifecta,
            _ => return Err(AllocationError::UnknownBetKind(s.to_string())),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for BetKind {
    type Error = AllocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BetKind> for String {
    fn from(kind: BetKind) -> Self {
        kind.label().to_string()
    }
}

/// Split a published label into its base and annotation:
/// "単勝(穴)" -> ("単勝", Some("穴"))
pub fn split_annotation(label: &str) -> (&str, Option<&str>) {
    let label = label.trim();
    match label.find(['(', '（']) {
        Some(start) => {
            let note = label[start..]
                .trim_start_matches(['(', '（'])
                .trim_end_matches([')', '）'])
                .trim();
            (label[..start].trim(), (!note.is_empty()).then_some(note))
        }
        None => (label, None),
    }
}

/// Hyphen-joined selection, e.g. `[3, 7]` -> "3-7"
pub fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// A single bet option
///
/// Serialized with its full published label under `type`, so an annotated
/// label such as `単勝(穴)` survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CandidateRecord", into = "CandidateRecord")]
pub struct BetCandidate {
    pub kind: BetKind,
    /// Portfolio annotation on the label, e.g. 穴 for a long shot
    pub annotation: Option<String>,
    pub numbers: Vec<u32>,
    pub odds: f64,
    pub expected_return: f64,
}

/// Candidate as published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "type", alias = "kind")]
    pub label: String,
    pub numbers: Vec<u32>,
    pub odds: f64,
    pub expected_return: f64,
}

impl TryFrom<CandidateRecord> for BetCandidate {
    type Error = AllocationError;

    fn try_from(record: CandidateRecord) -> Result<Self, Self::Error> {
        let kind = record.label.parse()?;
        let annotation = split_annotation(&record.label).1.map(str::to_string);
        Ok(Self {
            kind,
            annotation,
            numbers: record.numbers,
            odds: record.odds,
            expected_return: record.expected_return,
        })
    }
}

impl From<BetCandidate> for CandidateRecord {
    fn from(candidate: BetCandidate) -> Self {
        Self {
            label: candidate.label(),
            numbers: candidate.numbers,
            odds: candidate.odds,
            expected_return: candidate.expected_return,
        }
    }
}

impl BetCandidate {
    pub fn new(kind: BetKind, numbers: Vec<u32>, odds: f64, expected_return: f64) -> Self {
        Self {
            kind,
            annotation: None,
            numbers,
            odds,
            expected_return,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Published label including any annotation, e.g. "単勝(穴)"
    pub fn label(&self) -> String {
        match &self.annotation {
            Some(note) => format!("{}({})", self.kind.label(), note),
            None => self.kind.label().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), AllocationError> {
        validate_odds(self.odds)?;
        validate_numbers(&self.numbers)?;
        validate_expected_return(self.expected_return)
    }

    /// Same label and literally the same number sequence
    pub fn same_selection(&self, other: &BetCandidate) -> bool {
        self.kind == other.kind
            && self.annotation == other.annotation
            && self.numbers == other.numbers
    }

    /// Selection as displayed, e.g. "3-7"
    pub fn numbers_label(&self) -> String {
        join_numbers(&self.numbers)
    }
}

/// Stake assigned to a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub candidate: BetCandidate,
    pub amount: i64,
    pub potential_return: i64,
}

impl Allocation {
    pub fn new(candidate: BetCandidate, amount: i64) -> Self {
        let potential_return = (amount as f64 * candidate.odds).floor() as i64;
        Self {
            candidate,
            amount,
            potential_return,
        }
    }
}

/// One winning combination and its payout per 100 yen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutEntry {
    /// Published hyphen-joined selection, e.g. "7-3"
    pub numbers: String,
    pub payout_per_100: i64,
}

impl PayoutEntry {
    pub fn new(numbers: impl Into<String>, payout_per_100: i64) -> Self {
        Self {
            numbers: numbers.into(),
            payout_per_100,
        }
    }
}

/// All winning combinations drawn for one bet kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub kind: BetKind,
    pub entries: Vec<PayoutEntry>,
}

impl PayoutRecord {
    pub fn new(kind: BetKind, entries: Vec<PayoutEntry>) -> Self {
        Self { kind, entries }
    }
}

/// Payout records of a finished race, keyed by bet kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutLedger {
    records: BTreeMap<BetKind, PayoutRecord>,
}

impl PayoutLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any previous record of the same kind
    pub fn insert(&mut self, record: PayoutRecord) {
        self.records.insert(record.kind, record);
    }

    pub fn get(&self, kind: BetKind) -> Option<&PayoutRecord> {
        self.records.get(&kind)
    }

    pub fn records(&self) -> impl Iterator<Item = &PayoutRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PayoutRecord> for PayoutLedger {
    fn from_iter<I: IntoIterator<Item = PayoutRecord>>(iter: I) -> Self {
        let mut ledger = PayoutLedger::new();
        for record in iter {
            ledger.insert(record);
        }
        ledger
    }
}
