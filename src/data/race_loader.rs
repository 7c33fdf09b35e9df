//! Race document loading
//!
//! The scraper publishes one JSON array per run. Each element carries the
//! race info, the finished race's payouts, two strategy portfolios and the
//! top candidates per bet kind used as backfill.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::payout_parser::{build_ledger, PublishedPayout};
use crate::models::{BetCandidate, PayoutLedger};

/// Race status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceStatus {
    #[default]
    Upcoming,
    Finished,
}

/// Finishing position; non-numeric for cancellations and disqualifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Placing {
    Rank(u32),
    Text(String),
}

impl fmt::Display for Placing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placing::Rank(rank) => write!(f, "{}", rank),
            Placing::Text(text) => f.write_str(text),
        }
    }
}

/// Runner in the top 3 of a finished race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRunner {
    pub rank: Placing,
    pub number: u32,
    pub name: String,
    pub popularity: Placing,
}

/// Results of a finished race
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceResults {
    #[serde(default)]
    pub top3: Vec<PlacedRunner>,
    #[serde(default)]
    pub payouts: HashMap<String, PublishedPayout>,
}

/// Race metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceInfo {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub track: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub status: RaceStatus,
    #[serde(default)]
    pub results: Option<RaceResults>,
}

/// Betting strategy portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Balanced: favourites' win, wide and quinella
    #[serde(rename = "strategy_a")]
    Balanced,
    /// High risk: long shots and trio/trifecta
    #[serde(rename = "strategy_b")]
    HighRisk,
}

impl Strategy {
    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Balanced => "strategy_a",
            Strategy::HighRisk => "strategy_b",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Balanced => "Balanced: stable hits around the strongest runners",
            Strategy::HighRisk => "High risk: long shots and trio/trifecta payouts",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "strategy_a" | "balanced" => Ok(Strategy::Balanced),
            "b" | "strategy_b" | "high-risk" | "high_risk" => Ok(Strategy::HighRisk),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// Strategy portfolios
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolios {
    #[serde(default)]
    pub strategy_a: Vec<BetCandidate>,
    #[serde(default)]
    pub strategy_b: Vec<BetCandidate>,
}

/// Top candidates per bet kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopBets {
    #[serde(default)]
    pub win: Vec<BetCandidate>,
    #[serde(default)]
    pub place: Vec<BetCandidate>,
    #[serde(default)]
    pub umaren: Vec<BetCandidate>,
    #[serde(default)]
    pub wide: Vec<BetCandidate>,
    #[serde(default)]
    pub umatan: Vec<BetCandidate>,
    #[serde(default)]
    pub sanrenpuku: Vec<BetCandidate>,
    #[serde(default)]
    pub sanrentan: Vec<BetCandidate>,
}

impl TopBets {
    /// All candidates, single-runner kinds first
    pub fn flatten(&self) -> Vec<BetCandidate> {
        [
            &self.win,
            &self.place,
            &self.umaren,
            &self.wide,
            &self.umatan,
            &self.sanrenpuku,
            &self.sanrentan,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

/// One race as published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceDocument {
    pub race_info: RaceInfo,
    #[serde(default)]
    pub portfolios: Portfolios,
    #[serde(default)]
    pub top3_bets: TopBets,
}

impl RaceDocument {
    pub fn strategy_pool(&self, strategy: Strategy) -> &[BetCandidate] {
        match strategy {
            Strategy::Balanced => &self.portfolios.strategy_a,
            Strategy::HighRisk => &self.portfolios.strategy_b,
        }
    }

    pub fn backfill_pool(&self) -> Vec<BetCandidate> {
        self.top3_bets.flatten()
    }

    pub fn is_finished(&self) -> bool {
        self.race_info.status == RaceStatus::Finished
    }

    /// Ledger of a finished race; `None` while upcoming or without payouts
    pub fn payout_ledger(&self) -> Option<PayoutLedger> {
        if !self.is_finished() {
            return None;
        }
        match &self.race_info.results {
            Some(results) if !results.payouts.is_empty() => Some(build_ledger(&results.payouts)),
            _ => None,
        }
    }

    /// "JRA 芝2400m - 東京優駿"
    pub fn title(&self) -> String {
        let info = &self.race_info;
        format!("{} {} - {}", info.track, info.distance, info.name)
    }
}

/// Parse a race document array, sorted by date
pub fn parse_races(json: &str) -> Result<Vec<RaceDocument>> {
    let mut races: Vec<RaceDocument> =
        serde_json::from_str(json).context("Failed to parse race data")?;
    races.sort_by(|a, b| a.race_info.date.cmp(&b.race_info.date));
    Ok(races)
}

/// Load a race document array from a JSON file, sorted by date
pub fn load_races<P: AsRef<Path>>(path: P) -> Result<Vec<RaceDocument>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read race data: {}", path.display()))?;
    parse_races(&content)
}

/// Find a race by list index or by race id
pub fn find_race<'a>(races: &'a [RaceDocument], selector: &str) -> Option<&'a RaceDocument> {
    races
        .iter()
        .find(|r| !r.race_info.id.is_empty() && r.race_info.id == selector)
        .or_else(|| selector.parse::<usize>().ok().and_then(|i| races.get(i)))
}
