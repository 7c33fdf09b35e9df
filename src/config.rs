//! Allocator tuning constants
//!
//! Defaults reproduce the published recommendation behaviour. Every value can
//! be overridden from a TOML file:
//!
//! ```toml
//! min_unit = 100
//! edge_floor = 0.5
//! backfill_min_expected_return = 0.01
//! budget_per_slot = 3000
//! min_pool_size = 3
//! max_pool_size = 20
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::AllocationError;

/// Allocator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Minimum bet unit in yen; every stake is a multiple of this
    pub min_unit: i64,
    /// Edge assigned to candidates whose expected return falls below it
    pub edge_floor: f64,
    /// Backfill candidates below this expected return are ignored
    pub backfill_min_expected_return: f64,
    /// Budget needed per additional pool slot
    pub budget_per_slot: i64,
    pub min_pool_size: usize,
    pub max_pool_size: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            min_unit: 100,
            edge_floor: 0.5,
            backfill_min_expected_return: 0.01,
            budget_per_slot: 3000,
            min_pool_size: 3,
            max_pool_size: 20,
        }
    }
}

impl AllocatorConfig {
    /// Number of candidates a budget unlocks:
    /// `clamp(floor(budget / budget_per_slot), min_pool_size, max_pool_size)`
    ///
    /// Never panics, even on a config that fails `validate`: a non-positive
    /// `budget_per_slot` unlocks `max_pool_size`, and `max_pool_size` wins
    /// over inverted bounds.
    pub fn target_pool_size(&self, budget: i64) -> usize {
        let slots = match budget.max(0).checked_div(self.budget_per_slot) {
            Some(slots) if self.budget_per_slot > 0 => {
                usize::try_from(slots).unwrap_or(usize::MAX)
            }
            _ => self.max_pool_size,
        };
        slots.max(self.min_pool_size).min(self.max_pool_size)
    }

    pub fn validate(&self) -> Result<(), AllocationError> {
        if self.min_unit <= 0 {
            return Err(AllocationError::Config(format!(
                "min_unit must be positive, got {}",
                self.min_unit
            )));
        }
        if !self.edge_floor.is_finite() || self.edge_floor <= 0.0 {
            return Err(AllocationError::Config(format!(
                "edge_floor must be positive, got {}",
                self.edge_floor
            )));
        }
        if !self.backfill_min_expected_return.is_finite() || self.backfill_min_expected_return < 0.0
        {
            return Err(AllocationError::Config(format!(
                "backfill_min_expected_return must be non-negative, got {}",
                self.backfill_min_expected_return
            )));
        }
        if self.budget_per_slot <= 0 {
            return Err(AllocationError::Config(format!(
                "budget_per_slot must be positive, got {}",
                self.budget_per_slot
            )));
        }
        if self.min_pool_size == 0 || self.min_pool_size > self.max_pool_size {
            return Err(AllocationError::Config(format!(
                "pool size bounds must satisfy 1 <= min <= max, got {}..={}",
                self.min_pool_size, self.max_pool_size
            )));
        }
        Ok(())
    }
}

/// Load and validate configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AllocatorConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    info!(
        min_unit = config.min_unit,
        edge_floor = config.edge_floor,
        max_pool_size = config.max_pool_size,
        "Allocator configuration loaded"
    );

    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<AllocatorConfig> {
    let config: AllocatorConfig = toml::from_str(content).context("Failed to parse TOML")?;
    config.validate()?;
    Ok(config)
}
