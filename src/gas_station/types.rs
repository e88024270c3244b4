//! Gas price tiers.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wei per gwei.
pub const GWEI: u128 = 1_000_000_000;

/// Named gas price point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GasTier {
    Lowest,
    SafeLow,
    Standard,
    Fast,
    Fastest,
}

impl GasTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lowest => "lowest",
            Self::SafeLow => "safe_low",
            Self::Standard => "standard",
            Self::Fast => "fast",
            Self::Fastest => "fastest",
        }
    }

    /// Percentage of the node gas price this tier pays.
    pub fn percent_of_base(&self) -> u128 {
        match self {
            Self::Lowest => 80,
            Self::SafeLow => 90,
            Self::Standard => 100,
            Self::Fast => 125,
            Self::Fastest => 150,
        }
    }
}

impl FromStr for GasTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "lowest" => Ok(Self::Lowest),
            "safe_low" | "safelow" => Ok(Self::SafeLow),
            "standard" => Ok(Self::Standard),
            "fast" => Ok(Self::Fast),
            "fastest" => Ok(Self::Fastest),
            other => Err(format!(
                "unknown gas tier '{}', expected lowest, safe_low, standard, fast or fastest",
                other
            )),
        }
    }
}

/// A snapshot of gas price tiers, all in wei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPrices {
    pub lowest: u128,
    pub safe_low: u128,
    pub standard: u128,
    pub fast: u128,
    pub fastest: u128,
    /// Unix timestamp (seconds) when the snapshot was taken.
    pub last_update: u64,
}

impl GasPrices {
    /// Derive every tier from a single base price.
    pub fn from_base(base: u128) -> Self {
        let scaled = |tier: GasTier| base.saturating_mul(tier.percent_of_base()) / 100;
        Self {
            lowest: scaled(GasTier::Lowest),
            safe_low: scaled(GasTier::SafeLow),
            standard: scaled(GasTier::Standard),
            fast: scaled(GasTier::Fast),
            fastest: scaled(GasTier::Fastest),
            last_update: now_secs(),
        }
    }

    /// Price for one tier.
    pub fn tier(&self, tier: GasTier) -> u128 {
        match tier {
            GasTier::Lowest => self.lowest,
            GasTier::SafeLow => self.safe_low,
            GasTier::Standard => self.standard,
            GasTier::Fast => self.fast,
            GasTier::Fastest => self.fastest,
        }
    }
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Errors from a gas price source.
#[derive(Debug, Error)]
pub enum GasStationError {
    /// The source could not produce prices.
    #[error("Gas price source unavailable: {0}")]
    Unavailable(String),
}

pub type GasStationResult<T> = Result<T, GasStationError>;
