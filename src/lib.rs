//! Funding core of a Safe relay: advances native currency from a custodial
//! funder account to new wallet addresses, bounded by a per-call spend
//! ceiling, with gas prices from a live oracle.

pub mod blockchain;
pub mod config;
pub mod funding;
pub mod gas_station;
pub mod observability;
pub mod resilience;

pub use config::FunderConfig;
pub use funding::{FundingError, FundingRequest, FundingService, FundingServiceProvider};
