//! Funding subsystem.
//!
//! # Data Flow
//! ```text
//! FunderConfig + FUNDER_PRIVATE_KEY
//!     → provider.rs (lazy, resettable construction)
//!     → service.rs (ceiling check, gas price resolution, delegation)
//!     → gas_station (oracle read) then blockchain::transaction (submission)
//! ```

pub mod provider;
pub mod service;
pub mod types;

pub use provider::FundingServiceProvider;
pub use service::FundingService;
pub use types::{parse_destination, FundingError, FundingRequest, FundingResult, SpendCeiling};
