//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Transaction submission:
//!     → retries.rs (check if retryable, retry with backoff per caller policy)
//!     → backoff.rs (exponential delay with jitter)
//! ```
//!
//! # Design Decisions
//! - Every external call already has a deadline (see blockchain::client)
//! - Retries only when the caller passes a policy allowing them
//! - Nonce conflicts and transport errors are retryable; rejections are not

pub mod backoff;
pub mod retries;

pub use retries::{retry_with_backoff, RetryPolicy};
