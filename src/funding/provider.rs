//! Lazily constructed, shared funding service.
//!
//! A [`FundingServiceProvider`] is created once at startup and passed by
//! reference to whatever needs the service. The first `get_instance` builds
//! the service from the factory; later calls hand out the same `Arc` until
//! `reset_instance` drops it.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::schema::FunderConfig;
use crate::funding::service::FundingService;
use crate::funding::types::FundingResult;

type Factory = Box<dyn Fn() -> FundingResult<FundingService> + Send + Sync>;

/// Holder for at most one [`FundingService`].
pub struct FundingServiceProvider {
    factory: Factory,
    instance: Mutex<Option<Arc<FundingService>>>,
}

impl FundingServiceProvider {
    /// Create a provider that builds its service with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> FundingResult<FundingService> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            instance: Mutex::new(None),
        }
    }

    /// Provider wired to the RPC chain client, the configured gas station
    /// and the funder key from the environment.
    pub fn from_config(config: FunderConfig) -> Self {
        Self::new(move || FundingService::from_config(&config))
    }

    /// The shared service, built on first use.
    ///
    /// A failed build leaves the provider empty so the next call tries again.
    pub fn get_instance(&self) -> FundingResult<Arc<FundingService>> {
        let mut slot = self.instance.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(service) = slot.as_ref() {
            return Ok(Arc::clone(service));
        }

        let service = Arc::new((self.factory)()?);
        tracing::debug!(funder = %service.funder_address(), "Funding service constructed");
        *slot = Some(Arc::clone(&service));
        Ok(service)
    }

    /// Drop the cached service; the next `get_instance` rebuilds it.
    ///
    /// Callers still holding the old `Arc` keep using it.
    pub fn reset_instance(&self) {
        let mut slot = self.instance.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            tracing::debug!("Funding service instance discarded");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.instance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for FundingServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundingServiceProvider")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
