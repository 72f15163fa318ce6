use std::{sync::Arc, time::Duration};

use meter_core::MeterCatalog;

use crate::{
    config::{AppConfig, LimitsConfig},
    rate_limit::RateLimiter,
};

/// Shared by every handler. The catalog is immutable; only the rate limiter
/// holds mutable state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<MeterCatalog>,
    pub rate_limiter: Arc<RateLimiter>,
    pub max_range_minutes: i64,
    pub response_delay: Duration,
}

impl AppState {
    pub fn new(catalog: MeterCatalog, limits: &LimitsConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            rate_limiter: Arc::new(RateLimiter::per_second(limits.requests_per_second)),
            max_range_minutes: limits.max_range_minutes,
            response_delay: Duration::from_millis(limits.response_delay_ms),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        cfg.limits.validate()?;
        let catalog = MeterCatalog::new(cfg.catalog.size)?;
        Ok(Self::new(catalog, &cfg.limits))
    }

    /// Mimics the latency of a real metering backend.
    pub async fn simulate_latency(&self) {
        if !self.response_delay.is_zero() {
            tokio::time::sleep(self.response_delay).await;
        }
    }
}
