use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use parking_lot::Mutex;

use crate::{error::ApiError, state::AppState};

/// Above this many tracked clients, expired windows are swept on insert.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request limiter keyed by client IP address.
///
/// A limit of zero disables limiting.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_second(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(1))
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Records one request from `client`; returns false if it is over the limit.
    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        if self.limit == 0 {
            return true;
        }

        let mut clients = self.clients.lock();

        if clients.len() >= SWEEP_THRESHOLD && !clients.contains_key(&client) {
            let window = self.window;
            clients.retain(|_, w| now.saturating_duration_since(w.started) < window);
        }

        let entry = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            return false;
        }

        entry.count += 1;
        true
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }
}

/// Middleware rejecting requests beyond the per-client limit with 429.
pub async fn enforce(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.rate_limiter.check(addr.ip()) {
        metrics::counter!("rate_limited_requests_total").increment(1);
        tracing::debug!(client = %addr.ip(), path = %request.uri().path(), "rate limit exceeded");
        return Err(ApiError::RateLimited {
            limit: state.rate_limiter.limit(),
        });
    }

    Ok(next.run(request).await)
}
