//! Rate limiter initialization.
//!
//! This module provides a token-bucket rate limiter for controlling the DNS
//! query rate.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::{interval, Duration};
use tokio_util::sync::CancellationToken;

/// Token-bucket rate limiter for controlling query rate.
///
/// Tokens are replenished continuously at the configured rate by a
/// background task; each query consumes one token and waits when the bucket
/// is empty. Burst capacity allows short spikes above the base rate.
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    qps: u32,
}

impl RateLimiter {
    /// Waits until a query token is available and consumes it.
    pub async fn acquire(&self) {
        if let Ok(permit) = self.permits.acquire().await {
            // Tokens are consumed, not returned; the background task
            // replenishes them.
            permit.forget();
        }
    }

    /// The configured queries-per-second rate.
    pub fn qps(&self) -> u32 {
        self.qps
    }
}

/// Initializes a token-bucket rate limiter.
///
/// If `qps` is 0, rate limiting is disabled and `None` is returned. The
/// returned cancellation token stops the background replenishment task on
/// shutdown.
///
/// # Arguments
///
/// * `qps` - Queries per second (0 disables rate limiting)
/// * `burst` - Burst capacity (maximum tokens in the bucket)
pub fn init_rate_limiter(qps: u32, burst: usize) -> Option<(Arc<RateLimiter>, CancellationToken)> {
    if qps == 0 {
        return None;
    }

    let shutdown = CancellationToken::new();
    let shutdown_task = shutdown.clone();

    let limiter = Arc::new(RateLimiter {
        permits: Arc::new(Semaphore::new(burst)),
        qps,
    });

    let permits = Arc::clone(&limiter.permits);
    let mut ticker = interval(Duration::from_millis(100));
    tokio::spawn(async move {
        let mut last_tick = tokio::time::Instant::now();
        // Fractional tokens carry over between ticks so low rates still add up.
        let mut fractional = 0.0f64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = tokio::time::Instant::now();
                    let elapsed = now.duration_since(last_tick);
                    last_tick = now;

                    let earned = f64::from(qps) * elapsed.as_secs_f64() + fractional;
                    let whole = earned.floor();
                    fractional = earned - whole;

                    let available = permits.available_permits();
                    let headroom = burst.saturating_sub(available);
                    let to_add = (whole as usize).min(headroom);
                    if to_add > 0 {
                        permits.add_permits(to_add);
                    }
                }
                _ = shutdown_task.cancelled() => {
                    log::debug!("Rate limiter background task shutting down");
                    break;
                }
            }
        }
    });

    Some((limiter, shutdown))
}
