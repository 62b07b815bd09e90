//! Progress logging utilities.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::info;

/// Logs progress information about the running scan.
///
/// # Arguments
///
/// * `start_time` - The start time of the scan
/// * `completed` - Atomic counter of completed domains
/// * `errors` - Atomic counter of queries that recorded an error
/// * `total` - Optional atomic counter of total domains to check
pub fn log_progress(
    start_time: std::time::Instant,
    completed: &Arc<AtomicUsize>,
    errors: &Arc<AtomicUsize>,
    total: Option<&Arc<AtomicUsize>>,
) {
    let elapsed = start_time.elapsed().as_secs_f64();
    let done = completed.load(Ordering::SeqCst);
    let failed = errors.load(Ordering::SeqCst);
    let rate = if elapsed > 0.0 {
        done as f64 / elapsed
    } else {
        0.0
    };

    match total.map(|t| t.load(Ordering::SeqCst)) {
        Some(total) => info!(
            "Checked {done}/{total} domains ({failed} query errors) in {elapsed:.2}s (~{rate:.2} domains/sec)"
        ),
        None => info!(
            "Checked {done} domains ({failed} query errors) in {elapsed:.2}s (~{rate:.2} domains/sec)"
        ),
    }
}
