//! Poll-until-true primitive
//!
//! The only concurrency in a verification run: suspend for a fixed interval,
//! re-evaluate a condition, repeat until it is observed true or the deadline
//! passes. Success always means the condition was actually observed true at
//! least once; the probe runs at least once even with a zero timeout.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Default interval between condition probes
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Poll `probe` every `interval` until it returns true or `timeout` elapses.
///
/// Returns `Ok(true)` if the condition was observed true, `Ok(false)` if the
/// deadline passed with the condition still false. Probe errors propagate
/// immediately.
pub async fn poll_until<F, Fut>(interval: Duration, timeout: Duration, mut probe: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe().await? {
            return Ok(true);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_needs_one_probe() {
        let probes = AtomicUsize::new(0);
        let ok = poll_until(Duration::from_millis(100), Duration::from_secs(10), || {
            probes.fetch_add(1, Ordering::SeqCst);
            async { Ok(true) }
        })
        .await
        .unwrap();
        assert!(ok);
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reports_false() {
        let ok = poll_until(Duration::from_millis(100), Duration::from_millis(350), || {
            async { Ok(false) }
        })
        .await
        .unwrap();
        assert!(!ok);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_still_probes_once() {
        let probes = AtomicUsize::new(0);
        let ok = poll_until(Duration::from_millis(100), Duration::ZERO, || {
            probes.fetch_add(1, Ordering::SeqCst);
            async { Ok(false) }
        })
        .await
        .unwrap();
        assert!(!ok);
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_later_probe() {
        let probes = AtomicUsize::new(0);
        let ok = poll_until(Duration::from_millis(100), Duration::from_secs(10), || {
            let n = probes.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n >= 2) }
        })
        .await
        .unwrap();
        assert!(ok);
        assert_eq!(probes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_error_propagates() {
        let result = poll_until(Duration::from_millis(100), Duration::from_secs(1), || {
            async { Err(crate::error::Error::generic("page gone")) }
        })
        .await;
        assert!(result.is_err());
    }
}
