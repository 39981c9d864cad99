//! HTTP fetching behind a global concurrency gate.
//!
//! Every request in a run, whether for a listing page during discovery or
//! an article page during extraction, goes through one [`Fetcher`]. The
//! fetcher holds a counting semaphore; a permit is acquired before the
//! request is sent and released when the body has been read, so at most
//! `concurrency` requests are ever in flight at once.
//!
//! Failures are terminal for their URL: a transport error, timeout, or
//! non-success status is logged and surfaces as `None`. There is no retry
//! at this layer.

use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Fixed User-Agent sent with every request; Youm7 serves an empty shell to
/// clients without a browser-like agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// A shared HTTP client with a global in-flight request bound.
pub struct Fetcher {
    client: Client,
    gate: Semaphore,
    in_flight: AtomicUsize,
}

impl Fetcher {
    /// Build a fetcher allowing up to `concurrency` simultaneous requests,
    /// each with the given timeout.
    pub fn new(concurrency: usize, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            gate: Semaphore::new(concurrency),
            in_flight: AtomicUsize::new(0),
        })
    }

    /// Fetch a page and return its HTML, or `None` on any failure.
    ///
    /// Waits for a permit from the global gate before sending. All exit
    /// paths release the permit and the in-flight count.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        // The gate is never closed, so acquire can only fail if the
        // semaphore is dropped, which cannot happen while `self` is alive.
        let _permit = self.gate.acquire().await.ok()?;
        let _guard = self.track();
        debug!(%url, in_flight = self.in_flight(), "Fetching");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "Request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "Request returned non-success status");
            return None;
        }
        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(%url, error = %e, "Failed reading response body");
                None
            }
        }
    }

    /// Number of requests currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn track(&self) -> InFlightGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(&self.in_flight)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_fetcher_builds_with_defaults() {
        let fetcher = Fetcher::new(10, Duration::from_secs(30)).unwrap();
        assert_eq!(fetcher.in_flight(), 0);
        assert_eq!(fetcher.gate.available_permits(), 10);
    }

    #[tokio::test]
    async fn test_gate_bounds_in_flight_count() {
        let fetcher = Arc::new(Fetcher::new(3, Duration::from_secs(1)).unwrap());
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let fetcher = Arc::clone(&fetcher);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                let _permit = fetcher.gate.acquire().await.unwrap();
                let _guard = fetcher.track();
                peak.fetch_max(fetcher.in_flight(), Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "observed {peak} concurrent holders");
        assert_eq!(fetcher.in_flight(), 0);
        assert_eq!(fetcher.gate.available_permits(), 3);
    }

    #[tokio::test]
    async fn test_guard_releases_on_early_exit() {
        let fetcher = Fetcher::new(2, Duration::from_secs(1)).unwrap();
        {
            let _permit = fetcher.gate.acquire().await.unwrap();
            let _guard = fetcher.track();
            assert_eq!(fetcher.in_flight(), 1);
        }
        assert_eq!(fetcher.in_flight(), 0);
        assert_eq!(fetcher.gate.available_permits(), 2);
    }
}
