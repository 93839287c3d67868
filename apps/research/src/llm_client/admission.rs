//! Admission limiter for upstream calls.
//!
//! Bounds the number of in-flight calls with a semaphore and spaces call
//! starts by a fixed interval derived from a requests-per-minute setting.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use tracing::debug;

use super::LlmError;

#[derive(Debug)]
pub struct Admission {
    permits: Arc<Semaphore>,
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Admission {
    /// `requests_per_minute == 0` disables pacing.
    pub fn new(max_concurrent: usize, requests_per_minute: u32) -> Self {
        let interval = if requests_per_minute == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(60) / requests_per_minute
        };
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// No concurrency bound beyond one permit per caller and no pacing.
    pub fn unbounded() -> Self {
        Self::new(Semaphore::MAX_PERMITS, 0)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for a concurrency permit and then for the next pacing slot.
    /// The permit must be held for the duration of the upstream call.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, LlmError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| LlmError::AdmissionClosed)?;

        if !self.interval.is_zero() {
            let wait = {
                let mut next_slot = self.next_slot.lock().await;
                let now = Instant::now();
                let start = match *next_slot {
                    Some(slot) if slot > now => slot,
                    _ => now,
                };
                *next_slot = Some(start + self.interval);
                start - now
            };
            if !wait.is_zero() {
                debug!("Pacing upstream call for {}ms", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }

        Ok(permit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_interval_from_requests_per_minute() {
        assert_eq!(Admission::new(1, 60).interval(), Duration::from_secs(1));
        assert_eq!(Admission::new(1, 120).interval(), Duration::from_millis(500));
        assert!(Admission::new(1, 0).interval().is_zero());
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_starts_are_spaced() {
        let admission = Admission::new(10, 60);
        let started = Instant::now();

        let _a = admission.acquire().await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);

        let _b = admission.acquire().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(1));

        let _c = admission.acquire().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_does_not_accumulate_burst() {
        let admission = Admission::new(10, 60);
        let _a = admission.acquire().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let before = Instant::now();
        let _b = admission.acquire().await.unwrap();
        assert_eq!(before.elapsed(), Duration::ZERO);
        let _c = admission.acquire().await.unwrap();
        assert_eq!(before.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let admission = Arc::new(Admission::new(2, 0));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let admission = admission.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let _permit = admission.acquire().await.unwrap();
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }
}
