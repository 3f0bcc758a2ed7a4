use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chirpy_service::{Chirpy, ServiceResult};

use crate::error::{ServerError, ServerResult};

/// Request counter shown on the admin metrics page.
#[derive(Clone, Debug, Default)]
pub struct HitCounter(Arc<AtomicU64>);

impl HitCounter {
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Per-process context shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub chirpy: Chirpy,
    pub hits: HitCounter,
    pub require_auth_for_chirps: bool,
}

impl AppState {
    pub fn new(chirpy: Chirpy) -> Self {
        Self {
            chirpy,
            hits: HitCounter::default(),
            require_auth_for_chirps: false,
        }
    }

    pub fn require_auth_for_chirps(mut self, required: bool) -> Self {
        self.require_auth_for_chirps = required;
        self
    }

    /// Run a service call on the blocking pool. Password hashing and
    /// snapshot writes must not stall the async workers.
    pub async fn run<T, F>(&self, f: F) -> ServerResult<T>
    where
        F: FnOnce(&Chirpy) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let chirpy = self.chirpy.clone();
        tokio::task::spawn_blocking(move || f(&chirpy))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .map_err(ServerError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_counts_and_resets() {
        let hits = HitCounter::default();
        let shared = hits.clone();
        hits.increment();
        shared.increment();
        assert_eq!(hits.get(), 2);
        shared.reset();
        assert_eq!(hits.get(), 0);
    }
}
