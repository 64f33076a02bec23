// promptscrub-core/src/engines/model_handle.rs
//! Owns the token-classification model's load lifecycle.
//!
//! The handle moves through `Uninitialized -> Loading -> Ready | Failed`.
//! Concurrent [`ModelHandle::acquire`] calls join the load already in flight
//! instead of starting another one. A load runs on its own task, so a caller
//! that gives up waiting never leaves the handle stuck in `Loading`. A failed
//! load is retried by the next acquire.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::engine::{ModelLoader, StaticModelLoader, TokenClassifier};
use crate::errors::ScrubError;

type LoadOutcome = Result<Arc<dyn TokenClassifier>, String>;

enum LoadState {
    Uninitialized,
    /// Waiters subscribe to the receiver; the load task publishes once.
    Loading(watch::Receiver<Option<LoadOutcome>>),
    Ready(Arc<dyn TokenClassifier>),
    Failed(String),
}

/// Snapshot of the handle's state, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelState {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelState::Uninitialized => write!(f, "uninitialized"),
            ModelState::Loading => write!(f, "loading"),
            ModelState::Ready => write!(f, "ready"),
            ModelState::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Shared handle to a lazily loaded classifier. Cloning shares the same state.
#[derive(Clone)]
pub struct ModelHandle {
    loader: Arc<dyn ModelLoader>,
    state: Arc<Mutex<LoadState>>,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("loader", &self.loader.describe())
            .field("state", &self.state())
            .finish()
    }
}

impl ModelHandle {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            state: Arc::new(Mutex::new(LoadState::Uninitialized)),
        }
    }

    /// A handle that is ready from the start.
    pub fn ready(classifier: Arc<dyn TokenClassifier>) -> Self {
        let loader = Arc::new(StaticModelLoader::new(Arc::clone(&classifier)));
        Self {
            loader,
            state: Arc::new(Mutex::new(LoadState::Ready(classifier))),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> ModelState {
        match &*self.lock_state() {
            LoadState::Uninitialized => ModelState::Uninitialized,
            LoadState::Loading(_) => ModelState::Loading,
            LoadState::Ready(_) => ModelState::Ready,
            LoadState::Failed(reason) => ModelState::Failed(reason.clone()),
        }
    }

    /// Starts a load in the background if none is running or done.
    /// Must be called from within a Tokio runtime.
    pub fn warm_up(&self) {
        let mut state = self.lock_state();
        if matches!(*state, LoadState::Uninitialized | LoadState::Failed(_)) {
            let _ = self.start_load(&mut state);
        }
    }

    /// Returns the ready classifier, loading it first if needed.
    ///
    /// Callers arriving while a load is in flight wait for that same load.
    pub async fn acquire(&self) -> Result<Arc<dyn TokenClassifier>, ScrubError> {
        let mut rx = {
            let mut state = self.lock_state();
            match &*state {
                LoadState::Ready(classifier) => return Ok(Arc::clone(classifier)),
                LoadState::Loading(rx) if rx.has_changed().is_ok() || rx.borrow().is_some() => {
                    debug!("Joining in-flight model load ({}).", self.loader.describe());
                    rx.clone()
                }
                LoadState::Loading(_) => {
                    warn!("Previous model load was abandoned; starting a new one.");
                    self.start_load(&mut state)
                }
                LoadState::Uninitialized | LoadState::Failed(_) => self.start_load(&mut state),
            }
        };

        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| ScrubError::ModelUnavailable("model load was abandoned".to_string()))?
            .clone();

        match outcome {
            Some(Ok(classifier)) => Ok(classifier),
            Some(Err(reason)) => Err(ScrubError::ModelUnavailable(reason)),
            None => Err(ScrubError::ModelUnavailable("model load produced no outcome".to_string())),
        }
    }

    /// Moves the state to `Loading` and spawns the load task. The caller holds
    /// the state lock, so at most one load starts.
    fn start_load(&self, state: &mut LoadState) -> watch::Receiver<Option<LoadOutcome>> {
        let (tx, rx) = watch::channel(None);
        *state = LoadState::Loading(rx.clone());

        let loader = Arc::clone(&self.loader);
        let shared_state = Arc::clone(&self.state);
        info!("Loading classification model: {}", loader.describe());

        tokio::spawn(async move {
            let outcome: LoadOutcome = match loader.load().await {
                Ok(classifier) => {
                    info!("Classification model '{}' loaded successfully.", classifier.name());
                    Ok(classifier)
                }
                Err(e) => {
                    warn!("Failed to load classification model: {:#}", e);
                    Err(format!("{:#}", e))
                }
            };

            {
                let mut state = shared_state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                *state = match &outcome {
                    Ok(classifier) => LoadState::Ready(Arc::clone(classifier)),
                    Err(reason) => LoadState::Failed(reason.clone()),
                };
            }
            let _ = tx.send(Some(outcome));
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CandidateEntity;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct EchoClassifier;

    #[async_trait]
    impl TokenClassifier for EchoClassifier {
        fn name(&self) -> &str {
            "echo"
        }

        async fn predict(&self, text: &str) -> Result<Vec<CandidateEntity>> {
            Ok(vec![CandidateEntity::new("B-PER", text, 0.9)])
        }
    }

    /// Counts loads; sleeps to widen the in-flight window; fails the first
    /// `failures` attempts.
    struct CountingLoader {
        loads: Arc<AtomicUsize>,
        delay: Duration,
        failures: usize,
    }

    #[async_trait]
    impl ModelLoader for CountingLoader {
        fn describe(&self) -> String {
            "counting loader".to_string()
        }

        async fn load(&self) -> Result<Arc<dyn TokenClassifier>> {
            let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if attempt < self.failures {
                bail!("weights not found");
            }
            Ok(Arc::new(EchoClassifier))
        }
    }

    fn counting_handle(delay_ms: u64, failures: usize) -> (ModelHandle, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let loader = CountingLoader {
            loads: Arc::clone(&loads),
            delay: Duration::from_millis(delay_ms),
            failures,
        };
        (ModelHandle::new(Arc::new(loader)), loads)
    }

    #[tokio::test]
    async fn test_concurrent_acquires_share_one_load() {
        let (handle, loads) = counting_handle(50, 0);
        assert_eq!(handle.state(), ModelState::Uninitialized);

        let (a, b, c) = tokio::join!(handle.acquire(), handle.acquire(), handle.acquire());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), ModelState::Ready);

        handle.acquire().await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_reports_unavailable_then_retries() {
        let (handle, loads) = counting_handle(1, 1);

        let err = handle.acquire().await.err().unwrap();
        assert!(matches!(err, ScrubError::ModelUnavailable(ref r) if r.contains("weights not found")));
        assert!(matches!(handle.state(), ModelState::Failed(_)));

        assert!(handle.acquire().await.is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert_eq!(handle.state(), ModelState::Ready);
    }

    #[tokio::test]
    async fn test_abandoned_waiter_does_not_stall_the_load() {
        let (handle, loads) = counting_handle(50, 0);

        let gave_up = tokio::time::timeout(Duration::from_millis(5), handle.acquire()).await;
        assert!(gave_up.is_err());
        assert_eq!(handle.state(), ModelState::Loading);

        assert!(handle.acquire().await.is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_warm_up_starts_loading() {
        let (handle, loads) = counting_handle(20, 0);
        handle.warm_up();
        assert_eq!(handle.state(), ModelState::Loading);
        handle.warm_up();
        handle.acquire().await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ready_handle_skips_loading() {
        let handle = ModelHandle::ready(Arc::new(EchoClassifier));
        assert_eq!(handle.state(), ModelState::Ready);
        let classifier = handle.acquire().await.unwrap();
        assert_eq!(classifier.name(), "echo");
    }
}
