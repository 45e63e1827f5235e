//! Live probe state.
//!
//! Holds the latest probe result per provider. Results are applied in
//! arrival order; consumers (the aggregator, the icon scheduler) read
//! snapshots at call time so a delayed render always reflects the
//! most recent data.

use std::collections::HashMap;
use std::sync::Arc;

use burnbar_core::{validate_provider_id, MetricLine, ProbeOutput};
use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Latest known state for one provider.
#[derive(Debug, Clone)]
pub struct ProbeState {
    /// Display name from the most recent probe.
    pub display_name: String,
    /// Subscription plan, if reported.
    pub plan: Option<String>,
    /// Metric lines from the most recent successful probe.
    pub lines: Vec<MetricLine>,
    /// Provider icon URL.
    pub icon_url: String,
    /// When the most recent successful probe was applied.
    pub updated_at: DateTime<Utc>,
    /// Error from the most recent probe, if it failed. Lines from the
    /// last success are kept alongside.
    pub last_error: Option<String>,
}

#[derive(Default)]
struct ProbeStoreInner {
    states: HashMap<String, ProbeState>,
}

/// Store for live per-provider probe results.
///
/// Observable via watch channels for tray updates.
pub struct ProbeStore {
    inner: Arc<RwLock<ProbeStoreInner>>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl Default for ProbeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeStore {
    /// Creates an empty probe store.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(ProbeStoreInner::default())),
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Applies a probe result, replacing the provider's lines.
    ///
    /// Rejects outputs whose provider id fails registry validation so
    /// a misbehaving probe cannot create phantom providers.
    pub async fn apply(&self, output: ProbeOutput) -> Result<(), StoreError> {
        validate_provider_id(&output.provider_id)?;
        let provider_id = output.provider_id.clone();
        {
            let mut inner = self.inner.write().await;
            inner.states.insert(
                output.provider_id,
                ProbeState {
                    display_name: output.display_name,
                    plan: output.plan,
                    lines: output.lines,
                    icon_url: output.icon_url,
                    updated_at: Utc::now(),
                    last_error: None,
                },
            );
        }
        self.notify_change().await;
        debug!(provider = %provider_id, "Probe result applied");
        Ok(())
    }

    /// Records a probe failure without discarding the last good lines.
    pub async fn set_error(&self, provider_id: &str, error: String) {
        {
            let mut inner = self.inner.write().await;
            match inner.states.get_mut(provider_id) {
                Some(state) => state.last_error = Some(error),
                None => {
                    inner.states.insert(
                        provider_id.to_string(),
                        ProbeState {
                            display_name: provider_id.to_string(),
                            plan: None,
                            lines: Vec::new(),
                            icon_url: String::new(),
                            updated_at: Utc::now(),
                            last_error: Some(error),
                        },
                    );
                }
            }
        }
        self.notify_change().await;
        warn!(provider = %provider_id, "Probe error recorded");
    }

    /// Gets the state for a provider.
    pub async fn get(&self, provider_id: &str) -> Option<ProbeState> {
        self.inner.read().await.states.get(provider_id).cloned()
    }

    /// Removes a provider's state (e.g. after it is uninstalled).
    pub async fn remove(&self, provider_id: &str) {
        let removed = self
            .inner
            .write()
            .await
            .states
            .remove(provider_id)
            .is_some();
        if removed {
            self.notify_change().await;
        }
    }

    /// Projects current lines per provider, the aggregator's input.
    ///
    /// Providers that have only ever errored are excluded so they
    /// still read as "no data yet".
    pub async fn lines_by_id(&self) -> HashMap<String, Vec<MetricLine>> {
        self.inner
            .read()
            .await
            .states
            .iter()
            .filter(|(_, state)| !(state.lines.is_empty() && state.last_error.is_some()))
            .map(|(id, state)| (id.clone(), state.lines.clone()))
            .collect()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use burnbar_core::models::progress_percent_line;

    fn output(id: &str, used: f64) -> ProbeOutput {
        ProbeOutput {
            provider_id: id.to_string(),
            display_name: id.to_string(),
            plan: None,
            lines: vec![progress_percent_line("Session", used, None, None)],
            icon_url: format!("providers/{id}.svg"),
        }
    }

    #[tokio::test]
    async fn test_apply_replaces_lines() {
        let store = ProbeStore::new();
        store.apply(output("codex", 10.0)).await.unwrap();
        store.apply(output("codex", 20.0)).await.unwrap();

        let state = store.get("codex").await.unwrap();
        assert_eq!(state.lines.len(), 1);
        match &state.lines[0] {
            MetricLine::Progress { used, .. } => assert_eq!(*used, 20.0),
            other => panic!("unexpected line: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_apply_rejects_invalid_provider_id() {
        let store = ProbeStore::new();
        let err = store.apply(output("Not A Provider", 10.0)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidProbe(_)));
        assert!(store.get("Not A Provider").await.is_none());
    }

    #[tokio::test]
    async fn test_error_keeps_last_good_lines() {
        let store = ProbeStore::new();
        store.apply(output("codex", 10.0)).await.unwrap();
        store.set_error("codex", "timeout".to_string()).await;

        let state = store.get("codex").await.unwrap();
        assert_eq!(state.last_error.as_deref(), Some("timeout"));
        assert_eq!(state.lines.len(), 1);

        // Still visible to the aggregator.
        assert!(store.lines_by_id().await.contains_key("codex"));
    }

    #[tokio::test]
    async fn test_error_before_any_success_reads_as_no_data() {
        let store = ProbeStore::new();
        store.set_error("zai", "auth".to_string()).await;

        assert!(store.get("zai").await.is_some());
        assert!(!store.lines_by_id().await.contains_key("zai"));
    }

    #[tokio::test]
    async fn test_apply_clears_error() {
        let store = ProbeStore::new();
        store.set_error("codex", "down".to_string()).await;
        store.apply(output("codex", 5.0)).await.unwrap();

        let state = store.get("codex").await.unwrap();
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_remove_notifies_once() {
        let store = ProbeStore::new();
        store.apply(output("codex", 5.0)).await.unwrap();

        let mut rx = store.subscribe();
        store.remove("codex").await;
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        store.remove("codex").await;
        assert!(!rx.has_changed().unwrap());
    }
}
