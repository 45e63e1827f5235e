//! User preferences store.
//!
//! Manages persisted settings with change notification. The on-disk
//! field names are a stable format; renaming any of them breaks
//! existing installs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use burnbar_core::prefs::{self, ProviderPrefs};
use burnbar_core::{DisplayMode, ProviderMeta, TrayIconStyle};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Provider ordering and enablement.
    pub providers: ProviderPrefs,

    /// Whether gauges show used or remaining share.
    pub display_mode: DisplayMode,

    /// Menu bar glyph style.
    pub tray_icon_style: TrayIconStyle,

    /// Show percent text next to the glyph.
    pub tray_show_percentage: bool,

    /// Per-provider account display ordering.
    pub account_order: HashMap<String, Vec<String>>,
}

impl Settings {
    /// Whether percent text should actually render. Forced on when
    /// the style cannot render without it.
    pub fn effective_show_percentage(&self) -> bool {
        self.tray_show_percentage || self.tray_icon_style.mandates_percentage()
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store with default settings at the given path.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path, falling back to defaults on a
    /// malformed file.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        let (notify, _) = watch::channel(0);
        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        })
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk. In-memory
    /// state stays authoritative either way.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Normalization
    // ========================================================================

    /// Reconciles the stored provider list against the registry.
    ///
    /// Returns true when the normalized list differs from the stored
    /// one, in which case the caller should persist. Subscribers are
    /// only notified on an actual change.
    pub async fn normalize_against(&self, known: &[ProviderMeta]) -> bool {
        let changed = {
            let mut settings = self.settings.write().await;
            let normalized = prefs::normalize(&settings.providers, known);
            if prefs::prefs_equal(&settings.providers, &normalized) {
                false
            } else {
                settings.providers = normalized;
                true
            }
        };
        if changed {
            debug!("Provider preferences normalized against registry");
            self.notify_change().await;
        }
        changed
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Checks if a provider is enabled.
    pub async fn is_provider_enabled(&self, id: &str) -> bool {
        self.settings.read().await.providers.is_enabled(id)
    }

    /// Enables or disables a provider.
    pub async fn set_provider_enabled(&self, id: &str, enabled: bool) {
        self.update(|s| {
            if enabled {
                s.providers.disabled.retain(|d| d != id);
            } else if s.providers.order.iter().any(|o| o == id)
                && !s.providers.disabled.iter().any(|d| d == id)
            {
                s.providers.disabled.push(id.to_string());
            }
        })
        .await;
    }

    /// Sets the provider display order.
    pub async fn set_provider_order(&self, order: Vec<String>) {
        self.update(|s| s.providers.order = order).await;
    }

    /// Gets the display mode.
    pub async fn display_mode(&self) -> DisplayMode {
        self.settings.read().await.display_mode
    }

    /// Sets the display mode.
    pub async fn set_display_mode(&self, mode: DisplayMode) {
        self.update(|s| s.display_mode = mode).await;
    }

    /// Gets the tray icon style.
    pub async fn tray_icon_style(&self) -> TrayIconStyle {
        self.settings.read().await.tray_icon_style
    }

    /// Sets the tray icon style.
    pub async fn set_tray_icon_style(&self, style: TrayIconStyle) {
        self.update(|s| s.tray_icon_style = style).await;
    }

    /// Gets whether percent text renders next to the glyph.
    pub async fn tray_show_percentage(&self) -> bool {
        self.settings.read().await.effective_show_percentage()
    }

    /// Sets whether percent text renders next to the glyph.
    pub async fn set_tray_show_percentage(&self, value: bool) {
        self.update(|s| s.tray_show_percentage = value).await;
    }

    /// Gets the stored account order for a provider.
    pub async fn account_order(&self, provider_id: &str) -> Vec<String> {
        self.settings
            .read()
            .await
            .account_order
            .get(provider_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Stores the account order for a provider, reconciled against
    /// the live account ids.
    pub async fn set_account_order(&self, provider_id: &str, order: &[String], live: &[String]) {
        let normalized = prefs::normalize_account_order(order, live);
        self.update(|s| {
            s.account_order.insert(provider_id.to_string(), normalized);
        })
        .await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use burnbar_core::models::builtin_providers;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.display_mode, DisplayMode::Left);
        assert_eq!(settings.tray_icon_style, TrayIconStyle::Bars);
        assert!(!settings.tray_show_percentage);
        assert!(settings.providers.order.is_empty());
    }

    #[test]
    fn test_text_only_style_forces_percentage() {
        let mut settings = Settings::default();
        assert!(!settings.effective_show_percentage());

        settings.tray_icon_style = TrayIconStyle::TextOnly;
        assert!(settings.effective_show_percentage());
    }

    #[test]
    fn test_settings_serde_field_names() {
        let settings = Settings::default();
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json.get("displayMode").is_some());
        assert!(json.get("trayIconStyle").is_some());
        assert!(json.get("trayShowPercentage").is_some());
        assert!(json.get("accountOrder").is_some());
        assert!(json["providers"].get("order").is_some());
        assert!(json["providers"].get("disabled").is_some());
    }

    #[test]
    fn test_settings_accepts_retired_style_name() {
        let json = r#"{"trayIconStyle": "gauge"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.tray_icon_style, TrayIconStyle::Circle);
    }

    #[tokio::test]
    async fn test_settings_store_update() {
        let store = SettingsStore::new(PathBuf::from("/tmp/test_settings.json"));

        store
            .update(|s| {
                s.display_mode = DisplayMode::Used;
            })
            .await;

        let settings = store.get().await;
        assert_eq!(settings.display_mode, DisplayMode::Used);
    }

    #[tokio::test]
    async fn test_provider_toggle() {
        let store = SettingsStore::new(PathBuf::from("/tmp/test_settings.json"));
        store.normalize_against(&builtin_providers()).await;

        assert!(store.is_provider_enabled("codex").await);

        store.set_provider_enabled("codex", false).await;
        assert!(!store.is_provider_enabled("codex").await);

        store.set_provider_enabled("codex", true).await;
        assert!(store.is_provider_enabled("codex").await);
    }

    #[tokio::test]
    async fn test_normalize_reports_change_once() {
        let store = SettingsStore::new(PathBuf::from("/tmp/test_settings.json"));
        let known = builtin_providers();

        assert!(store.normalize_against(&known).await);
        // Second pass is a no-op, so no redundant persistence write.
        assert!(!store.normalize_against(&known).await);
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone());
        store
            .update(|s| {
                s.tray_icon_style = TrayIconStyle::Circle;
                s.tray_show_percentage = true;
            })
            .await;
        store.save().await.unwrap();

        let reloaded = SettingsStore::load(path).await.unwrap();
        let settings = reloaded.get().await;
        assert_eq!(settings.tray_icon_style, TrayIconStyle::Circle);
        assert!(settings.tray_show_percentage);
    }

    #[tokio::test]
    async fn test_account_order_normalized_on_set() {
        let store = SettingsStore::new(PathBuf::from("/tmp/test_settings.json"));
        let live = vec!["a1".to_string(), "a2".to_string()];
        let stored = vec!["a2".to_string(), "ghost".to_string()];

        store.set_account_order("claude", &stored, &live).await;
        assert_eq!(store.account_order("claude").await, vec!["a2", "a1"]);
    }

    #[tokio::test]
    async fn test_subscribe_sees_updates() {
        let store = SettingsStore::new(PathBuf::from("/tmp/test_settings.json"));
        let mut rx = store.subscribe();

        store.update(|s| s.tray_show_percentage = true).await;
        assert!(rx.has_changed().unwrap());
    }
}
