//! Provider preference normalization.
//!
//! Persisted ordering and enablement can drift from the live provider
//! registry: providers get installed, removed, or renamed between
//! runs. [`normalize`] reconciles the two on every start. It is pure
//! and deterministic so a start-up pass never perturbs an ordering
//! the user set by hand.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::ProviderMeta;

/// Providers that start enabled when first installed. Everything else
/// defaults to disabled until the user opts in.
pub const DEFAULT_ENABLED: &[&str] = &["codex", "claude"];

/// Persisted provider ordering and enablement.
///
/// Invariant after [`normalize`]: `order` contains every known
/// provider id exactly once; `disabled` is a subset of `order`;
/// neither list contains unknown ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderPrefs {
    /// Display order, one entry per known provider.
    pub order: Vec<String>,
    /// Ids the user has switched off.
    pub disabled: Vec<String>,
}

impl ProviderPrefs {
    /// True when the provider is present and not disabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.order.iter().any(|o| o == id) && !self.disabled.iter().any(|d| d == id)
    }

    /// Ids in display order with disabled providers filtered out.
    pub fn enabled_order(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|id| !self.disabled.contains(id))
            .map(String::as_str)
    }
}

/// Reconciles stored preferences against the live registry.
///
/// Stored order is filtered to known ids (preserving relative order,
/// dropping duplicates), then any known id missing from it is
/// appended. Newly appended providers default to disabled unless they
/// are on the [`DEFAULT_ENABLED`] allow list.
pub fn normalize(stored: &ProviderPrefs, known: &[ProviderMeta]) -> ProviderPrefs {
    let known_ids: HashSet<&str> = known.iter().map(|m| m.id.as_str()).collect();

    let mut order: Vec<String> = Vec::with_capacity(known.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(known.len());
    for id in &stored.order {
        if known_ids.contains(id.as_str()) && seen.insert(id.as_str()) {
            order.push(id.clone());
        }
    }

    let mut appended: Vec<&str> = Vec::new();
    for meta in known {
        if !seen.contains(meta.id.as_str()) {
            order.push(meta.id.clone());
            appended.push(meta.id.as_str());
        }
    }

    let mut disabled: Vec<String> = Vec::new();
    let mut seen_disabled: HashSet<&str> = HashSet::new();
    for id in &stored.disabled {
        if known_ids.contains(id.as_str()) && seen_disabled.insert(id.as_str()) {
            disabled.push(id.clone());
        }
    }

    for id in appended {
        if !DEFAULT_ENABLED.contains(&id) && !disabled.iter().any(|d| d == id) {
            disabled.push(id.to_string());
        }
    }

    ProviderPrefs { order, disabled }
}

/// Structural equality, used to skip redundant persistence writes.
pub fn prefs_equal(a: &ProviderPrefs, b: &ProviderPrefs) -> bool {
    a.order.len() == b.order.len()
        && a.disabled.len() == b.disabled.len()
        && a.order.iter().zip(&b.order).all(|(x, y)| x == y)
        && a.disabled.iter().zip(&b.disabled).all(|(x, y)| x == y)
}

/// Reconciles a stored per-provider account ordering against the live
/// account ids, the same way [`normalize`] treats provider order.
pub fn normalize_account_order(stored: &[String], live: &[String]) -> Vec<String> {
    let live_ids: HashSet<&str> = live.iter().map(String::as_str).collect();

    let mut order: Vec<String> = Vec::with_capacity(live.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(live.len());
    for id in stored {
        if live_ids.contains(id.as_str()) && seen.insert(id.as_str()) {
            order.push(id.clone());
        }
    }
    for id in live {
        if !seen.contains(id.as_str()) {
            order.push(id.clone());
        }
    }
    order
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::builtin_providers;

    fn prefs(order: &[&str], disabled: &[&str]) -> ProviderPrefs {
        ProviderPrefs {
            order: order.iter().map(|s| (*s).to_string()).collect(),
            disabled: disabled.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn test_fresh_install_gets_registry_order() {
        let known = builtin_providers();
        let result = normalize(&ProviderPrefs::default(), &known);

        let expected: Vec<&str> = known.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(result.order, expected);

        // Everything off the allow list starts disabled.
        for id in &result.order {
            assert_eq!(
                result.disabled.contains(id),
                !DEFAULT_ENABLED.contains(&id.as_str()),
                "id: {id}"
            );
        }
    }

    #[test]
    fn test_preserves_manual_order() {
        let known = builtin_providers();
        let stored = prefs(&["zai", "claude", "codex"], &["zai"]);
        let result = normalize(&stored, &known);

        assert_eq!(&result.order[..3], &["zai", "claude", "codex"]);
        // New providers appended after the manual prefix.
        assert!(result.order.len() == known.len());
    }

    #[test]
    fn test_drops_unknown_and_duplicate_ids() {
        let known = builtin_providers();
        let stored = prefs(&["codex", "ghost", "codex", "claude"], &["ghost", "claude"]);
        let result = normalize(&stored, &known);

        assert_eq!(result.order.iter().filter(|id| *id == "codex").count(), 1);
        assert!(!result.order.iter().any(|id| id == "ghost"));
        assert!(!result.disabled.iter().any(|id| id == "ghost"));
        assert!(result.disabled.iter().any(|id| id == "claude"));
    }

    #[test]
    fn test_idempotent() {
        let known = builtin_providers();
        let stored = prefs(&["opencode", "codex"], &["opencode"]);
        let once = normalize(&stored, &known);
        let twice = normalize(&once, &known);
        assert!(prefs_equal(&once, &twice));
    }

    #[test]
    fn test_never_drops_or_invents_known_ids() {
        let known = builtin_providers();
        // Fuzz-ish grid of malformed stored inputs.
        let cases = [
            prefs(&[], &[]),
            prefs(&["bogus"], &["bogus"]),
            prefs(&["claude", "claude", "claude"], &[]),
            prefs(&["zai", "x", "zai", "claude", "y"], &["x", "zai"]),
        ];
        for stored in &cases {
            let result = normalize(stored, &known);
            assert_eq!(result.order.len(), known.len());
            for meta in &known {
                assert!(result.order.contains(&meta.id));
            }
            for id in result.order.iter().chain(&result.disabled) {
                assert!(known.iter().any(|m| &m.id == id), "unknown id {id}");
            }
        }
    }

    #[test]
    fn test_disabled_is_subset_of_order() {
        let known = builtin_providers();
        let stored = prefs(&["claude"], &["codex", "nope"]);
        let result = normalize(&stored, &known);
        for id in &result.disabled {
            assert!(result.order.contains(id));
        }
    }

    #[test]
    fn test_prefs_equal_is_positional() {
        let a = prefs(&["codex", "claude"], &[]);
        let b = prefs(&["claude", "codex"], &[]);
        assert!(!prefs_equal(&a, &b));
        assert!(prefs_equal(&a, &a.clone()));
    }

    #[test]
    fn test_enabled_order_filters_disabled() {
        let p = prefs(&["codex", "zai", "claude"], &["zai"]);
        let enabled: Vec<&str> = p.enabled_order().collect();
        assert_eq!(enabled, vec!["codex", "claude"]);
        assert!(p.is_enabled("codex"));
        assert!(!p.is_enabled("zai"));
        assert!(!p.is_enabled("missing"));
    }

    #[test]
    fn test_account_order_reconciliation() {
        let stored = vec!["b".to_string(), "ghost".to_string(), "a".to_string()];
        let live = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(normalize_account_order(&stored, &live), vec!["b", "a", "c"]);
    }
}
