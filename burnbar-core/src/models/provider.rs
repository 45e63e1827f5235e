//! Static provider descriptors.
//!
//! [`ProviderMeta`] is loaded once at startup from the provider
//! registry and is immutable for the process lifetime. The built-in
//! registry here covers the providers `BurnBar` ships with; external
//! registries may extend it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const MIN_ID_LEN: usize = 2;
const MAX_ID_LEN: usize = 64;

/// Kind of line a provider's manifest declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ManifestLineKind {
    /// Free-form text row.
    Text,
    /// Used-versus-limit gauge row.
    Progress,
    /// Status chip row.
    Badge,
}

/// One line a provider's manifest declares it may emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestLine {
    /// Base (unscoped) metric label.
    pub label: String,
    /// Line kind.
    pub kind: ManifestLineKind,
}

/// Static per-provider descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMeta {
    /// Registry id (lowercase, stable across versions).
    pub id: String,
    /// Display name in UI.
    pub name: String,
    /// Icon URL for the provider glyph.
    pub icon_url: String,
    /// Brand accent color (CSS hex), if the provider has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color: Option<String>,
    /// Lines this provider's probe may emit.
    pub lines: Vec<ManifestLine>,
    /// Ordered preference list of metric labels eligible to represent
    /// the provider as a single tray gauge. The first one present in
    /// live data wins.
    pub primary_candidates: Vec<String>,
}

impl ProviderMeta {
    fn new(id: &str, name: &str, brand_color: Option<&str>, primary_candidates: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon_url: format!("providers/{id}.svg"),
            brand_color: brand_color.map(str::to_string),
            lines: primary_candidates
                .iter()
                .map(|label| ManifestLine {
                    label: (*label).to_string(),
                    kind: ManifestLineKind::Progress,
                })
                .collect(),
            primary_candidates: primary_candidates.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Returns the built-in provider registry.
///
/// Order here is the default display order for fresh installs.
pub fn builtin_providers() -> Vec<ProviderMeta> {
    vec![
        ProviderMeta::new("codex", "Codex", Some("#10a37f"), &["Session", "Weekly"]),
        ProviderMeta::new("claude", "Claude", Some("#cc7744"), &["Session", "Weekly"]),
        ProviderMeta::new("copilot", "Copilot", Some("#24292e"), &["Premium requests", "Chat"]),
        ProviderMeta::new("antigravity", "Antigravity", Some("#9400d3"), &["Prompt Credits"]),
        ProviderMeta::new("opencode", "OpenCode", None, &["Monthly Cost"]),
        ProviderMeta::new("zai", "z.ai", Some("#646464"), &["Token Usage", "Utility Usage"]),
    ]
}

/// Validates a provider registry id.
///
/// Ids are 2-64 chars, start with a lowercase letter or digit, and
/// contain only lowercase letters, digits, `.`, `_`, or `-`.
pub fn is_valid_provider_id(value: &str) -> bool {
    if value.len() < MIN_ID_LEN || value.len() > MAX_ID_LEN {
        return false;
    }

    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return false;
    }

    chars.all(|ch| {
        ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '.' || ch == '_' || ch == '-'
    })
}

/// Checks a provider registry id, erroring on invalid ids.
///
/// Used at the ingestion boundary so a misbehaving probe cannot
/// create phantom providers in live state.
pub fn validate_provider_id(value: &str) -> Result<(), CoreError> {
    if is_valid_provider_id(value) {
        Ok(())
    } else {
        Err(CoreError::InvalidProviderId(value.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_ids_are_valid() {
        for meta in builtin_providers() {
            assert!(is_valid_provider_id(&meta.id), "bad id: {}", meta.id);
        }
    }

    #[test]
    fn test_builtin_registry_has_primary_candidates() {
        for meta in builtin_providers() {
            assert!(
                !meta.primary_candidates.is_empty(),
                "{} has no primary candidates",
                meta.id
            );
        }
    }

    #[test]
    fn test_provider_id_validation() {
        assert!(is_valid_provider_id("codex"));
        assert!(is_valid_provider_id("z-ai.v2"));
        assert!(is_valid_provider_id("0penai"));

        assert!(!is_valid_provider_id("x"));
        assert!(!is_valid_provider_id("Codex"));
        assert!(!is_valid_provider_id("-codex"));
        assert!(!is_valid_provider_id("has space"));
        assert!(!is_valid_provider_id(&"a".repeat(65)));
    }

    #[test]
    fn test_validate_names_offending_id() {
        assert!(validate_provider_id("codex").is_ok());
        let err = validate_provider_id("Bad Id").unwrap_err();
        assert_eq!(err.to_string(), "Invalid provider id: \"Bad Id\"");
    }

    #[test]
    fn test_meta_serde_shape() {
        let meta = &builtin_providers()[0];
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["id"], "codex");
        assert_eq!(json["iconUrl"], "providers/codex.svg");
        assert_eq!(json["primaryCandidates"][0], "Session");
    }
}
