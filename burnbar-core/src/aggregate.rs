//! Per-provider usage aggregation.
//!
//! Collapses a provider's progress lines, possibly one per account,
//! into the single fraction its tray gauge shows. Pure function of
//! its inputs; the caller debounces, not this module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{DisplayMode, MetricLine, ProviderMeta};
use crate::prefs::ProviderPrefs;
use crate::scoped_label::base_metric_label;

/// One tray gauge for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayPrimaryBar {
    /// Provider registry id.
    pub id: String,
    /// Fraction in `[0, 1]`, or `None` while loading or when the
    /// provider's data has no usable primary metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraction: Option<f64>,
}

/// Computes the tray gauges for every eligible enabled provider.
///
/// Providers are visited in settings order until `max_bars` bars are
/// collected. A provider with no primary candidates is skipped
/// entirely; one with candidates but no live data (or no usable
/// aggregate) still gets a bar with `fraction: None` so the tray can
/// show a loading/empty track for it.
pub fn primary_bars(
    meta: &[ProviderMeta],
    prefs: &ProviderPrefs,
    states_by_id: &HashMap<String, Vec<MetricLine>>,
    max_bars: usize,
    display_mode: DisplayMode,
) -> Vec<TrayPrimaryBar> {
    let meta_by_id: HashMap<&str, &ProviderMeta> =
        meta.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut bars = Vec::new();
    for id in prefs.enabled_order() {
        if bars.len() >= max_bars {
            break;
        }
        let Some(provider) = meta_by_id.get(id) else {
            continue;
        };
        if provider.primary_candidates.is_empty() {
            continue;
        }

        let fraction = states_by_id
            .get(id)
            .and_then(|lines| provider_fraction(provider, lines, display_mode));

        bars.push(TrayPrimaryBar {
            id: id.to_string(),
            fraction,
        });
    }
    bars
}

/// Selects the provider's primary metric and aggregates it across
/// accounts into one fraction.
fn provider_fraction(
    provider: &ProviderMeta,
    lines: &[MetricLine],
    display_mode: DisplayMode,
) -> Option<f64> {
    let primary = provider
        .primary_candidates
        .iter()
        .find(|candidate| {
            lines.iter().any(|line| {
                matches!(line, MetricLine::Progress { .. })
                    && base_metric_label(line.label()) == **candidate
            })
        })?;

    let mut total_used = 0.0;
    let mut total_limit = 0.0;
    for line in lines {
        let MetricLine::Progress { label, used, limit, .. } = line else {
            continue;
        };
        if base_metric_label(label) != *primary {
            continue;
        }
        // One line per account; units assumed comparable.
        if limit.is_finite() && *limit > 0.0 && used.is_finite() {
            total_used += used;
            total_limit += limit;
        }
    }

    if total_limit <= 0.0 {
        return None;
    }

    let shown = match display_mode {
        DisplayMode::Used => total_used,
        DisplayMode::Left => total_limit - total_used,
    };
    Some((shown / total_limit).clamp(0.0, 1.0))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{progress_percent_line, ProgressFormat};
    use crate::scoped_label::encode;

    fn progress(label: &str, used: f64, limit: f64) -> MetricLine {
        MetricLine::Progress {
            label: label.to_string(),
            used,
            limit,
            format: ProgressFormat::Percent,
            resets_at: None,
            period_duration_ms: None,
            color: None,
        }
    }

    fn test_meta(id: &str, candidates: &[&str]) -> ProviderMeta {
        ProviderMeta {
            id: id.to_string(),
            name: id.to_string(),
            icon_url: String::new(),
            brand_color: None,
            lines: vec![],
            primary_candidates: candidates.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn test_prefs(order: &[&str]) -> ProviderPrefs {
        ProviderPrefs {
            order: order.iter().map(|s| (*s).to_string()).collect(),
            disabled: vec![],
        }
    }

    #[test]
    fn test_single_provider_used_mode() {
        let meta = vec![test_meta("codex", &["Session"])];
        let mut states = HashMap::new();
        states.insert("codex".to_string(), vec![progress("Session", 25.0, 100.0)]);

        let bars = primary_bars(
            &meta,
            &test_prefs(&["codex"]),
            &states,
            4,
            DisplayMode::Used,
        );
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].fraction, Some(0.25));
    }

    #[test]
    fn test_multi_account_aggregation() {
        let meta = vec![test_meta("claude", &["Session"])];
        let mut states = HashMap::new();
        states.insert(
            "claude".to_string(),
            vec![
                progress(&encode("Work", "a1", "Session"), 10.0, 100.0),
                progress(&encode("Personal", "a2", "Session"), 5.0, 50.0),
            ],
        );

        let bars = primary_bars(
            &meta,
            &test_prefs(&["claude"]),
            &states,
            4,
            DisplayMode::Used,
        );
        // (10 + 5) / (100 + 50)
        assert_eq!(bars[0].fraction, Some(0.1));
    }

    #[test]
    fn test_candidate_preference_order() {
        let meta = vec![test_meta("codex", &["Session", "Weekly"])];
        let mut states = HashMap::new();
        // Only the second candidate is present.
        states.insert("codex".to_string(), vec![progress("Weekly", 30.0, 100.0)]);

        let bars = primary_bars(
            &meta,
            &test_prefs(&["codex"]),
            &states,
            4,
            DisplayMode::Used,
        );
        assert_eq!(bars[0].fraction, Some(0.3));
    }

    #[test]
    fn test_no_matching_candidate_yields_none_fraction() {
        let meta = vec![test_meta("zai", &["Token Usage"])];
        let mut states = HashMap::new();
        states.insert("zai".to_string(), vec![progress("Something Else", 1.0, 2.0)]);

        let bars = primary_bars(&meta, &test_prefs(&["zai"]), &states, 4, DisplayMode::Used);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].fraction, None);
    }

    #[test]
    fn test_no_live_data_yields_none_fraction() {
        let meta = vec![test_meta("codex", &["Session"])];
        let bars = primary_bars(
            &meta,
            &test_prefs(&["codex"]),
            &HashMap::new(),
            4,
            DisplayMode::Used,
        );
        assert_eq!(bars, vec![TrayPrimaryBar { id: "codex".to_string(), fraction: None }]);
    }

    #[test]
    fn test_provider_without_candidates_is_skipped() {
        let meta = vec![test_meta("opencode", &[]), test_meta("codex", &["Session"])];
        let mut states = HashMap::new();
        states.insert("codex".to_string(), vec![progress("Session", 50.0, 100.0)]);

        let bars = primary_bars(
            &meta,
            &test_prefs(&["opencode", "codex"]),
            &states,
            4,
            DisplayMode::Used,
        );
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].id, "codex");
    }

    #[test]
    fn test_max_bars_and_settings_order() {
        let meta: Vec<ProviderMeta> = ["a2", "b2", "c2"]
            .iter()
            .map(|id| test_meta(id, &["Session"]))
            .collect();
        let states: HashMap<String, Vec<MetricLine>> = meta
            .iter()
            .map(|m| (m.id.clone(), vec![progress("Session", 1.0, 2.0)]))
            .collect();

        let bars = primary_bars(
            &meta,
            &test_prefs(&["c2", "a2", "b2"]),
            &states,
            2,
            DisplayMode::Used,
        );
        let ids: Vec<&str> = bars.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "a2"]);
    }

    #[test]
    fn test_disabled_provider_excluded() {
        let meta = vec![test_meta("codex", &["Session"])];
        let prefs = ProviderPrefs {
            order: vec!["codex".to_string()],
            disabled: vec!["codex".to_string()],
        };
        let bars = primary_bars(&meta, &prefs, &HashMap::new(), 4, DisplayMode::Used);
        assert!(bars.is_empty());
    }

    #[test]
    fn test_nonfinite_and_zero_limit_lines_ignored() {
        let meta = vec![test_meta("codex", &["Session"])];
        let mut states = HashMap::new();
        states.insert(
            "codex".to_string(),
            vec![
                progress("Session", f64::NAN, 100.0),
                progress("Session", 5.0, 0.0),
                progress("Session", 5.0, f64::INFINITY),
                progress("Session", 20.0, 100.0),
            ],
        );

        let bars = primary_bars(
            &meta,
            &test_prefs(&["codex"]),
            &states,
            4,
            DisplayMode::Used,
        );
        assert_eq!(bars[0].fraction, Some(0.2));
    }

    #[test]
    fn test_left_mode_inverts_fraction() {
        let meta = vec![test_meta("codex", &["Session"])];
        let mut states = HashMap::new();
        states.insert("codex".to_string(), vec![progress_percent_line("Session", 90.0, None, None)]);

        let bars = primary_bars(
            &meta,
            &test_prefs(&["codex"]),
            &states,
            4,
            DisplayMode::Left,
        );
        let fraction = bars[0].fraction.unwrap();
        assert!((fraction - 0.1).abs() < 1e-9);
    }
}
