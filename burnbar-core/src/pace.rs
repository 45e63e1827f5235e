//! Consumption pace estimation.
//!
//! Given a progress line's used/limit and the period it covers,
//! classifies the current burn rate and projects end-of-period usage
//! for tooltips. All time arguments are epoch milliseconds so the
//! non-finite guards cover timestamps as well as amounts.

use serde::{Deserialize, Serialize};

use crate::models::DisplayMode;

/// Elapsed fraction of the period below which no stable rate estimate
/// exists. Intentional product constant, no config surface.
pub const MIN_ELAPSED_FRACTION: f64 = 0.05;

/// Projected usage at or below this fraction of the limit counts as
/// ahead of pace. Intentional product constant.
pub const AHEAD_LIMIT_FRACTION: f64 = 0.8;

/// Pace classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaceStatus {
    /// Projected usage comfortably under the limit.
    Ahead,
    /// Projected usage approaches but stays under the limit.
    OnTrack,
    /// Projected usage exceeds the limit.
    Behind,
}

impl std::fmt::Display for PaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaceStatus::Ahead => write!(f, "ahead"),
            PaceStatus::OnTrack => write!(f, "on-track"),
            PaceStatus::Behind => write!(f, "behind"),
        }
    }
}

/// Result of a pace estimate. Recomputed on every render tick, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaceResult {
    /// Classification of the current burn rate.
    pub status: PaceStatus,
    /// Linear projection of usage at period end, in the metric's own
    /// units.
    pub projected_usage: f64,
}

/// Classifies consumption rate and projects end-of-period usage.
///
/// Returns `None` when no estimate is possible: non-finite input,
/// non-positive limit or period, a period that has not started, or
/// one that is already over. Zero usage and over-limit usage short-
/// circuit before the early-period gate since their classification
/// does not depend on a stable rate.
pub fn calculate_pace(
    used: f64,
    limit: f64,
    resets_at_ms: f64,
    period_duration_ms: f64,
    now_ms: f64,
) -> Option<PaceResult> {
    if !used.is_finite()
        || !limit.is_finite()
        || !resets_at_ms.is_finite()
        || !period_duration_ms.is_finite()
        || !now_ms.is_finite()
    {
        return None;
    }
    if limit <= 0.0 || period_duration_ms <= 0.0 {
        return None;
    }

    let period_start_ms = resets_at_ms - period_duration_ms;
    let elapsed_ms = now_ms - period_start_ms;
    if elapsed_ms <= 0.0 || now_ms >= resets_at_ms {
        return None;
    }

    if used == 0.0 {
        return Some(PaceResult {
            status: PaceStatus::Ahead,
            projected_usage: 0.0,
        });
    }
    if used >= limit {
        return Some(PaceResult {
            status: PaceStatus::Behind,
            projected_usage: (used / elapsed_ms) * period_duration_ms,
        });
    }
    if elapsed_ms / period_duration_ms < MIN_ELAPSED_FRACTION {
        return None;
    }

    let projected_usage = (used / elapsed_ms) * period_duration_ms;
    let status = if projected_usage <= limit * AHEAD_LIMIT_FRACTION {
        PaceStatus::Ahead
    } else if projected_usage <= limit {
        PaceStatus::OnTrack
    } else {
        PaceStatus::Behind
    };

    Some(PaceResult {
        status,
        projected_usage,
    })
}

/// Builds the tooltip detail line for a pace result.
///
/// Behind-pace results get a "Limit in ..." ETA when the limit will
/// be reached before the reset; everything else gets the projected
/// percentage at reset, rounded pessimistically for the active
/// display mode.
pub fn pace_detail_text(
    result: &PaceResult,
    used: f64,
    limit: f64,
    resets_at_ms: f64,
    period_duration_ms: f64,
    now_ms: f64,
    display_mode: DisplayMode,
) -> String {
    if result.status == PaceStatus::Behind && period_duration_ms > 0.0 {
        let rate = result.projected_usage / period_duration_ms;
        if rate > 0.0 {
            let eta_ms = (limit - used) / rate;
            if eta_ms > 0.0 && eta_ms < resets_at_ms - now_ms {
                return format!("Limit in {}", format_compact_duration(eta_ms));
            }
        }
    }

    let used_percent = (result.projected_usage / limit * 100.0).clamp(0.0, 100.0);
    match display_mode {
        DisplayMode::Left => {
            let left = round_display_percent(100.0 - used_percent, DisplayMode::Left);
            format!("{}% left at reset", format_percent(left))
        }
        DisplayMode::Used => {
            let used = round_display_percent(used_percent, DisplayMode::Used);
            format!("{}% used at reset", format_percent(used))
        }
    }
}

/// Rounds a display percentage to one decimal.
///
/// Remaining values floor and used values ceil, so the display never
/// overstates what is left nor understates what is spent. Clamped to
/// `[0.1, 99.9]` except at the exact boundaries.
fn round_display_percent(value: f64, display_mode: DisplayMode) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    if value >= 100.0 {
        return 100.0;
    }
    let rounded = match display_mode {
        DisplayMode::Left => (value * 10.0).floor() / 10.0,
        DisplayMode::Used => (value * 10.0).ceil() / 10.0,
    };
    rounded.clamp(0.1, 99.9)
}

fn format_percent(value: f64) -> String {
    if (value - value.round()).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Formats a duration compactly: `2d 3h`, `4h 10m`, `25m`, `<1m`.
pub fn format_compact_duration(ms: f64) -> String {
    let total_minutes = (ms / 60_000.0).floor();
    if !total_minutes.is_finite() || total_minutes < 1.0 {
        return "<1m".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let total_minutes = total_minutes as i64;

    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: f64 = 3_600_000.0;
    const DAY: f64 = 24.0 * HOUR;

    #[test]
    fn test_zero_usage_is_ahead_anywhere_in_period() {
        // Even inside the early-period gate.
        let result = calculate_pace(0.0, 100.0, 100.0 * HOUR, 100.0 * HOUR, 1.0 * HOUR).unwrap();
        assert_eq!(result.status, PaceStatus::Ahead);
        assert_eq!(result.projected_usage, 0.0);
    }

    #[test]
    fn test_over_limit_is_behind_anywhere_in_period() {
        let result = calculate_pace(120.0, 100.0, 100.0 * HOUR, 100.0 * HOUR, 1.0 * HOUR).unwrap();
        assert_eq!(result.status, PaceStatus::Behind);
        // 120 used in 1h of a 100h period.
        assert!((result.projected_usage - 12_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_too_early_returns_none() {
        // 2% elapsed with nonzero usage under the limit.
        let result = calculate_pace(1.0, 100.0, 100.0 * HOUR, 100.0 * HOUR, 2.0 * HOUR);
        assert!(result.is_none());
    }

    #[test]
    fn test_period_over_returns_none() {
        assert!(calculate_pace(10.0, 100.0, 10.0 * HOUR, 5.0 * HOUR, 10.0 * HOUR).is_none());
        assert!(calculate_pace(10.0, 100.0, 10.0 * HOUR, 5.0 * HOUR, 11.0 * HOUR).is_none());
    }

    #[test]
    fn test_before_period_start_returns_none() {
        // Period runs [10h, 15h); now is 9h.
        assert!(calculate_pace(10.0, 100.0, 15.0 * HOUR, 5.0 * HOUR, 9.0 * HOUR).is_none());
    }

    #[test]
    fn test_invalid_inputs_return_none() {
        assert!(calculate_pace(f64::NAN, 100.0, DAY, DAY, HOUR).is_none());
        assert!(calculate_pace(10.0, 0.0, DAY, DAY, HOUR).is_none());
        assert!(calculate_pace(10.0, -5.0, DAY, DAY, HOUR).is_none());
        assert!(calculate_pace(10.0, 100.0, DAY, 0.0, HOUR).is_none());
        assert!(calculate_pace(10.0, 100.0, f64::INFINITY, DAY, HOUR).is_none());
    }

    #[test]
    fn test_classification_boundaries() {
        // elapsed 1ms of a 2ms period keeps the projection arithmetic
        // exact, so the <= boundaries can be hit dead on.
        let ahead = calculate_pace(40.0, 100.0, 2.0, 2.0, 1.0).unwrap();
        assert_eq!(ahead.status, PaceStatus::Ahead); // projects to 80 == limit * 0.8

        let on_track = calculate_pace(45.0, 100.0, 2.0, 2.0, 1.0).unwrap();
        assert_eq!(on_track.status, PaceStatus::OnTrack); // projects to 90

        let exactly_limit = calculate_pace(50.0, 100.0, 2.0, 2.0, 1.0).unwrap();
        assert_eq!(exactly_limit.status, PaceStatus::OnTrack); // projects to 100 == limit

        let behind = calculate_pace(60.0, 100.0, 2.0, 2.0, 1.0).unwrap();
        assert_eq!(behind.status, PaceStatus::Behind); // projects to 120
    }

    #[test]
    fn test_end_to_end_codex_scenario() {
        // 450/500 used, 2h left of a 24h period.
        let now = 0.0;
        let resets = 2.0 * HOUR;
        let result = calculate_pace(450.0, 500.0, resets, DAY, now).unwrap();
        // 22h elapsed; projects to 450/22*24 ~= 490.9, under the limit.
        assert_eq!(result.status, PaceStatus::OnTrack);
        assert!((result.projected_usage - 490.909).abs() < 0.001);
    }

    #[test]
    fn test_behind_detail_renders_eta() {
        // 61 used in 5h of a 10h period projects to 122.
        let result = calculate_pace(61.0, 100.0, 10.0 * HOUR, 10.0 * HOUR, 5.0 * HOUR).unwrap();
        assert_eq!(result.status, PaceStatus::Behind);
        let text = pace_detail_text(
            &result,
            61.0,
            100.0,
            10.0 * HOUR,
            10.0 * HOUR,
            5.0 * HOUR,
            DisplayMode::Left,
        );
        // rate = 12.2/h, (100-61)/12.2 ~= 3h 11m until the limit.
        assert_eq!(text, "Limit in 3h 11m");
    }

    #[test]
    fn test_behind_detail_falls_back_to_percent_when_eta_after_reset() {
        // Over limit already: projection is huge but the remaining
        // allowance is negative, so no ETA applies.
        let result = calculate_pace(120.0, 100.0, 10.0 * HOUR, 10.0 * HOUR, 5.0 * HOUR).unwrap();
        let text = pace_detail_text(
            &result,
            120.0,
            100.0,
            10.0 * HOUR,
            10.0 * HOUR,
            5.0 * HOUR,
            DisplayMode::Used,
        );
        assert_eq!(text, "100% used at reset");
    }

    #[test]
    fn test_detail_percent_rounding_modes() {
        // Projects to 49.5% used at reset.
        let result = PaceResult {
            status: PaceStatus::OnTrack,
            projected_usage: 49.55,
        };
        let left = pace_detail_text(&result, 24.0, 100.0, DAY, DAY, DAY / 2.0, DisplayMode::Left);
        // 50.45 left, floored to 50.4
        assert_eq!(left, "50.4% left at reset");

        let used = pace_detail_text(&result, 24.0, 100.0, DAY, DAY, DAY / 2.0, DisplayMode::Used);
        // 49.55 used, ceiled to 49.6
        assert_eq!(used, "49.6% used at reset");
    }

    #[test]
    fn test_detail_percent_clamps_off_boundary() {
        let tiny = PaceResult {
            status: PaceStatus::Ahead,
            projected_usage: 0.01,
        };
        let text = pace_detail_text(&tiny, 0.01, 100.0, DAY, DAY, DAY / 2.0, DisplayMode::Used);
        assert_eq!(text, "0.1% used at reset");

        let zero = PaceResult {
            status: PaceStatus::Ahead,
            projected_usage: 0.0,
        };
        let text = pace_detail_text(&zero, 0.0, 100.0, DAY, DAY, DAY / 2.0, DisplayMode::Used);
        assert_eq!(text, "0% used at reset");
    }

    #[test]
    fn test_compact_duration_formats() {
        assert_eq!(format_compact_duration(30.0 * 1000.0), "<1m");
        assert_eq!(format_compact_duration(25.0 * 60_000.0), "25m");
        assert_eq!(format_compact_duration(4.0 * HOUR + 10.0 * 60_000.0), "4h 10m");
        assert_eq!(format_compact_duration(2.0 * DAY + 3.0 * HOUR), "2d 3h");
    }

    #[test]
    fn test_pace_status_serde_names() {
        assert_eq!(serde_json::to_string(&PaceStatus::OnTrack).unwrap(), "\"on-track\"");
        assert_eq!(serde_json::to_string(&PaceStatus::Ahead).unwrap(), "\"ahead\"");
    }
}
