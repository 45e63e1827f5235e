//! Account-scoped label codec.
//!
//! The metric-line data model has no explicit account dimension, so a
//! provider with multiple accounts embeds the account in the label
//! string: `account label :: account id · metric label`. This module
//! is the only place that format is known; everything downstream
//! works on the decoded [`ScopedLabel`].
//!
//! Decoding is best-effort and total. A label that does not match the
//! pattern is returned unchanged as an unscoped metric label; an
//! unscoped label that happens to contain both delimiters is decoded
//! as scoped. That ambiguity is accepted, not an error.

/// Separates the account part from the metric part.
pub const OUTER_DELIMITER: &str = " · ";
/// Separates the account display name from the account id.
pub const INNER_DELIMITER: &str = "::";

/// Decoded view of a metric-line label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedLabel {
    /// Account display name, if the label was scoped.
    pub account_label: Option<String>,
    /// Account id, if the label carried one.
    pub account_id: Option<String>,
    /// The underlying metric label.
    pub metric_label: String,
}

impl ScopedLabel {
    fn unscoped(label: &str) -> Self {
        Self {
            account_label: None,
            account_id: None,
            metric_label: label.to_string(),
        }
    }
}

/// Decodes a label into its account and metric parts.
///
/// Splits on the last occurrence of each delimiter so metric labels
/// may themselves contain arbitrary text. Never fails: anything that
/// does not parse cleanly comes back unscoped.
pub fn decode(label: &str) -> ScopedLabel {
    let Some(outer) = label.rfind(OUTER_DELIMITER) else {
        return ScopedLabel::unscoped(label);
    };

    let account_part = &label[..outer];
    let metric_part = &label[outer + OUTER_DELIMITER.len()..];
    if account_part.is_empty() || metric_part.is_empty() {
        return ScopedLabel::unscoped(label);
    }

    match account_part.rfind(INNER_DELIMITER) {
        Some(inner) => {
            let name = &account_part[..inner];
            let id = &account_part[inner + INNER_DELIMITER.len()..];
            if name.is_empty() || id.is_empty() {
                return ScopedLabel::unscoped(label);
            }
            ScopedLabel {
                account_label: Some(name.to_string()),
                account_id: Some(id.to_string()),
                metric_label: metric_part.to_string(),
            }
        }
        None => ScopedLabel {
            account_label: Some(account_part.to_string()),
            account_id: None,
            metric_label: metric_part.to_string(),
        },
    }
}

/// Encodes an account-scoped label.
///
/// Always produces both delimiters, in the fixed order the decoder
/// expects.
pub fn encode(account_label: &str, account_id: &str, metric_label: &str) -> String {
    format!("{account_label}{INNER_DELIMITER}{account_id}{OUTER_DELIMITER}{metric_label}")
}

/// Returns the metric label with any account scoping stripped.
pub fn base_metric_label(label: &str) -> String {
    decode(label).metric_label
}

// ============================================================================
// Tests
// ============================================================================
