//! Probe snapshot loading.
//!
//! The CLI has no probe service behind it; it replays a JSON snapshot
//! file of probe outputs through the live store instead, so the
//! aggregation the commands exercise matches what the app would do.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use burnbar_core::{MetricLine, ProbeOutput};
use burnbar_store::ProbeStore;

/// Loads a snapshot file and applies every event in file order.
///
/// The file holds either a JSON array of probe outputs or a single
/// output object.
pub async fn load_into_store(path: &Path) -> Result<ProbeStore> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading snapshot {}", path.display()))?;

    let outputs: Vec<ProbeOutput> = match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(_) => {
            let single: ProbeOutput = serde_json::from_str(&raw)
                .with_context(|| format!("parsing snapshot {}", path.display()))?;
            vec![single]
        }
    };

    let store = ProbeStore::new();
    for output in outputs {
        store.apply(output).await?;
    }
    Ok(store)
}

/// Loads a snapshot straight into a lines-by-provider map.
pub async fn load_lines(path: &Path) -> Result<HashMap<String, Vec<MetricLine>>> {
    let store = load_into_store(path).await?;
    Ok(store.lines_by_id().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn snapshot_json() -> &'static str {
        r#"[
            {
                "providerId": "codex",
                "displayName": "OpenAI Codex",
                "lines": [
                    {"type": "progress", "label": "Session", "used": 45.0,
                     "limit": 100.0, "format": {"kind": "percent"}}
                ],
                "iconUrl": "icons/codex.png"
            }
        ]"#
    }

    #[tokio::test]
    async fn test_load_array_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(snapshot_json().as_bytes()).unwrap();

        let lines = load_lines(file.path()).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines["codex"].len(), 1);
    }

    #[tokio::test]
    async fn test_load_single_object_snapshot() {
        let single = snapshot_json()
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']');
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(single.as_bytes()).unwrap();

        let lines = load_lines(file.path()).await.unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_snapshot_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        assert!(load_lines(file.path()).await.is_err());
    }
}
