//! Recovery of the ids shown by the previous edition.
//!
//! The rendered artifact is the only state carried between runs. Its first
//! line is a versioned manifest listing every id it contains:
//!
//! ```text
//! // anima:shown v1 ["m1","m7","a3"]
//! ```
//!
//! Artifacts written before the manifest existed are still understood by
//! scanning their `id: "<value>"` markers.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tokio::fs;

/// Prefix of the manifest line, followed by a JSON array of ids
pub const MANIFEST_PREFIX: &str = "// anima:shown v1 ";

fn id_marker() -> &'static Regex {
    static ID_MARKER: OnceLock<Regex> = OnceLock::new();
    ID_MARKER.get_or_init(|| Regex::new(r#"id:\s*"([^"]+)""#).expect("valid id marker pattern"))
}

/// Build the manifest line for a set of ids
pub fn manifest_line<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    let ids: Vec<&str> = ids.into_iter().collect();
    // Serializing a list of strings cannot fail
    let json = serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string());
    format!("{}{}", MANIFEST_PREFIX, json)
}

/// Ids listed by the manifest line, `None` when there is no usable manifest
fn manifest_ids(text: &str) -> Option<HashSet<String>> {
    let line = text
        .lines()
        .find_map(|line| line.trim_start().strip_prefix(MANIFEST_PREFIX))?;

    match serde_json::from_str::<Vec<String>>(line.trim()) {
        Ok(ids) => Some(ids.into_iter().collect()),
        Err(e) => {
            tracing::warn!("Ignoring malformed shown-ids manifest: {}", e);
            None
        }
    }
}

/// Ids found by scanning `id: "<value>"` markers
fn marker_ids(text: &str) -> HashSet<String> {
    id_marker()
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Ids shown by a previously rendered artifact
pub fn excluded_ids(previous_artifact: &str) -> HashSet<String> {
    manifest_ids(previous_artifact).unwrap_or_else(|| marker_ids(previous_artifact))
}

/// Ids shown by the artifact at `path`
///
/// A missing or unreadable artifact means nothing is excluded.
pub async fn excluded_ids_from_path(path: &Path) -> HashSet<String> {
    match fs::read_to_string(path).await {
        Ok(text) => excluded_ids(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No previous artifact at {}", path.display());
            HashSet::new()
        }
        Err(e) => {
            tracing::warn!(
                "Could not read previous artifact {}: {}; excluding nothing",
                path.display(),
                e
            );
            HashSet::new()
        }
    }
}
