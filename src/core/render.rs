//! Rendering of the edition into the front-end data file.
//!
//! The artifact is a JavaScript file assigning the edition to the
//! `recommendations` constant, preceded by the shown-ids manifest the
//! freshness tracker reads back on the next run.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::freshness::manifest_line;
use crate::domain::{Category, Edition, EditionEntry};

/// Name of the constant the front end reads
pub const CONSTANT_NAME: &str = "recommendations";

const ENTRY_INDENT: &str = "        ";
const FIELD_INDENT: &str = "            ";

/// Escape a string as a double-quoted JavaScript literal
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut prev = '\0';
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            // keep "</script>" from closing an inline script block
            '/' if prev == '<' => out.push_str("\\/"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
        prev = c;
    }
    out.push('"');
    out
}

/// Object key, bare when it is a plain identifier
fn js_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        .unwrap_or(false)
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_ident {
        key.to_string()
    } else {
        js_string(key)
    }
}

fn js_value(value: &Value) -> String {
    match value {
        Value::String(s) => js_string(s),
        other => other.to_string(),
    }
}

/// Fields of an entry in emission order; tags and default context stay internal
fn entry_fields(entry: &EditionEntry) -> Vec<(String, String)> {
    let item = &entry.item;
    let mut fields = vec![
        ("id".to_string(), js_string(&item.id)),
        ("title".to_string(), js_string(&item.title)),
        ("subtitle".to_string(), js_string(&item.subtitle)),
        ("image".to_string(), js_string(&item.image)),
        ("technicianReview".to_string(), js_string(&item.technician_review)),
        ("soulNote".to_string(), js_string(&item.soul_note)),
        ("significance".to_string(), js_string(&item.significance)),
        ("artistFact".to_string(), js_string(&item.artist_fact)),
    ];

    let mut extra: Vec<_> = item.extra.iter().collect();
    extra.sort_by(|a, b| a.0.cmp(b.0));
    fields.extend(extra.into_iter().map(|(k, v)| (js_key(k), js_value(v))));

    fields.push(("layout".to_string(), js_string(entry.layout.as_str())));
    fields.push(("dailyContext".to_string(), js_string(&entry.daily_context)));
    fields
}

/// Render the edition as the front-end data file
pub fn render(edition: &Edition) -> String {
    let mut out = String::new();

    let ids = edition.ids();
    out.push_str(&manifest_line(ids.iter().map(String::as_str)));
    out.push('\n');

    let _ = writeln!(out, "const {} = {{", CONSTANT_NAME);
    for category in Category::ALL {
        let _ = writeln!(out, "    {}: [", category);
        for entry in edition.entries(category) {
            let _ = writeln!(out, "{}{{", ENTRY_INDENT);
            for (key, value) in entry_fields(entry) {
                let _ = writeln!(out, "{}{}: {},", FIELD_INDENT, key, value);
            }
            let _ = writeln!(out, "{}}},", ENTRY_INDENT);
        }
        out.push_str("    ],\n");
    }
    out.push_str("};\n");

    out
}

/// Give the temporary file the permissions of the file it replaces
///
/// Temporary files are created owner-only; a new artifact gets the usual
/// world-readable mode so the site can serve it.
fn publish_permissions(tmp: &std::fs::File, path: &Path) -> Result<()> {
    let permissions = match std::fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => default_permissions(tmp)?,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to inspect artifact: {}", path.display()))
        }
    };
    tmp.set_permissions(permissions)
        .with_context(|| format!("Failed to set permissions for {}", path.display()))
}

#[cfg(unix)]
fn default_permissions(_tmp: &std::fs::File) -> Result<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(tmp: &std::fs::File) -> Result<std::fs::Permissions> {
    Ok(tmp.metadata().context("Failed to inspect temporary file")?.permissions())
}

/// Replace the artifact at `path` with `content` atomically
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over the destination, so readers never observe a partial file.
pub async fn write_artifact(path: &Path, content: String) -> Result<PathBuf> {
    let path = path.to_path_buf();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())
            .context("Failed to write artifact contents")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to flush artifact contents")?;
        publish_permissions(tmp.as_file(), &path)?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to replace artifact: {}", path.display()))?;
        Ok(path)
    })
    .await
    .context("Artifact writer task panicked")?
}
