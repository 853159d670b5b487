//! Golden-file JSON snapshots.
//!
//! Values are serialized as pretty JSON with object keys sorted so the file
//! does not depend on field order. Set `WILDLANDS_UPDATE_SNAPSHOTS=1` to
//! rewrite goldens instead of comparing.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that switches snapshots to update mode.
pub const UPDATE_SNAPSHOTS_ENV: &str = "WILDLANDS_UPDATE_SNAPSHOTS";

/// Compare `value` with the golden file at `path`, or rewrite it in update mode.
///
/// A mismatch reports the first differing line.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = to_snapshot_json(value)?;

    if update_mode() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        return fs::write(path, &actual).with_context(|| format!("Failed to write snapshot {}", path.display()));
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (set {}=1 to create it)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        )
    })?;

    match first_difference(&expected, &actual) {
        None => Ok(()),
        Some((line, want, got)) => anyhow::bail!(
            "Snapshot {} differs at line {}: expected `{}`, got `{}`",
            path.display(),
            line,
            want,
            got
        ),
    }
}

/// Snapshot text for a value: sorted keys, two-space indent, trailing newline.
pub fn to_snapshot_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let mut text = serde_json::to_string_pretty(&sort_keys(value))?;
    text.push('\n');
    Ok(text)
}

fn update_mode() -> bool {
    std::env::var(UPDATE_SNAPSHOTS_ENV)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn first_difference<'a>(expected: &'a str, actual: &'a str) -> Option<(usize, &'a str, &'a str)> {
    let mut want = expected.lines();
    let mut got = actual.lines();
    let mut line = 1;
    loop {
        match (want.next(), got.next()) {
            (None, None) => return None,
            (a, b) if a == b => line += 1,
            (a, b) => return Some((line, a.unwrap_or("<eof>"), b.unwrap_or("<eof>"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_recursively() {
        let text = to_snapshot_json(&json!({"b": 1, "a": {"d": true, "c": [ {"z": 0, "y": 1} ]}})).unwrap();
        let a = text.find("\"a\"").unwrap();
        let b = text.find("\"b\"").unwrap();
        let y = text.find("\"y\"").unwrap();
        let z = text.find("\"z\"").unwrap();
        assert!(a < b);
        assert!(y < z);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn difference_reports_line() {
        assert_eq!(first_difference("a\nb\n", "a\nb\n"), None);
        assert_eq!(first_difference("a\nb\n", "a\nc\n"), Some((2, "b", "c")));
        assert_eq!(first_difference("a\n", "a\nb\n"), Some((2, "<eof>", "b")));
    }
}
