//! File helpers for JSON inputs, reports and downloaded archives.
//!
//! - `read_json_file`: parse a JSON document from disk.
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - `write_bytes_file`: write raw bytes (e.g. a transform archive).
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn read_json_file(path: &Path) -> Result<Value> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_bytes_file(path, json.as_bytes())
}

pub fn write_bytes_file(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_round_trip_through_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");
        write_json_file(&path, &json!({ "pairs": 3 })).unwrap();
        let back = read_json_file(&path).unwrap();
        assert_eq!(back["pairs"], 3);
    }
}
