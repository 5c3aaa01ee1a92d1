// Raw dataset loading: a JSON array of rows or newline-delimited JSON
use anyhow::{Context, Result};
use homematch_core::{Error, RawListing};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load raw listing rows from a file.
///
/// A file whose first non-whitespace character is `[` is read as a JSON
/// array; anything else is read as one JSON object per line. Unparseable
/// NDJSON lines are skipped with a warning.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<RawListing>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(Error::from)
        .with_context(|| format!("Failed to read dataset {:?}", path))?;

    let rows = parse_dataset(&text).with_context(|| format!("Failed to parse dataset {:?}", path))?;
    info!("Loaded {} raw rows from {:?}", rows.len(), path);
    Ok(rows)
}

pub fn parse_dataset(text: &str) -> Result<Vec<RawListing>> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text).map_err(Error::from)?);
    }

    let mut rows = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawListing>(line) {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Skipping dataset line {}: {}", lineno + 1, e),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array() {
        let rows = parse_dataset(
            r#"[
                {"price": 300000, "bed": 3, "bath": 2, "house_size": 1500, "city": "Austin", "state": "Texas"},
                {"price": null, "city": "Dallas"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bed, Some(3.0));
        assert_eq!(rows[1].price, None);
        assert_eq!(rows[1].state, None);
    }

    #[test]
    fn test_ndjson_skips_bad_lines() {
        let text = "{\"price\": 1, \"city\": \"A\"}\n\nnot json\n{\"price\": 2}\n";
        let rows = parse_dataset(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].price, Some(2.0));
    }

    #[test]
    fn test_malformed_array_is_error() {
        let err = parse_dataset("[{\"price\": 1},").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset"));
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Io(_))));
    }
}
