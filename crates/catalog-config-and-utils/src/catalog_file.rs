//! JSON catalog files.
//!
//! A catalog file is an object keyed by record id:
//!
//! ```json
//! { "🐢": { "symbol": "🐢", "name": "Turtle", "description": "A cute turtle.", "usage": "Something slow" } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use catalog_engine::Record;

use crate::{CoreError, CoreResult};

/// Reads a catalog file.
pub fn load_catalog(path: &Path) -> CoreResult<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    let records = catalog_from_json(&content)?;
    tracing::info!(path = %path.display(), records = records.len(), "catalog file loaded");
    Ok(records)
}

/// Parses a catalog document. Records come back ordered by id.
pub fn catalog_from_json(json: &str) -> CoreResult<Vec<Record>> {
    let entries: BTreeMap<String, Record> = serde_json::from_str(json)?;
    entries
        .into_iter()
        .map(|(key, record)| {
            if key == record.symbol {
                Ok(record)
            } else {
                Err(CoreError::Config(format!(
                    "catalog entry `{key}` holds a record with symbol `{}`",
                    record.symbol
                )))
            }
        })
        .collect()
}

/// Serializes records as a catalog document.
pub fn catalog_to_json(records: &[Record]) -> CoreResult<String> {
    let entries: BTreeMap<&str, &Record> = records
        .iter()
        .map(|record| (record.symbol.as_str(), record))
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
