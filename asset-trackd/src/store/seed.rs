use std::path::Path;
use anyhow::{Context, Result};
use shared::types::AssetRecord;
use super::db::AssetDb;

/// Read a JSON array of asset records
pub fn load(path: impl AsRef<Path>) -> Result<Vec<AssetRecord>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;

    parse(&contents).with_context(|| format!("Failed to parse seed file: {}", path.display()))
}

pub fn parse(contents: &str) -> Result<Vec<AssetRecord>> {
    let records: Vec<AssetRecord> = serde_json::from_str(contents)?;
    Ok(records)
}

/// Insert records whose ID is not present yet. Existing records are left alone.
/// Returns how many were added.
pub fn import(db: &AssetDb, records: &[AssetRecord]) -> Result<usize> {
    let mut added = 0;
    for record in records {
        if record.unique_id.trim().is_empty() {
            tracing::warn!("Skipping seed record with empty unique_id");
            continue;
        }
        if db.insert_record(record)? {
            added += 1;
        }
    }
    Ok(added)
}
