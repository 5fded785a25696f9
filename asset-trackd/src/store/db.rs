use std::path::Path;
use anyhow::{Context, Result};
use rusqlite::{Connection, params, params_from_iter, OptionalExtension};
use shared::types::{AssetField, AssetRecord, FieldUpdate};

const SELECT_COLUMNS: &str =
    "SELECT unique_id, DOM, DOI, expiry_date, warrenty_date,
            last_inspection_date, next_inspection_date, health
     FROM assets";

pub struct AssetDb {
    conn: Connection,
}

impl AssetDb {
    /// Open or create the SQLite database with WAL mode enabled
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to enable WAL mode")?;

        // Every field but the key is optional; absence is NULL
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                unique_id            TEXT PRIMARY KEY,
                DOM                  TEXT,
                DOI                  TEXT,
                expiry_date          TEXT,
                warrenty_date        TEXT,
                last_inspection_date TEXT,
                next_inspection_date TEXT,
                health               TEXT
            );
            "#,
        )
        .context("Failed to create database schema")?;

        Ok(Self { conn })
    }

    /// Point lookup by unique ID
    pub fn find_by_id(&self, unique_id: &str) -> Result<Option<AssetRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE unique_id = ?1"),
                params![unique_id],
                Self::row_to_record,
            )
            .optional()
            .context("Failed to query asset")?;

        Ok(record)
    }

    /// Overwrite the listed fields of one record. Returns the number of rows
    /// touched; an unknown ID is not an error and simply touches nothing.
    pub fn update_fields(&self, unique_id: &str, update: &FieldUpdate) -> Result<usize> {
        if update.is_empty() {
            return Ok(0);
        }

        let assignments = update
            .iter()
            .enumerate()
            .map(|(i, (field, _))| format!("{} = ?{}", field.column(), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE assets SET {} WHERE unique_id = ?{}",
            assignments,
            update.len() + 1
        );

        let values = update
            .iter()
            .map(|(_, value)| value.as_str())
            .chain(std::iter::once(unique_id));

        let count = self
            .conn
            .execute(&sql, params_from_iter(values))
            .context("Failed to update asset")?;

        Ok(count)
    }

    /// Create a record if its ID is not taken yet. Returns true if a row was added.
    pub fn insert_record(&self, record: &AssetRecord) -> Result<bool> {
        let count = self
            .conn
            .execute(
                r#"
                INSERT OR IGNORE INTO assets (
                    unique_id, DOM, DOI, expiry_date, warrenty_date,
                    last_inspection_date, next_inspection_date, health
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    &record.unique_id,
                    record.get(AssetField::Dom),
                    record.get(AssetField::Doi),
                    record.get(AssetField::ExpiryDate),
                    record.get(AssetField::WarrantyDate),
                    record.get(AssetField::LastInspectionDate),
                    record.get(AssetField::NextInspectionDate),
                    record.get(AssetField::Health),
                ],
            )
            .context("Failed to insert asset")?;

        Ok(count > 0)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM assets", [], |row| row.get(0))
            .context("Failed to count assets")?;
        Ok(count as u64)
    }

    fn row_to_record(row: &rusqlite::Row) -> Result<AssetRecord, rusqlite::Error> {
        Ok(AssetRecord {
            unique_id: row.get(0)?,
            dom: row.get(1)?,
            doi: row.get(2)?,
            expiry_date: row.get(3)?,
            warranty_date: row.get(4)?,
            last_inspection_date: row.get(5)?,
            next_inspection_date: row.get(6)?,
            health: row.get(7)?,
        })
    }
}
