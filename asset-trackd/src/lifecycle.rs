//! Field updates applied by the install and inspect operations.

use chrono::{DateTime, Utc};
use shared::dates::{next_inspection, to_iso};
use shared::types::{AssetField, FieldUpdate};

/// Mark installed now and schedule the first inspection.
/// Unconditional: calling it again simply moves both dates forward.
pub fn install_update(now: DateTime<Utc>) -> FieldUpdate {
    vec![
        (AssetField::Doi, to_iso(now)),
        (AssetField::NextInspectionDate, to_iso(next_inspection(now))),
    ]
}

/// Record an inspection result and schedule the next one. `health` is free text.
pub fn inspect_update(health: &str, now: DateTime<Utc>) -> FieldUpdate {
    vec![
        (AssetField::Health, health.to_string()),
        (AssetField::LastInspectionDate, to_iso(now)),
        (AssetField::NextInspectionDate, to_iso(next_inspection(now))),
    ]
}
