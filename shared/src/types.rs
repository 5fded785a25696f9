use serde::{Serialize, Deserialize};

/// An inspected physical asset, identified by the ID encoded in its QR code.
/// This is the canonical data model used by the daemon, the store and seed files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Unique, immutable lookup key
    pub unique_id: String,

    /// Date of manufacture
    #[serde(rename = "DOM", default, skip_serializing_if = "Option::is_none")]
    pub dom: Option<String>,

    /// Date of installation
    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    /// Warranty end. The stored field name keeps its historical spelling.
    #[serde(rename = "warrenty_date", default, skip_serializing_if = "Option::is_none")]
    pub warranty_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_inspection_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_inspection_date: Option<String>,

    /// Free-text status recorded by the last inspection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
}

impl AssetRecord {
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            ..Self::default()
        }
    }

    /// Current value of a mutable field
    pub fn get(&self, field: AssetField) -> Option<&str> {
        let value = match field {
            AssetField::Dom => &self.dom,
            AssetField::Doi => &self.doi,
            AssetField::ExpiryDate => &self.expiry_date,
            AssetField::WarrantyDate => &self.warranty_date,
            AssetField::LastInspectionDate => &self.last_inspection_date,
            AssetField::NextInspectionDate => &self.next_inspection_date,
            AssetField::Health => &self.health,
        };
        value.as_deref()
    }
}

/// The mutable columns of an asset record. `unique_id` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetField {
    Dom,
    Doi,
    ExpiryDate,
    WarrantyDate,
    LastInspectionDate,
    NextInspectionDate,
    Health,
}

impl AssetField {
    /// Date fields in display order
    pub const DATES: [AssetField; 6] = [
        AssetField::Dom,
        AssetField::Doi,
        AssetField::ExpiryDate,
        AssetField::WarrantyDate,
        AssetField::LastInspectionDate,
        AssetField::NextInspectionDate,
    ];

    /// Stored column / document key name
    pub fn column(self) -> &'static str {
        match self {
            AssetField::Dom => "DOM",
            AssetField::Doi => "DOI",
            AssetField::ExpiryDate => "expiry_date",
            AssetField::WarrantyDate => "warrenty_date",
            AssetField::LastInspectionDate => "last_inspection_date",
            AssetField::NextInspectionDate => "next_inspection_date",
            AssetField::Health => "health",
        }
    }
}

/// A partial update: the listed fields are overwritten, everything else is kept.
pub type FieldUpdate = Vec<(AssetField, String)>;
