use chrono::{DateTime, Utc};
use shared::dates::{format_date, is_past, parse_optional, DateError};
use shared::protocol::NOT_AVAILABLE;
use shared::types::{AssetField, AssetRecord};

/// Display form of a record: dates as `YYYY-MM-DD` or `N/A`, plus the derived flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub unique_id: String,
    pub dates: Vec<(AssetField, String)>,
    pub health: String,
    pub expired: bool,
    pub warranty_over: bool,
}

impl RecordView {
    pub fn new(record: &AssetRecord, now: DateTime<Utc>) -> Result<Self, DateError> {
        let dates = AssetField::DATES
            .into_iter()
            .map(|field| -> Result<_, DateError> {
                Ok((field, format_date(parse_optional(record.get(field))?)))
            })
            .collect::<Result<Vec<_>, DateError>>()?;

        let expiry = parse_optional(record.get(AssetField::ExpiryDate))?;
        let warranty = parse_optional(record.get(AssetField::WarrantyDate))?;

        let health = record
            .health
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_string();

        Ok(Self {
            unique_id: record.unique_id.clone(),
            dates,
            health,
            expired: is_past(expiry, now),
            warranty_over: is_past(warranty, now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn shown(view: &RecordView, field: AssetField) -> &str {
        view.dates
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_absent_fields_are_na() {
        let view = RecordView::new(&AssetRecord::new("ABC123"), now()).unwrap();

        assert_eq!(view.dates.len(), AssetField::DATES.len());
        assert!(view.dates.iter().all(|(_, v)| v == "N/A"));
        assert_eq!(view.health, "N/A");
        assert!(!view.expired, "Absent expiry is never expired");
        assert!(!view.warranty_over);
    }

    #[test]
    fn test_empty_string_is_na() {
        let mut record = AssetRecord::new("ABC123");
        record.doi = Some(String::new());
        record.health = Some(String::new());

        let view = RecordView::new(&record, now()).unwrap();
        assert_eq!(shown(&view, AssetField::Doi), "N/A");
        assert_eq!(view.health, "N/A");
    }

    #[test]
    fn test_dates_formatted() {
        let mut record = AssetRecord::new("ABC123");
        record.dom = Some("2023-01-10T08:15:00".to_string());
        record.next_inspection_date = Some("2024-11-30T23:00:00-05:00".to_string());
        record.health = Some("Good".to_string());

        let view = RecordView::new(&record, now()).unwrap();
        assert_eq!(shown(&view, AssetField::Dom), "2023-01-10");
        // Shown in the stored offset, not shifted to UTC
        assert_eq!(shown(&view, AssetField::NextInspectionDate), "2024-11-30");
        assert_eq!(view.health, "Good");
    }

    #[test]
    fn test_flags() {
        let mut record = AssetRecord::new("ABC123");
        record.expiry_date = Some("2024-06-01T11:59:59Z".to_string());
        record.warranty_date = Some("2024-06-01T12:00:00Z".to_string());

        let view = RecordView::new(&record, now()).unwrap();
        assert!(view.expired);
        assert!(!view.warranty_over, "Same instant is not over");

        record.expiry_date = Some("2030-01-01".to_string());
        record.warranty_date = Some("2020-01-01".to_string());
        let view = RecordView::new(&record, now()).unwrap();
        assert!(!view.expired);
        assert!(view.warranty_over);
    }

    #[test]
    fn test_flags_compare_instants_across_offsets() {
        let mut record = AssetRecord::new("ABC123");
        // 11:00 UTC, before now
        record.expiry_date = Some("2024-06-01T20:00:00+09:00".to_string());
        // 13:00 UTC, after now, though displayed a day earlier than the expiry
        record.warranty_date = Some("2024-05-31T23:00:00-14:00".to_string());

        let view = RecordView::new(&record, now()).unwrap();
        assert!(view.expired);
        assert!(!view.warranty_over);
        assert_eq!(shown(&view, AssetField::WarrantyDate), "2024-05-31");
    }

    #[test]
    fn test_malformed_date_is_error() {
        let mut record = AssetRecord::new("ABC123");
        record.expiry_date = Some("soon".to_string());
        assert!(RecordView::new(&record, now()).is_err());
    }
}
