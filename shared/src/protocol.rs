use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Days between inspections, applied by install and inspect
pub const INSPECTION_INTERVAL_DAYS: i64 = 182;

/// Displayed for absent fields
pub const NOT_AVAILABLE: &str = "N/A";

/// Route paths
pub const HOME_PATH: &str = "/";
pub const SCAN_PATH: &str = "/scan_qr";
pub const VIEW_PREFIX: &str = "/view";
pub const INSTALL_PREFIX: &str = "/install";
pub const INSPECT_PREFIX: &str = "/inspect";
pub const HEALTH_PATH: &str = "/health";

/// Lookup form field names
pub const FORM_UNIQUE_ID: &str = "unique_id";
pub const FORM_QR_FILE: &str = "qr_file";

/// User-visible notices
pub const MSG_NO_RECORD: &str = "No record found.";
pub const MSG_NO_RECORD_FOR_QR: &str = "No record found for this QR.";
pub const MSG_NO_QR: &str = "No QR detected.";
pub const MSG_RECORD_NOT_FOUND: &str = "Record not found.";
pub const MSG_INSTALLED: &str = "Installation marked complete. Next inspection scheduled.";
pub const MSG_INSPECTED: &str = "Inspection updated successfully.";

pub fn view_path(unique_id: &str) -> String {
    format!("{}/{}", VIEW_PREFIX, encode_segment(unique_id))
}

pub fn install_path(unique_id: &str) -> String {
    format!("{}/{}", INSTALL_PREFIX, encode_segment(unique_id))
}

pub fn inspect_path(unique_id: &str) -> String {
    format!("{}/{}", INSPECT_PREFIX, encode_segment(unique_id))
}

/// Characters escaped in an ID used as a single path segment. IDs come
/// straight out of QR payloads, so separators and query/fragment markers must not
/// survive into the URL.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
