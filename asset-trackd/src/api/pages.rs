//! Server-rendered pages. Templates are embedded at build time and filled by a
//! single-pass `{{name}}` substitution; text values are HTML-escaped.

use shared::protocol::{inspect_path, install_path, view_path, NOT_AVAILABLE};
use shared::types::{AssetField, AssetRecord};
use super::flash::Notice;
use super::record_view::RecordView;

const LAYOUT: &str = include_str!("../web/layout.html");
const NOTICE: &str = include_str!("../web/notice.html");
const HOME: &str = include_str!("../web/home.html");
const VIEW: &str = include_str!("../web/view.html");
const ROW: &str = include_str!("../web/row.html");
const INSPECT: &str = include_str!("../web/inspect.html");
const ERROR: &str = include_str!("../web/error.html");

struct Template {
    source: &'static str,
    values: Vec<(&'static str, String)>,
}

impl Template {
    fn new(source: &'static str) -> Self {
        Self { source, values: Vec::new() }
    }

    fn text(mut self, key: &'static str, value: impl AsRef<str>) -> Self {
        self.values.push((key, escape(value.as_ref())));
        self
    }

    fn html(mut self, key: &'static str, value: String) -> Self {
        self.values.push((key, value));
        self
    }

    /// Unknown placeholders render as nothing
    fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };

            let key = after[..end].trim();
            if let Some((_, value)) = self.values.iter().find(|(k, _)| *k == key) {
                out.push_str(value);
            }
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        out
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, notices: &[Notice], body: String) -> String {
    let notices = notices
        .iter()
        .map(|n| {
            Template::new(NOTICE)
                .text("category", n.category().as_str())
                .text("message", n.message())
                .render()
        })
        .collect::<String>();

    Template::new(LAYOUT)
        .text("title", title)
        .html("notice", notices)
        .html("body", body)
        .render()
}

fn label(field: AssetField) -> &'static str {
    match field {
        AssetField::Dom => "Date of Manufacture",
        AssetField::Doi => "Date of Installation",
        AssetField::ExpiryDate => "Expiry Date",
        AssetField::WarrantyDate => "Warranty Date",
        AssetField::LastInspectionDate => "Last Inspection",
        AssetField::NextInspectionDate => "Next Inspection",
        AssetField::Health => "Health",
    }
}

pub fn home(notices: &[Notice]) -> String {
    layout("Find an asset", notices, HOME.to_string())
}

pub fn view(notices: &[Notice], record: &RecordView) -> String {
    let rows = record
        .dates
        .iter()
        .map(|(field, value)| {
            Template::new(ROW)
                .text("label", label(*field))
                .text("value", value)
                .render()
        })
        .collect::<String>();

    let (expired_class, expired_label) = if record.expired {
        ("badge-bad", "Expired")
    } else {
        ("badge-ok", "In date")
    };
    let (warranty_class, warranty_label) = if record.warranty_over {
        ("badge-bad", "Warranty over")
    } else {
        ("badge-ok", "Under warranty")
    };

    let body = Template::new(VIEW)
        .text("unique_id", &record.unique_id)
        .text("expired_class", expired_class)
        .text("expired_label", expired_label)
        .text("warranty_class", warranty_class)
        .text("warranty_label", warranty_label)
        .html("rows", rows)
        .text("health", &record.health)
        .text("install_action", install_path(&record.unique_id))
        .text("inspect_link", inspect_path(&record.unique_id))
        .render();

    layout(&format!("Asset {}", record.unique_id), notices, body)
}

pub fn inspect(notices: &[Notice], record: &AssetRecord) -> String {
    let current = record.health.as_deref().unwrap_or_default();
    let shown = if current.trim().is_empty() { NOT_AVAILABLE } else { current };

    let body = Template::new(INSPECT)
        .text("unique_id", &record.unique_id)
        .text("health", shown)
        .text("current", current)
        .text("inspect_action", inspect_path(&record.unique_id))
        .text("view_link", view_path(&record.unique_id))
        .render();

    layout(&format!("Inspect {}", record.unique_id), notices, body)
}

pub fn error(message: &str) -> String {
    let body = Template::new(ERROR).text("message", message).render();
    layout("Error", &[], body)
}
