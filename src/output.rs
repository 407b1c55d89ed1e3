//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};

use tenantguard_entity::Record;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Generic display row for untyped records
#[derive(Debug, Serialize, Tabled)]
pub struct RecordRow {
    /// Record ID
    id: String,
    /// Organization
    org: String,
    /// Most descriptive field
    summary: String,
    /// Created at
    created: String,
}

impl RecordRow {
    const SUMMARY_FIELDS: [&'static str; 6] = ["name", "title", "email", "fullName", "action", "target"];

    /// Build a row from a stored record.
    pub fn from_record(record: &Record) -> Self {
        let text = |field: &str| {
            record
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let summary = Self::SUMMARY_FIELDS
            .iter()
            .map(|f| text(f))
            .find(|s| !s.is_empty())
            .unwrap_or_default();

        Self {
            id: text("id"),
            org: text("orgId"),
            summary,
            created: text("created_date"),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print records; tables use [`RecordRow`], JSON prints them whole
pub fn print_records(records: &[Record], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let rows: Vec<RecordRow> = records.iter().map(RecordRow::from_record).collect();
            print_list(&rows, format);
        }
        OutputFormat::Json => print_item(&records, format),
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{item:#?}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
