use crate::scanning::domain::{Blocklist, BlocklistEntry, Severity};
use crate::shared::error::ScanError;
use crate::shared::Result;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::{debug, warn};

const CANONICAL_HEADER: [&str; 5] = ["package_name", "version", "severity", "reason", "cve"];

const WIZ_REASON: &str = "Compromised by the Shai-Hulud supply chain worm";

/// Minimum fields a five-column row needs (the CVE column is optional).
const MIN_FULL_FIELDS: usize = 4;

/// Parses blocklist CSV text.
///
/// The header decides the shape. A two-column header starting with
/// `Package` is the Wiz export, whose version column lists one or more
/// releases as `= 1.0.0 || = 1.0.1`; each listed release becomes its own
/// critical entry. Anything else is read as the five-column form.
///
/// # Arguments
/// * `content` - Raw CSV text
/// * `location` - URL or path the text came from, used in error messages
///
/// # Errors
/// Returns [`ScanError::BlocklistLoad`] when the text has no data rows or is
/// not valid CSV.
pub fn parse_blocklist_csv(content: &str, location: &str) -> Result<Blocklist> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, _>>()
        .map_err(|e| load_error(location, e.to_string()))?;

    if records.len() < 2 {
        return Err(load_error(
            location,
            "blocklist file is empty or missing header".to_string(),
        ));
    }

    let (header, rows) = (&records[0], &records[1..]);
    let entries = if is_wiz_header(header) {
        debug!(location, rows = rows.len(), "reading Wiz blocklist format");
        rows.iter().flat_map(parse_wiz_row).collect()
    } else {
        debug!(location, rows = rows.len(), "reading five-column blocklist format");
        rows.iter()
            .enumerate()
            .filter_map(|(index, row)| parse_full_row(row, index + 2))
            .collect()
    };

    Ok(Blocklist::new(entries))
}

/// Writes a blocklist in the five-column form, header included.
///
/// # Errors
/// Returns an error if the CSV writer fails.
pub fn write_blocklist_csv(blocklist: &Blocklist) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CANONICAL_HEADER)?;
    for entry in blocklist.entries() {
        writer.write_record([
            entry.package_name(),
            entry.version(),
            entry.severity().as_str(),
            entry.reason(),
            entry.cve().unwrap_or(""),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush blocklist CSV: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

fn is_wiz_header(header: &StringRecord) -> bool {
    header.len() == 2
        && header
            .get(0)
            .is_some_and(|h| h.eq_ignore_ascii_case("package"))
}

fn parse_wiz_row(row: &StringRecord) -> Vec<BlocklistEntry> {
    let (Some(name), Some(versions)) = (row.get(0), row.get(1)) else {
        return Vec::new();
    };
    if name.is_empty() {
        return Vec::new();
    }
    wiz_versions(versions)
        .map(|version| BlocklistEntry::new(name, version, Severity::Critical, WIZ_REASON, None))
        .collect()
}

/// Splits `= 1.0.0 || = 1.0.1` into `1.0.0`, `1.0.1`.
fn wiz_versions(spec: &str) -> impl Iterator<Item = &str> {
    spec.split("||")
        .map(|part| part.trim().trim_start_matches('=').trim())
        .filter(|version| !version.is_empty())
}

fn parse_full_row(row: &StringRecord, line: usize) -> Option<BlocklistEntry> {
    if row.len() < MIN_FULL_FIELDS {
        debug!(line, fields = row.len(), "skipping short blocklist row");
        return None;
    }
    let name = row.get(0).unwrap_or_default();
    let version = row.get(1).unwrap_or_default();
    if name.is_empty() || version.is_empty() {
        debug!(line, "skipping blocklist row without name or version");
        return None;
    }

    let raw_severity = row.get(2).unwrap_or_default();
    let severity = raw_severity.parse::<Severity>().unwrap_or_else(|_| {
        warn!(line, severity = raw_severity, package = name, "unknown severity, using medium");
        Severity::Medium
    });
    let cve = row.get(4).map(str::to_string);

    Some(BlocklistEntry::new(
        name,
        version,
        severity,
        row.get(3).unwrap_or_default(),
        cve,
    ))
}

fn load_error(location: &str, details: String) -> anyhow::Error {
    ScanError::BlocklistLoad {
        location: location.to_string(),
        details,
    }
    .into()
}
