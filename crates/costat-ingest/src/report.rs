//! Report parsing: one published CSV report into per-region statistics.
//!
//! The published reports are loosely structured: one row per
//! (statistic, county) pair, with human-readable labels that drift over
//! time. Parsing filters to county-level rows, normalizes the labels onto
//! the fixed statistic schema, and normalizes county names to canonical
//! region keys. Row-level anomalies are logged and skipped; only an empty
//! or structurally unparsable file fails the whole report.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use costat_model::{Classification, RegionStats, StatValue, classify};

use crate::error::{IngestError, Result};

/// Only rows describing county-level breakdowns are relevant.
const COUNTY_ROW_SUFFIX: &str = "by County";
/// Rows carrying free-text notes in the attribute column.
const NOTE_ATTRIBUTE: &str = "Note";

/// Filler words stripped from a description to recover the statistic label.
static LABEL_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("in Colorado|by County|Colorado|Total|Per [0-9,]+ People")
        .expect("invalid label noise regex")
});

/// One raw CSV row. Transient; only used during parsing.
#[derive(Debug, Deserialize)]
struct RawReportRow {
    description: String,
    attribute: String,
    #[serde(default)]
    metric: String,
    #[serde(default)]
    value: String,
}

/// Parse one report file into region statistics.
///
/// Returns [`IngestError::EmptyReport`] when the file has no content or
/// lacks the required columns; the caller logs and skips such files.
pub fn parse_report(path: &Path) -> Result<RegionStats> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(_) => {
            return Err(IngestError::EmptyReport {
                path: path.to_path_buf(),
            });
        }
    };
    for required in ["description", "attribute", "metric", "value"] {
        if !headers.iter().any(|h| h == required) {
            return Err(IngestError::EmptyReport {
                path: path.to_path_buf(),
            });
        }
    }

    let mut stats = RegionStats::new();
    for (row_idx, row_result) in reader.deserialize::<RawReportRow>().enumerate() {
        let row = match row_result {
            Ok(row) => row,
            Err(error) => {
                warn!(report = %path.display(), row = row_idx, %error, "skipping malformed row");
                continue;
            }
        };

        // Keep only county breakdown rows; state totals and notes are not
        // per-region data.
        if !row.description.ends_with(COUNTY_ROW_SUFFIX) || row.attribute == NOTE_ATTRIBUTE {
            continue;
        }

        let label = LABEL_NOISE.replace_all(&row.description, "");
        let label = label.trim();

        let code = match classify(label, &row.metric) {
            Classification::Code(code) => code,
            Classification::UnknownLabel(label) => {
                warn!(report = %path.display(), %label, "new statistic detected, skipping row");
                continue;
            }
            Classification::UnknownTestType(metric) => {
                warn!(report = %path.display(), %metric, "new test type detected, skipping row");
                continue;
            }
        };

        let region = normalize_region(&row.attribute);
        let value = StatValue::from_parsed(row.value.trim().parse::<f64>().ok());
        stats.insert(&region, code, value);
    }

    debug!(report = %path.display(), regions = stats.region_count(), "parsed report");
    Ok(stats)
}

/// Canonical region name: the attribute with one " County" suffix removed.
fn normalize_region(attribute: &str) -> String {
    attribute.replacen(" County", "", 1).trim().to_string()
}
