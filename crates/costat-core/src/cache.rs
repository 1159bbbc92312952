//! Base geometry cache.
//!
//! The base shapefile is loaded once per run and indexed by region key for
//! O(1) lookup during merge. The cache is immutable after load: merging
//! clones per-region templates into new records, so successive report merges
//! never observe each other's values. A cache value is always fully loaded
//! — [`BaseShapeCache::load`] is the only constructor.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use costat_shp::{DbfField, Shape, ShpHeader, read_shapefile};

use crate::error::{CoreError, Result};

/// One base region: its attribute record and geometry, used as the immutable
/// template for every merge.
#[derive(Debug, Clone)]
pub struct BaseShapeRecord {
    pub values: Vec<costat_shp::DbfValue>,
    pub shape: Shape,
}

/// The loaded base geometry dataset, indexed by uppercase region key.
#[derive(Debug)]
pub struct BaseShapeCache {
    fields: Vec<DbfField>,
    records: BTreeMap<String, BaseShapeRecord>,
    header: ShpHeader,
    source: PathBuf,
}

impl BaseShapeCache {
    /// Load the base shapefile and index its records by region key.
    ///
    /// The region key is the first attribute field's value, uppercased.
    /// Duplicate keys keep the last record.
    pub fn load(path: &Path) -> Result<Self> {
        let dataset = read_shapefile(path)?;
        if dataset.fields.is_empty() {
            return Err(CoreError::MissingKeyField {
                path: path.to_path_buf(),
            });
        }

        let mut records = BTreeMap::new();
        for record in dataset.records {
            let key = record
                .values
                .first()
                .map(|v| v.as_text().trim().to_uppercase())
                .unwrap_or_default();
            if key.is_empty() {
                warn!(base = %path.display(), "base record with empty region key, skipping");
                continue;
            }
            let previous = records.insert(
                key.clone(),
                BaseShapeRecord {
                    values: record.values,
                    shape: record.shape,
                },
            );
            if previous.is_some() {
                warn!(base = %path.display(), region = %key, "duplicate region key in base dataset, keeping last");
            }
        }

        info!(base = %path.display(), regions = records.len(), "loaded base geometry");

        Ok(Self {
            fields: dataset.fields,
            records,
            header: dataset.header,
            source: path.to_path_buf(),
        })
    }

    /// The base dataset's attribute field definitions, in file order.
    pub fn fields(&self) -> &[DbfField] {
        &self.fields
    }

    /// The .shp main-header metadata, reused for derived outputs.
    pub fn header(&self) -> ShpHeader {
        self.header
    }

    /// The path the base dataset was loaded from (for sidecar lookup).
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn record(&self, key: &str) -> Option<&BaseShapeRecord> {
        self.records.get(key)
    }

    /// All (key, record) pairs, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BaseShapeRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn region_count(&self) -> usize {
        self.records.len()
    }
}
