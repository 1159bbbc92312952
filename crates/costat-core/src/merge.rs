//! Merge engine: one report's statistics into a derived dataset.

use tracing::debug;

use costat_model::{FieldDef, FieldKind, RegionStats, StatValue, StatisticCode, report_field_defs};
use costat_shp::{DbfField, DbfValue, ShapeRecord, Shapefile};

use crate::cache::BaseShapeCache;

/// Merge one report's statistics with the base geometry into a new dataset.
///
/// The output carries exactly one record per base region: the base attribute
/// values followed by one value per [`StatisticCode`] in canonical order,
/// with the absent marker for anything the report did not cover. Report
/// regions with no base geometry (placeholder rows like "UNKNOWN") are
/// dropped; no geometry is synthesized. The cache is never mutated — each
/// record is built from a cloned template.
pub fn merge_report(cache: &BaseShapeCache, stats: &RegionStats) -> Shapefile {
    let mut fields = cache.fields().to_vec();
    fields.extend(report_field_defs().iter().map(to_dbf_field));

    for key in stats.region_keys() {
        if cache.record(key).is_none() {
            debug!(region = %key, "report region has no base geometry, dropping");
        }
    }

    let records = cache
        .iter()
        .map(|(key, base)| {
            let mut values = base.values.clone();
            for code in StatisticCode::ALL {
                let value = stats.get(key, code).unwrap_or(StatValue::Absent);
                values.push(match value {
                    StatValue::Value(v) => DbfValue::numeric(v),
                    StatValue::Absent => DbfValue::numeric_missing(),
                });
            }
            ShapeRecord {
                values,
                shape: base.shape.clone(),
            }
        })
        .collect();

    Shapefile {
        fields,
        records,
        header: cache.header(),
    }
}

fn to_dbf_field(def: &FieldDef) -> DbfField {
    match def.kind {
        FieldKind::Numeric => DbfField::numeric(&def.name, def.width, def.decimals),
        FieldKind::Character => DbfField::character(&def.name, def.width),
    }
}
