//! ESRI shapefile reader and writer.
//!
//! This crate reads and writes the shapefile member files used by the
//! ingestion pipeline: the `.shp` geometry file, the `.shx` index, the
//! `.dbf` attribute table, and the `.prj` spatial-reference sidecar.
//!
//! Geometries are carried as opaque byte payloads and survive a read/write
//! cycle byte-for-byte. Attribute values are typed; absent numeric values
//! are an explicit marker that serializes as an all-blank field, never zero.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use costat_shp::{read_shapefile, write_shapefile};
//!
//! let base = read_shapefile(Path::new("shapefiles/base/COUNTIES.shp")).unwrap();
//! println!("{} records", base.num_records());
//! write_shapefile(Path::new("shapefiles/copy"), &base).unwrap();
//! ```

use std::collections::BTreeSet;
use std::path::Path;

pub mod dbf;
mod error;
mod paths;
pub mod shp;
mod sidecar;
mod types;

pub use error::{Result, ShpError};
pub use sidecar::copy_projection;
pub use types::{DbfField, DbfType, DbfValue, NumericValue, Shape, ShapeRecord, Shapefile, ShpHeader};

/// Read a shapefile (`.shp` + `.dbf`) into memory.
///
/// `path` may point at any member file or at the bare stem; member
/// extensions are substituted. Geometry and attribute record counts must
/// agree.
pub fn read_shapefile(path: &Path) -> Result<Shapefile> {
    let (header, shapes) = shp::read_shp(&paths::member_path(path, "shp"))?;
    let (fields, rows) = dbf::read_dbf(&paths::member_path(path, "dbf"))?;

    if shapes.len() != rows.len() {
        return Err(ShpError::RecordCountMismatch {
            shapes: shapes.len(),
            rows: rows.len(),
        });
    }

    let records = rows
        .into_iter()
        .zip(shapes)
        .map(|(values, shape)| ShapeRecord { values, shape })
        .collect();

    Ok(Shapefile {
        fields,
        records,
        header,
    })
}

/// Write a shapefile to `<path>.shp`, `<path>.shx` and `<path>.dbf`.
///
/// The dataset is validated first; field order in the written attribute
/// table exactly matches `Shapefile::fields`.
pub fn write_shapefile(path: &Path, dataset: &Shapefile) -> Result<()> {
    validate_dataset(dataset)?;

    let rows: Vec<Vec<DbfValue>> = dataset.records.iter().map(|r| r.values.clone()).collect();
    dbf::write_dbf(&paths::member_path(path, "dbf"), &dataset.fields, &rows)?;

    let shapes: Vec<Shape> = dataset.records.iter().map(|r| r.shape.clone()).collect();
    shp::write_shp_shx(
        &paths::member_path(path, "shp"),
        &paths::member_path(path, "shx"),
        &dataset.header,
        &shapes,
    )?;
    Ok(())
}

/// Validate a dataset before writing.
fn validate_dataset(dataset: &Shapefile) -> Result<()> {
    let mut seen = BTreeSet::new();
    for field in &dataset.fields {
        let name = field.name.trim().to_uppercase();
        if name.is_empty() || name.len() > 10 {
            return Err(ShpError::InvalidFieldName {
                name: field.name.clone(),
            });
        }
        if !seen.insert(name) {
            return Err(ShpError::DuplicateField {
                name: field.name.clone(),
            });
        }
        if field.length == 0 {
            return Err(ShpError::ZeroWidth {
                name: field.name.clone(),
            });
        }
    }

    for record in &dataset.records {
        if record.values.len() != dataset.fields.len() {
            return Err(ShpError::RowLengthMismatch {
                expected: dataset.fields.len(),
                actual: record.values.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(fields: Vec<DbfField>, values: Vec<Vec<DbfValue>>) -> Shapefile {
        let records = values
            .into_iter()
            .map(|values| ShapeRecord {
                values,
                shape: Shape::new(vec![1, 0, 0, 0]),
            })
            .collect();
        Shapefile {
            fields,
            records,
            header: ShpHeader {
                shape_type: 1,
                bbox: [0.0; 4],
                z_range: [0.0; 2],
                m_range: [0.0; 2],
            },
        }
    }

    #[test]
    fn test_validate_dataset_valid() {
        let ds = dataset(
            vec![
                DbfField::character("COUNTY", 12),
                DbfField::numeric("CASECOUNT", 10, 0),
            ],
            vec![vec![DbfValue::character("DENVER"), DbfValue::numeric(1.0)]],
        );
        assert!(validate_dataset(&ds).is_ok());
    }

    #[test]
    fn test_validate_dataset_long_name() {
        let ds = dataset(vec![DbfField::numeric("CASESPER100000", 10, 0)], vec![]);
        assert!(matches!(
            validate_dataset(&ds),
            Err(ShpError::InvalidFieldName { .. })
        ));
    }

    #[test]
    fn test_validate_dataset_duplicate_fields() {
        let ds = dataset(
            vec![
                DbfField::numeric("DEATHS", 7, 0),
                DbfField::numeric("deaths", 7, 0),
            ],
            vec![],
        );
        assert!(matches!(
            validate_dataset(&ds),
            Err(ShpError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_validate_dataset_zero_width() {
        let ds = dataset(vec![DbfField::numeric("DEATHS", 0, 0)], vec![]);
        assert!(matches!(
            validate_dataset(&ds),
            Err(ShpError::ZeroWidth { .. })
        ));
    }

    #[test]
    fn test_validate_dataset_row_arity() {
        let ds = dataset(
            vec![
                DbfField::character("COUNTY", 12),
                DbfField::numeric("DEATHS", 7, 0),
            ],
            vec![vec![DbfValue::character("DENVER")]],
        );
        assert!(matches!(
            validate_dataset(&ds),
            Err(ShpError::RowLengthMismatch { .. })
        ));
    }
}
