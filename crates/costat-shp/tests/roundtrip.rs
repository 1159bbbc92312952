//! Integration tests for the shapefile read/write cycle.
//!
//! These verify that a written dataset reads back with the same field
//! definitions, the same per-record values, and byte-identical geometry.

use std::path::Path;

use costat_shp::{
    DbfField, DbfValue, NumericValue, Shape, ShapeRecord, Shapefile, ShpHeader, copy_projection,
    read_shapefile, write_shapefile,
};
use tempfile::TempDir;

fn polygon_shape(seed: u8) -> Shape {
    let mut bytes = vec![0u8; 44];
    bytes[0..4].copy_from_slice(&5i32.to_le_bytes());
    for (idx, byte) in bytes.iter_mut().enumerate().skip(4) {
        *byte = seed.wrapping_add(idx as u8);
    }
    Shape::new(bytes)
}

fn county_dataset() -> Shapefile {
    let fields = vec![
        DbfField::character("COUNTY", 14),
        DbfField::numeric("POP", 10, 0),
        DbfField::numeric("CASECOUNT", 10, 0),
        DbfField::numeric("TESTRATE", 7, 2),
    ];

    let records = vec![
        ShapeRecord {
            values: vec![
                DbfValue::character("DENVER"),
                DbfValue::numeric(715522.0),
                DbfValue::numeric(100.0),
                DbfValue::numeric(8.25),
            ],
            shape: polygon_shape(0x10),
        },
        ShapeRecord {
            values: vec![
                DbfValue::character("ADAMS"),
                DbfValue::numeric(519572.0),
                DbfValue::numeric_missing(),
                DbfValue::numeric_missing(),
            ],
            shape: polygon_shape(0x20),
        },
    ];

    Shapefile {
        fields,
        records,
        header: ShpHeader {
            shape_type: 5,
            bbox: [-109.06, 36.99, -102.04, 41.0],
            z_range: [0.0, 0.0],
            m_range: [0.0, 0.0],
        },
    }
}

#[test]
fn round_trip_preserves_fields_values_and_geometry() {
    let dir = TempDir::new().unwrap();
    let stem = dir.path().join("counties");

    let dataset = county_dataset();
    write_shapefile(&stem, &dataset).unwrap();
    let read_back = read_shapefile(&stem).unwrap();

    assert_eq!(read_back.fields, dataset.fields);
    assert_eq!(read_back.num_records(), dataset.num_records());
    for (read, orig) in read_back.records.iter().zip(dataset.records.iter()) {
        assert_eq!(read.values, orig.values);
        assert_eq!(read.shape.bytes, orig.shape.bytes, "geometry bytes differ");
    }
    assert_eq!(read_back.header, dataset.header);
}

#[test]
fn absent_values_stay_absent_not_zero() {
    let dir = TempDir::new().unwrap();
    let stem = dir.path().join("counties");

    write_shapefile(&stem, &county_dataset()).unwrap();
    let read_back = read_shapefile(&stem).unwrap();

    let adams = &read_back.records[1];
    assert_eq!(adams.values[2], DbfValue::Num(NumericValue::Missing));
    assert_eq!(adams.values[3], DbfValue::Num(NumericValue::Missing));
}

#[test]
fn member_extension_is_substituted_on_read() {
    let dir = TempDir::new().unwrap();
    let stem = dir.path().join("counties");
    write_shapefile(&stem, &county_dataset()).unwrap();

    // Pointing at the .shp member or the bare stem both work.
    let via_member = read_shapefile(&dir.path().join("counties.shp")).unwrap();
    let via_stem = read_shapefile(&stem).unwrap();
    assert_eq!(via_member, via_stem);
}

#[test]
fn dotted_stems_write_distinct_datasets() {
    let dir = TempDir::new().unwrap();

    // Dots in the stem are part of the dataset name, not an extension.
    let first = dir.path().join("covid.2020.04.15");
    let second = dir.path().join("covid.2020.04.16");
    write_shapefile(&first, &county_dataset()).unwrap();
    write_shapefile(&second, &county_dataset()).unwrap();

    for stem in ["covid.2020.04.15", "covid.2020.04.16"] {
        for ext in ["shp", "shx", "dbf"] {
            assert!(
                dir.path().join(format!("{stem}.{ext}")).is_file(),
                "missing {stem}.{ext}"
            );
        }
    }
    assert!(!dir.path().join("covid.2020.04.shp").exists());

    let read_back = read_shapefile(&first).unwrap();
    assert_eq!(read_back.fields, county_dataset().fields);
}

#[test]
fn projection_sidecar_is_copied_with_output_name() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base");
    write_shapefile(&base, &county_dataset()).unwrap();
    std::fs::write(dir.path().join("base.prj"), b"PROJCS[\"NAD83\"]").unwrap();

    let dest = dir.path().join("covid19_case_data_2020-04-15");
    copy_projection(&base, &dest).unwrap();
    assert!(
        Path::new(&dir.path().join("covid19_case_data_2020-04-15.prj")).is_file(),
        "sidecar not copied"
    );
}

mod numeric_props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any value that fits an N 10.2 field survives the write/read cycle
        /// up to its declared precision.
        #[test]
        fn numeric_fields_round_trip(value in -9999.0f64..99999.0) {
            let fields = vec![
                DbfField::character("COUNTY", 8),
                DbfField::numeric("STAT", 10, 2),
            ];
            let records = vec![ShapeRecord {
                values: vec![DbfValue::character("X"), DbfValue::numeric(value)],
                shape: polygon_shape(0x01),
            }];
            let dataset = Shapefile {
                fields,
                records,
                header: ShpHeader {
                    shape_type: 5,
                    bbox: [0.0; 4],
                    z_range: [0.0; 2],
                    m_range: [0.0; 2],
                },
            };

            let dir = TempDir::new().unwrap();
            let stem = dir.path().join("prop");
            write_shapefile(&stem, &dataset).unwrap();
            let read_back = read_shapefile(&stem).unwrap();

            let expected: f64 = format!("{value:.2}").parse().unwrap();
            match read_back.records[0].values[1] {
                DbfValue::Num(NumericValue::Value(v)) => {
                    prop_assert!((v - expected).abs() < 1e-6, "got {v}, want {expected}");
                }
                ref other => prop_assert!(false, "unexpected value {other:?}"),
            }
        }
    }
}
