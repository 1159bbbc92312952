//! DBF (dBASE III) attribute table reader and writer.
//!
//! Only the subset of the format produced and consumed by shapefile tooling
//! is supported: a fixed field-descriptor array followed by fixed-width ASCII
//! records. Absent numeric values are all-blank fields, distinct from zero.

use std::fs;
use std::path::Path;

use chrono::{Datelike, Local};

use crate::error::{Result, ShpError};
use crate::types::{DbfField, DbfType, DbfValue, NumericValue};

/// Size of the fixed header prefix and of each field descriptor.
const HEADER_LEN: usize = 32;
const DESCRIPTOR_LEN: usize = 32;
/// Marks the end of the field-descriptor array.
const DESCRIPTOR_TERMINATOR: u8 = 0x0d;
/// Optional end-of-file marker after the last record.
const EOF_MARKER: u8 = 0x1a;
/// Record deletion flags.
const FLAG_ACTIVE: u8 = b' ';
const FLAG_DELETED: u8 = b'*';

/// Read a DBF file into field definitions and attribute rows.
///
/// Records flagged as deleted are skipped.
pub fn read_dbf(path: &Path) -> Result<(Vec<DbfField>, Vec<Vec<DbfValue>>)> {
    let data = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ShpError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ShpError::Io(e)
        }
    })?;
    parse_dbf(&data)
}

/// Parse DBF data from bytes.
pub fn parse_dbf(data: &[u8]) -> Result<(Vec<DbfField>, Vec<Vec<DbfValue>>)> {
    if data.len() < HEADER_LEN {
        return Err(ShpError::invalid_format("DBF header too short"));
    }

    let record_count = u32::from_le_bytes(data[4..8].try_into().expect("slice len")) as usize;
    let header_size = u16::from_le_bytes(data[8..10].try_into().expect("slice len")) as usize;
    let record_size = u16::from_le_bytes(data[10..12].try_into().expect("slice len")) as usize;

    let fields = parse_descriptors(data, header_size)?;

    let expected_size: usize = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();
    if record_size != expected_size {
        return Err(ShpError::invalid_format(format!(
            "record size {record_size} does not match field widths ({expected_size})"
        )));
    }

    let mut rows = Vec::with_capacity(record_count);
    let mut offset = header_size;
    for _ in 0..record_count {
        let record = data
            .get(offset..offset + record_size)
            .ok_or(ShpError::RecordOutOfBounds { offset })?;
        offset += record_size;

        if record[0] == FLAG_DELETED {
            continue;
        }

        let mut values = Vec::with_capacity(fields.len());
        let mut pos = 1usize;
        for field in &fields {
            let slice = &record[pos..pos + field.length as usize];
            values.push(decode_value(slice, field));
            pos += field.length as usize;
        }
        rows.push(values);
    }

    Ok((fields, rows))
}

/// Write field definitions and rows to a DBF file.
///
/// Every row must have exactly one value per field.
pub fn write_dbf(path: &Path, fields: &[DbfField], rows: &[Vec<DbfValue>]) -> Result<()> {
    let data = build_dbf(fields, rows)?;
    fs::write(path, data)?;
    Ok(())
}

/// Serialize a DBF file to bytes.
pub fn build_dbf(fields: &[DbfField], rows: &[Vec<DbfValue>]) -> Result<Vec<u8>> {
    let record_size: usize = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();
    let header_size = HEADER_LEN + DESCRIPTOR_LEN * fields.len() + 1;
    let mut out = Vec::with_capacity(header_size + record_size * rows.len() + 1);

    // Header: version, last-update date, counts and sizes.
    let today = Local::now().date_naive();
    out.push(0x03);
    out.push((today.year() - 1900) as u8);
    out.push(today.month() as u8);
    out.push(today.day() as u8);
    out.extend_from_slice(&(rows.len() as u32).to_le_bytes());
    out.extend_from_slice(&(header_size as u16).to_le_bytes());
    out.extend_from_slice(&(record_size as u16).to_le_bytes());
    out.resize(HEADER_LEN, 0);

    for field in fields {
        out.extend_from_slice(&build_descriptor(field));
    }
    out.push(DESCRIPTOR_TERMINATOR);

    for row in rows {
        if row.len() != fields.len() {
            return Err(ShpError::RowLengthMismatch {
                expected: fields.len(),
                actual: row.len(),
            });
        }
        out.push(FLAG_ACTIVE);
        for (value, field) in row.iter().zip(fields.iter()) {
            out.extend_from_slice(&encode_value(value, field)?);
        }
    }
    out.push(EOF_MARKER);

    Ok(out)
}

/// Parse the field-descriptor array.
fn parse_descriptors(data: &[u8], header_size: usize) -> Result<Vec<DbfField>> {
    let mut fields = Vec::new();
    let mut offset = HEADER_LEN;

    while offset < header_size && data.get(offset) != Some(&DESCRIPTOR_TERMINATOR) {
        let descriptor = data
            .get(offset..offset + DESCRIPTOR_LEN)
            .ok_or(ShpError::RecordOutOfBounds { offset })?;

        let name_bytes = &descriptor[0..11];
        let name_end = name_bytes.iter().position(|&b| b == 0).unwrap_or(11);
        let name = String::from_utf8_lossy(&name_bytes[..name_end])
            .trim()
            .to_string();

        let type_byte = descriptor[11];
        let field_type =
            DbfType::from_byte(type_byte).ok_or_else(|| ShpError::UnsupportedFieldType {
                name: name.clone(),
                type_byte: type_byte as char,
            })?;

        fields.push(DbfField {
            name,
            field_type,
            length: descriptor[16],
            decimals: descriptor[17],
        });
        offset += DESCRIPTOR_LEN;
    }

    Ok(fields)
}

/// Build one 32-byte field descriptor.
fn build_descriptor(field: &DbfField) -> [u8; DESCRIPTOR_LEN] {
    let mut out = [0u8; DESCRIPTOR_LEN];
    let name_bytes = field.name.as_bytes();
    let len = name_bytes.len().min(11);
    out[..len].copy_from_slice(&name_bytes[..len]);
    out[11] = field.field_type.as_byte();
    out[16] = field.length;
    out[17] = field.decimals;
    out
}

/// Decode a fixed-width field slice.
fn decode_value(slice: &[u8], field: &DbfField) -> DbfValue {
    if field.field_type.is_numeric() {
        let text = String::from_utf8_lossy(slice);
        let trimmed = text.trim();
        // Blank or asterisk-filled numeric fields are the absent marker.
        if trimmed.is_empty() || trimmed.bytes().all(|b| b == b'*') {
            return DbfValue::Num(NumericValue::Missing);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => DbfValue::Num(NumericValue::Value(v)),
            _ => DbfValue::Num(NumericValue::Missing),
        }
    } else {
        DbfValue::Char(String::from_utf8_lossy(slice).trim_end().to_string())
    }
}

/// Encode one value into its fixed-width representation.
fn encode_value(value: &DbfValue, field: &DbfField) -> Result<Vec<u8>> {
    if field.field_type.is_numeric() {
        let numeric = match value {
            DbfValue::Num(n) => *n,
            // Text landing in a numeric field: parse it, absent on failure.
            DbfValue::Char(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => NumericValue::Value(v),
                _ => NumericValue::Missing,
            },
        };
        encode_numeric(numeric, field)
    } else {
        let text = value.as_text();
        Ok(encode_char(&text, field.length))
    }
}

/// Encode a numeric value, right-justified and space padded.
fn encode_numeric(value: NumericValue, field: &DbfField) -> Result<Vec<u8>> {
    let width = field.length as usize;
    match value {
        NumericValue::Missing => Ok(vec![b' '; width]),
        NumericValue::Value(v) => {
            let text = format!("{v:.prec$}", prec = field.decimals as usize);
            if text.len() > width {
                return Err(ShpError::NumericOverflow {
                    field: field.name.clone(),
                    value: v,
                    width: field.length,
                });
            }
            let mut out = vec![b' '; width - text.len()];
            out.extend_from_slice(text.as_bytes());
            Ok(out)
        }
    }
}

/// Encode a character value, left-justified and space padded.
fn encode_char(value: &str, length: u8) -> Vec<u8> {
    let len = length as usize;
    let mut out = Vec::with_capacity(len);

    for ch in value.chars().take(len) {
        if ch.is_ascii() {
            out.push(ch as u8);
        } else {
            out.push(b'?');
        }
    }
    while out.len() < len {
        out.push(b' ');
    }
    out
}
