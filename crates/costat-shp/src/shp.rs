//! .shp geometry file and .shx index reader/writer.
//!
//! Geometry record payloads are treated as opaque byte blocks: they are
//! sliced out of the source file and re-emitted unchanged, so geometries
//! survive a read/write cycle byte-for-byte.

use std::fs;
use std::path::Path;

use crate::error::{Result, ShpError};
use crate::types::{Shape, ShpHeader};

/// Length of the main file header shared by .shp and .shx.
pub const MAIN_HEADER_LEN: usize = 100;
const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;

/// Read a .shp file into its header metadata and raw geometry payloads.
pub fn read_shp(path: &Path) -> Result<(ShpHeader, Vec<Shape>)> {
    let data = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ShpError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ShpError::Io(e)
        }
    })?;
    parse_shp(&data)
}

/// Parse .shp data from bytes.
pub fn parse_shp(data: &[u8]) -> Result<(ShpHeader, Vec<Shape>)> {
    let header = parse_main_header(data)?;

    let mut shapes = Vec::new();
    let mut offset = MAIN_HEADER_LEN;
    while offset < data.len() {
        // Record header: record number and content length, both big-endian,
        // content length counted in 16-bit words.
        let _record_number = read_i32_be(data, offset)?;
        let content_words = read_i32_be(data, offset + 4)?;
        if content_words < 0 {
            return Err(ShpError::invalid_format("negative record content length"));
        }
        offset += 8;

        let content_len = content_words as usize * 2;
        let content = data
            .get(offset..offset + content_len)
            .ok_or(ShpError::RecordOutOfBounds { offset })?;
        shapes.push(Shape::new(content.to_vec()));
        offset += content_len;
    }

    Ok((header, shapes))
}

/// Write the .shp and .shx pair for the given geometries.
pub fn write_shp_shx(
    shp_path: &Path,
    shx_path: &Path,
    header: &ShpHeader,
    shapes: &[Shape],
) -> Result<()> {
    fs::write(shp_path, build_shp(header, shapes))?;
    fs::write(shx_path, build_shx(header, shapes))?;
    Ok(())
}

/// Serialize the .shp file to bytes.
pub fn build_shp(header: &ShpHeader, shapes: &[Shape]) -> Vec<u8> {
    let content_words: usize = shapes.iter().map(|s| 4 + s.bytes.len() / 2).sum();
    let file_words = MAIN_HEADER_LEN / 2 + content_words;

    let mut out = Vec::with_capacity(file_words * 2);
    out.extend_from_slice(&build_main_header(header, file_words));

    for (idx, shape) in shapes.iter().enumerate() {
        out.extend_from_slice(&((idx + 1) as i32).to_be_bytes());
        out.extend_from_slice(&((shape.bytes.len() / 2) as i32).to_be_bytes());
        out.extend_from_slice(&shape.bytes);
    }
    out
}

/// Serialize the .shx index to bytes.
pub fn build_shx(header: &ShpHeader, shapes: &[Shape]) -> Vec<u8> {
    let file_words = MAIN_HEADER_LEN / 2 + 4 * shapes.len();

    let mut out = Vec::with_capacity(file_words * 2);
    out.extend_from_slice(&build_main_header(header, file_words));

    let mut record_offset = MAIN_HEADER_LEN / 2;
    for shape in shapes {
        let content_words = shape.bytes.len() / 2;
        out.extend_from_slice(&(record_offset as i32).to_be_bytes());
        out.extend_from_slice(&(content_words as i32).to_be_bytes());
        record_offset += 4 + content_words;
    }
    out
}

fn parse_main_header(data: &[u8]) -> Result<ShpHeader> {
    if data.len() < MAIN_HEADER_LEN {
        return Err(ShpError::invalid_format("main header too short"));
    }
    if read_i32_be(data, 0)? != FILE_CODE {
        return Err(ShpError::invalid_format("bad file code"));
    }
    if read_i32_le(data, 28)? != VERSION {
        return Err(ShpError::invalid_format("unsupported shapefile version"));
    }

    let shape_type = read_i32_le(data, 32)?;
    let mut doubles = [0f64; 8];
    for (idx, value) in doubles.iter_mut().enumerate() {
        *value = read_f64_le(data, 36 + idx * 8)?;
    }

    Ok(ShpHeader {
        shape_type,
        bbox: [doubles[0], doubles[1], doubles[2], doubles[3]],
        z_range: [doubles[4], doubles[5]],
        m_range: [doubles[6], doubles[7]],
    })
}

fn build_main_header(header: &ShpHeader, file_words: usize) -> [u8; MAIN_HEADER_LEN] {
    let mut out = [0u8; MAIN_HEADER_LEN];
    out[0..4].copy_from_slice(&FILE_CODE.to_be_bytes());
    out[24..28].copy_from_slice(&(file_words as i32).to_be_bytes());
    out[28..32].copy_from_slice(&VERSION.to_le_bytes());
    out[32..36].copy_from_slice(&header.shape_type.to_le_bytes());

    let doubles = [
        header.bbox[0],
        header.bbox[1],
        header.bbox[2],
        header.bbox[3],
        header.z_range[0],
        header.z_range[1],
        header.m_range[0],
        header.m_range[1],
    ];
    for (idx, value) in doubles.iter().enumerate() {
        out[36 + idx * 8..44 + idx * 8].copy_from_slice(&value.to_le_bytes());
    }
    out
}

fn read_i32_be(data: &[u8], offset: usize) -> Result<i32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(ShpError::RecordOutOfBounds { offset })?;
    Ok(i32::from_be_bytes(bytes.try_into().expect("slice len")))
}

fn read_i32_le(data: &[u8], offset: usize) -> Result<i32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(ShpError::RecordOutOfBounds { offset })?;
    Ok(i32::from_le_bytes(bytes.try_into().expect("slice len")))
}

fn read_f64_le(data: &[u8], offset: usize) -> Result<f64> {
    let bytes = data
        .get(offset..offset + 8)
        .ok_or(ShpError::RecordOutOfBounds { offset })?;
    Ok(f64::from_le_bytes(bytes.try_into().expect("slice len")))
}
