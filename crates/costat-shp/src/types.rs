//! Core types for shapefile handling.

/// DBF field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbfType {
    /// 'C' — left-justified text, space padded.
    Character,
    /// 'N' — right-justified ASCII number, space padded.
    Numeric,
    /// 'F' — floating point, treated like Numeric.
    Float,
    /// 'L' — logical flag, carried as text.
    Logical,
    /// 'D' — YYYYMMDD date, carried as text.
    Date,
}

impl DbfType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'C' => Some(DbfType::Character),
            b'N' => Some(DbfType::Numeric),
            b'F' => Some(DbfType::Float),
            b'L' => Some(DbfType::Logical),
            b'D' => Some(DbfType::Date),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            DbfType::Character => b'C',
            DbfType::Numeric => b'N',
            DbfType::Float => b'F',
            DbfType::Logical => b'L',
            DbfType::Date => b'D',
        }
    }

    /// Whether values of this type are numbers (and may be absent).
    pub fn is_numeric(&self) -> bool {
        matches!(self, DbfType::Numeric | DbfType::Float)
    }
}

/// Definition of one DBF field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbfField {
    /// Field name, at most 10 bytes.
    pub name: String,
    pub field_type: DbfType,
    /// Field width in bytes.
    pub length: u8,
    /// Decimal places (numeric fields).
    pub decimals: u8,
}

impl DbfField {
    pub fn numeric(name: &str, length: u8, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            field_type: DbfType::Numeric,
            length,
            decimals,
        }
    }

    pub fn character(name: &str, length: u8) -> Self {
        Self {
            name: name.to_string(),
            field_type: DbfType::Character,
            length,
            decimals: 0,
        }
    }
}

/// A numeric attribute value: present, or the explicit absent marker.
///
/// Absent serializes as an all-blank field, never as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Value(f64),
    Missing,
}

impl NumericValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, NumericValue::Missing)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            NumericValue::Value(v) => Some(*v),
            NumericValue::Missing => None,
        }
    }
}

/// One attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum DbfValue {
    Num(NumericValue),
    Char(String),
}

impl DbfValue {
    pub fn numeric(value: f64) -> Self {
        DbfValue::Num(NumericValue::Value(value))
    }

    pub fn numeric_missing() -> Self {
        DbfValue::Num(NumericValue::Missing)
    }

    pub fn character(value: impl Into<String>) -> Self {
        DbfValue::Char(value.into())
    }

    /// The value as text, as used for region-key extraction.
    pub fn as_text(&self) -> String {
        match self {
            DbfValue::Char(s) => s.clone(),
            DbfValue::Num(NumericValue::Value(v)) => v.to_string(),
            DbfValue::Num(NumericValue::Missing) => String::new(),
        }
    }
}

/// An opaque geometry payload: the raw record content from the .shp file
/// (shape type word followed by the geometry body), preserved byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub bytes: Vec<u8>,
}

impl Shape {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The shape type word, if the payload is well-formed.
    pub fn shape_type(&self) -> Option<i32> {
        let bytes = self.bytes.get(0..4)?;
        Some(i32::from_le_bytes(bytes.try_into().ok()?))
    }
}

/// Metadata from the .shp main header needed to write derived files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShpHeader {
    pub shape_type: i32,
    /// xmin, ymin, xmax, ymax.
    pub bbox: [f64; 4],
    pub z_range: [f64; 2],
    pub m_range: [f64; 2],
}

/// One geometry plus its attribute record.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub values: Vec<DbfValue>,
    pub shape: Shape,
}

/// A complete in-memory shapefile: field definitions, records, and the
/// header metadata required to serialize the geometry file.
#[derive(Debug, Clone, PartialEq)]
pub struct Shapefile {
    pub fields: Vec<DbfField>,
    pub records: Vec<ShapeRecord>,
    pub header: ShpHeader,
}

impl Shapefile {
    pub fn num_records(&self) -> usize {
        self.records.len()
    }
}
