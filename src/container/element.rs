//! Data element decoding for MAT Level 5 files
//!
//! Every piece of a MAT-file body is a data element: an 8-byte tag holding the
//! storage type and byte count, followed by the payload padded to an 8-byte
//! boundary. Payloads of at most 4 bytes may use the "small element" form, in
//! which the byte count lives in the upper half of the first tag word and the
//! payload fills the second.

use std::io::{self, Read};

use super::header::Endian;
use super::ContainerError;

/// Size of a regular data element tag
pub(crate) const TAG_LEN: u64 = 8;

/// Storage types (`mi*` codes) used in data element tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `miINT8` (1)
    Int8,
    /// `miUINT8` (2)
    UInt8,
    /// `miINT16` (3)
    Int16,
    /// `miUINT16` (4)
    UInt16,
    /// `miINT32` (5)
    Int32,
    /// `miUINT32` (6)
    UInt32,
    /// `miSINGLE` (7)
    Single,
    /// `miDOUBLE` (9)
    Double,
    /// `miINT64` (12)
    Int64,
    /// `miUINT64` (13)
    UInt64,
    /// `miMATRIX` (14), an array record
    Matrix,
    /// `miCOMPRESSED` (15), a zlib stream holding one record
    Compressed,
    /// `miUTF8` (16)
    Utf8,
    /// `miUTF16` (17)
    Utf16,
    /// `miUTF32` (18)
    Utf32,
}

impl DataType {
    /// Map a raw tag type code to a storage type
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(DataType::Int8),
            2 => Some(DataType::UInt8),
            3 => Some(DataType::Int16),
            4 => Some(DataType::UInt16),
            5 => Some(DataType::Int32),
            6 => Some(DataType::UInt32),
            7 => Some(DataType::Single),
            9 => Some(DataType::Double),
            12 => Some(DataType::Int64),
            13 => Some(DataType::UInt64),
            14 => Some(DataType::Matrix),
            15 => Some(DataType::Compressed),
            16 => Some(DataType::Utf8),
            17 => Some(DataType::Utf16),
            18 => Some(DataType::Utf32),
            _ => None,
        }
    }

    /// Width of one numeric value, `None` for non-numeric types
    pub fn byte_size(&self) -> Option<usize> {
        match self {
            DataType::Int8 | DataType::UInt8 => Some(1),
            DataType::Int16 | DataType::UInt16 => Some(2),
            DataType::Int32 | DataType::UInt32 | DataType::Single => Some(4),
            DataType::Int64 | DataType::UInt64 | DataType::Double => Some(8),
            _ => None,
        }
    }
}

/// MATLAB array classes (`mx*` codes) from the array flags sub-element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayClass {
    /// Cell array
    Cell,
    /// Structure
    Struct,
    /// Object
    Object,
    /// Character array
    Char,
    /// Sparse matrix
    Sparse,
    /// Double precision
    Double,
    /// Single precision
    Single,
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit unsigned integer
    UInt64,
    /// Function handle
    Function,
    /// Opaque (e.g. MCOS) object
    Opaque,
    /// Class code not defined by the format
    Unknown(u8),
}

impl ArrayClass {
    /// Map the low byte of the array flags to a class
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => ArrayClass::Cell,
            2 => ArrayClass::Struct,
            3 => ArrayClass::Object,
            4 => ArrayClass::Char,
            5 => ArrayClass::Sparse,
            6 => ArrayClass::Double,
            7 => ArrayClass::Single,
            8 => ArrayClass::Int8,
            9 => ArrayClass::UInt8,
            10 => ArrayClass::Int16,
            11 => ArrayClass::UInt16,
            12 => ArrayClass::Int32,
            13 => ArrayClass::UInt32,
            14 => ArrayClass::Int64,
            15 => ArrayClass::UInt64,
            16 => ArrayClass::Function,
            17 => ArrayClass::Opaque,
            other => ArrayClass::Unknown(other),
        }
    }

    /// Dense numeric classes whose real part is a plain value array
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ArrayClass::Double
                | ArrayClass::Single
                | ArrayClass::Int8
                | ArrayClass::UInt8
                | ArrayClass::Int16
                | ArrayClass::UInt16
                | ArrayClass::Int32
                | ArrayClass::UInt32
                | ArrayClass::Int64
                | ArrayClass::UInt64
        )
    }

    /// Floating-point classes that can back a channel
    pub fn is_float(&self) -> bool {
        matches!(self, ArrayClass::Double | ArrayClass::Single)
    }

    /// MATLAB's name for the class
    pub fn name(&self) -> String {
        match self {
            ArrayClass::Cell => "cell".to_string(),
            ArrayClass::Struct => "struct".to_string(),
            ArrayClass::Object => "object".to_string(),
            ArrayClass::Char => "char".to_string(),
            ArrayClass::Sparse => "sparse".to_string(),
            ArrayClass::Double => "double".to_string(),
            ArrayClass::Single => "single".to_string(),
            ArrayClass::Int8 => "int8".to_string(),
            ArrayClass::UInt8 => "uint8".to_string(),
            ArrayClass::Int16 => "int16".to_string(),
            ArrayClass::UInt16 => "uint16".to_string(),
            ArrayClass::Int32 => "int32".to_string(),
            ArrayClass::UInt32 => "uint32".to_string(),
            ArrayClass::Int64 => "int64".to_string(),
            ArrayClass::UInt64 => "uint64".to_string(),
            ArrayClass::Function => "function_handle".to_string(),
            ArrayClass::Opaque => "opaque".to_string(),
            ArrayClass::Unknown(code) => format!("unknown({})", code),
        }
    }
}

/// A decoded sub-element: raw type code plus unpadded payload
pub(crate) struct Element {
    pub code: u32,
    pub bytes: Vec<u8>,
}

/// Read a regular (non-small) tag from the top level of the file
pub(crate) fn read_tag<R: Read>(src: &mut R, endian: Endian) -> io::Result<(u32, u32)> {
    let mut tag = [0u8; TAG_LEN as usize];
    src.read_exact(&mut tag)?;
    Ok((endian.read_u32(&tag[..4]), endian.read_u32(&tag[4..])))
}

/// Read one sub-element inside a matrix body, honoring the small element form
pub(crate) fn read_element<R: Read>(
    src: &mut R,
    endian: Endian,
    offset: u64,
) -> Result<Element, ContainerError> {
    let mut tag = [0u8; TAG_LEN as usize];
    src.read_exact(&mut tag)
        .map_err(|e| truncated(offset, "sub-element tag", e))?;

    let word = endian.read_u32(&tag[..4]);
    if word >> 16 != 0 {
        let len = (word >> 16) as usize;
        if len > 4 {
            return Err(ContainerError::malformed(
                offset,
                format!("small element claims {} bytes", len),
            ));
        }
        return Ok(Element {
            code: word & 0xFFFF,
            bytes: tag[4..4 + len].to_vec(),
        });
    }

    let len = endian.read_u32(&tag[4..]) as usize;
    // Bounded read: a corrupt length must not drive a huge up-front allocation.
    let mut bytes = Vec::new();
    src.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(ContainerError::malformed(
            offset,
            format!("sub-element declares {} bytes, only {} present", len, bytes.len()),
        ));
    }

    // The final element of a record may legitimately omit its padding.
    let padding = padding_for(len as u64);
    io::copy(&mut src.by_ref().take(padding), &mut io::sink())?;

    Ok(Element { code: word, bytes })
}

/// Bytes needed to round `len` up to an 8-byte boundary
pub(crate) fn padding_for(len: u64) -> u64 {
    (8 - len % 8) % 8
}

fn truncated(offset: u64, what: &str, err: io::Error) -> ContainerError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ContainerError::malformed(offset, format!("truncated {}", what))
    } else {
        ContainerError::Io(err)
    }
}

/// Convert a numeric payload of any storage type into `f32` samples
///
/// MATLAB stores arrays with the narrowest type that holds their values, so a
/// `double` array of small integers may arrive as `miUINT8`. Values are widened
/// or narrowed to `f32` here.
pub(crate) fn decode_numeric(
    code: u32,
    bytes: &[u8],
    endian: Endian,
    name: &str,
    offset: u64,
) -> Result<Vec<f32>, ContainerError> {
    let data_type = DataType::from_code(code).ok_or_else(|| ContainerError::UnsupportedStorage {
        name: name.to_string(),
        code,
    })?;
    let size = data_type
        .byte_size()
        .ok_or_else(|| ContainerError::UnsupportedStorage {
            name: name.to_string(),
            code,
        })?;

    if bytes.len() % size != 0 {
        return Err(ContainerError::malformed(
            offset,
            format!(
                "{} bytes is not a multiple of the {}-byte {:?} width",
                bytes.len(),
                size,
                data_type
            ),
        ));
    }

    let chunks = bytes.chunks_exact(size);
    let values = match data_type {
        DataType::Int8 => chunks.map(|c| c[0] as i8 as f32).collect(),
        DataType::UInt8 => chunks.map(|c| c[0] as f32).collect(),
        DataType::Int16 => chunks.map(|c| endian.read_i16(c) as f32).collect(),
        DataType::UInt16 => chunks.map(|c| endian.read_u16(c) as f32).collect(),
        DataType::Int32 => chunks.map(|c| endian.read_i32(c) as f32).collect(),
        DataType::UInt32 => chunks.map(|c| endian.read_u32(c) as f32).collect(),
        DataType::Int64 => chunks.map(|c| endian.read_i64(c) as f32).collect(),
        DataType::UInt64 => chunks.map(|c| endian.read_u64(c) as f32).collect(),
        DataType::Single => chunks.map(|c| endian.read_f32(c)).collect(),
        DataType::Double => chunks.map(|c| endian.read_f64(c) as f32).collect(),
        _ => unreachable!("byte_size() is None for non-numeric types"),
    };

    Ok(values)
}
