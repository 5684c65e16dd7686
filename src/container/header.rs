//! MAT Level 5 file header and byte-order handling

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::ContainerError;

/// Size of the fixed file header in bytes
pub const HEADER_LEN: usize = 128;

/// Length of the descriptive text field at the start of the header
const TEXT_LEN: usize = 116;

/// Level 5 format version stored at bytes 124..126
const VERSION_5: u16 = 0x0100;

/// Version written by MATLAB 7.3+ (HDF5-based) files
const VERSION_73: u16 = 0x0200;

/// Byte order of every numeric field in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Indicator bytes read as `IM`
    Little,
    /// Indicator bytes read as `MI`
    Big,
}

impl Endian {
    pub(crate) fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Endian::Little => LittleEndian::read_u16(buf),
            Endian::Big => BigEndian::read_u16(buf),
        }
    }

    pub(crate) fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(buf),
            Endian::Big => BigEndian::read_u32(buf),
        }
    }

    pub(crate) fn read_i16(self, buf: &[u8]) -> i16 {
        match self {
            Endian::Little => LittleEndian::read_i16(buf),
            Endian::Big => BigEndian::read_i16(buf),
        }
    }

    pub(crate) fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            Endian::Little => LittleEndian::read_i32(buf),
            Endian::Big => BigEndian::read_i32(buf),
        }
    }

    pub(crate) fn read_i64(self, buf: &[u8]) -> i64 {
        match self {
            Endian::Little => LittleEndian::read_i64(buf),
            Endian::Big => BigEndian::read_i64(buf),
        }
    }

    pub(crate) fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Endian::Little => LittleEndian::read_u64(buf),
            Endian::Big => BigEndian::read_u64(buf),
        }
    }

    pub(crate) fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            Endian::Little => LittleEndian::read_f32(buf),
            Endian::Big => BigEndian::read_f32(buf),
        }
    }

    pub(crate) fn read_f64(self, buf: &[u8]) -> f64 {
        match self {
            Endian::Little => LittleEndian::read_f64(buf),
            Endian::Big => BigEndian::read_f64(buf),
        }
    }
}

/// Parsed 128-byte MAT-file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatHeader {
    /// Descriptive text, e.g. `MATLAB 5.0 MAT-file, Platform: ...`
    pub description: String,
    /// Offset of the subsystem data block, if the file has one
    pub subsys_offset: Option<u64>,
    /// Byte order of the file
    pub endian: Endian,
    /// Format version (always `0x0100` for accepted files)
    pub version: u16,
}

impl MatHeader {
    /// Parse the fixed header block
    pub fn parse(bytes: &[u8]) -> Result<Self, ContainerError> {
        if bytes.len() < HEADER_LEN {
            return Err(ContainerError::InvalidHeader(format!(
                "expected {} header bytes, got {}",
                HEADER_LEN,
                bytes.len()
            )));
        }

        let endian = match &bytes[126..128] {
            b"IM" => Endian::Little,
            b"MI" => Endian::Big,
            other => {
                return Err(ContainerError::InvalidHeader(format!(
                    "unknown endian indicator {:?}",
                    String::from_utf8_lossy(other)
                )))
            }
        };

        let version = endian.read_u16(&bytes[124..126]);
        match version {
            VERSION_5 => {}
            VERSION_73 => {
                return Err(ContainerError::InvalidHeader(
                    "MATLAB 7.3 (HDF5) files are not supported".to_string(),
                ))
            }
            other => {
                return Err(ContainerError::InvalidHeader(format!(
                    "unsupported version 0x{:04x}",
                    other
                )))
            }
        }

        let description = String::from_utf8_lossy(&bytes[..TEXT_LEN])
            .trim_end_matches(|c: char| c == ' ' || c == '\0')
            .to_string();

        // Unused subsystem offsets are written as all zeros or all spaces.
        let subsys_offset = match endian.read_u64(&bytes[TEXT_LEN..124]) {
            0 | 0x2020_2020_2020_2020 => None,
            offset => Some(offset),
        };

        Ok(Self {
            description,
            subsys_offset,
            endian,
            version,
        })
    }
}
