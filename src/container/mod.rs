//! Read-only decoder for MATLAB Level 5 MAT-files
//!
//! A MAT-file is a 128-byte header followed by a sequence of top-level data
//! elements. Each variable is one `miMATRIX` element, optionally wrapped in a
//! zlib-compressed `miCOMPRESSED` element. This module walks those records and
//! exposes two read depths:
//!
//! - **metadata only** ([`MatReader::next_info`]): name, class and dimensions.
//!   Plain records are skipped by seeking; compressed records are inflated just
//!   far enough to reach the name.
//! - **full** ([`MatReader::next_variable`], [`MatReader::read_variable`]):
//!   the real part is decoded and converted to `f32`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use matchannels::container::MatReader;
//!
//! let mut reader = MatReader::open("log.mat")?;
//! while let Some(info) = reader.next_info()? {
//!     println!("{}: {:?} {:?}", info.name, info.class, info.dims);
//! }
//! # Ok::<(), matchannels::container::ContainerError>(())
//! ```

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::ZlibDecoder;
use log::{debug, trace};

mod element;
mod error;
mod header;
mod iterators;
mod variable;

#[cfg(test)]
pub(crate) mod fixture;

pub use element::{ArrayClass, DataType};
pub use error::ContainerError;
pub use header::{Endian, MatHeader, HEADER_LEN};
pub use iterators::{VariableInfos, Variables};
pub use variable::{Variable, VariableInfo};

use element::{decode_numeric, padding_for, read_element, read_tag, TAG_LEN};

/// Default capacity of the buffered file reader
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Complex bit in the array flags word
const COMPLEX_FLAG: u32 = 0x0800;

/// Outcome of decoding one top-level element
struct RecordRead {
    next_offset: u64,
    /// `None` for elements that are not variables (or are empty)
    entry: Option<(VariableInfo, Option<Vec<f32>>)>,
}

/// Sequential reader over the variable records of a MAT-file
///
/// The underlying handle is owned by the reader and released when the reader
/// is dropped or [`closed`](MatReader::close).
pub struct MatReader<R> {
    reader: R,
    header: MatHeader,
    len: u64,
    position: u64,
}

impl MatReader<BufReader<File>> {
    /// Open a MAT-file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContainerError> {
        Self::open_with_capacity(path, DEFAULT_BUFFER_CAPACITY)
    }

    /// Open a MAT-file with a custom read buffer size
    pub fn open_with_capacity<P: AsRef<Path>>(
        path: P,
        capacity: usize,
    ) -> Result<Self, ContainerError> {
        let path = path.as_ref();
        debug!("Opening MAT-file {}", path.display());
        let file = File::open(path)?;
        Self::new(BufReader::with_capacity(capacity, file))
    }
}

impl<R: Read + Seek> MatReader<R> {
    /// Wrap any seekable source positioned anywhere; the header is read from byte 0
    pub fn new(mut reader: R) -> Result<Self, ContainerError> {
        let len = reader.seek(SeekFrom::End(0))?;
        if len < HEADER_LEN as u64 {
            return Err(ContainerError::InvalidHeader(format!(
                "file is {} bytes, shorter than the {}-byte header",
                len, HEADER_LEN
            )));
        }

        reader.seek(SeekFrom::Start(0))?;
        let mut bytes = [0u8; HEADER_LEN];
        reader.read_exact(&mut bytes)?;
        let header = MatHeader::parse(&bytes)?;

        debug!(
            "MAT header: {:?} endian, {} bytes, \"{}\"",
            header.endian, len, header.description
        );

        Ok(Self {
            reader,
            header,
            len,
            position: HEADER_LEN as u64,
        })
    }

    /// Parsed file header
    pub fn header(&self) -> &MatHeader {
        &self.header
    }

    /// Read the next record's metadata without materializing its data
    pub fn next_info(&mut self) -> Result<Option<VariableInfo>, ContainerError> {
        Ok(self.next_entry(false)?.map(|(info, _)| info))
    }

    /// Read the next record including its data
    pub fn next_variable(&mut self) -> Result<Option<Variable>, ContainerError> {
        Ok(self.next_entry(true)?.map(|(info, data)| Variable {
            info,
            data: data.unwrap_or_default(),
        }))
    }

    /// Iterate over the remaining records, metadata only
    pub fn infos(&mut self) -> VariableInfos<'_, R> {
        VariableInfos { reader: self }
    }

    /// Iterate over the remaining records with their data
    pub fn variables(&mut self) -> Variables<'_, R> {
        Variables { reader: self }
    }

    /// Fully read the record described by `info`
    ///
    /// Does not disturb the sequential position used by [`next_info`](Self::next_info).
    pub fn read_variable(&mut self, info: &VariableInfo) -> Result<Variable, ContainerError> {
        let entry = self
            .read_record_at(info.offset, true)?
            .and_then(|record| record.entry);

        match entry {
            Some((found, data)) if found.name == info.name => Ok(Variable {
                info: found,
                data: data.unwrap_or_default(),
            }),
            _ => Err(ContainerError::VariableNotFound(info.name.clone())),
        }
    }

    /// Fully read the first record named `name`, scanning from the start of the file
    pub fn read_variable_by_name(&mut self, name: &str) -> Result<Variable, ContainerError> {
        let mut offset = HEADER_LEN as u64;
        while let Some(record) = self.read_record_at(offset, false)? {
            if let Some((info, _)) = record.entry {
                if info.name == name {
                    return self.read_variable(&info);
                }
            }
            offset = record.next_offset;
        }
        Err(ContainerError::VariableNotFound(name.to_string()))
    }

    /// Restart sequential reading at the first record
    pub fn rewind(&mut self) {
        self.position = HEADER_LEN as u64;
    }

    /// Release the underlying handle
    pub fn close(self) {
        debug!("Closing MAT-file reader");
    }

    fn next_entry(
        &mut self,
        with_data: bool,
    ) -> Result<Option<(VariableInfo, Option<Vec<f32>>)>, ContainerError> {
        loop {
            let record = match self.read_record_at(self.position, with_data) {
                Ok(Some(record)) => record,
                Ok(None) => return Ok(None),
                Err(e) => {
                    // A decode error ends sequential reading.
                    self.position = self.len;
                    return Err(e);
                }
            };
            self.position = record.next_offset;
            if let Some(entry) = record.entry {
                return Ok(Some(entry));
            }
        }
    }

    fn read_record_at(
        &mut self,
        offset: u64,
        with_data: bool,
    ) -> Result<Option<RecordRead>, ContainerError> {
        if offset + TAG_LEN > self.len {
            return Ok(None);
        }

        let endian = self.header.endian;
        self.reader.seek(SeekFrom::Start(offset))?;
        let (code, nbytes) = read_tag(&mut self.reader, endian)?;
        let nbytes = u64::from(nbytes);
        let body_start = offset + TAG_LEN;

        if body_start + nbytes > self.len {
            return Err(ContainerError::malformed(
                offset,
                format!("record of {} bytes extends past end of file", nbytes),
            ));
        }

        let data_type = DataType::from_code(code);
        let next_offset = match data_type {
            Some(DataType::Compressed) => body_start + nbytes,
            _ => body_start + nbytes + padding_for(nbytes),
        };

        if self.header.subsys_offset == Some(offset) {
            trace!("Skipping subsystem data block at offset {}", offset);
            return Ok(Some(RecordRead {
                next_offset,
                entry: None,
            }));
        }

        let entry = match data_type {
            Some(DataType::Matrix) if nbytes > 0 => {
                let mut body = (&mut self.reader).take(nbytes);
                Some(parse_matrix(&mut body, endian, offset, false, with_data)?)
            }
            Some(DataType::Compressed) => {
                let mut inflated = ZlibDecoder::new((&mut self.reader).take(nbytes));
                let (inner_code, inner_len) = read_tag(&mut inflated, endian)
                    .map_err(|e| inflate_error(offset, e))?;
                if DataType::from_code(inner_code) != Some(DataType::Matrix) {
                    return Err(ContainerError::malformed(
                        offset,
                        format!("compressed element holds type {}, expected a matrix", inner_code),
                    ));
                }
                if inner_len == 0 {
                    None
                } else {
                    let mut body = inflated.take(u64::from(inner_len));
                    Some(parse_matrix(&mut body, endian, offset, true, with_data)?)
                }
            }
            _ => {
                trace!(
                    "Skipping top-level element of type {} ({} bytes) at offset {}",
                    code,
                    nbytes,
                    offset
                );
                None
            }
        };

        Ok(Some(RecordRead { next_offset, entry }))
    }
}

/// Decode a matrix body: flags, dimensions, name and (optionally) the real part
fn parse_matrix<S: Read>(
    src: &mut S,
    endian: Endian,
    offset: u64,
    compressed: bool,
    with_data: bool,
) -> Result<(VariableInfo, Option<Vec<f32>>), ContainerError> {
    let flags = read_element(src, endian, offset)?;
    if DataType::from_code(flags.code) != Some(DataType::UInt32) || flags.bytes.len() < 8 {
        return Err(ContainerError::malformed(offset, "missing array flags"));
    }
    let flag_word = endian.read_u32(&flags.bytes[..4]);
    let class = ArrayClass::from_code((flag_word & 0xFF) as u8);
    let complex = flag_word & COMPLEX_FLAG != 0;

    let dims_element = read_element(src, endian, offset)?;
    if DataType::from_code(dims_element.code) != Some(DataType::Int32)
        || dims_element.bytes.len() % 4 != 0
    {
        return Err(ContainerError::malformed(offset, "missing dimensions"));
    }
    let dims = dims_element
        .bytes
        .chunks_exact(4)
        .map(|chunk| {
            let dim = endian.read_i32(chunk);
            usize::try_from(dim).map_err(|_| {
                ContainerError::malformed(offset, format!("negative dimension {}", dim))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name_element = read_element(src, endian, offset)?;
    let name = String::from_utf8(name_element.bytes)
        .map_err(|_| ContainerError::malformed(offset, "variable name is not valid UTF-8"))?
        .trim_end_matches('\0')
        .to_string();

    let info = VariableInfo {
        name,
        class,
        dims,
        complex,
        offset,
        compressed,
    };

    if !with_data {
        trace!("Record '{}' at offset {} (metadata only)", info.name, offset);
        return Ok((info, None));
    }

    if !class.is_numeric() {
        return Err(ContainerError::UnsupportedClass {
            name: info.name,
            class: class.name(),
        });
    }

    let expected = info.checked_sample_count().ok_or_else(|| {
        ContainerError::malformed(
            offset,
            format!("'{}' declares dimensions {:?} that overflow", info.name, info.dims),
        )
    })?;

    let real = read_element(src, endian, offset)?;
    let data = decode_numeric(real.code, &real.bytes, endian, &info.name, offset)?;
    if data.len() != expected {
        return Err(ContainerError::malformed(
            offset,
            format!(
                "'{}' declares {} elements but holds {}",
                info.name,
                expected,
                data.len()
            ),
        ));
    }

    trace!("Record '{}' at offset {}: {} samples", info.name, offset, data.len());
    Ok((info, Some(data)))
}

fn inflate_error(offset: u64, err: io::Error) -> ContainerError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ContainerError::malformed(offset, "compressed element ends before its matrix tag")
    } else {
        ContainerError::Io(err)
    }
}
