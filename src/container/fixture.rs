//! Test-only MAT Level 5 writer used to build fixture files

use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::header::Endian;

/// One variable to be written into a fixture file
#[derive(Debug, Clone)]
pub(crate) struct FixtureVar {
    pub name: String,
    pub class: u8,
    pub dims: Vec<i32>,
    pub storage: u32,
    pub values: Vec<f64>,
    pub complex: bool,
    pub compressed: bool,
}

impl FixtureVar {
    /// Column vector of class `single`
    pub fn single(name: &str, values: &[f32]) -> Self {
        Self {
            name: name.to_string(),
            class: 7,
            dims: vec![values.len() as i32, 1],
            storage: 7,
            values: values.iter().map(|&v| v as f64).collect(),
            complex: false,
            compressed: false,
        }
    }

    /// Column vector of class `double`
    pub fn double(name: &str, values: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            class: 6,
            dims: vec![values.len() as i32, 1],
            storage: 9,
            values: values.to_vec(),
            complex: false,
            compressed: false,
        }
    }

    /// Character array stored as `miUINT16` code units
    pub fn text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            class: 4,
            dims: vec![1, text.len() as i32],
            storage: 4,
            values: text.bytes().map(|b| b as f64).collect(),
            complex: false,
            compressed: false,
        }
    }

    pub fn with_class(mut self, class: u8) -> Self {
        self.class = class;
        self
    }

    pub fn with_storage(mut self, storage: u32) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_dims(mut self, dims: &[i32]) -> Self {
        self.dims = dims.to_vec();
        self
    }

    pub fn complex(mut self) -> Self {
        self.complex = true;
        self
    }

    pub fn compressed(mut self) -> Self {
        self.compressed = true;
        self
    }
}

/// Builder producing the bytes of a complete MAT-file
#[derive(Debug, Clone)]
pub(crate) struct MatBuilder {
    endian: Endian,
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
enum Part {
    Var(FixtureVar),
    Raw(Vec<u8>),
}

impl MatBuilder {
    pub fn new() -> Self {
        Self {
            endian: Endian::Little,
            parts: Vec::new(),
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.endian = Endian::Big;
        self
    }

    pub fn var(mut self, var: FixtureVar) -> Self {
        self.parts.push(Part::Var(var));
        self
    }

    /// Append a top-level element of arbitrary type
    pub fn raw_element(mut self, code: u32, payload: &[u8]) -> Self {
        let mut bytes = Vec::new();
        self.put_u32(&mut bytes, code);
        self.put_u32(&mut bytes, payload.len() as u32);
        bytes.extend_from_slice(payload);
        pad(&mut bytes);
        self.parts.push(Part::Raw(bytes));
        self
    }

    /// Append bytes verbatim (e.g. a truncated record)
    pub fn raw_bytes(mut self, bytes: &[u8]) -> Self {
        self.parts.push(Part::Raw(bytes.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = self.header();
        for part in &self.parts {
            match part {
                Part::Var(var) => out.extend(self.record(var)),
                Part::Raw(bytes) => out.extend_from_slice(bytes),
            }
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }

    /// Matrix body of one variable, without its enclosing tag
    pub fn matrix_body(&self, var: &FixtureVar) -> Vec<u8> {
        let mut body = Vec::new();

        let mut flags = var.class as u32;
        if var.complex {
            flags |= 0x0800;
        }
        self.put_u32(&mut body, 6);
        self.put_u32(&mut body, 8);
        self.put_u32(&mut body, flags);
        self.put_u32(&mut body, 0);

        self.put_u32(&mut body, 5);
        self.put_u32(&mut body, (var.dims.len() * 4) as u32);
        for &dim in &var.dims {
            self.put_u32(&mut body, dim as u32);
        }
        pad(&mut body);

        let name = var.name.as_bytes();
        if !name.is_empty() && name.len() <= 4 {
            self.put_u32(&mut body, ((name.len() as u32) << 16) | 1);
            let mut inline = [0u8; 4];
            inline[..name.len()].copy_from_slice(name);
            body.extend_from_slice(&inline);
        } else {
            self.put_u32(&mut body, 1);
            self.put_u32(&mut body, name.len() as u32);
            body.extend_from_slice(name);
            pad(&mut body);
        }

        let parts = if var.complex { 2 } else { 1 };
        for part in 0..parts {
            let payload = if part == 0 {
                self.encode(var.storage, &var.values)
            } else {
                self.encode(var.storage, &vec![0.0; var.values.len()])
            };
            self.put_u32(&mut body, var.storage);
            self.put_u32(&mut body, payload.len() as u32);
            body.extend(payload);
            pad(&mut body);
        }

        body
    }

    fn record(&self, var: &FixtureVar) -> Vec<u8> {
        let body = self.matrix_body(var);
        let mut matrix = Vec::new();
        self.put_u32(&mut matrix, 14);
        self.put_u32(&mut matrix, body.len() as u32);
        matrix.extend(body);

        if !var.compressed {
            return matrix;
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&matrix).unwrap();
        let deflated = encoder.finish().unwrap();

        let mut out = Vec::new();
        self.put_u32(&mut out, 15);
        self.put_u32(&mut out, deflated.len() as u32);
        out.extend(deflated);
        out
    }

    fn header(&self) -> Vec<u8> {
        let mut text = b"MATLAB 5.0 MAT-file, Platform: fixture, Created by: matchannels tests".to_vec();
        text.resize(116, b' ');
        text.extend_from_slice(&[b' '; 8]);
        match self.endian {
            Endian::Little => {
                text.extend_from_slice(&0x0100u16.to_le_bytes());
                text.extend_from_slice(b"IM");
            }
            Endian::Big => {
                text.extend_from_slice(&0x0100u16.to_be_bytes());
                text.extend_from_slice(b"MI");
            }
        }
        text
    }

    fn encode(&self, storage: u32, values: &[f64]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in values {
            let bytes: Vec<u8> = match (storage, self.endian) {
                (1, _) => vec![v as i8 as u8],
                (2, _) => vec![v as u8],
                (3, Endian::Little) => (v as i16).to_le_bytes().to_vec(),
                (3, Endian::Big) => (v as i16).to_be_bytes().to_vec(),
                (4, Endian::Little) => (v as u16).to_le_bytes().to_vec(),
                (4, Endian::Big) => (v as u16).to_be_bytes().to_vec(),
                (5, Endian::Little) => (v as i32).to_le_bytes().to_vec(),
                (5, Endian::Big) => (v as i32).to_be_bytes().to_vec(),
                (6, Endian::Little) => (v as u32).to_le_bytes().to_vec(),
                (6, Endian::Big) => (v as u32).to_be_bytes().to_vec(),
                (7, Endian::Little) => (v as f32).to_le_bytes().to_vec(),
                (7, Endian::Big) => (v as f32).to_be_bytes().to_vec(),
                (9, Endian::Little) => v.to_le_bytes().to_vec(),
                (9, Endian::Big) => v.to_be_bytes().to_vec(),
                (12, Endian::Little) => (v as i64).to_le_bytes().to_vec(),
                (12, Endian::Big) => (v as i64).to_be_bytes().to_vec(),
                (13, Endian::Little) => (v as u64).to_le_bytes().to_vec(),
                (13, Endian::Big) => (v as u64).to_be_bytes().to_vec(),
                (other, _) => panic!("fixture cannot encode storage type {}", other),
            };
            out.extend(bytes);
        }
        out
    }

    fn put_u32(&self, buf: &mut Vec<u8>, value: u32) {
        match self.endian {
            Endian::Little => buf.extend_from_slice(&value.to_le_bytes()),
            Endian::Big => buf.extend_from_slice(&value.to_be_bytes()),
        }
    }
}

fn pad(buf: &mut Vec<u8>) {
    while buf.len() % 8 != 0 {
        buf.push(0);
    }
}
