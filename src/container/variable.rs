use super::element::ArrayClass;
use super::ContainerError;

/// Metadata of one top-level variable record, read without its data
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    /// Variable name as stored in the file
    pub name: String,
    /// MATLAB array class
    pub class: ArrayClass,
    /// Declared dimensions (at least two for well-formed files)
    pub dims: Vec<usize>,
    /// Whether an imaginary part follows the real part
    pub complex: bool,
    /// Byte offset of the record's tag from the start of the file
    pub offset: u64,
    /// Whether the record is stored as a zlib-compressed element
    pub compressed: bool,
}

impl VariableInfo {
    /// Number of elements (product of the dimensions)
    ///
    /// For a vector this is its length along the sample axis. Saturates at
    /// `usize::MAX` when the declared shape overflows.
    pub fn sample_count(&self) -> usize {
        self.checked_sample_count().unwrap_or(usize::MAX)
    }

    /// Number of elements, or `None` if the product of the dimensions overflows
    pub fn checked_sample_count(&self) -> Option<usize> {
        if self.dims.is_empty() {
            return Some(0);
        }
        self.dims
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    /// True when at most one dimension exceeds 1
    pub fn is_vector(&self) -> bool {
        self.dims.iter().filter(|&&d| d > 1).count() <= 1
    }

    /// Check that the record can back a float channel
    pub fn ensure_channel(&self) -> Result<(), ContainerError> {
        if !self.class.is_float() {
            return Err(ContainerError::UnsupportedClass {
                name: self.name.clone(),
                class: self.class.name(),
            });
        }
        if self.complex {
            return Err(ContainerError::Complex(self.name.clone()));
        }
        if !self.is_vector() {
            return Err(ContainerError::NotAVector {
                name: self.name.clone(),
                dims: self.dims.clone(),
            });
        }
        Ok(())
    }
}

/// A fully decoded numeric variable
///
/// Only the real part is kept, converted to `f32` in column-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Record metadata
    pub info: VariableInfo,
    /// Real part of the data
    pub data: Vec<f32>,
}

impl Variable {
    /// Variable name
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Decoded samples
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    /// Split into metadata and owned samples
    pub fn into_parts(self) -> (VariableInfo, Vec<f32>) {
        (self.info, self.data)
    }
}
