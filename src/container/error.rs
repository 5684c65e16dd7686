/// Errors that can occur while decoding a MAT-file
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The 128-byte file header is missing or not a Level 5 header
    #[error("Invalid MAT-file header: {0}")]
    InvalidHeader(String),

    /// A data element is truncated or structurally inconsistent
    #[error("Malformed data element at offset {offset}: {reason}")]
    Malformed {
        /// Byte offset of the top-level record being decoded
        offset: u64,
        /// What was wrong with it
        reason: String,
    },

    /// The variable's array class cannot be represented as a float channel
    #[error("Unsupported array class for '{name}': {class}")]
    UnsupportedClass {
        /// Variable name
        name: String,
        /// Human-readable class name
        class: String,
    },

    /// The element storage type is not a numeric MAT type
    #[error("Unsupported storage type {code} for '{name}'")]
    UnsupportedStorage {
        /// Variable name
        name: String,
        /// Raw `mi*` type code
        code: u32,
    },

    /// Complex variables carry an imaginary part and are not channels
    #[error("Complex variable '{0}' is not supported")]
    Complex(String),

    /// The variable has more than one non-singleton dimension
    #[error("Variable '{name}' is not a vector (dimensions {dims:?})")]
    NotAVector {
        /// Variable name
        name: String,
        /// Declared dimensions
        dims: Vec<usize>,
    },

    /// No record with the requested name exists in the file
    #[error("Variable not found: {0}")]
    VariableNotFound(String),
}

impl ContainerError {
    pub(crate) fn malformed(offset: u64, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }
}
