use std::path::PathBuf;

use crate::container::ContainerError;
use crate::pattern::PatternError;

/// Errors that can occur while building or querying a channel store
///
/// The display text of the construction errors is fixed and matched verbatim
/// by callers; details are carried in the variant fields.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The backing file is missing, unreadable or not a Level 5 MAT-file
    #[error("file does not exist")]
    FileOpen {
        /// Path passed to `open`
        path: PathBuf,
        /// Underlying open or header error
        #[source]
        source: ContainerError,
    },

    /// A channel's length disagrees with the established cardinality
    #[error("columns differ in size")]
    CardinalityMismatch {
        /// Offending channel
        name: String,
        /// Cardinality set by the first absorbed channel
        expected: usize,
        /// Sample count of the offending channel
        actual: usize,
    },

    /// A pattern was supplied but no variable name matched it
    #[error("no channels matched")]
    NoMatch {
        /// The pattern that matched nothing
        pattern: String,
    },

    /// Lookup of a channel name that is not in the store
    #[error("channel not found: {0}")]
    KeyNotFound(String),

    /// The pattern could not be compiled or evaluated
    #[error("invalid channel pattern: {0}")]
    Pattern(#[from] PatternError),

    /// A record could not be decoded or is not a float vector
    #[error("container error: {0}")]
    Container(#[from] ContainerError),
}
