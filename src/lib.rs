//! # matchannels - Channel access for MATLAB MAT-files
//!
//! `matchannels` loads the named numeric vectors ("channels") of a MATLAB
//! Level 5 MAT-file into an immutable, queryable map, typically to pull a few
//! signals out of a wide sensor or data-logger export.
//!
//! ## Key Features
//!
//! - **Pattern selection**: pick channels with a case-insensitive regular
//!   expression (look-around supported) that matches anywhere in the name.
//!
//! - **Lazy reads**: with a pattern, unmatched variables are only inspected by
//!   name; their data is never decoded, even inside compressed records.
//!
//! - **Uniform length**: every channel in a store has the same number of
//!   samples. A file that violates this fails to load.
//!
//! - **Strict failures**: construction either returns a complete store or an
//!   error; there is no partial result.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matchannels::MatChannels;
//!
//! let log = MatChannels::open("session.mat", "pmanifold|rpm")?;
//!
//! assert_eq!(log.number_of_channels(), log.keys().len());
//! println!("samples per channel: {}", log.size());
//!
//! if let Some((name, samples)) = log.find("rpm")? {
//!     println!("{} peaks at {:?}", name, samples.iter().copied().fold(f32::MIN, f32::max));
//! }
//! # Ok::<(), matchannels::ChannelError>(())
//! ```
//!
//! ## Error Messages
//!
//! | Failure | Display text |
//! |---------|--------------|
//! | Missing, unreadable or non-MAT file | `file does not exist` |
//! | Channels of different lengths | `columns differ in size` |
//! | Pattern matched no variable | `no channels matched` |
//!
//! ## Architecture
//!
//! - [`channels`]: the channel store and its ingestion pipeline
//! - [`container`]: read-only MAT Level 5 decoder
//! - [`pattern`]: case-insensitive name patterns

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod channels;
pub mod container;
pub mod pattern;

pub use channels::{ChannelConfig, ChannelError, MatChannels};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::channels::{ChannelConfig, ChannelError, ChannelSummary, MatChannels};
    pub use crate::container::{ContainerError, MatReader, Variable, VariableInfo};
    pub use crate::pattern::{ChannelPattern, PatternError};
}
