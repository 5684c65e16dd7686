//! # Channel store
//!
//! [`MatChannels`] is an immutable, in-memory view of the float vectors in a
//! MAT-file, keyed by variable name. All channels share one length, the
//! store's *cardinality*.
//!
//! ## Example
//!
//! ```rust,no_run
//! use matchannels::channels::MatChannels;
//!
//! let log = MatChannels::open("session.mat", "(?<!team_)pmanifold|anathrott|rpm")?;
//!
//! println!("{} channels x {} samples", log.number_of_channels(), log.size());
//! for (name, samples) in &log {
//!     println!("{}: first sample {:?}", name, samples.first());
//! }
//!
//! let pmanifold = log.at("L001_Pmanifold")?;
//! # let _ = pmanifold;
//! # Ok::<(), matchannels::channels::ChannelError>(())
//! ```
//!
//! ## `size()` is not the channel count
//!
//! [`MatChannels::size`] returns the number of samples per channel. Use
//! [`MatChannels::number_of_channels`] for the number of channels.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Index;
use std::path::{Path, PathBuf};

use crate::pattern::ChannelPattern;

mod config;
mod error;
mod ingest;
mod summary;


pub use config::ChannelConfig;
pub use error::ChannelError;
pub use summary::{ChannelStats, ChannelSummary};

/// Iterator over `(name, samples)` pairs in name order
pub type Iter<'a> = btree_map::Iter<'a, String, Vec<f32>>;

/// Named float channels of equal length, loaded from a MAT-file
///
/// Built once by [`MatChannels::open`]; read-only afterwards. Iteration and
/// [`keys`](MatChannels::keys) follow byte-wise name order.
#[derive(Debug, Clone)]
pub struct MatChannels {
    path: PathBuf,
    pattern: Option<String>,
    data: BTreeMap<String, Vec<f32>>,
    /// Set by the first absorbed channel, fixed afterwards
    cardinality: Option<usize>,
}

impl MatChannels {
    /// Channel names in iteration order
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Alias of [`keys`](Self::keys)
    pub fn channels(&self) -> Vec<String> {
        self.keys()
    }

    /// Samples of the channel named exactly `name`
    pub fn at(&self, name: &str) -> Result<&[f32], ChannelError> {
        self.get(name)
            .ok_or_else(|| ChannelError::KeyNotFound(name.to_string()))
    }

    /// Alias of [`at`](Self::at)
    pub fn channel(&self, name: &str) -> Result<&[f32], ChannelError> {
        self.at(name)
    }

    /// Samples of the channel named exactly `name`, if present
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.data.get(name).map(Vec::as_slice)
    }

    /// Whether a channel named exactly `name` is present
    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// First channel, in iteration order, whose name contains a match for `pattern`
    ///
    /// The pattern is case-insensitive. This is a linear scan over all names.
    pub fn find(&self, pattern: &str) -> Result<Option<(&str, &[f32])>, ChannelError> {
        let pattern = ChannelPattern::new(pattern)?;
        for (name, samples) in &self.data {
            if pattern.is_match(name)? {
                return Ok(Some((name.as_str(), samples.as_slice())));
            }
        }
        Ok(None)
    }

    /// Iterate over `(name, samples)` pairs
    pub fn iter(&self) -> Iter<'_> {
        self.data.iter()
    }

    /// True if no channel was absorbed
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples per channel (the cardinality), 0 for an empty store
    pub fn size(&self) -> usize {
        self.cardinality.unwrap_or(0)
    }

    /// Number of distinct channels
    pub fn number_of_channels(&self) -> usize {
        self.data.len()
    }

    /// Path the store was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name filter used at construction, if any
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

impl PartialEq for MatChannels {
    /// Stores are equal when their name → samples mappings are equal
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Index<&str> for MatChannels {
    type Output = [f32];

    /// # Panics
    ///
    /// Panics if no channel is named `name`; use [`MatChannels::at`] to handle
    /// absence.
    fn index(&self, name: &str) -> &[f32] {
        match self.get(name) {
            Some(samples) => samples,
            None => panic!("channel not found: {}", name),
        }
    }
}

impl<'a> IntoIterator for &'a MatChannels {
    type Item = (&'a String, &'a Vec<f32>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
