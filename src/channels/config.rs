use serde::Deserialize;

use crate::container::DEFAULT_BUFFER_CAPACITY;

/// Configuration for opening a channel store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Name filter; `None` or an empty string absorbs every variable
    pub pattern: Option<String>,
    /// Capacity of the buffered file reader in bytes
    pub buffer_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            pattern: None,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl ChannelConfig {
    /// Set the name filter
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the read buffer capacity
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// The filter to apply, treating an empty pattern as no filter
    pub fn effective_pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }
}
