use std::fmt;

use serde::Serialize;

use super::MatChannels;

/// Per-channel statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStats {
    /// Channel name
    pub name: String,
    /// Smallest non-NaN sample
    pub min: Option<f32>,
    /// Largest non-NaN sample
    pub max: Option<f32>,
    /// Mean of the non-NaN samples
    pub mean: Option<f64>,
}

/// Summary of a loaded channel store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    /// Source file
    pub path: String,
    /// Name filter used at construction
    pub pattern: Option<String>,
    /// Number of channels
    pub number_of_channels: usize,
    /// Samples per channel
    pub cardinality: usize,
    /// Statistics in iteration order
    pub channels: Vec<ChannelStats>,
}

impl ChannelStats {
    fn compute(name: &str, samples: &[f32]) -> Self {
        let present: Vec<f32> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
        if present.is_empty() {
            return Self {
                name: name.to_string(),
                min: None,
                max: None,
                mean: None,
            };
        }

        let min = present.iter().copied().fold(f32::INFINITY, f32::min);
        let max = present.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = present.iter().map(|&v| v as f64).sum::<f64>() / present.len() as f64;

        Self {
            name: name.to_string(),
            min: Some(min),
            max: Some(max),
            mean: Some(mean),
        }
    }
}

impl MatChannels {
    /// Compute summary statistics over every channel
    pub fn summary(&self) -> ChannelSummary {
        ChannelSummary {
            path: self.path.display().to_string(),
            pattern: self.pattern.clone(),
            number_of_channels: self.number_of_channels(),
            cardinality: self.size(),
            channels: self
                .iter()
                .map(|(name, samples)| ChannelStats::compute(name, samples))
                .collect(),
        }
    }
}

impl fmt::Display for ChannelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.path)?;
        if let Some(pattern) = &self.pattern {
            writeln!(f, "Pattern: {}", pattern)?;
        }
        writeln!(f, "Channels: {}", self.number_of_channels)?;
        writeln!(f, "Samples per channel: {}", self.cardinality)?;
        for stats in &self.channels {
            match (stats.min, stats.max, stats.mean) {
                (Some(min), Some(max), Some(mean)) => writeln!(
                    f,
                    "  {:<32} min {:>12.4} max {:>12.4} mean {:>12.4}",
                    stats.name, min, max, mean
                )?,
                _ => writeln!(f, "  {:<32} (no samples)", stats.name)?,
            }
        }
        Ok(())
    }
}
