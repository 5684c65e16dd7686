use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::Path;

use log::{debug, info, trace};

use super::{ChannelConfig, ChannelError, MatChannels};
use crate::container::MatReader;
use crate::pattern::ChannelPattern;

impl MatChannels {
    /// Load the channels of a MAT-file
    ///
    /// An empty `pattern` absorbs every variable. Otherwise only variables
    /// whose name contains a case-insensitive match are read, and a pattern
    /// that matches nothing fails with [`ChannelError::NoMatch`].
    pub fn open<P: AsRef<Path>>(path: P, pattern: &str) -> Result<Self, ChannelError> {
        Self::open_with_config(path, ChannelConfig::default().with_pattern(pattern))
    }

    /// Load the channels of a MAT-file with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ChannelConfig,
    ) -> Result<Self, ChannelError> {
        let path = path.as_ref();

        let mut reader = MatReader::open_with_capacity(path, config.buffer_capacity).map_err(
            |source| ChannelError::FileOpen {
                path: path.to_path_buf(),
                source,
            },
        )?;

        let pattern = config
            .effective_pattern()
            .map(ChannelPattern::new)
            .transpose()?;

        let mut channels = MatChannels {
            path: path.to_path_buf(),
            pattern: pattern.as_ref().map(|p| p.as_str().to_string()),
            data: BTreeMap::new(),
            cardinality: None,
        };

        // Any early return drops `reader`, which closes the file.
        match &pattern {
            None => channels.absorb_all(&mut reader)?,
            Some(pattern) => {
                channels.absorb_matching(&mut reader, pattern)?;
                if channels.is_empty() {
                    return Err(ChannelError::NoMatch {
                        pattern: pattern.as_str().to_string(),
                    });
                }
            }
        }
        reader.close();

        info!(
            "Loaded {} channels x {} samples from {}",
            channels.number_of_channels(),
            channels.size(),
            path.display()
        );

        Ok(channels)
    }

    /// Read every record with its data and absorb it
    fn absorb_all<R: Read + Seek>(
        &mut self,
        reader: &mut MatReader<R>,
    ) -> Result<(), ChannelError> {
        while let Some(variable) = reader.next_variable()? {
            variable.info.ensure_channel()?;
            self.update_cardinality(&variable.info.name, variable.info.sample_count())?;

            let (info, samples) = variable.into_parts();
            self.absorb(info.name, samples);
        }
        Ok(())
    }

    /// Scan record metadata and read data only for names matching `pattern`
    fn absorb_matching<R: Read + Seek>(
        &mut self,
        reader: &mut MatReader<R>,
        pattern: &ChannelPattern,
    ) -> Result<(), ChannelError> {
        while let Some(info) = reader.next_info()? {
            if !pattern.is_match(&info.name)? {
                trace!("'{}' does not match '{}'", info.name, pattern);
                continue;
            }

            info.ensure_channel()?;
            self.update_cardinality(&info.name, info.sample_count())?;

            let (info, samples) = reader.read_variable(&info)?.into_parts();
            self.absorb(info.name, samples);
        }
        Ok(())
    }

    fn update_cardinality(&mut self, name: &str, count: usize) -> Result<(), ChannelError> {
        match self.cardinality {
            None => {
                debug!("Cardinality set to {} by '{}'", count, name);
                self.cardinality = Some(count);
                Ok(())
            }
            Some(expected) if expected != count => Err(ChannelError::CardinalityMismatch {
                name: name.to_string(),
                expected,
                actual: count,
            }),
            Some(_) => Ok(()),
        }
    }

    fn absorb(&mut self, name: String, mut samples: Vec<f32>) {
        samples.truncate(self.size());
        debug!("Absorbed '{}' ({} samples)", name, samples.len());
        if self.data.insert(name, samples).is_some() {
            debug!("Duplicate channel name replaced by the later record");
        }
    }
}
