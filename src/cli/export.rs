use anyhow::{Context, Result};
use log::info;
use matchannels::{ChannelConfig, MatChannels};
use std::path::{Path, PathBuf};

/// Export the selected channels as CSV columns
pub fn run(input: PathBuf, output: PathBuf, config: ChannelConfig) -> Result<()> {
    let channels = MatChannels::open_with_config(&input, config)
        .with_context(|| format!("Failed to load channels from {}", input.display()))?;

    write_csv(&channels, &output)?;

    info!(
        "Wrote {} channels x {} samples to {}",
        channels.number_of_channels(),
        channels.size(),
        output.display()
    );
    Ok(())
}

/// Write one header row of channel names followed by one row per sample
fn write_csv(channels: &MatChannels, output: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    writer.write_record(channels.keys())?;

    let columns: Vec<&Vec<f32>> = channels.iter().map(|(_, samples)| samples).collect();
    for row in 0..channels.size() {
        writer.write_record(columns.iter().map(|column| column[row].to_string()))?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Little-endian MAT-file holding uncompressed `single` column vectors
    fn mat_bytes(vars: &[(&str, &[f32])]) -> Vec<u8> {
        let mut out = b"MATLAB 5.0 MAT-file".to_vec();
        out.resize(124, b' ');
        out.extend_from_slice(&0x0100u16.to_le_bytes());
        out.extend_from_slice(b"IM");

        for (name, values) in vars {
            let mut body = Vec::new();
            for word in [6u32, 8, 7, 0, 5, 8, values.len() as u32, 1] {
                body.extend_from_slice(&word.to_le_bytes());
            }
            body.extend_from_slice(&1u32.to_le_bytes());
            body.extend_from_slice(&(name.len() as u32).to_le_bytes());
            body.extend_from_slice(name.as_bytes());
            body.resize(body.len().div_ceil(8) * 8, 0);
            body.extend_from_slice(&7u32.to_le_bytes());
            body.extend_from_slice(&((values.len() * 4) as u32).to_le_bytes());
            for v in values.iter() {
                body.extend_from_slice(&v.to_le_bytes());
            }
            body.resize(body.len().div_ceil(8) * 8, 0);

            out.extend_from_slice(&14u32.to_le_bytes());
            out.extend_from_slice(&(body.len() as u32).to_le_bytes());
            out.extend(body);
        }
        out
    }

    #[test]
    fn test_export_writes_columns() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("session.mat");
        let output = dir.path().join("session.csv");
        std::fs::write(
            &input,
            mat_bytes(&[("speed", &[1.0, 2.0, 3.0]), ("accel", &[0.5, 0.25, 0.0])]),
        )
        .unwrap();

        run(input, output.clone(), ChannelConfig::default()).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["accel", "speed"]);

        let rows: Vec<Vec<f32>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|v| v.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows, vec![vec![0.5, 1.0], vec![0.25, 2.0], vec![0.0, 3.0]]);
    }

    #[test]
    fn test_export_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            dir.path().join("missing.mat"),
            dir.path().join("out.csv"),
            ChannelConfig::default(),
        )
        .unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string() == "file does not exist"));
        assert!(!dir.path().join("out.csv").exists());
    }
}
