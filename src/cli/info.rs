use anyhow::{Context, Result};
use matchannels::{ChannelConfig, MatChannels};
use std::path::PathBuf;

/// Load channels and print their summary
pub fn run(file: PathBuf, config: ChannelConfig, json: bool) -> Result<()> {
    let channels = MatChannels::open_with_config(&file, config)
        .with_context(|| format!("Failed to load channels from {}", file.display()))?;

    let summary = channels.summary();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print!("{}", summary);
    }

    Ok(())
}
