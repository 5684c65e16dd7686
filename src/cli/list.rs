use anyhow::{Context, Result};
use matchannels::container::MatReader;
use std::path::PathBuf;

/// Print every variable record of a MAT-file, metadata only
pub fn run(file: PathBuf) -> Result<()> {
    let mut reader = MatReader::open(&file)
        .with_context(|| format!("Failed to open MAT-file {}", file.display()))?;

    println!("MAT-file: {}", file.display());
    println!("Header: {}", reader.header().description);
    println!();

    let mut count = 0usize;
    for info in reader.infos() {
        let info = info.context("Failed to read variable record")?;
        let dims: Vec<String> = info.dims.iter().map(|d| d.to_string()).collect();
        println!(
            "  {:<32} {:<8} {:>12}{}",
            info.name,
            info.class.name(),
            dims.join("x"),
            if info.compressed { "  (compressed)" } else { "" }
        );
        count += 1;
    }

    println!();
    println!("{} variables", count);
    Ok(())
}
