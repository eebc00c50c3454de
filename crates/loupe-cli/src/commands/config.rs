use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use loupe_core::config::ReviewConfig;

use super::load_config;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Validate an existing config file instead of printing defaults
    #[arg(long, conflicts_with = "output")]
    pub check: Option<PathBuf>,
}

/// Print or save a full default ReviewConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    if let Some(ref path) = args.check {
        load_config(Some(path))?;
        println!("{} is valid", path.display());
        return Ok(());
    }

    let toml_str = toml::to_string_pretty(&ReviewConfig::default())?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
