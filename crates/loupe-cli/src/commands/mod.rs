pub mod config;
pub mod info;
pub mod layout;
pub mod sync;

use std::path::Path;

use anyhow::{bail, Context, Result};
use loupe_core::config::ReviewConfig;
use loupe_core::geometry::{is_valid_size, Size};
use tracing::debug;

/// Load a TOML review config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ReviewConfig> {
    let Some(path) = path else {
        return Ok(ReviewConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ReviewConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config.validate()?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// clap value parser for `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> Result<Size> {
    let Some((w, h)) = s.split_once(['x', 'X']) else {
        bail!("expected WIDTHxHEIGHT, got '{s}'");
    };
    let size = Size::new(w.trim().parse()?, h.trim().parse()?);
    if !is_valid_size(size) {
        bail!("size must be positive, got '{s}'");
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_accepts_both_separators() {
        assert_eq!(parse_size("1280x800").unwrap(), Size::new(1280.0, 800.0));
        assert_eq!(parse_size("640X480").unwrap(), Size::new(640.0, 480.0));
    }

    #[test]
    fn parse_size_rejects_garbage() {
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax3").is_err());
    }
}
