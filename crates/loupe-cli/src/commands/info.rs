use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use loupe_core::io::faces::{read_faces, read_faces_for_image, sidecar_path};
use loupe_core::io::image_info::read_image_info;

use super::load_config;
use crate::summary::print_info_summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,

    /// Detection sidecar (defaults to <image>.faces.json)
    #[arg(long)]
    pub faces: Option<PathBuf>,

    /// Review config TOML used for confidence bands
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let info = read_image_info(&args.file)?;

    let (faces_path, faces) = match &args.faces {
        Some(path) => (path.clone(), read_faces(path)?),
        None => (sidecar_path(&args.file), read_faces_for_image(&args.file)?),
    };

    print_info_summary(&info, &faces_path, &faces, &config.confidence);
    Ok(())
}
