use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use loupe_core::face::DisplayMode;
use loupe_core::geometry::{Size, Vec2};
use loupe_core::io::faces::{read_faces, read_faces_for_image};
use loupe_core::io::image_info::read_image_info;
use loupe_core::layout::{AnnotationLayout, LayoutRequest, MonospaceMeasure};
use loupe_core::viewport::Viewport;
use serde::Serialize;
use tracing::debug;

use super::{load_config, parse_size};
use crate::summary::print_layout_summary;

#[derive(Args)]
pub struct LayoutArgs {
    /// Input image file
    pub image: PathBuf,

    /// Detection sidecar (defaults to <image>.faces.json)
    #[arg(long)]
    pub faces: Option<PathBuf>,

    /// Use these image dimensions instead of reading the file header
    #[arg(long, value_parser = parse_size)]
    pub dimensions: Option<Size>,

    /// Surface size
    #[arg(long, value_parser = parse_size, default_value = "1280x800")]
    pub surface: Size,

    /// Manual zoom factor (auto-fit when omitted)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Horizontal scroll offset in surface pixels (manual zoom only)
    #[arg(long, default_value = "0")]
    pub scroll_x: f64,

    /// Vertical scroll offset in surface pixels (manual zoom only)
    #[arg(long, default_value = "0")]
    pub scroll_y: f64,

    /// Annotate only this face
    #[arg(long)]
    pub active: Option<usize>,

    /// Emit placements as JSON
    #[arg(long)]
    pub json: bool,

    /// Review config TOML
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &LayoutArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let natural = match args.dimensions {
        Some(size) => size,
        None => read_image_info(&args.image)?.dimensions(),
    };
    let faces = match &args.faces {
        Some(path) => read_faces(path)?,
        None => read_faces_for_image(&args.image)?,
    };

    let mut viewport = Viewport::new(config.zoom.clone());
    viewport.set_surface_size(args.surface);
    if !viewport.set_natural_size(natural) {
        bail!("Invalid image dimensions {}x{}", natural.width, natural.height);
    }
    if let Some(zoom) = args.zoom {
        viewport.set_zoom(zoom);
        viewport.set_scroll_offset(Vec2::new(args.scroll_x, args.scroll_y));
    }

    let mode = args.active.map_or(DisplayMode::All, DisplayMode::Single);
    let request = LayoutRequest {
        faces: &faces,
        transform: viewport.transform(),
        natural_size: natural,
        mode,
    };
    let layout = AnnotationLayout::compute(
        &request,
        &config.layout,
        &config.confidence,
        &MonospaceMeasure::default(),
    );

    debug!(
        faces = layout.faces.len(),
        fallbacks = layout.fallback_count(),
        buffer = layout.buffer,
        "Layout computed"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&LayoutReport::new(&viewport, &layout))?);
    } else {
        print_layout_summary(&viewport, mode, &layout);
    }
    Ok(())
}

/// JSON shape of `loupe layout --json`.
#[derive(Serialize)]
struct LayoutReport<'a> {
    zoom: f64,
    mode: String,
    scroll: Vec2,
    #[serde(flatten)]
    layout: &'a AnnotationLayout,
}

impl<'a> LayoutReport<'a> {
    fn new(viewport: &Viewport, layout: &'a AnnotationLayout) -> Self {
        Self {
            zoom: viewport.effective_scale(),
            mode: viewport.mode().to_string(),
            scroll: viewport.scroll_offset(),
            layout,
        }
    }
}
