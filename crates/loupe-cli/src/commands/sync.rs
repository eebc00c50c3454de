use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use loupe_core::geometry::{Size, Vec2};
use loupe_core::sync::{SyncChannel, SyncMessage, SyncRole};
use loupe_core::timing::SystemClock;
use loupe_core::viewport::Viewport;

use super::{load_config, parse_size};
use crate::summary::print_view_summary;

#[derive(Args)]
pub struct SyncArgs {
    #[command(subcommand)]
    pub action: SyncAction,

    /// Review config TOML
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum SyncAction {
    /// Build the wire message for a view
    Encode(EncodeArgs),
    /// Apply a wire message to a peer view and print the result
    Apply(ApplyArgs),
}

#[derive(Args)]
pub struct EncodeArgs {
    /// Image dimensions
    #[arg(long, value_parser = parse_size)]
    pub dimensions: Size,

    /// Surface size
    #[arg(long, value_parser = parse_size, default_value = "1280x800")]
    pub surface: Size,

    /// Manual zoom factor (auto-fit when omitted)
    #[arg(long)]
    pub zoom: Option<f64>,

    #[arg(long, default_value = "0")]
    pub scroll_x: f64,

    #[arg(long, default_value = "0")]
    pub scroll_y: f64,

    /// Mark the message as coming from the linked original view
    #[arg(long)]
    pub secondary: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Wire message, e.g. '{"zoom":2.0,"x":0.05,"y":0.03,"slave":0}'
    pub message: String,

    /// Peer image dimensions
    #[arg(long, value_parser = parse_size)]
    pub dimensions: Size,

    /// Peer surface size
    #[arg(long, value_parser = parse_size, default_value = "1280x800")]
    pub surface: Size,
}

pub fn run(args: &SyncArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut viewport = Viewport::new(config.zoom.clone());

    match &args.action {
        SyncAction::Encode(enc) => {
            load_view(&mut viewport, enc.dimensions, enc.surface)?;
            if let Some(zoom) = enc.zoom {
                viewport.set_zoom(zoom);
                viewport.set_scroll_offset(Vec2::new(enc.scroll_x, enc.scroll_y));
            }
            let role = if enc.secondary {
                SyncRole::Secondary
            } else {
                SyncRole::Primary
            };
            println!("{}", SyncMessage::from_viewport(&viewport, role).to_json()?);
        }
        SyncAction::Apply(apply) => {
            load_view(&mut viewport, apply.dimensions, apply.surface)?;
            let msg = SyncMessage::from_json(&apply.message)?;
            let mut channel = SyncChannel::new(SystemClock::new(), SyncRole::Secondary, &config.sync);
            if !channel.receive(&mut viewport, &msg) {
                bail!("Message was not applied");
            }
            channel.on_paint(&mut viewport);
            print_view_summary(&viewport);
        }
    }
    Ok(())
}

fn load_view(viewport: &mut Viewport, dimensions: Size, surface: Size) -> Result<()> {
    viewport.set_surface_size(surface);
    if !viewport.set_natural_size(dimensions) {
        bail!("Invalid image dimensions {}x{}", dimensions.width, dimensions.height);
    }
    Ok(())
}
