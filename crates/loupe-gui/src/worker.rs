use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::{Context, Result};
use loupe_core::io::faces::{read_faces_for_image, sidecar_path};
use tracing::{debug, warn};

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> std::io::Result<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("loupe-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })?;

    Ok(cmd_tx)
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_log(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Log { message: msg.into() });
}

fn send_error(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Error { message: msg.into() });
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadImage { path } => {
                if handle_load_image(&path, &tx, &ctx) {
                    handle_load_faces(&path, &tx, &ctx);
                }
            }
            WorkerCommand::ReloadFaces { image } => {
                handle_load_faces(&image, &tx, &ctx);
            }
        }
    }
    debug!("Worker channel closed");
}

fn decode_image(path: &Path) -> Result<egui::ColorImage> {
    let decoded = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgba8();
    let size = [decoded.width() as usize, decoded.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw()))
}

fn handle_load_image(path: &Path, tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context) -> bool {
    let start = Instant::now();
    match decode_image(path) {
        Ok(image) => {
            debug!(path = %path.display(), elapsed = ?start.elapsed(), "Image decoded");
            send(tx, ctx, WorkerResult::ImageLoaded {
                path: path.to_path_buf(),
                image,
            });
            true
        }
        Err(e) => {
            warn!("Image load failed: {e:#}");
            send(tx, ctx, WorkerResult::ImageFailed {
                path: path.to_path_buf(),
                message: format!("{e:#}"),
            });
            false
        }
    }
}

fn handle_load_faces(image: &Path, tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context) {
    match read_faces_for_image(image) {
        Ok(faces) => {
            if faces.is_empty() {
                send_log(
                    tx,
                    ctx,
                    format!("No detections ({} not found or empty)", sidecar_path(image).display()),
                );
            }
            send(tx, ctx, WorkerResult::FacesLoaded { faces });
        }
        Err(e) => send_error(
            tx,
            ctx,
            format!("Failed to read {}: {e}", sidecar_path(image).display()),
        ),
    }
}
