use std::path::PathBuf;

use loupe_core::config::ReviewConfig;
use loupe_core::face::Face;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Decode an image and read its detection sidecar.
    LoadImage { path: PathBuf },

    /// Re-read the detection sidecar of an already loaded image.
    ReloadFaces { image: PathBuf },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    ImageLoaded {
        path: PathBuf,
        image: egui::ColorImage,
    },
    ImageFailed {
        path: PathBuf,
        message: String,
    },
    FacesLoaded {
        faces: Vec<Face>,
    },
    ConfigImported {
        config: ReviewConfig,
    },
    Error {
        message: String,
    },
    Log {
        message: String,
    },
}
