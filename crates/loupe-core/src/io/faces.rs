use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LoupeError, Result};
use crate::face::Face;

/// Detection sidecar written by the external face detector.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionFile {
    #[serde(default)]
    pub faces: Vec<Face>,
}

/// Conventional sidecar location: `<image>.faces.json`.
pub fn sidecar_path(image: &Path) -> PathBuf {
    let mut name = image.as_os_str().to_os_string();
    name.push(".faces.json");
    PathBuf::from(name)
}

pub fn parse_faces(json: &str) -> Result<Vec<Face>> {
    let file: DetectionFile = serde_json::from_str(json)?;
    validate_faces(&file.faces)?;
    Ok(file.faces)
}

pub fn read_faces(path: &Path) -> Result<Vec<Face>> {
    let json = std::fs::read_to_string(path)?;
    parse_faces(&json)
}

/// Faces for an image, or an empty set when no sidecar exists.
pub fn read_faces_for_image(image: &Path) -> Result<Vec<Face>> {
    let path = sidecar_path(image);
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_faces(&path)
}

pub fn write_faces(path: &Path, faces: &[Face]) -> Result<()> {
    let file = DetectionFile {
        faces: faces.to_vec(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
    Ok(())
}

/// Negative sizes are a detector bug and rejected; zero-sized boxes are
/// tolerated and simply not laid out.
fn validate_faces(faces: &[Face]) -> Result<()> {
    for (index, face) in faces.iter().enumerate() {
        let Some(b) = face.bbox else { continue };
        if b.width < 0.0 || b.height < 0.0 {
            return Err(LoupeError::InvalidFace {
                index,
                reason: format!("negative size {}x{}", b.width, b.height),
            });
        }
        if b.width == 0.0 || b.height == 0.0 {
            warn!(index, "Face box has zero area; it will not be annotated");
        }
    }
    Ok(())
}
