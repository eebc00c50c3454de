use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceBands;
use crate::geometry::{Point, Rect, Size};

/// Face bounding box in image pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }

    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// One detection result. Manual identifications carry no box.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Face {
    #[serde(rename = "box", default)]
    pub bbox: Option<FaceBox>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Face {
    pub fn with_box(bbox: FaceBox) -> Self {
        Self {
            bbox: Some(bbox),
            ..Self::default()
        }
    }

    pub fn labelled(bbox: FaceBox, label: impl Into<String>) -> Self {
        Self {
            bbox: Some(bbox),
            label: Some(label.into()),
            confidence: None,
        }
    }

    /// Box usable for layout; malformed boxes are treated as absent.
    pub fn layout_box(&self) -> Option<FaceBox> {
        self.bbox.filter(FaceBox::is_valid)
    }

    /// Label text, ignoring empty strings.
    pub fn display_label(&self) -> Option<&str> {
        self.label.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Colour band of a face box, derived from its detection score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceClass {
    High,
    Medium,
    Low,
    Unknown,
}

impl ConfidenceClass {
    pub fn classify(score: Option<f64>, bands: &ConfidenceBands) -> Self {
        match score {
            Some(s) if !s.is_finite() => Self::Unknown,
            Some(s) if s >= bands.high => Self::High,
            Some(s) if s >= bands.medium => Self::Medium,
            Some(_) => Self::Low,
            None => Self::Unknown,
        }
    }
}

impl fmt::Display for ConfidenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Which faces are annotated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    All,
    Single(usize),
    None,
}

impl DisplayMode {
    pub fn shows(&self, index: usize) -> bool {
        match self {
            Self::All => true,
            Self::Single(active) => *active == index,
            Self::None => false,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Single(i) => write!(f, "Single (#{i})"),
            Self::None => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_respects_band_edges() {
        let bands = ConfidenceBands::default();
        assert_eq!(ConfidenceClass::classify(Some(0.8), &bands), ConfidenceClass::High);
        assert_eq!(ConfidenceClass::classify(Some(0.79), &bands), ConfidenceClass::Medium);
        assert_eq!(ConfidenceClass::classify(Some(0.5), &bands), ConfidenceClass::Medium);
        assert_eq!(ConfidenceClass::classify(Some(0.1), &bands), ConfidenceClass::Low);
        assert_eq!(ConfidenceClass::classify(None, &bands), ConfidenceClass::Unknown);
        assert_eq!(
            ConfidenceClass::classify(Some(f64::NAN), &bands),
            ConfidenceClass::Unknown
        );
    }

    #[test]
    fn zero_sized_box_is_not_laid_out() {
        let face = Face::with_box(FaceBox::new(10.0, 10.0, 0.0, 5.0));
        assert!(face.layout_box().is_none());
    }

    #[test]
    fn blank_label_is_ignored() {
        let face = Face::labelled(FaceBox::new(0.0, 0.0, 5.0, 5.0), "   ");
        assert!(face.display_label().is_none());
    }
}
