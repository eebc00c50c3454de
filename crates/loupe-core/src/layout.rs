//! Collision-avoiding placement of face labels.
//!
//! Face boxes are projected onto the surface and committed to an ordered
//! list of placed rects. Each label is then placed by a radial search around
//! its face: rings of growing radius, sampled at fixed angles, taking the
//! first candidate whose buffered rect touches no buffered rect already
//! placed and which lies inside the on-screen image. Faces are processed in input
//! order, so earlier faces claim space first.

use serde::Serialize;
use tracing::debug;

use crate::config::{ConfidenceBands, LayoutConfig};
use crate::face::{ConfidenceClass, DisplayMode, Face};
use crate::geometry::{contains_rect, overlaps, ray_exit, Line, Point, Rect, Size, Vec2};
use crate::viewport::ViewTransform;

/// Upper bound on candidates sampled per ring.
const MAX_ANGLE_STEPS: usize = 3600;

/// Text measurement supplied by the renderer.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> Size;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> Size,
{
    fn measure(&self, text: &str) -> Size {
        self(text)
    }
}

/// Fixed-advance approximation for headless use.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasure {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 14.0,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str) -> Size {
        Size::new(text.chars().count() as f64 * self.char_width, self.line_height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacedKind {
    FaceBox,
    Label,
}

/// Rect committed to the collision set of the current pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlacedRect {
    pub rect: Rect,
    pub kind: PlacedKind,
    pub face_index: usize,
}

/// How a label position was found.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    /// Non-colliding and inside the image.
    Search { ring: usize, angle_deg: f64 },
    /// Non-colliding but (partly) outside the image.
    OutOfBounds { ring: usize, angle_deg: f64 },
    /// Search exhausted; fixed position above the box, collisions ignored.
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub text: String,
    pub rect: Rect,
    /// From the box perimeter (`p0`) to the label center (`p1`).
    pub connector: Line,
    pub source: LabelSource,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FacePlacement {
    pub face_index: usize,
    pub box_rect: Rect,
    pub class: ConfidenceClass,
    pub label: Option<LabelPlacement>,
}

/// Everything the layout pass needs besides configuration.
#[derive(Clone, Copy, Debug)]
pub struct LayoutRequest<'a> {
    pub faces: &'a [Face],
    pub transform: ViewTransform,
    pub natural_size: Size,
    pub mode: DisplayMode,
}

/// Result of one layout pass. Derived state, rebuilt from scratch each time.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnnotationLayout {
    pub faces: Vec<FacePlacement>,
    /// Ordered collision set: face boxes first, then labels in face order.
    pub placed: Vec<PlacedRect>,
    /// Collision buffer used for this pass.
    pub buffer: f64,
}

impl AnnotationLayout {
    pub fn compute(
        request: &LayoutRequest<'_>,
        config: &LayoutConfig,
        bands: &ConfidenceBands,
        measure: &dyn TextMeasure,
    ) -> Self {
        let t = request.transform;
        let image_bounds = t.rect_to_screen(request.natural_size.to_rect());
        let buffer = config
            .min_buffer_px
            .max(image_bounds.width() * config.buffer_ratio);

        let mut layout = Self {
            faces: Vec::new(),
            placed: Vec::new(),
            buffer,
        };

        for (index, face) in request.faces.iter().enumerate() {
            if !request.mode.shows(index) {
                continue;
            }
            let Some(bbox) = face.layout_box() else {
                continue;
            };
            let box_rect = t.rect_to_screen(bbox.as_rect());
            layout.placed.push(PlacedRect {
                rect: box_rect,
                kind: PlacedKind::FaceBox,
                face_index: index,
            });
            layout.faces.push(FacePlacement {
                face_index: index,
                box_rect,
                class: ConfidenceClass::classify(face.confidence, bands),
                label: None,
            });
        }

        for slot in 0..layout.faces.len() {
            let face_index = layout.faces[slot].face_index;
            let Some(text) = request.faces[face_index].display_label() else {
                continue;
            };
            let box_rect = layout.faces[slot].box_rect;
            let text_size = measure.measure(text);
            let label_size = Size::new(
                text_size.width + 2.0 * config.padding,
                text_size.height + 2.0 * config.padding,
            );

            let query = LabelQuery {
                face_index,
                box_rect,
                label_size,
                image_bounds,
                buffer,
            };
            let (rect, source) = match search(&query, &layout.placed, config) {
                Some(found) => found,
                None => {
                    debug!(face_index, "Label search exhausted, using fallback above box");
                    (fallback_rect(box_rect, label_size, config), LabelSource::Fallback)
                }
            };

            let label_center = rect.center();
            layout.placed.push(PlacedRect {
                rect,
                kind: PlacedKind::Label,
                face_index,
            });
            layout.faces[slot].label = Some(LabelPlacement {
                text: text.to_string(),
                rect,
                connector: Line::new(ray_exit(box_rect, label_center), label_center),
                source,
            });
        }

        layout
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelPlacement> {
        self.faces.iter().filter_map(|f| f.label.as_ref())
    }

    pub fn fallback_count(&self) -> usize {
        self.labels()
            .filter(|l| l.source == LabelSource::Fallback)
            .count()
    }
}

/// One label looking for a spot.
struct LabelQuery {
    face_index: usize,
    box_rect: Rect,
    label_size: Size,
    image_bounds: Rect,
    buffer: f64,
}

/// Buffered overlap test. Against its own face box only the candidate is
/// buffered; every other placed rect is buffered as well, so two labels end
/// up at least twice the buffer apart.
fn collides(candidate: Rect, query: &LabelQuery, placed: &[PlacedRect]) -> bool {
    let b = query.buffer;
    let expanded = candidate.inflate(b, b);
    placed.iter().any(|p| {
        let own_box = p.kind == PlacedKind::FaceBox && p.face_index == query.face_index;
        if own_box {
            overlaps(expanded, p.rect)
        } else {
            overlaps(expanded, p.rect.inflate(b, b))
        }
    })
}

/// Number of candidates per ring, or `None` when the angular step cannot
/// make progress.
fn angle_steps(config: &LayoutConfig) -> Option<usize> {
    let step = config.angle_step_deg;
    if !(step.is_finite() && step > 0.0) {
        return None;
    }
    Some(((360.0 / step).ceil() as usize).min(MAX_ANGLE_STEPS))
}

fn search(
    query: &LabelQuery,
    placed: &[PlacedRect],
    config: &LayoutConfig,
) -> Option<(Rect, LabelSource)> {
    let Some(angle_steps) = angle_steps(config) else {
        debug!(
            angle_step_deg = config.angle_step_deg,
            "Unusable angle step, skipping label search"
        );
        return None;
    };
    let center = query.box_rect.center();
    let start_radius =
        query.box_rect.width().max(query.box_rect.height()) / 2.0 + config.radius_margin;
    let mut out_of_bounds: Option<(Rect, LabelSource)> = None;

    for ring in 0..config.ring_count {
        let radius = start_radius + ring as f64 * config.radius_step;
        for step in 0..angle_steps {
            let angle_deg = step as f64 * config.angle_step_deg;
            if angle_deg >= 360.0 {
                break;
            }
            let candidate_center = center + Vec2::from_angle(angle_deg.to_radians()) * radius;
            let candidate = Rect::from_center_size(candidate_center, query.label_size);
            if collides(candidate, query, placed) {
                continue;
            }
            if contains_rect(query.image_bounds, candidate) {
                return Some((candidate, LabelSource::Search { ring, angle_deg }));
            }
            if out_of_bounds.is_none() {
                out_of_bounds = Some((candidate, LabelSource::OutOfBounds { ring, angle_deg }));
            }
        }
    }
    out_of_bounds
}

fn fallback_rect(box_rect: Rect, label_size: Size, config: &LayoutConfig) -> Rect {
    let origin = Point::new(
        box_rect.center().x - label_size.width / 2.0,
        box_rect.y0 - config.fallback_gap - label_size.height,
    );
    Rect::from_origin_size(origin, label_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::FaceBox;

    #[test]
    fn unlabelled_face_places_only_its_box() {
        let faces = vec![Face::with_box(FaceBox::new(10.0, 10.0, 20.0, 20.0))];
        let request = LayoutRequest {
            faces: &faces,
            transform: ViewTransform::IDENTITY,
            natural_size: Size::new(200.0, 200.0),
            mode: DisplayMode::All,
        };
        let layout = AnnotationLayout::compute(
            &request,
            &LayoutConfig::default(),
            &ConfidenceBands::default(),
            &MonospaceMeasure::default(),
        );
        assert_eq!(layout.placed.len(), 1);
        assert_eq!(layout.placed[0].kind, PlacedKind::FaceBox);
        assert!(layout.faces[0].label.is_none());
    }

    #[test]
    fn zero_angle_step_falls_back_instead_of_spinning() {
        let faces = vec![Face::labelled(FaceBox::new(10.0, 40.0, 20.0, 20.0), "Ann")];
        let request = LayoutRequest {
            faces: &faces,
            transform: ViewTransform::IDENTITY,
            natural_size: Size::new(200.0, 200.0),
            mode: DisplayMode::All,
        };
        for angle_step_deg in [0.0, -15.0, f64::NAN] {
            let config = LayoutConfig {
                angle_step_deg,
                ..LayoutConfig::default()
            };
            let layout = AnnotationLayout::compute(
                &request,
                &config,
                &ConfidenceBands::default(),
                &MonospaceMeasure::default(),
            );
            assert_eq!(layout.fallback_count(), 1, "angle step {angle_step_deg}");
        }
    }

    #[test]
    fn closure_can_measure_text() {
        let measure = |t: &str| Size::new(t.len() as f64 * 10.0, 12.0);
        assert_eq!(TextMeasure::measure(&measure, "abc"), Size::new(30.0, 12.0));
    }
}
