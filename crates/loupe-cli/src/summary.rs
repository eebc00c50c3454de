use std::collections::BTreeMap;
use std::path::Path;

use console::Style;
use loupe_core::config::ConfidenceBands;
use loupe_core::face::{ConfidenceClass, DisplayMode, Face};
use loupe_core::io::image_info::ImageInfo;
use loupe_core::layout::{AnnotationLayout, LabelSource};
use loupe_core::viewport::Viewport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }

    fn class(&self, class: ConfidenceClass) -> Style {
        match class {
            ConfidenceClass::High => Style::new().green(),
            ConfidenceClass::Medium => Style::new().yellow(),
            ConfidenceClass::Low => Style::new().red(),
            ConfidenceClass::Unknown => self.label.clone(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_info_summary(
    info: &ImageInfo,
    faces_path: &Path,
    faces: &[Face],
    bands: &ConfidenceBands,
) {
    let s = Styles::new();
    print_title(&s, "Image");

    println!(
        "  {:<14}{}",
        s.label.apply_to("File"),
        s.path.apply_to(info.path.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(format!("{}x{}", info.width, info.height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Sidecar"),
        s.path.apply_to(faces_path.display())
    );
    println!();

    if faces.is_empty() {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Faces"),
            s.disabled.apply_to("none")
        );
        println!();
        return;
    }

    let boxed = faces.iter().filter(|f| f.layout_box().is_some()).count();
    let labelled = faces.iter().filter(|f| f.display_label().is_some()).count();
    let mut classes: BTreeMap<String, usize> = BTreeMap::new();
    for face in faces {
        let class = ConfidenceClass::classify(face.confidence, bands);
        *classes.entry(class.to_string()).or_default() += 1;
    }

    println!("  {}", s.header.apply_to("Faces"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Total"),
        s.value.apply_to(faces.len())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("With box"),
        s.value.apply_to(boxed)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Labelled"),
        s.value.apply_to(labelled)
    );
    for (class, count) in &classes {
        println!(
            "    {:<12}{}",
            s.label.apply_to(class),
            s.value.apply_to(count)
        );
    }
    println!();

    for (i, face) in faces.iter().enumerate() {
        let class = ConfidenceClass::classify(face.confidence, bands);
        let name = face.display_label().unwrap_or("(unnamed)");
        let geometry = match face.bbox {
            Some(b) => format!("{:.0},{:.0} {:.0}x{:.0}", b.x, b.y, b.width, b.height),
            None => "no box".to_string(),
        };
        println!(
            "    {}. {:<24}{:<22}{}",
            s.label.apply_to(i),
            s.value.apply_to(name),
            geometry,
            s.class(class).apply_to(class)
        );
    }
    println!();
}

pub fn print_view_summary(viewport: &Viewport) {
    let s = Styles::new();
    print_title(&s, "View");
    print_view_section(&s, viewport);
}

fn print_view_section(s: &Styles, viewport: &Viewport) {
    let scroll = viewport.scroll_offset();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Mode"),
        s.method.apply_to(viewport.mode())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Zoom"),
        s.value.apply_to(format!("{:.1}%", viewport.effective_scale() * 100.0))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scroll"),
        s.value.apply_to(format!("{:.1}, {:.1}", scroll.x, scroll.y))
    );
    println!();
}

pub fn print_layout_summary(viewport: &Viewport, mode: DisplayMode, layout: &AnnotationLayout) {
    let s = Styles::new();
    print_title(&s, "Annotation Layout");
    print_view_section(&s, viewport);

    println!(
        "  {:<14}{}",
        s.label.apply_to("Display"),
        s.method.apply_to(mode)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Buffer"),
        s.value.apply_to(format!("{:.1} px", layout.buffer))
    );
    println!();

    if layout.faces.is_empty() {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Faces"),
            s.disabled.apply_to("none")
        );
        println!();
        return;
    }

    println!("  {}", s.header.apply_to("Faces"));
    for face in &layout.faces {
        let b = face.box_rect;
        println!(
            "    {}. box {:.0},{:.0} {:.0}x{:.0}  {}",
            s.label.apply_to(face.face_index),
            b.x0,
            b.y0,
            b.width(),
            b.height(),
            s.class(face.class).apply_to(face.class)
        );
        let Some(label) = &face.label else {
            continue;
        };
        let source = match label.source {
            LabelSource::Search { ring, angle_deg } => {
                s.method.apply_to(format!("ring {ring} @ {angle_deg:.0}\u{b0}"))
            }
            LabelSource::OutOfBounds { ring, angle_deg } => s
                .disabled
                .apply_to(format!("outside image, ring {ring} @ {angle_deg:.0}\u{b0}")),
            LabelSource::Fallback => s.disabled.apply_to("fallback".to_string()),
        };
        println!(
            "       {} at {:.0},{:.0}  {}",
            s.value.apply_to(&label.text),
            label.rect.x0,
            label.rect.y0,
            source
        );
    }
    println!();

    let fallbacks = layout.fallback_count();
    if fallbacks > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Fallbacks"),
            s.disabled.apply_to(fallbacks)
        );
        println!();
    }
}
