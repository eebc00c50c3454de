//! Geometry shared by the engine. Points, sizes, rects and transforms come
//! from `kurbo`; this module only adds the few predicates the layout and
//! viewport need on top of them.

pub use kurbo::{Affine, Line, Point, Rect, Size, Vec2};

/// True when both sides are finite and strictly positive.
pub fn is_valid_size(size: Size) -> bool {
    size.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Strict AABB overlap; rects that only share an edge do not overlap.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    let i = a.intersect(b);
    i.width() > 0.0 && i.height() > 0.0
}

/// Inclusive containment: `inner` may touch the edges of `outer`.
pub fn contains_rect(outer: Rect, inner: Rect) -> bool {
    outer.intersect(inner) == inner
}

/// Point where the ray from the rect center towards `target` leaves the
/// rect. Picks the smallest positive parametric distance among the four
/// edges; returns the center itself when `target` coincides with it.
pub fn ray_exit(rect: Rect, target: Point) -> Point {
    let c = rect.center();
    let d = target - c;
    if d == Vec2::ZERO {
        return c;
    }

    let mut t_min = f64::INFINITY;
    if d.x != 0.0 {
        for edge_x in [rect.x0, rect.x1] {
            let t = (edge_x - c.x) / d.x;
            if t > 0.0 {
                let y = c.y + t * d.y;
                if y >= rect.y0 - 1e-9 && y <= rect.y1 + 1e-9 {
                    t_min = t_min.min(t);
                }
            }
        }
    }
    if d.y != 0.0 {
        for edge_y in [rect.y0, rect.y1] {
            let t = (edge_y - c.y) / d.y;
            if t > 0.0 {
                let x = c.x + t * d.x;
                if x >= rect.x0 - 1e-9 && x <= rect.x1 + 1e-9 {
                    t_min = t_min.min(t);
                }
            }
        }
    }

    if t_min.is_finite() {
        c + d * t_min
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!overlaps(a, b));
        assert!(overlaps(a.inflate(0.5, 0.5), b));
    }

    #[test]
    fn containment_includes_edges() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(contains_rect(outer, Rect::new(90.0, 0.0, 100.0, 10.0)));
        assert!(!contains_rect(outer, Rect::new(95.0, 0.0, 105.0, 10.0)));
    }

    #[test]
    fn ray_exit_hits_right_edge() {
        let r = Rect::new(0.0, 0.0, 20.0, 10.0);
        let p = ray_exit(r, Point::new(100.0, 5.0));
        assert_eq!(p, Point::new(20.0, 5.0));
    }

    #[test]
    fn ray_exit_hits_top_edge_on_steep_ray() {
        let r = Rect::new(0.0, 0.0, 20.0, 10.0);
        let p = ray_exit(r, Point::new(12.0, -100.0));
        assert!(p.y.abs() < 1e-9);
        assert!(p.x > 10.0 && p.x < 11.0);
    }

    #[test]
    fn ray_exit_degenerate_target_returns_center() {
        let r = Rect::new(0.0, 0.0, 20.0, 10.0);
        assert_eq!(ray_exit(r, r.center()), r.center());
    }

    #[test]
    fn size_validity() {
        assert!(is_valid_size(Size::new(1.0, 2.0)));
        assert!(!is_valid_size(Size::new(0.0, 2.0)));
        assert!(!is_valid_size(Size::new(f64::NAN, 2.0)));
    }
}
