//! Freehand ink markup.

use super::{MarkupColor, MarkupTrait, ObjectKind, ObjectMeta, point_to_segment_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Stroke widths offered by the pen tool, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PenWidth {
    Thin,
    #[default]
    Medium,
    Thick,
}

impl PenWidth {
    pub fn pixels(&self) -> f64 {
        f64::from(u8::from(*self))
    }

    pub fn all() -> &'static [PenWidth] {
        &[PenWidth::Thin, PenWidth::Medium, PenWidth::Thick]
    }
}

impl From<PenWidth> for u8 {
    fn from(width: PenWidth) -> Self {
        match width {
            PenWidth::Thin => 1,
            PenWidth::Medium => 3,
            PenWidth::Thick => 5,
        }
    }
}

impl TryFrom<u8> for PenWidth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PenWidth::Thin),
            3 => Ok(PenWidth::Medium),
            5 => Ok(PenWidth::Thick),
            other => Err(format!("unsupported pen width {other}, expected 1, 3 or 5")),
        }
    }
}

/// A single freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupPen {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Points along the stroke, in drawing order.
    pub points: Vec<Point>,
    pub color: MarkupColor,
    pub width: PenWidth,
}

impl MarkupPen {
    /// Minimum number of points for a stroke to be committed.
    pub const MIN_POINTS: usize = 2;

    pub fn new(points: Vec<Point>, color: MarkupColor, width: PenWidth) -> Self {
        Self {
            meta: ObjectMeta::new(ObjectKind::Pen),
            points,
            color,
            width,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl MarkupTrait for MarkupPen {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let rect = self
            .points
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        let half = self.width.pixels() / 2.0;
        rect.inflate(half, half)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.width.pixels() / 2.0;
        match self.points.as_slice() {
            [] => false,
            [only] => (point - *only).hypot() <= reach,
            points => points
                .windows(2)
                .any(|w| point_to_segment_dist(point, w[0], w[1]) <= reach),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke() -> MarkupPen {
        MarkupPen::new(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 50.0)],
            MarkupColor::Red,
            PenWidth::Medium,
        )
    }

    #[test]
    fn test_width_values() {
        let widths: Vec<u8> = PenWidth::all().iter().map(|w| u8::from(*w)).collect();
        assert_eq!(widths, vec![1, 3, 5]);
        assert!(PenWidth::try_from(2).is_err());
    }

    #[test]
    fn test_bounds_include_stroke_width() {
        let bounds = stroke().bounds();
        assert!((bounds.x0 + 1.5).abs() < 1e-10);
        assert!((bounds.x1 - 101.5).abs() < 1e-10);
        assert!((bounds.y1 - 51.5).abs() < 1e-10);
    }

    #[test]
    fn test_hit_test_follows_polyline() {
        let pen = stroke();
        assert!(pen.hit_test(Point::new(50.0, 1.0), 0.0));
        assert!(pen.hit_test(Point::new(101.0, 25.0), 0.0));
        // Inside the bounding box but far from the ink.
        assert!(!pen.hit_test(Point::new(30.0, 40.0), 2.0));
    }

    #[test]
    fn test_single_point_stroke() {
        let pen = MarkupPen::new(vec![Point::new(5.0, 5.0)], MarkupColor::Blue, PenWidth::Thin);
        assert!(pen.hit_test(Point::new(6.0, 5.0), 1.0));
        assert!(!pen.hit_test(Point::new(10.0, 5.0), 1.0));
    }

    #[test]
    fn test_translate_moves_every_point() {
        let mut pen = stroke();
        pen.translate(Vec2::new(20.0, 20.0));
        assert_eq!(pen.points[0], Point::new(20.0, 20.0));
        assert_eq!(pen.points[2], Point::new(120.0, 70.0));
    }
}
