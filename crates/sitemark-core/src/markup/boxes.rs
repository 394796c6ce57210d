//! Status box markup.

use super::{MarkupColor, MarkupShape, MarkupTrait, ObjectKind, ObjectMeta};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A status box drawn over a region of the blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupBox {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Outline drawn inside the bounding box.
    pub shape: MarkupShape,
    /// Status color.
    pub color: MarkupColor,
    /// Free-text label, used for gray (material) boxes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Top-left corner x.
    pub x: f64,
    /// Top-left corner y.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MarkupBox {
    /// Default side length for boxes placed with a single click.
    pub const DEFAULT_SIZE: f64 = 60.0;

    /// Create a new box covering the given rectangle.
    pub fn new(rect: Rect, shape: MarkupShape, color: MarkupColor) -> Self {
        let rect = rect.abs();
        Self {
            meta: ObjectMeta::new(ObjectKind::Box),
            shape,
            color,
            label: None,
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
        }
    }

    /// Create a box from two corner points.
    pub fn from_corners(p1: Point, p2: Point, shape: MarkupShape, color: MarkupColor) -> Self {
        Self::new(Rect::from_points(p1, p2), shape, color)
    }

    /// Create a default-sized box centred on a point.
    pub fn centered(center: Point, shape: MarkupShape, color: MarkupColor) -> Self {
        let half = Self::DEFAULT_SIZE / 2.0;
        Self::new(
            Rect::new(center.x - half, center.y - half, center.x + half, center.y + half),
            shape,
            color,
        )
    }

    /// Get the box as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl MarkupTrait for MarkupBox {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_from_corners_normalizes() {
        let b = MarkupBox::from_corners(
            Point::new(100.0, 100.0),
            Point::new(50.0, 40.0),
            MarkupShape::Square,
            MarkupColor::Red,
        );
        assert!((b.x - 50.0).abs() < f64::EPSILON);
        assert!((b.y - 40.0).abs() < f64::EPSILON);
        assert!((b.width - 50.0).abs() < f64::EPSILON);
        assert!((b.height - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_centered_box() {
        let b = MarkupBox::centered(Point::new(100.0, 100.0), MarkupShape::Circle, MarkupColor::Blue);
        assert!((b.x - 70.0).abs() < f64::EPSILON);
        assert!((b.width - MarkupBox::DEFAULT_SIZE).abs() < f64::EPSILON);
        assert!(b.meta.id.starts_with("box-"));
    }

    #[test]
    fn test_hit_test() {
        let b = MarkupBox::new(Rect::new(0.0, 0.0, 100.0, 100.0), MarkupShape::Square, MarkupColor::Gray);
        assert!(b.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!b.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(b.hit_test(Point::new(105.0, 50.0), 10.0));
    }

    #[test]
    fn test_translate() {
        let mut b = MarkupBox::new(Rect::new(10.0, 10.0, 60.0, 60.0), MarkupShape::Square, MarkupColor::Red);
        b.translate(Vec2::new(20.0, 20.0));
        assert_eq!(b.as_rect(), Rect::new(30.0, 30.0, 80.0, 80.0));
    }
}
