//! Text note markup.

use super::{MarkupColor, MarkupTrait, ObjectKind, ObjectMeta};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Named font size buckets offered by the text tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSizeBucket {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSizeBucket {
    /// Get the point size for this bucket.
    pub fn points(&self) -> f64 {
        match self {
            FontSizeBucket::Small => 12.0,
            FontSizeBucket::Medium => 16.0,
            FontSizeBucket::Large => 24.0,
        }
    }

    /// Get the bucket closest to an arbitrary point size.
    pub fn nearest(points: f64) -> Self {
        Self::all()
            .iter()
            .copied()
            .min_by(|a, b| {
                (a.points() - points)
                    .abs()
                    .total_cmp(&(b.points() - points).abs())
            })
            .unwrap_or_default()
    }

    pub fn all() -> &'static [FontSizeBucket] {
        &[FontSizeBucket::Small, FontSizeBucket::Medium, FontSizeBucket::Large]
    }
}

/// A text note placed on the blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupText {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// The text content.
    pub content: String,
    /// Font size in points.
    pub font_size: f64,
    pub color: MarkupColor,
    /// Top-left x of the text box.
    pub x: f64,
    /// Top-left y of the text box.
    pub y: f64,
}

impl MarkupText {
    /// Approximate glyph advance relative to font size.
    const CHAR_WIDTH_FACTOR: f64 = 0.6;
    /// Line height relative to font size.
    const LINE_HEIGHT_FACTOR: f64 = 1.2;

    pub fn new(position: Point, content: String, font_size: f64, color: MarkupColor) -> Self {
        Self {
            meta: ObjectMeta::new(ObjectKind::Text),
            content,
            font_size,
            color,
            x: position.x,
            y: position.y,
        }
    }

    /// Get the named bucket closest to this text's font size.
    pub fn size_bucket(&self) -> FontSizeBucket {
        FontSizeBucket::nearest(self.font_size)
    }
}

impl MarkupTrait for MarkupText {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    /// Approximate layout box; the renderer owns exact glyph metrics.
    fn bounds(&self) -> Rect {
        let lines: Vec<&str> = self.content.lines().collect();
        let line_count = lines.len().max(1) as f64;
        let max_chars = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
            .max(1) as f64;
        let width = max_chars * self.font_size * Self::CHAR_WIDTH_FACTOR;
        let height = line_count * self.font_size * Self::LINE_HEIGHT_FACTOR;
        Rect::new(self.x, self.y, self.x + width, self.y + height)
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
    fn test_bucket_points() {
        assert!((FontSizeBucket::Small.points() - 12.0).abs() < f64::EPSILON);
        assert!((FontSizeBucket::Large.points() - 24.0).abs() < f64::EPSILON);
        assert_eq!(FontSizeBucket::nearest(15.0), FontSizeBucket::Medium);
        assert_eq!(FontSizeBucket::nearest(40.0), FontSizeBucket::Large);
        assert_eq!(FontSizeBucket::nearest(1.0), FontSizeBucket::Small);
    }

    #[test]
    fn test_bounds_grow_with_content() {
        let short = MarkupText::new(Point::ZERO, "ab".to_string(), 10.0, MarkupColor::Red);
        let long = MarkupText::new(Point::ZERO, "abcdef\nxy".to_string(), 10.0, MarkupColor::Red);
        assert!((short.bounds().width() - 12.0).abs() < 1e-10);
        assert!((long.bounds().width() - 36.0).abs() < 1e-10);
        assert!((long.bounds().height() - 24.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_text_still_hittable() {
        let text = MarkupText::new(Point::new(10.0, 10.0), String::new(), 16.0, MarkupColor::Gray);
        assert!(text.hit_test(Point::new(12.0, 12.0), 0.0));
    }
}
