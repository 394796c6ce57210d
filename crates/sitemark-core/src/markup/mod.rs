//! Markup object definitions for blueprint annotation.
//!
//! Every object lives in unscaled document coordinates (blueprint pixels).
//! The collection order of a document is its paint order, front-most last.

mod boxes;
mod pen;
mod stamp;
mod text;

pub use boxes::MarkupBox;
pub use pen::{MarkupPen, PenWidth};
pub use stamp::{MarkupStamp, StampSettings, StampSize};
pub use text::{FontSizeBucket, MarkupText};

use chrono::{DateTime, Utc};
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for markup objects within a document.
pub type ObjectId = String;

/// Wall-clock timestamp stored on objects and documents.
pub type Timestamp = DateTime<Utc>;

/// Semantic markup color.
///
/// Gray marks material or other notes, red marks work in progress and
/// blue marks completed work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupColor {
    #[default]
    Gray,
    Red,
    Blue,
}

impl MarkupColor {
    /// Get the color name as used in the JSON payload.
    pub fn name(&self) -> &'static str {
        match self {
            MarkupColor::Gray => "gray",
            MarkupColor::Red => "red",
            MarkupColor::Blue => "blue",
        }
    }

    /// Get the site-status meaning shown in the palette.
    pub fn meaning(&self) -> &'static str {
        match self {
            MarkupColor::Gray => "Material / other",
            MarkupColor::Red => "In progress",
            MarkupColor::Blue => "Completed",
        }
    }

    /// Get the render color.
    pub fn to_color(&self) -> Color {
        match self {
            MarkupColor::Gray => Color::from_rgba8(0x6b, 0x72, 0x80, 255),
            MarkupColor::Red => Color::from_rgba8(0xef, 0x44, 0x44, 255),
            MarkupColor::Blue => Color::from_rgba8(0x3b, 0x82, 0xf6, 255),
        }
    }

    /// Get all colors in palette order.
    pub fn all() -> &'static [MarkupColor] {
        &[MarkupColor::Gray, MarkupColor::Red, MarkupColor::Blue]
    }
}

/// Outline drawn by boxes and stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupShape {
    #[default]
    Square,
    Circle,
    Triangle,
    Star,
    Diagonal,
}

impl MarkupShape {
    /// Cycle to the next shape.
    pub fn next(self) -> Self {
        match self {
            MarkupShape::Square => MarkupShape::Circle,
            MarkupShape::Circle => MarkupShape::Triangle,
            MarkupShape::Triangle => MarkupShape::Star,
            MarkupShape::Star => MarkupShape::Diagonal,
            MarkupShape::Diagonal => MarkupShape::Square,
        }
    }
}

/// Identity and timestamps shared by all markup objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub id: ObjectId,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

impl ObjectMeta {
    /// Create fresh metadata for an object of the given kind.
    pub fn new(kind: ObjectKind) -> Self {
        let now = Utc::now();
        Self {
            id: generate_object_id(kind),
            created_at: now,
            modified_at: now,
        }
    }

    /// Mark the object as modified now.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// Generate an object id of the form `{kind}-{unix_millis}-{suffix}`.
///
/// The random suffix keeps ids unique when several objects are created
/// within the same millisecond (e.g. a multi-object paste).
pub fn generate_object_id(kind: ObjectKind) -> ObjectId {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", kind.name(), millis, &suffix[..8])
}

/// Variant tag of a markup object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Box,
    Text,
    Pen,
    Stamp,
}

impl ObjectKind {
    /// Get the tag as written in the `type` field.
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Box => "box",
            ObjectKind::Text => "text",
            ObjectKind::Pen => "pen",
            ObjectKind::Stamp => "stamp",
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Common behaviour of all markup variants.
pub trait MarkupTrait {
    /// Get the shared identity and timestamps.
    fn meta(&self) -> &ObjectMeta;

    /// Get mutable identity and timestamps.
    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// Get the bounding box in document coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in document coordinates) hits this object.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Move the object by a delta in document coordinates.
    fn translate(&mut self, delta: Vec2);
}

/// A single annotation placed on a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarkupObject {
    Box(MarkupBox),
    Text(MarkupText),
    Pen(MarkupPen),
    Stamp(MarkupStamp),
}

impl MarkupObject {
    fn inner(&self) -> &dyn MarkupTrait {
        match self {
            MarkupObject::Box(o) => o,
            MarkupObject::Text(o) => o,
            MarkupObject::Pen(o) => o,
            MarkupObject::Stamp(o) => o,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn MarkupTrait {
        match self {
            MarkupObject::Box(o) => o,
            MarkupObject::Text(o) => o,
            MarkupObject::Pen(o) => o,
            MarkupObject::Stamp(o) => o,
        }
    }

    pub fn id(&self) -> &str {
        &self.meta().id
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            MarkupObject::Box(_) => ObjectKind::Box,
            MarkupObject::Text(_) => ObjectKind::Text,
            MarkupObject::Pen(_) => ObjectKind::Pen,
            MarkupObject::Stamp(_) => ObjectKind::Stamp,
        }
    }

    pub fn meta(&self) -> &ObjectMeta {
        self.inner().meta()
    }

    pub fn bounds(&self) -> Rect {
        self.inner().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.inner().hit_test(point, tolerance)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.inner_mut().translate(delta);
    }

    /// Mark the object as modified now.
    pub fn touch(&mut self) {
        self.inner_mut().meta_mut().touch();
    }

    /// Give the object a fresh id and reset both timestamps to now.
    /// Used when pasting so copies never share identity with their source.
    pub fn regenerate_id(&mut self) {
        let meta = ObjectMeta::new(self.kind());
        *self.inner_mut().meta_mut() = meta;
    }

    pub fn color(&self) -> MarkupColor {
        match self {
            MarkupObject::Box(o) => o.color,
            MarkupObject::Text(o) => o.color,
            MarkupObject::Pen(o) => o.color,
            MarkupObject::Stamp(o) => o.color,
        }
    }

    /// Set the color. Every variant carries one, so this always applies.
    pub fn set_color(&mut self, color: MarkupColor) -> bool {
        match self {
            MarkupObject::Box(o) => o.color = color,
            MarkupObject::Text(o) => o.color = color,
            MarkupObject::Pen(o) => o.color = color,
            MarkupObject::Stamp(o) => o.color = color,
        }
        true
    }

    /// Set the outline shape. Returns false for variants without one.
    pub fn set_shape(&mut self, shape: MarkupShape) -> bool {
        match self {
            MarkupObject::Box(o) => o.shape = shape,
            MarkupObject::Stamp(o) => o.shape = shape,
            MarkupObject::Text(_) | MarkupObject::Pen(_) => return false,
        }
        true
    }

    /// Set the box label. Returns false for non-box variants.
    pub fn set_label(&mut self, label: Option<String>) -> bool {
        match self {
            MarkupObject::Box(o) => {
                o.label = label.filter(|l| !l.is_empty());
                true
            }
            _ => false,
        }
    }

    /// Set text content. Returns false for non-text variants.
    pub fn set_content(&mut self, content: &str) -> bool {
        match self {
            MarkupObject::Text(o) => {
                o.content = content.to_string();
                true
            }
            _ => false,
        }
    }

    /// Set the font size. Returns false for non-text variants.
    pub fn set_font_size(&mut self, font_size: f64) -> bool {
        match self {
            MarkupObject::Text(o) => {
                o.font_size = font_size;
                true
            }
            _ => false,
        }
    }

    /// Set the stamp size. Returns false for non-stamp variants.
    pub fn set_stamp_size(&mut self, size: StampSize) -> bool {
        match self {
            MarkupObject::Stamp(o) => {
                o.size = size;
                true
            }
            _ => false,
        }
    }

    pub fn as_box(&self) -> Option<&MarkupBox> {
        match self {
            MarkupObject::Box(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&MarkupText> {
        match self {
            MarkupObject::Text(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_pen(&self) -> Option<&MarkupPen> {
        match self {
            MarkupObject::Pen(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_stamp(&self) -> Option<&MarkupStamp> {
        match self {
            MarkupObject::Stamp(o) => Some(o),
            _ => None,
        }
    }

    /// Reference position used for offsets: the top-left of the box, text or
    /// stamp, or the first point of a pen stroke.
    pub fn origin(&self) -> Point {
        match self {
            MarkupObject::Box(o) => Point::new(o.x, o.y),
            MarkupObject::Text(o) => Point::new(o.x, o.y),
            MarkupObject::Pen(o) => o.points.first().copied().unwrap_or(Point::ZERO),
            MarkupObject::Stamp(o) => Point::new(o.x, o.y),
        }
    }
}

impl From<MarkupBox> for MarkupObject {
    fn from(o: MarkupBox) -> Self {
        MarkupObject::Box(o)
    }
}

impl From<MarkupText> for MarkupObject {
    fn from(o: MarkupText) -> Self {
        MarkupObject::Text(o)
    }
}

impl From<MarkupPen> for MarkupObject {
    fn from(o: MarkupPen) -> Self {
        MarkupObject::Pen(o)
    }
}

impl From<MarkupStamp> for MarkupObject {
    fn from(o: MarkupStamp) -> Self {
        MarkupObject::Stamp(o)
    }
}
