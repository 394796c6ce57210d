//! Stamp markup.

use super::{MarkupColor, MarkupShape, MarkupTrait, ObjectKind, ObjectMeta};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Stamp sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl StampSize {
    /// Side length of the stamp in document pixels.
    pub fn side(&self) -> f64 {
        match self {
            StampSize::Small => 24.0,
            StampSize::Medium => 40.0,
            StampSize::Large => 64.0,
        }
    }
}

/// Defaults applied to newly placed stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StampSettings {
    pub shape: MarkupShape,
    pub color: MarkupColor,
    pub size: StampSize,
}

/// A fixed-size stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupStamp {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub shape: MarkupShape,
    pub color: MarkupColor,
    pub size: StampSize,
    /// Top-left x.
    pub x: f64,
    /// Top-left y.
    pub y: f64,
}

impl MarkupStamp {
    /// Create a stamp centred on a point.
    pub fn new(center: Point, settings: StampSettings) -> Self {
        let half = settings.size.side() / 2.0;
        Self {
            meta: ObjectMeta::new(ObjectKind::Stamp),
            shape: settings.shape,
            color: settings.color,
            size: settings.size,
            x: center.x - half,
            y: center.y - half,
        }
    }

    pub fn center(&self) -> Point {
        let half = self.size.side() / 2.0;
        Point::new(self.x + half, self.y + half)
    }
}

impl MarkupTrait for MarkupStamp {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn bounds(&self) -> Rect {
        let side = self.size.side();
        Rect::new(self.x, self.y, self.x + side, self.y + side)
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}
