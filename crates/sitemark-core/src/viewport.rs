//! Viewport module for zoom/pan transforms over the blueprint.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const DEFAULT_MIN_ZOOM: f64 = 0.25;
/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f64 = 5.0;
/// Multiplicative step for zoom in/out.
pub const DEFAULT_ZOOM_STEP: f64 = 1.2;

/// Viewport manages the view transform for the markup canvas.
///
/// Markup geometry is stored in document (blueprint pixel) coordinates.
/// The viewport scales uniformly by `zoom` and then translates by
/// `(pan_x, pan_y)` in screen pixels, anchored at the canvas origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Horizontal pan offset in screen pixels.
    pub pan_x: f64,
    /// Vertical pan offset in screen pixels.
    pub pan_y: f64,
    /// Intrinsic blueprint width, known once the image decodes.
    pub image_width: Option<u32>,
    /// Intrinsic blueprint height, known once the image decodes.
    pub image_height: Option<u32>,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_bounds(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM, DEFAULT_ZOOM_STEP)
    }
}

impl Viewport {
    /// Create a viewport with default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport with explicit zoom bounds and step.
    ///
    /// Bounds that are not positive and finite fall back to the defaults, an
    /// inverted pair is swapped, and a step of 1 or less uses the default step.
    pub fn with_bounds(min_zoom: f64, max_zoom: f64, zoom_step: f64) -> Self {
        let positive = |zoom: f64, fallback: f64| {
            if zoom.is_finite() && zoom > 0.0 { zoom } else { fallback }
        };
        let low = positive(min_zoom, DEFAULT_MIN_ZOOM);
        let high = positive(max_zoom, DEFAULT_MAX_ZOOM);
        let (min_zoom, max_zoom) = if low <= high { (low, high) } else { (high, low) };
        let zoom_step = if zoom_step.is_finite() && zoom_step > 1.0 {
            zoom_step
        } else {
            DEFAULT_ZOOM_STEP
        };
        Self {
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            pan_x: 0.0,
            pan_y: 0.0,
            image_width: None,
            image_height: None,
            min_zoom,
            max_zoom,
            zoom_step,
        }
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Get the pan offset as a vector.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.pan_x, self.pan_y)
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts document coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset()) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to document coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset())
    }

    /// Convert a screen point to document coordinates.
    pub fn screen_to_document(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a document point to screen coordinates.
    pub fn document_to_screen(&self, document_point: Point) -> Point {
        self.transform() * document_point
    }

    /// Zoom in by one step, clamped to the maximum.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * self.zoom_step);
    }

    /// Zoom out by one step, clamped to the minimum.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / self.zoom_step);
    }

    /// Set the zoom level, clamped to the configured bounds.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Reset zoom to 100% and pan to the origin.
    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Pan by a delta in screen pixels. Panning is not clamped.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zoom by a factor, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let document_point = self.screen_to_document(screen_point);
        self.zoom = new_zoom;

        // Adjust pan so document_point stays under screen_point
        let new_screen = self.document_to_screen(document_point);
        self.pan(screen_point.x - new_screen.x, screen_point.y - new_screen.y);
    }

    /// Record the intrinsic blueprint dimensions.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_width = Some(width);
        self.image_height = Some(height);
    }

    /// Forget the blueprint dimensions (new blueprint pending decode).
    pub fn clear_image_size(&mut self) {
        self.image_width = None;
        self.image_height = None;
    }

    /// Get the blueprint size, if known.
    pub fn image_size(&self) -> Option<Size> {
        match (self.image_width, self.image_height) {
            (Some(w), Some(h)) => Some(Size::new(f64::from(w), f64::from(h))),
            _ => None,
        }
    }

    /// Fit the viewport so the whole blueprint is visible and centred.
    /// Does nothing until the blueprint dimensions are known.
    pub fn fit_to_image(&mut self, viewport: Size, padding: f64) {
        let Some(image) = self.image_size() else {
            return;
        };
        if image.width <= 0.0 || image.height <= 0.0 {
            self.reset_zoom();
            return;
        }

        let available = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = available.width / image.width;
        let scale_y = available.height / image.height;
        self.set_zoom(scale_x.min(scale_y));

        self.pan_x = (viewport.width - image.width * self.zoom) / 2.0;
        self.pan_y = (viewport.height - image.height * self.zoom) / 2.0;
    }
}
