//! Tool palette and per-tool drawing state.

use crate::markup::{
    FontSizeBucket, MarkupBox, MarkupColor, MarkupObject, MarkupPen, MarkupShape, MarkupStamp,
    MarkupText, ObjectId, PenWidth, StampSettings,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tool {
    #[default]
    Select,
    Pan,
    /// Status box in the given color.
    Box(MarkupColor),
    Text,
    Pen,
    Stamp,
    /// Momentary: zooms the viewport once, never stays active.
    ZoomIn,
    /// Momentary: zooms the viewport once, never stays active.
    ZoomOut,
}

impl Tool {
    /// Get the palette name of this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Pan => "pan",
            Tool::Box(MarkupColor::Gray) => "box-gray",
            Tool::Box(MarkupColor::Red) => "box-red",
            Tool::Box(MarkupColor::Blue) => "box-blue",
            Tool::Text => "text",
            Tool::Pen => "pen",
            Tool::Stamp => "stamp",
            Tool::ZoomIn => "zoom-in",
            Tool::ZoomOut => "zoom-out",
        }
    }

    /// Check if selecting this tool only triggers a one-shot action.
    pub fn is_momentary(&self) -> bool {
        matches!(self, Tool::ZoomIn | Tool::ZoomOut)
    }

    /// Check if this tool creates markup objects.
    pub fn is_drawing_tool(&self) -> bool {
        matches!(self, Tool::Box(_) | Tool::Text | Tool::Pen | Tool::Stamp)
    }

    /// Get all tools in palette order.
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Select,
            Tool::Pan,
            Tool::Box(MarkupColor::Gray),
            Tool::Box(MarkupColor::Red),
            Tool::Box(MarkupColor::Blue),
            Tool::Text,
            Tool::Pen,
            Tool::Stamp,
            Tool::ZoomIn,
            Tool::ZoomOut,
        ]
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown tool name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::all()
            .iter()
            .copied()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

impl TryFrom<String> for Tool {
    type Error = UnknownTool;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tool> for String {
    fn from(tool: Tool) -> Self {
        tool.name().to_string()
    }
}

/// In-flight pointer gesture.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Freehand stroke being drawn, in document coordinates.
    Stroke { points: Vec<Point> },
    /// Viewport drag, tracking the last screen position.
    Pan { last: Point },
    /// Box or stamp placement, from the press position in document coordinates.
    Place { start: Point },
    /// Dragging the selection, from the last document position.
    Move { last: Point },
}

/// Tool palette state: active tool, selection, clipboard and style defaults.
#[derive(Debug, Clone)]
pub struct ToolState {
    /// Currently active tool. Never a momentary tool.
    pub active_tool: Tool,
    /// True while new markup is being drawn: a pen stroke or a box/stamp placement.
    pub is_drawing: bool,
    /// Selected object ids. May briefly contain stale ids; consumers filter.
    pub selected_objects: HashSet<ObjectId>,
    /// Copied objects, in z-order.
    pub clipboard: Vec<MarkupObject>,
    /// Defaults for new stamps.
    pub stamp_settings: StampSettings,
    /// Outline used by the box tools.
    pub box_shape: MarkupShape,
    /// Label attached to new gray boxes.
    pub box_label: Option<String>,
    pub text_color: MarkupColor,
    pub text_size: FontSizeBucket,
    pub pen_color: MarkupColor,
    pub pen_width: PenWidth,
    gesture: Gesture,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            active_tool: Tool::default(),
            is_drawing: false,
            selected_objects: HashSet::new(),
            clipboard: Vec::new(),
            stamp_settings: StampSettings::default(),
            box_shape: MarkupShape::default(),
            box_label: None,
            text_color: MarkupColor::Red,
            text_size: FontSizeBucket::default(),
            pen_color: MarkupColor::Red,
            pen_width: PenWidth::default(),
            gesture: Gesture::Idle,
        }
    }
}

impl ToolState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a persistent tool active, dropping any in-flight gesture.
    /// Momentary tools are ignored here; the editor applies them directly.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool.is_momentary() {
            return;
        }
        self.cancel();
        self.active_tool = tool;
    }

    /// Start a freehand stroke at a document point.
    pub fn begin_stroke(&mut self, point: Point) {
        self.gesture = Gesture::Stroke {
            points: vec![point],
        };
        self.is_drawing = true;
    }

    /// Extend the in-flight stroke. Repeated points are dropped.
    pub fn extend_stroke(&mut self, point: Point) {
        if let Gesture::Stroke { points } = &mut self.gesture {
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
    }

    /// Finish the in-flight stroke and build the pen object.
    /// Strokes shorter than two points are discarded.
    pub fn finish_stroke(&mut self, point: Point) -> Option<MarkupPen> {
        self.extend_stroke(point);
        let gesture = std::mem::take(&mut self.gesture);
        self.is_drawing = false;
        match gesture {
            Gesture::Stroke { points } if points.len() >= MarkupPen::MIN_POINTS => {
                Some(MarkupPen::new(points, self.pen_color, self.pen_width))
            }
            _ => None,
        }
    }

    /// Points of the in-flight stroke (for preview rendering).
    pub fn stroke_points(&self) -> &[Point] {
        match &self.gesture {
            Gesture::Stroke { points } => points,
            _ => &[],
        }
    }

    /// Start a viewport drag at a screen point.
    pub fn begin_pan(&mut self, screen: Point) {
        self.gesture = Gesture::Pan { last: screen };
    }

    /// Advance the viewport drag, returning the screen delta since the last call.
    pub fn drag_pan(&mut self, screen: Point) -> Option<Vec2> {
        match &mut self.gesture {
            Gesture::Pan { last } => {
                let delta = screen - *last;
                *last = screen;
                Some(delta)
            }
            _ => None,
        }
    }

    /// End the viewport drag.
    pub fn end_pan(&mut self) {
        if matches!(self.gesture, Gesture::Pan { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Start placing a box or stamp at a document point.
    pub fn begin_place(&mut self, point: Point) {
        self.gesture = Gesture::Place { start: point };
        self.is_drawing = true;
    }

    /// Finish a placement gesture.
    ///
    /// A box dragged further than `drag_threshold` spans the dragged
    /// rectangle; anything else is treated as a click at the press point.
    pub fn finish_place(&mut self, point: Point, drag_threshold: f64) -> Option<MarkupObject> {
        self.is_drawing = false;
        let Gesture::Place { start } = std::mem::take(&mut self.gesture) else {
            return None;
        };
        match self.active_tool {
            Tool::Box(color) if start.distance(point) > drag_threshold => {
                Some(self.build_box(MarkupBox::from_corners(start, point, self.box_shape, color)).into())
            }
            _ => self.create_click_object(start),
        }
    }

    /// Start dragging the selection at a document point.
    pub fn begin_move(&mut self, point: Point) {
        self.gesture = Gesture::Move { last: point };
    }

    /// Advance the selection drag, returning the document delta since the last call.
    pub fn drag_move(&mut self, point: Point) -> Option<Vec2> {
        match &mut self.gesture {
            Gesture::Move { last } => {
                let delta = point - *last;
                *last = point;
                Some(delta)
            }
            _ => None,
        }
    }

    /// End the selection drag. Returns false if none was in flight.
    pub fn end_move(&mut self) -> bool {
        let moving = self.is_moving();
        if moving {
            self.gesture = Gesture::Idle;
        }
        moving
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.gesture, Gesture::Move { .. })
    }

    /// Check if a pointer gesture is in flight.
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Cancel the current gesture without committing anything.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.is_drawing = false;
    }

    /// Build the object a single click creates with the active tool.
    /// Text is excluded because its content comes from the text prompt.
    pub fn create_click_object(&self, point: Point) -> Option<MarkupObject> {
        match self.active_tool {
            Tool::Box(color) => {
                Some(self.build_box(MarkupBox::centered(point, self.box_shape, color)).into())
            }
            Tool::Stamp => Some(MarkupStamp::new(point, self.stamp_settings).into()),
            Tool::Select | Tool::Pan | Tool::Text | Tool::Pen | Tool::ZoomIn | Tool::ZoomOut => {
                None
            }
        }
    }

    /// Apply the box label to gray boxes.
    fn build_box(&self, mut boxed: MarkupBox) -> MarkupBox {
        if boxed.color == MarkupColor::Gray {
            boxed.label = self.box_label.clone().filter(|l| !l.is_empty());
        }
        boxed
    }

    /// Build a text object with the current text style.
    /// Blank content yields nothing.
    pub fn create_text(&self, point: Point, content: &str) -> Option<MarkupText> {
        if content.trim().is_empty() {
            return None;
        }
        Some(MarkupText::new(
            point,
            content.to_string(),
            self.text_size.points(),
            self.text_color,
        ))
    }
}
