//! Renderer-facing surface.
//!
//! The core never paints. Each model produces a serializable frame (geometry
//! plus state) and hands it to an injected [`Renderer`]. A renderer that has no
//! drawing surface simply reports itself unavailable and the frame is skipped;
//! the simulation keeps stepping.

pub mod history;

use serde::{Deserialize, Serialize};

pub use history::{HistoryBuffer, PairedHistory};

/// A point in canvas or model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2 {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Both coordinates finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Straight line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point.
    pub from: Point2,
    /// End point.
    pub to: Point2,
}

/// Axis-aligned rectangle, origin at the top-left corner (canvas convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Map a series onto a polyline inside `area`.
///
/// Samples are spaced evenly across the width; a value of `y_max` touches the
/// top edge and zero touches the bottom. Fewer than two samples produce no
/// line.
#[must_use]
pub fn chart_polyline<'a>(
    values: impl ExactSizeIterator<Item = &'a f64>,
    area: Rect,
    y_max: f64,
) -> Vec<Point2> {
    let n = values.len();
    if n < 2 || y_max <= 0.0 {
        return Vec::new();
    }
    let x_step = area.width / (n - 1) as f64;
    values
        .enumerate()
        .map(|(i, v)| {
            Point2::new(
                area.left + i as f64 * x_step,
                area.bottom() - (v / y_max) * area.height,
            )
        })
        .collect()
}

/// Sink for per-frame model output.
pub trait Renderer<F> {
    /// Whether a drawing surface exists right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Draw one frame.
    fn draw(&mut self, frame: &F);
}

/// Renderer with no surface. Frames are never drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl<F> Renderer<F> for NullRenderer {
    fn is_available(&self) -> bool {
        false
    }

    fn draw(&mut self, _frame: &F) {}
}

/// Renderer that keeps the most recent frames in memory.
#[derive(Debug, Clone)]
pub struct RecordingRenderer<F> {
    frames: HistoryBuffer<F>,
    drawn: u64,
    available: bool,
}

impl<F> RecordingRenderer<F> {
    /// Keep up to `capacity` frames.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: HistoryBuffer::new(capacity),
            drawn: 0,
            available: true,
        }
    }

    /// Simulate losing or regaining the drawing surface.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Total frames drawn.
    #[must_use]
    pub const fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Retained frames, oldest first.
    #[must_use]
    pub const fn frames(&self) -> &HistoryBuffer<F> {
        &self.frames
    }

    /// Most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<&F> {
        self.frames.last()
    }
}

impl<F: Clone> Renderer<F> for RecordingRenderer<F> {
    fn is_available(&self) -> bool {
        self.available
    }

    fn draw(&mut self, frame: &F) {
        self.frames.push(frame.clone());
        self.drawn += 1;
    }
}

impl<F, R: Renderer<F> + ?Sized> Renderer<F> for Box<R> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn draw(&mut self, frame: &F) {
        (**self).draw(frame);
    }
}
