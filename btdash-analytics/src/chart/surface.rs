//! Drawing surfaces the chart renderer paints onto.
//!
//! A surface has a backing store in device pixels and draws in display
//! units; `resize` sets both the backing size and the display-to-device
//! scale. Every call can fail, and the renderer turns failures into a
//! logged [`RenderOutcome::Failed`](super::RenderOutcome::Failed).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("drawing surface is unavailable")]
    Unavailable,

    #[error("container has no area ({width}x{height})")]
    EmptyViewport { width: f64, height: f64 },

    #[error("surface backend failed: {0}")]
    Backend(String),
}

/// Backing-store size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// The container a chart is drawn into: display size plus pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Pixel ratio, with anything unusable treated as 1.
    pub fn scale(&self) -> f64 {
        if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }
}

/// Line style for one polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
}

/// A 2D drawing target. Coordinates are display units, origin top-left.
pub trait Surface {
    /// Reallocate the backing store and set the display-to-device scale.
    fn resize(&mut self, backing: PixelSize, scale: f64) -> Result<(), SurfaceError>;

    /// Erase everything within `width x height`.
    fn clear(&mut self, width: f64, height: f64) -> Result<(), SurfaceError>;

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str)
        -> Result<(), SurfaceError>;

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) -> Result<(), SurfaceError>;

    /// One continuous line through `points`, in order.
    fn stroke_polyline(&mut self, points: &[(f64, f64)], stroke: Stroke<'_>)
        -> Result<(), SurfaceError>;
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Resize { backing: PixelSize, scale: f64 },
    Clear { width: f64, height: f64 },
    FillRect { x: f64, y: f64, width: f64, height: f64, color: String },
    FillText { text: String, x: f64, y: f64, color: String },
    Polyline { points: Vec<(f64, f64)>, color: String, width: f64 },
}

/// Headless surface that records every call. A `clear` drops what was
/// drawn before it, so the log always describes the current picture.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    backing: Option<PixelSize>,
    failure: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn backing(&self) -> Option<PixelSize> {
        self.backing
    }

    pub fn polylines(&self) -> Vec<&[(f64, f64)]> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Polyline { points, .. } => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, op: DrawOp) -> Result<(), SurfaceError> {
        if let Some(msg) = &self.failure {
            return Err(SurfaceError::Backend(msg.clone()));
        }
        self.ops.push(op);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, backing: PixelSize, scale: f64) -> Result<(), SurfaceError> {
        self.record(DrawOp::Resize { backing, scale })?;
        self.backing = Some(backing);
        Ok(())
    }

    fn clear(&mut self, width: f64, height: f64) -> Result<(), SurfaceError> {
        if self.failure.is_none() {
            self.ops.retain(|op| matches!(op, DrawOp::Resize { .. }));
        }
        self.record(DrawOp::Clear { width, height })
    }

    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &str,
    ) -> Result<(), SurfaceError> {
        self.record(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        })
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) -> Result<(), SurfaceError> {
        self.record(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            color: color.to_string(),
        })
    }

    fn stroke_polyline(
        &mut self,
        points: &[(f64, f64)],
        stroke: Stroke<'_>,
    ) -> Result<(), SurfaceError> {
        self.record(DrawOp::Polyline {
            points: points.to_vec(),
            color: stroke.color.to_string(),
            width: stroke.width,
        })
    }
}
