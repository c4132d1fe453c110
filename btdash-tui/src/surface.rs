//! Chart surface backed by a ratatui braille canvas.
//!
//! The renderer draws into this surface in display units; one terminal cell
//! is 2 units wide and 4 tall, matching braille dot resolution. The
//! recorded picture is then painted as a [`Canvas`] widget with the y axis
//! flipped, since canvas coordinates grow upwards.

use btdash_analytics::chart::{PixelSize, Stroke, Surface, SurfaceError, Viewport};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::theme;

pub const UNITS_PER_COL: f64 = 2.0;
pub const UNITS_PER_ROW: f64 = 4.0;

/// The display-unit viewport for a terminal area.
pub fn viewport_for(area: Rect) -> Viewport {
    Viewport::new(
        area.width as f64 * UNITS_PER_COL,
        area.height as f64 * UNITS_PER_ROW,
    )
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    from: (f64, f64),
    to: (f64, f64),
    color: Color,
}

#[derive(Debug, Clone, PartialEq)]
struct Label {
    text: String,
    at: (f64, f64),
    color: Color,
}

#[derive(Debug, Clone, Default)]
pub struct TerminalSurface {
    width: f64,
    height: f64,
    backing: Option<PixelSize>,
    background: Option<Color>,
    segments: Vec<Segment>,
    labels: Vec<Label>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backing(&self) -> Option<PixelSize> {
        self.backing
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.segments.is_empty() && self.labels.is_empty()
    }

    /// Paint the recorded picture into `area`.
    pub fn paint(&self, f: &mut Frame, area: Rect, block: Block<'_>) {
        let (w, h) = (self.width.max(1.0), self.height.max(1.0));
        let mut canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(|ctx| {
                for s in &self.segments {
                    ctx.draw(&CanvasLine {
                        x1: s.from.0,
                        y1: h - s.from.1,
                        x2: s.to.0,
                        y2: h - s.to.1,
                        color: s.color,
                    });
                }
                for l in &self.labels {
                    ctx.print(
                        l.at.0,
                        h - l.at.1,
                        Span::styled(l.text.clone(), Style::default().fg(l.color)),
                    );
                }
            });
        if let Some(bg) = self.background {
            canvas = canvas.background_color(bg);
        }
        f.render_widget(canvas, area);
    }
}

impl Surface for TerminalSurface {
    fn resize(&mut self, backing: PixelSize, _scale: f64) -> Result<(), SurfaceError> {
        self.backing = Some(backing);
        Ok(())
    }

    fn clear(&mut self, width: f64, height: f64) -> Result<(), SurfaceError> {
        self.width = width;
        self.height = height;
        self.background = None;
        self.segments.clear();
        self.labels.clear();
        Ok(())
    }

    /// Only opaque hex fills show up; translucent CSS colors keep the
    /// terminal's own background.
    fn fill_rect(
        &mut self,
        _x: f64,
        _y: f64,
        _width: f64,
        _height: f64,
        color: &str,
    ) -> Result<(), SurfaceError> {
        let parsed = theme::parse_color(color, Color::Reset);
        self.background = (parsed != Color::Reset).then_some(parsed);
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) -> Result<(), SurfaceError> {
        self.labels.push(Label {
            text: text.to_string(),
            at: (x, y),
            color: theme::parse_color(color, theme::TEXT_SECONDARY),
        });
        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        points: &[(f64, f64)],
        stroke: Stroke<'_>,
    ) -> Result<(), SurfaceError> {
        let color = theme::parse_color(stroke.color, theme::ACCENT);
        self.segments.extend(points.windows(2).map(|pair| Segment {
            from: pair[0],
            to: pair[1],
            color,
        }));
        Ok(())
    }
}
