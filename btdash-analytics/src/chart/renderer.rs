//! Single-series line charts: the equity curve and the win-rate trend.

use btdash_core::config::ChartSettings;
use tracing::warn;

use super::surface::{PixelSize, Stroke, Surface, SurfaceError, Viewport};

/// Label drawn on the equity chart when there is nothing to plot.
pub const EQUITY_PLACEHOLDER: &str = "Equity curve: not enough data";

/// How values map onto the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRange {
    /// Span the data's own min..max.
    Auto,
    /// Clamp into `min..=max` and span exactly that.
    Clamped { min: f64, max: f64 },
}

/// What a chart shows with fewer than two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseData {
    Placeholder,
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Drawn { points: usize },
    Placeholder,
    Blank,
    /// The call failed; the failure was logged.
    Failed,
}

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    name: &'static str,
    settings: ChartSettings,
    range: ValueRange,
    sparse: SparseData,
}

impl ChartRenderer {
    /// Equity curve: auto-scaled, placeholder label when sparse.
    pub fn equity(settings: ChartSettings) -> Self {
        Self {
            name: "equity",
            settings,
            range: ValueRange::Auto,
            sparse: SparseData::Placeholder,
        }
    }

    /// Rolling win rate: fixed 0..100 axis, left blank when sparse.
    pub fn win_rate_trend(settings: ChartSettings) -> Self {
        Self {
            name: "win_rate_trend",
            settings,
            range: ValueRange::Clamped {
                min: 0.0,
                max: 100.0,
            },
            sparse: SparseData::Blank,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// The configured container size at pixel ratio 1.
    pub fn default_viewport(&self) -> Viewport {
        Viewport::new(self.settings.width, self.settings.height)
    }

    /// `floor(size * ratio)` per axis, raised to the chart's floors.
    pub fn backing_size(&self, viewport: Viewport) -> PixelSize {
        let scale = viewport.scale();
        let px = |len: f64, floor: u32| {
            let scaled = (len * scale).floor();
            if scaled.is_finite() && scaled > floor as f64 {
                scaled.min(u32::MAX as f64) as u32
            } else {
                floor
            }
        };
        PixelSize {
            width: px(viewport.width, self.settings.min_width),
            height: px(viewport.height, self.settings.min_height),
        }
    }

    /// Map values to display coordinates inside the padded plot area.
    ///
    /// X runs linearly from `pad_x` to `width - pad_x` by index; Y runs from
    /// `height - pad_y` (lowest value) up to `pad_y` (highest).
    pub fn project(&self, viewport: Viewport, values: &[f64]) -> Vec<(f64, f64)> {
        let (pad_x, pad_y) = (self.settings.pad_x, self.settings.pad_y);
        let plot_w = viewport.width - 2.0 * pad_x;
        let plot_h = viewport.height - 2.0 * pad_y;
        let values: Vec<f64> = values.iter().map(|&v| self.bound(v)).collect();
        let (lo, hi) = self.span(&values);
        let steps = values.len().saturating_sub(1).max(1) as f64;

        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = pad_x + plot_w * i as f64 / steps;
                let y = pad_y + plot_h * (1.0 - (v - lo) / (hi - lo));
                (x, y)
            })
            .collect()
    }

    /// Clear and repaint the chart. Never fails: problems are logged and
    /// reported as [`RenderOutcome::Failed`].
    pub fn render(
        &self,
        surface: Option<&mut dyn Surface>,
        viewport: Viewport,
        values: &[f64],
    ) -> RenderOutcome {
        match self.try_render(surface, viewport, values) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(chart = self.name, error = %e, "chart render failed");
                RenderOutcome::Failed
            }
        }
    }

    fn try_render(
        &self,
        surface: Option<&mut dyn Surface>,
        viewport: Viewport,
        values: &[f64],
    ) -> Result<RenderOutcome, SurfaceError> {
        let surface = surface.ok_or(SurfaceError::Unavailable)?;
        if viewport.is_empty() {
            return Err(SurfaceError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        surface.resize(self.backing_size(viewport), viewport.scale())?;
        surface.clear(viewport.width, viewport.height)?;

        let sparse = values.len() < 2;
        if sparse && self.sparse == SparseData::Blank {
            return Ok(RenderOutcome::Blank);
        }

        surface.fill_rect(0.0, 0.0, viewport.width, viewport.height, &self.settings.background)?;

        if sparse {
            surface.fill_text(EQUITY_PLACEHOLDER, 10.0, 20.0, &self.settings.label_color)?;
            return Ok(RenderOutcome::Placeholder);
        }

        let points = self.project(viewport, values);
        surface.stroke_polyline(
            &points,
            Stroke {
                color: &self.settings.stroke_color,
                width: self.settings.line_width,
            },
        )?;
        Ok(RenderOutcome::Drawn {
            points: points.len(),
        })
    }

    fn bound(&self, v: f64) -> f64 {
        let v = if v.is_finite() { v } else { 0.0 };
        match self.range {
            ValueRange::Auto => v,
            ValueRange::Clamped { min, max } => v.clamp(min, max),
        }
    }

    fn span(&self, values: &[f64]) -> (f64, f64) {
        let (lo, hi) = match self.range {
            ValueRange::Clamped { min, max } => (min, max),
            ValueRange::Auto => values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                }),
        };
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        if hi <= lo {
            (lo, lo + 1.0)
        } else {
            (lo, hi)
        }
    }
}
