//! Line-chart rendering onto pluggable drawing surfaces.

pub mod renderer;
pub mod surface;
pub mod svg;

pub use renderer::{ChartRenderer, RenderOutcome, SparseData, ValueRange, EQUITY_PLACEHOLDER};
pub use surface::{DrawOp, PixelSize, RecordingSurface, Stroke, Surface, SurfaceError, Viewport};
pub use svg::SvgSurface;
