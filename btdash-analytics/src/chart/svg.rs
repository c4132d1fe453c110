//! SVG document surface, used by the CLI to write charts to disk.

use std::fmt::Write as _;

use super::surface::{PixelSize, Stroke, Surface, SurfaceError};

#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    backing: Option<PixelSize>,
    view: (f64, f64),
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished document. `width`/`height` are the backing pixels, the
    /// view box is in display units.
    pub fn to_document(&self) -> String {
        let backing = self.backing.unwrap_or(PixelSize { width: 0, height: 0 });
        let mut doc = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
             viewBox=\"0 0 {} {}\">\n",
            backing.width,
            backing.height,
            num(self.view.0),
            num(self.view.1)
        );
        for el in &self.elements {
            doc.push_str("  ");
            doc.push_str(el);
            doc.push('\n');
        }
        doc.push_str("</svg>\n");
        doc
    }
}

impl Surface for SvgSurface {
    fn resize(&mut self, backing: PixelSize, scale: f64) -> Result<(), SurfaceError> {
        if backing.width == 0 || backing.height == 0 {
            return Err(SurfaceError::Backend("zero-sized SVG canvas".into()));
        }
        self.backing = Some(backing);
        self.view = (backing.width as f64 / scale, backing.height as f64 / scale);
        self.elements.clear();
        Ok(())
    }

    fn clear(&mut self, _width: f64, _height: f64) -> Result<(), SurfaceError> {
        self.elements.clear();
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &str,
    ) -> Result<(), SurfaceError> {
        self.elements.push(format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            num(x),
            num(y),
            num(width),
            num(height),
            escape(color)
        ));
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) -> Result<(), SurfaceError> {
        self.elements.push(format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"12\" \
             font-family=\"system-ui, sans-serif\">{}</text>",
            num(x),
            num(y),
            escape(color),
            escape(text)
        ));
        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        points: &[(f64, f64)],
        stroke: Stroke<'_>,
    ) -> Result<(), SurfaceError> {
        let mut coords = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            if i > 0 {
                coords.push(' ');
            }
            let _ = write!(coords, "{},{}", num(*x), num(*y));
        }
        self.elements.push(format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" \
             stroke-linejoin=\"round\"/>",
            coords,
            escape(stroke.color),
            num(stroke.width)
        ));
        Ok(())
    }
}

fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_has_backing_size_and_view_box() {
        let mut svg = SvgSurface::new();
        svg.resize(PixelSize { width: 1200, height: 320 }, 2.0).unwrap();
        svg.stroke_polyline(
            &[(12.0, 8.0), (588.0, 152.0)],
            Stroke {
                color: "#5be7a9",
                width: 1.2,
            },
        )
        .unwrap();
        let doc = svg.to_document();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains("width=\"1200\" height=\"320\" viewBox=\"0 0 600 160\""));
        assert!(doc.contains("points=\"12,8 588,152\""));
        assert!(doc.contains("stroke-width=\"1.2\""));
    }

    #[test]
    fn text_is_escaped() {
        let mut svg = SvgSurface::new();
        svg.resize(PixelSize { width: 300, height: 120 }, 1.0).unwrap();
        svg.fill_text("a < b & c", 10.0, 20.0, "#fff").unwrap();
        assert!(svg.to_document().contains("a &lt; b &amp; c"));
    }

    #[test]
    fn clear_empties_the_document() {
        let mut svg = SvgSurface::new();
        svg.resize(PixelSize { width: 300, height: 120 }, 1.0).unwrap();
        svg.fill_rect(0.0, 0.0, 300.0, 120.0, "#000").unwrap();
        svg.clear(300.0, 120.0).unwrap();
        assert!(!svg.to_document().contains("<rect"));
    }
}
