use std::io::Write;

use crate::document::PdfDocument;
use crate::error::Result;
use crate::fonts::TextStyle;
use crate::graphics::{Color, Rect};

/// A paged drawing target addressed in layout units with a
/// top-left origin.
///
/// Pages are numbered from 1. Drawing always goes to the active
/// page: the most recently added one, or whichever page was last
/// selected with `set_page`.
pub trait Surface {
    /// Page width and height in layout units.
    fn page_size(&self) -> (f64, f64);

    fn page_count(&self) -> usize;

    /// Append a blank page and make it active.
    fn add_page(&mut self) -> Result<()>;

    /// Make an existing page active again.
    fn set_page(&mut self, page: usize) -> Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);

    /// Draw text with its baseline at `y`.
    fn text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);

    /// Decode `data` and draw it stretched over `rect`.
    fn image(&mut self, data: &[u8], rect: Rect) -> Result<()>;
}

/// `Surface` over a `PdfDocument`, converting layout units to
/// points and flipping the y axis.
pub struct PdfSurface<W: Write> {
    doc: PdfDocument<W>,
    width: f64,
    height: f64,
    points_per_unit: f64,
}

impl<W: Write> PdfSurface<W> {
    pub fn new(doc: PdfDocument<W>, width: f64, height: f64, points_per_unit: f64) -> Self {
        PdfSurface {
            doc,
            width,
            height,
            points_per_unit,
        }
    }

    /// Finish the PDF and return the underlying writer.
    pub fn finish(self) -> std::io::Result<W> {
        self.doc.end_document()
    }

    fn x(&self, x: f64) -> f64 {
        x * self.points_per_unit
    }

    fn y(&self, y: f64) -> f64 {
        (self.height - y) * self.points_per_unit
    }

    fn rect_path(&mut self, rect: Rect) {
        let k = self.points_per_unit;
        let (x, y) = (self.x(rect.x), self.y(rect.bottom()));
        self.doc.rect(x, y, rect.width * k, rect.height * k);
    }
}

impl<W: Write> Surface for PdfSurface<W> {
    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    fn add_page(&mut self) -> Result<()> {
        let k = self.points_per_unit;
        self.doc.begin_page(self.width * k, self.height * k)?;
        Ok(())
    }

    fn set_page(&mut self, page: usize) -> Result<()> {
        self.doc.open_page(page)?;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.doc.save_state().set_fill_color(color);
        self.rect_path(rect);
        self.doc.fill().restore_state();
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        let width = line_width * self.points_per_unit;
        self.doc
            .save_state()
            .set_stroke_color(color)
            .set_line_width(width);
        self.rect_path(rect);
        self.doc.stroke().restore_state();
    }

    fn text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        let (x, y) = (self.x(x), self.y(y));
        self.doc.place_text(text, x, y, style);
    }

    fn image(&mut self, data: &[u8], rect: Rect) -> Result<()> {
        let id = self.doc.load_image_bytes(data)?;
        let k = self.points_per_unit;
        let (x, y) = (self.x(rect.x), self.y(rect.bottom()));
        self.doc.place_image(id, x, y, rect.width * k, rect.height * k);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> PdfSurface<Vec<u8>> {
        let doc = PdfDocument::new(Vec::new()).unwrap();
        PdfSurface::new(doc, 100.0, 200.0, 2.0)
    }

    #[test]
    fn converts_to_bottom_left_points() {
        let mut s = surface();
        s.add_page().unwrap();
        s.fill_rect(Rect::new(10.0, 20.0, 30.0, 40.0), Color::BLACK);
        s.text("Hi", 5.0, 50.0, &TextStyle::regular(10.0));
        let out = String::from_utf8_lossy(&s.finish().unwrap()).into_owned();
        // bottom edge at y = 60 -> (200 - 60) * 2 = 280
        assert!(out.contains("20 280 60 80 re\nf\n"));
        assert!(out.contains("10 300 Td\n(Hi) Tj"));
        assert!(out.contains("/MediaBox [0 0 200 400]"));
    }

    #[test]
    fn set_page_out_of_range_is_an_error() {
        let mut s = surface();
        s.add_page().unwrap();
        assert!(s.set_page(2).is_err());
        assert!(s.set_page(1).is_ok());
    }
}
