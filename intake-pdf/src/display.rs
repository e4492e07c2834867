use crate::error::{Error, Result};
use crate::fonts::{Font, TextStyle};
use crate::graphics::{Color, Rect};
use crate::images::decode_image;
use crate::surface::Surface;

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font: Font,
        size: f64,
    },
    Image {
        rect: Rect,
        pixel_width: u32,
        pixel_height: u32,
    },
}

/// Items drawn on one page, in drawing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayPage {
    pub items: Vec<DisplayItem>,
}

impl DisplayPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            DisplayItem::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    pub fn strokes(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, DisplayItem::StrokeRect { .. }))
            .count()
    }
}

/// In-memory `Surface` that records every operation per page.
/// Used for layout previews and for checking what a document
/// would contain without producing a PDF.
#[derive(Debug, Clone)]
pub struct DisplayList {
    width: f64,
    height: f64,
    pages: Vec<DisplayPage>,
    active: usize,
}

impl DisplayList {
    pub fn new(width: f64, height: f64) -> Self {
        DisplayList {
            width,
            height,
            pages: Vec::new(),
            active: 0,
        }
    }

    pub fn pages(&self) -> &[DisplayPage] {
        &self.pages
    }

    /// 1-based page lookup.
    pub fn page(&self, page: usize) -> Option<&DisplayPage> {
        page.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    fn push(&mut self, item: DisplayItem) {
        match self.pages.get_mut(self.active) {
            Some(page) => page.items.push(item),
            None => log::warn!("display item dropped: no page"),
        }
    }
}

impl Surface for DisplayList {
    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) -> Result<()> {
        self.pages.push(DisplayPage::default());
        self.active = self.pages.len() - 1;
        Ok(())
    }

    fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 || page > self.pages.len() {
            return Err(Error::PageOutOfRange {
                page,
                count: self.pages.len(),
            });
        }
        self.active = page - 1;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DisplayItem::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.push(DisplayItem::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        self.push(DisplayItem::Text {
            text: text.to_string(),
            x,
            y,
            font: style.font,
            size: style.size,
        });
    }

    fn image(&mut self, data: &[u8], rect: Rect) -> Result<()> {
        let image = decode_image(data)?;
        self.push(DisplayItem::Image {
            rect,
            pixel_width: image.width,
            pixel_height: image.height,
        });
        Ok(())
    }
}
