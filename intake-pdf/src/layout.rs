//! Paginated layout of labeled fields and section bands.
//!
//! `Layout` owns the drawing surface and a vertical cursor. Every
//! draw consults the page-break check first, so a block always
//! lands whole on one page. Page chrome ("Page i of N" and the
//! border frame) is added by `Layout::decorate`, which consumes the
//! layout: the total page count is only known once content drawing
//! has finished, and nothing can be drawn after it.

use crate::config::{BreakPolicy, LayoutConfig};
use crate::error::Result;
use crate::fonts::{Font, TextStyle};
use crate::graphics::Rect;
use crate::surface::Surface;
use crate::wrap::{Measure, RenderedBlock};

/// One unit of content for the layout engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawRequest {
    Section {
        title: String,
    },
    Field {
        label: String,
        value: String,
        full_width: bool,
    },
}

impl DrawRequest {
    pub fn section(title: impl Into<String>) -> Self {
        DrawRequest::Section {
            title: title.into(),
        }
    }

    /// A field wrapped to the narrow two-column width.
    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        DrawRequest::Field {
            label: label.into(),
            value: value.into(),
            full_width: false,
        }
    }

    /// A field wrapped to the full row width.
    pub fn full_field(label: impl Into<String>, value: impl Into<String>) -> Self {
        DrawRequest::Field {
            label: label.into(),
            value: value.into(),
            full_width: true,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DrawRequest::Section { title } => title,
            DrawRequest::Field { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Section,
    Field,
    Text,
}

/// Where a block ended up: its page (1-based) and the vertical
/// span it reserved, in layout units.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub kind: BlockKind,
    pub label: String,
    pub top: f64,
    pub bottom: f64,
}

/// A line of free text inside a `draw_rows` block. `advance` is
/// the distance from this baseline to the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRow {
    pub text: String,
    pub style: TextStyle,
    pub advance: f64,
}

/// The finished, decorated document.
#[derive(Debug)]
pub struct Decorated<S> {
    pub surface: S,
    pub page_count: usize,
    pub placements: Vec<Placement>,
}

pub struct Layout<S: Surface> {
    surface: S,
    config: LayoutConfig,
    cursor: f64,
    /// Whether anything has been placed on the active page.
    page_used: bool,
    placements: Vec<Placement>,
}

impl<S: Surface> Layout<S> {
    /// Start laying out on `surface`, adding the first page if it
    /// has none. The cursor starts at `first_page_top`.
    pub fn new(mut surface: S, config: LayoutConfig) -> Result<Self> {
        if surface.page_count() == 0 {
            surface.add_page()?;
        }
        Ok(Layout {
            surface,
            cursor: config.first_page_top,
            config,
            page_used: false,
            placements: Vec::new(),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// The page content is currently drawn to.
    pub fn page(&self) -> usize {
        self.surface.page_count()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Direct access for fixed-position artwork (header, photo).
    /// Such drawing does not move the cursor.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Move the cursor down without drawing.
    pub fn skip(&mut self, dy: f64) {
        self.cursor += dy;
    }

    /// Start a new page when `required` more units would push the
    /// cursor past the bottom margin. Returns whether a page was
    /// added. An untouched page is never abandoned, so a block
    /// taller than a whole page is placed at the top of one.
    pub fn ensure_room(&mut self, required: f64) -> Result<bool> {
        if self.cursor + required <= self.config.content_limit() || !self.page_used {
            return Ok(false);
        }
        self.surface.add_page()?;
        self.cursor = self.config.top_margin;
        self.page_used = false;
        log::debug!("page break: now on page {}", self.page());
        Ok(true)
    }

    /// Page-break check for a block of `height`, per the configured policy.
    fn check_break(&mut self, height: f64) -> Result<bool> {
        match self.config.break_policy {
            BreakPolicy::Measured => self.ensure_room(height),
            BreakPolicy::Threshold => self.ensure_room(0.0),
        }
    }

    pub fn draw(&mut self, request: &DrawRequest) -> Result<()> {
        match request {
            DrawRequest::Section { title } => self.draw_section(title),
            DrawRequest::Field {
                label,
                value,
                full_width,
            } => self.draw_field(label, value, *full_width),
        }
    }

    pub fn draw_all<'a, I>(&mut self, requests: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a DrawRequest>,
    {
        for request in requests {
            self.draw(request)?;
        }
        Ok(())
    }

    /// Bold `label:` at the margin and the wrapped value beside it.
    /// An empty value is drawn as the placeholder.
    pub fn draw_field(&mut self, label: &str, value: &str, full_width: bool) -> Result<()> {
        let block = self.wrap_value(value, full_width);
        self.check_break(block.height)?;

        let cfg = &self.config;
        let label_style = TextStyle::bold(cfg.label_size);
        let value_style = TextStyle::regular(cfg.value_size);
        let (label_x, value_x) = (cfg.margin, cfg.margin + cfg.value_indent);
        let line_height = cfg.line_height;

        self.surface
            .text(&format!("{}:", label), label_x, self.cursor, &label_style);
        for (i, line) in block.lines.iter().enumerate() {
            let y = self.cursor + i as f64 * line_height;
            self.surface.text(line, value_x, y, &value_style);
        }
        self.place(BlockKind::Field, label, block.height);
        Ok(())
    }

    /// Wrap a field value at its column width.
    pub fn wrap_value(&self, value: &str, full_width: bool) -> RenderedBlock {
        let cfg = &self.config;
        let text = if value.trim().is_empty() {
            cfg.placeholder.as_str()
        } else {
            value
        };
        let width = if full_width {
            cfg.full_width()
        } else {
            cfg.half_width
        };
        let measure = Measure {
            font: Font::Helvetica,
            size: cfg.value_size,
            units_per_point: cfg.units_per_point(),
        };
        RenderedBlock::layout(text, width, &measure, cfg.line_height, cfg.field_padding)
    }

    /// A filled band across the content width with the title inset.
    pub fn draw_section(&mut self, title: &str) -> Result<()> {
        let cfg = &self.config;
        let needed = cfg.section_gap + cfg.band_height + cfg.section_trailing;
        self.check_break(needed)?;

        self.cursor += self.config.section_gap;
        let band = Rect::new(
            self.config.margin,
            self.cursor,
            self.config.content_width(),
            self.config.band_height,
        );
        self.draw_band(title, band);
        let advance = self.config.band_height + self.config.section_trailing;
        self.place(BlockKind::Section, title, advance);
        Ok(())
    }

    /// The opening band on the first page: no gap, no break check,
    /// and narrowed so it stops short of the photo.
    pub fn draw_lead_section(&mut self, title: &str) -> Result<()> {
        let band = Rect::new(
            self.config.margin,
            self.cursor,
            self.config.full_width(),
            self.config.band_height,
        );
        self.draw_band(title, band);
        let advance = self.config.band_height + self.config.section_trailing;
        self.place(BlockKind::Section, title, advance);
        Ok(())
    }

    /// Free text lines kept together on one page.
    pub fn draw_rows(&mut self, label: &str, rows: &[TextRow]) -> Result<()> {
        let height: f64 = rows.iter().map(|r| r.advance).sum();
        self.check_break(height)?;
        let mut y = self.cursor;
        for row in rows {
            self.surface.text(&row.text, self.config.margin, y, &row.style);
            y += row.advance;
        }
        self.place(BlockKind::Text, label, height);
        Ok(())
    }

    fn draw_band(&mut self, title: &str, band: Rect) {
        let cfg = &self.config;
        let style = TextStyle::bold(cfg.section_title_size).with_color(cfg.title_color);
        let (x, y) = (band.x + cfg.title_inset, band.y + cfg.title_baseline);
        self.surface.fill_rect(band, cfg.band_color);
        self.surface.text(title, x, y, &style);
    }

    fn place(&mut self, kind: BlockKind, label: &str, height: f64) {
        let top = self.cursor;
        self.cursor += height;
        self.page_used = true;
        self.placements.push(Placement {
            page: self.page(),
            kind,
            label: label.to_string(),
            top,
            bottom: self.cursor,
        });
    }

    /// Finish content and add page chrome to every page: first a
    /// `Page i of N` footer pass, then a border pass.
    pub fn decorate(mut self) -> Result<Decorated<S>> {
        let total = self.surface.page_count();
        let cfg = &self.config;
        let (width, height) = self.surface.page_size();

        let footer_style = TextStyle::regular(cfg.footer_size).with_color(cfg.muted_color);
        let footer_x = width - cfg.margin - cfg.footer_right;
        let footer_y = height - cfg.footer_bottom;
        for page in 1..=total {
            self.surface.set_page(page)?;
            self.surface
                .text(&format!("Page {} of {}", page, total), footer_x, footer_y, &footer_style);
        }

        let inset = cfg.border_inset;
        let frame = Rect::new(inset, inset, width - 2.0 * inset, height - 2.0 * inset);
        for page in 1..=total {
            self.surface.set_page(page)?;
            self.surface
                .stroke_rect(frame, cfg.border_color, cfg.border_width);
        }

        Ok(Decorated {
            surface: self.surface,
            page_count: total,
            placements: self.placements,
        })
    }
}
