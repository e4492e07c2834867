use serde::{Deserialize, Serialize};

use crate::graphics::Color;

/// How the page-break check decides whether a block still fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakPolicy {
    /// Measure the block first and break if it would cross the
    /// bottom margin. Blocks never straddle the limit.
    #[default]
    Measured,
    /// Break only once the cursor itself is past the bottom margin,
    /// before measuring. Reproduces the row positions of documents
    /// produced by the original form, at the cost of tall blocks
    /// running into the bottom margin.
    Threshold,
}

/// Page geometry, typography and colors for the application
/// document. Lengths are layout units (millimetres by default),
/// font sizes are points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub points_per_unit: f64,

    pub margin: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    /// Cursor start on the first page, below the header band.
    pub first_page_top: f64,

    pub header_height: f64,
    pub photo_width: f64,
    pub photo_height: f64,
    /// Space kept clear on the right of full-width values for the photo.
    pub photo_gutter: f64,
    pub logo_size: f64,

    pub value_indent: f64,
    pub half_width: f64,
    pub line_height: f64,
    pub field_padding: f64,
    pub label_size: f64,
    pub value_size: f64,
    pub placeholder: String,

    pub section_gap: f64,
    pub band_height: f64,
    pub section_trailing: f64,
    pub title_inset: f64,
    pub title_baseline: f64,
    pub section_title_size: f64,

    pub footer_size: f64,
    pub footer_right: f64,
    pub footer_bottom: f64,
    pub border_inset: f64,
    pub border_width: f64,

    pub header_color: Color,
    pub band_color: Color,
    pub title_color: Color,
    pub border_color: Color,
    pub muted_color: Color,

    pub break_policy: BreakPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_width: 210.0,
            page_height: 297.0,
            points_per_unit: 72.0 / 25.4,

            margin: 15.0,
            top_margin: 20.0,
            bottom_margin: 30.0,
            first_page_top: 45.0,

            header_height: 35.0,
            photo_width: 35.0,
            photo_height: 45.0,
            photo_gutter: 40.0,
            logo_size: 20.0,

            value_indent: 55.0,
            half_width: 80.0,
            line_height: 5.0,
            field_padding: 3.0,
            label_size: 10.0,
            value_size: 10.0,
            placeholder: "N/A".to_string(),

            section_gap: 5.0,
            band_height: 10.0,
            section_trailing: 5.0,
            title_inset: 3.0,
            title_baseline: 7.0,
            section_title_size: 12.0,

            footer_size: 8.0,
            footer_right: 20.0,
            footer_bottom: 10.0,
            border_inset: 5.0,
            border_width: 1.0,

            header_color: Color::rgb8(37, 99, 235),
            band_color: Color::rgb8(239, 246, 255),
            title_color: Color::rgb8(30, 64, 175),
            border_color: Color::rgb8(37, 99, 235),
            muted_color: Color::rgb8(100, 100, 100),

            break_policy: BreakPolicy::Measured,
        }
    }
}

impl LayoutConfig {
    /// Lowest cursor position content may reach on a page.
    pub fn content_limit(&self) -> f64 {
        self.page_height - self.bottom_margin
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Wrap width for values that span the row, leaving the photo
    /// gutter clear.
    pub fn full_width(&self) -> f64 {
        self.content_width() - self.photo_gutter
    }

    /// Layout units per typographic point.
    pub fn units_per_point(&self) -> f64 {
        1.0 / self.points_per_unit
    }
}
