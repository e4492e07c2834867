//! Builds the complete application document: header, photo, the
//! planned fields, the declaration block and page decoration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::application::{validate_submission, Application};
use crate::config::LayoutConfig;
use crate::display::DisplayList;
use crate::document::PdfDocument;
use crate::error::Result;
use crate::fonts::TextStyle;
use crate::graphics::{Color, Rect};
use crate::history::{History, SubmissionRecord};
use crate::layout::{Decorated, Layout, Placement, TextRow};
use crate::plan::draw_plan;
use crate::surface::{PdfSurface, Surface};

pub const DOCUMENT_TITLE: &str = "Employee Information Form";
pub const ACADEMY_NAME: &str = "Rapid Academy of Career Exam";
pub const ATTESTATION: &str =
    "I hereby declare that all the information given above is true to the best of my knowledge and belief.";
pub const SIGNATURE_LINE: &str = "Candidate Signature : __________________";

const LOGO_TOP: f64 = 8.0;
const TITLE_OFFSET: f64 = 25.0;
const TITLE_BASELINE: f64 = 18.0;
const SUBTITLE_BASELINE: f64 = 25.0;
const DECLARATION_GAP: f64 = 10.0;

/// Image bytes drawn into the document. Either may be missing or
/// undecodable; the document is produced without it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assets<'a> {
    pub photo: Option<&'a [u8]>,
    pub logo: Option<&'a [u8]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub layout: LayoutConfig,
    pub compress: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            layout: LayoutConfig::default(),
            compress: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub placements: Vec<Placement>,
}

/// Draw the whole document onto `surface` and decorate it.
pub fn render<S: Surface>(
    surface: S,
    config: &LayoutConfig,
    app: &Application,
    assets: &Assets<'_>,
    submitted_on: NaiveDate,
) -> Result<Decorated<S>> {
    let mut layout = Layout::new(surface, config.clone())?;
    draw_header(&mut layout, assets.logo);

    if let Some(photo) = assets.photo {
        let cfg = layout.config();
        let frame = Rect::new(
            cfg.page_width - cfg.margin - cfg.photo_width,
            cfg.first_page_top,
            cfg.photo_width,
            cfg.photo_height,
        );
        if let Err(e) = layout.surface_mut().image(photo, frame) {
            log::warn!("photo not added: {}", e);
        }
    }

    layout.draw_lead_section("Personal Information")?;
    layout.draw_all(&draw_plan(app))?;
    draw_declaration(&mut layout, submitted_on)?;
    layout.decorate()
}

fn draw_header<S: Surface>(layout: &mut Layout<S>, logo: Option<&[u8]>) {
    let cfg = layout.config().clone();
    let surface = layout.surface_mut();
    surface.fill_rect(
        Rect::new(0.0, 0.0, cfg.page_width, cfg.header_height),
        cfg.header_color,
    );

    if let Some(logo) = logo {
        let frame = Rect::new(cfg.margin, LOGO_TOP, cfg.logo_size, cfg.logo_size);
        if let Err(e) = surface.image(logo, frame) {
            log::warn!("logo not added: {}", e);
        }
    }

    let x = cfg.margin + TITLE_OFFSET;
    surface.text(
        DOCUMENT_TITLE,
        x,
        TITLE_BASELINE,
        &TextStyle::bold(20.0).with_color(Color::WHITE),
    );
    surface.text(
        ACADEMY_NAME,
        x,
        SUBTITLE_BASELINE,
        &TextStyle::regular(10.0).with_color(Color::WHITE),
    );
}

fn draw_declaration<S: Surface>(layout: &mut Layout<S>, submitted_on: NaiveDate) -> Result<()> {
    layout.draw_section("Declaration")?;
    layout.skip(DECLARATION_GAP);

    let muted = layout.config().muted_color;
    let rows = [
        TextRow {
            text: ATTESTATION.to_string(),
            style: TextStyle::bold(10.0).with_color(muted),
            advance: 15.0,
        },
        TextRow {
            text: SIGNATURE_LINE.to_string(),
            style: TextStyle::bold(10.0).with_color(muted),
            advance: 10.0,
        },
        TextRow {
            text: format!("Submitted on: {}", submission_date(submitted_on)),
            style: TextStyle::regular(10.0).with_color(muted),
            advance: 0.0,
        },
    ];
    layout.draw_rows("Declaration", &rows)
}

/// Long Indian-English date, e.g. `02 April 2025`.
pub fn submission_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// `Employee_Form_{name}_{millis}.pdf`, with each whitespace run in
/// the name replaced by one underscore.
pub fn file_name(full_name: &str, at: DateTime<Utc>) -> String {
    let mut name = String::with_capacity(full_name.len());
    let mut in_space = false;
    for c in full_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    format!("Employee_Form_{}_{}.pdf", name, at.timestamp_millis())
}

/// Produce the PDF for an application in memory.
pub fn generate(
    app: &Application,
    assets: &Assets<'_>,
    options: &RenderOptions,
    now: DateTime<Local>,
) -> Result<GeneratedDocument> {
    let started = Instant::now();
    let cfg = &options.layout;

    let mut doc = PdfDocument::new(Vec::new())?;
    doc.set_compression(options.compress)
        .set_info("Title", DOCUMENT_TITLE)
        .set_info("Author", &app.full_name)
        .set_info("Creator", ACADEMY_NAME);
    let surface = PdfSurface::new(doc, cfg.page_width, cfg.page_height, cfg.points_per_unit);

    let done = render(surface, cfg, app, assets, now.date_naive())?;
    let bytes = done.surface.finish()?;
    let file_name = file_name(&app.full_name, now.with_timezone(&Utc));

    log::info!(
        "generated {} ({} page(s), {} bytes) in {:?}",
        file_name,
        done.page_count,
        bytes.len(),
        started.elapsed()
    );
    Ok(GeneratedDocument {
        file_name,
        bytes,
        page_count: done.page_count,
        placements: done.placements,
    })
}

/// Lay the document out without producing a PDF.
pub fn preview(
    app: &Application,
    assets: &Assets<'_>,
    config: &LayoutConfig,
    submitted_on: NaiveDate,
) -> Result<Decorated<DisplayList>> {
    let surface = DisplayList::new(config.page_width, config.page_height);
    render(surface, config, app, assets, submitted_on)
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub path: PathBuf,
    pub page_count: usize,
    pub record: SubmissionRecord,
}

/// Validate, generate, save into `out_dir` and record in `history`.
pub fn submit(
    app: &Application,
    assets: &Assets<'_>,
    options: &RenderOptions,
    out_dir: &Path,
    history: &History,
) -> Result<Submission> {
    validate_submission(app, assets.photo)?;

    let now = Local::now();
    let generated = generate(app, assets, options, now)?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&generated.file_name);
    fs::write(&path, &generated.bytes)?;

    let record = SubmissionRecord::new(
        generated.file_name.clone(),
        now.with_timezone(&Utc),
        app.clone(),
    );
    history.append(record.clone())?;

    Ok(Submission {
        path,
        page_count: generated.page_count,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_collapses_whitespace() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            file_name("Asha  Kumari\tPatel", at),
            "Employee_Form_Asha_Kumari_Patel_1700000000123.pdf"
        );
        assert_eq!(file_name(" Asha", at), "Employee_Form__Asha_1700000000123.pdf");
    }

    #[test]
    fn submission_date_is_two_digit_day_long_month() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        assert_eq!(submission_date(date), "02 April 2025");
    }

    #[test]
    fn header_is_drawn_before_content() {
        let app = Application::default();
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let done = preview(&app, &Assets::default(), &LayoutConfig::default(), date).unwrap();
        let first = done.surface.page(1).unwrap();
        let texts: Vec<&str> = first.texts().take(3).collect();
        assert_eq!(texts, vec![DOCUMENT_TITLE, ACADEMY_NAME, "Personal Information"]);
    }

    #[test]
    fn bad_photo_is_skipped() {
        let app = Application::default();
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let assets = Assets {
            photo: Some(&b"not a photo"[..]),
            logo: None,
        };
        let done = preview(&app, &assets, &LayoutConfig::default(), date).unwrap();
        assert!(done.surface.page(1).unwrap().contains_text("Personal Information"));
    }
}
