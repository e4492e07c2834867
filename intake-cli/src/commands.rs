use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use intake_pdf::images::decode_data_url;
use intake_pdf::{
    preview, submit, validate_submission, Application, Assets, BreakPolicy, Error, FieldError,
    History, RenderOptions,
};

use crate::args::Commands;
use crate::config::IntakeConfig;

pub fn run(command: Commands, config: IntakeConfig) -> Result<()> {
    run_to(command, config, &mut io::stdout().lock())
}

/// Run a command, writing its report to `out`.
pub fn run_to<W: Write>(command: Commands, config: IntakeConfig, out: &mut W) -> Result<()> {
    match command {
        Commands::Generate {
            application,
            photo,
            logo,
            out_dir,
            history,
            dry_run,
            threshold_breaks,
            no_compress,
        } => {
            let options = render_options(&config, threshold_breaks, no_compress);
            let request = GenerateRequest {
                application,
                photo,
                logo: logo.or(config.logo_path),
                out_dir: out_dir.unwrap_or(config.out_dir),
                history: history.unwrap_or(config.history_path),
            };
            if dry_run {
                dry_run_generate(&request, &options, out)
            } else {
                generate(&request, &options, out)
            }
        }
        Commands::History { history } => list_history(
            &History::open(history.unwrap_or(config.history_path)),
            out,
        ),
    }
}

/// Command-line switches can only turn compression off or force
/// threshold breaks; they never undo the config file.
fn render_options(config: &IntakeConfig, threshold_breaks: bool, no_compress: bool) -> RenderOptions {
    let mut options = RenderOptions {
        layout: config.layout.clone(),
        compress: config.compress && !no_compress,
    };
    if threshold_breaks {
        options.layout.break_policy = BreakPolicy::Threshold;
    }
    options
}

struct GenerateRequest {
    application: PathBuf,
    photo: Option<String>,
    logo: Option<PathBuf>,
    out_dir: PathBuf,
    history: PathBuf,
}

impl GenerateRequest {
    fn load_application(&self) -> Result<Application> {
        let text = fs::read_to_string(&self.application)
            .with_context(|| format!("reading {}", self.application.display()))?;
        Application::from_json(&text)
            .with_context(|| format!("parsing {}", self.application.display()))
    }

    fn load_photo(&self) -> Result<Option<Vec<u8>>> {
        match self.photo.as_deref() {
            None => Ok(None),
            Some(url) if url.starts_with("data:") => Ok(Some(decode_data_url(url)?)),
            Some(path) => {
                let bytes =
                    fs::read(path).with_context(|| format!("reading photo {}", path))?;
                Ok(Some(bytes))
            }
        }
    }

    /// The logo is decoration: a missing file only costs a warning.
    fn load_logo(&self) -> Option<Vec<u8>> {
        let path = self.logo.as_deref()?;
        match fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("logo {} not loaded: {}", path.display(), e);
                None
            }
        }
    }
}

fn generate<W: Write>(request: &GenerateRequest, options: &RenderOptions, out: &mut W) -> Result<()> {
    let app = request.load_application()?;
    let photo = request.load_photo()?;
    let logo = request.load_logo();
    let assets = Assets {
        photo: photo.as_deref(),
        logo: logo.as_deref(),
    };

    check_out_dir(&request.out_dir)?;
    let history = History::open(&request.history);
    let submission = submit(&app, &assets, options, &request.out_dir, &history)
        .map_err(report_validation)?;
    writeln!(
        out,
        "Saved {} ({} page{})",
        submission.path.display(),
        submission.page_count,
        if submission.page_count == 1 { "" } else { "s" }
    )?;
    Ok(())
}

fn dry_run_generate<W: Write>(
    request: &GenerateRequest,
    options: &RenderOptions,
    out: &mut W,
) -> Result<()> {
    let app = request.load_application()?;
    let photo = request.load_photo()?;
    let logo = request.load_logo();
    validate_submission(&app, photo.as_deref()).map_err(report_validation)?;

    let assets = Assets {
        photo: photo.as_deref(),
        logo: logo.as_deref(),
    };
    let done = preview(&app, &assets, &options.layout, Local::now().date_naive())?;
    writeln!(out, "{} page(s)", done.page_count)?;
    for page in 1..=done.page_count {
        let labels: Vec<&str> = done
            .placements
            .iter()
            .filter(|p| p.page == page)
            .map(|p| p.label.as_str())
            .collect();
        writeln!(out, "  page {}: {}", page, labels.join(", "))?;
    }
    Ok(())
}

/// One indented line per rejected field.
fn validation_report(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("  {}\n", e)).collect()
}

/// Print each rejected field to stderr before failing.
fn report_validation(err: Error) -> anyhow::Error {
    if let Error::Validation(errors) = &err {
        eprint!("{}", validation_report(errors));
    }
    err.into()
}

fn list_history<W: Write>(history: &History, out: &mut W) -> Result<()> {
    let records = history
        .load()
        .with_context(|| format!("reading history {}", history.path().display()))?;
    if records.is_empty() {
        writeln!(out, "No submissions in {}", history.path().display())?;
        return Ok(());
    }
    for record in &records {
        writeln!(
            out,
            "{}  {:<24}  {}",
            record.submitted_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            record.data.full_name,
            record.file_name
        )?;
    }
    Ok(())
}

/// Reject an output directory that is an existing file.
fn check_out_dir(dir: &Path) -> Result<()> {
    if dir.is_file() {
        bail!("output path {} is a file", dir.display());
    }
    Ok(())
}
