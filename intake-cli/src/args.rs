use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Turn employment applications into printable PDF forms", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML settings file (defaults to ./intake.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Repeat for more detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate an application and write its PDF
    Generate {
        /// Application record as JSON
        application: PathBuf,

        /// Passport photo: a JPEG/PNG file or a data: URL
        #[arg(long)]
        photo: Option<String>,

        /// Header logo image
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Directory the PDF is written to (overrides `out_dir` in the config)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Submission history file to append to (overrides `history_path`)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Lay the document out and report pages without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Break pages only once the cursor passes the bottom margin
        #[arg(long)]
        threshold_breaks: bool,

        /// Write uncompressed content streams
        #[arg(long)]
        no_compress: bool,
    },

    /// List previous submissions
    History {
        /// Submission history file to read (overrides `history_path`)
        #[arg(long)]
        history: Option<PathBuf>,
    },
}
