use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use intake_pdf::LayoutConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "intake.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub out_dir: PathBuf,
    pub history_path: PathBuf,
    pub logo_path: Option<PathBuf>,
    pub compress: bool,
    pub layout: LayoutConfig,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        IntakeConfig {
            out_dir: PathBuf::from("."),
            history_path: PathBuf::from("intake-history.json"),
            logo_path: None,
            compress: true,
            layout: LayoutConfig::default(),
        }
    }
}

impl IntakeConfig {
    /// Load an explicitly named file, or `intake.toml` from the
    /// working directory if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                Self::load_from(path)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: IntakeConfig =
            toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
