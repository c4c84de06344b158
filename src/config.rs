//! Project configuration (xstitch.yaml) parsing.
//!
//! The config file holds default chart settings and output paths so a
//! project can be re-rendered without repeating flags. Every key is
//! optional; command-line flags override file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{XsError, Result};
use crate::resample::{Filter, FilterKind};
use crate::stitch::ChartOptions;

/// The name of the config file.
pub const CONFIG_FILENAME: &str = "xstitch.yaml";

/// Project configuration loaded from xstitch.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stitches along the shorter side of the pattern.
    pub minimum_size: u32,

    /// Chart pixels per stitch.
    pub cell_size: u32,

    /// Grid line width in pixels (0 for none).
    pub grid_width: u32,

    /// Apply Floyd-Steinberg dithering when quantizing.
    pub dither: bool,

    /// TrueType font for symbols. The builtin bitmap font when unset.
    pub font: Option<PathBuf>,

    pub filter: FilterConfig,

    pub output: OutputConfig,
}

/// Resampling kernels by direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub shrink: FilterKind,
    pub enlarge: FilterKind,
}

/// Where the chart command writes its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub real_color: PathBuf,
    pub grid: PathBuf,
    /// JSON legend, skipped when unset.
    pub legend: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let options = ChartOptions::default();
        Self {
            minimum_size: options.minimum_size,
            cell_size: options.cell_size,
            grid_width: options.grid_width,
            dither: options.dither,
            font: None,
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            shrink: FilterKind::CatmullRom,
            enlarge: FilterKind::Nearest,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            real_color: PathBuf::from("realcolor.png"),
            grid: PathBuf::from("grid.png"),
            legend: None,
        }
    }
}

impl Config {
    /// Load config from an xstitch.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| XsError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(content).map_err(|e| XsError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Look for xstitch.yaml in `dir`. Defaults when there is none.
    pub fn discover(dir: impl AsRef<Path>) -> Result<(Self, Option<PathBuf>)> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        if path.is_file() {
            Ok((Self::load(&path)?, Some(path)))
        } else {
            Ok((Self::default(), None))
        }
    }

    /// Chart settings from this config.
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            minimum_size: self.minimum_size,
            cell_size: self.cell_size,
            grid_width: self.grid_width,
            dither: self.dither,
            filter: Filter::Directional {
                shrink: self.filter.shrink,
                enlarge: self.filter.enlarge,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.minimum_size == 0 {
            return Err(XsError::Config {
                message: "minimum_size must be at least 1".to_string(),
                help: None,
            });
        }
        if self.cell_size == 0 {
            return Err(XsError::Config {
                message: "cell_size must be at least 1".to_string(),
                help: None,
            });
        }
        Ok(())
    }
}
