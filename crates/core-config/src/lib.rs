//! Configuration loading, validation, and atomic persistence.
//!
//! The on-disk file is TOML (`runtop.toml`), parsed tolerantly: unknown
//! fields are ignored, a malformed file degrades to defaults with a warning,
//! and every enumerated option falls back to its default on an unrecognized
//! value. Writes go through a temp file in the destination directory followed
//! by an atomic rename, so a crash mid-save can never leave a torn config.

use anyhow::{Context, Result};
use core_render::ColorScheme;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "runtop.toml";
const GRID_DIM_RANGE: std::ops::RangeInclusive<u16> = 1..=9;
const DEFAULT_HEARTBEAT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub rows: u16,
    pub cols: u16,
}

impl GridDims {
    fn clamped(self, name: &str) -> Self {
        let clamp = |v: u16| v.clamp(*GRID_DIM_RANGE.start(), *GRID_DIM_RANGE.end());
        let out = Self {
            rows: clamp(self.rows),
            cols: clamp(self.cols),
        };
        if out != self {
            info!(
                target: "config",
                grid = name,
                rows = self.rows,
                cols = self.cols,
                clamped_rows = out.rows,
                clamped_cols = out.cols,
                "grid_dims_clamped"
            );
        }
        out
    }
}

/// Series/chart color assignment strategy names shared by both grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    PerPlot,
    PerSeries,
}

impl ColorMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "per_plot" => Some(Self::PerPlot),
            "per_series" => Some(Self::PerSeries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerPlot => "per_plot",
            Self::PerSeries => "per_series",
        }
    }
}

/// Raw file shape. Everything optional; resolution happens in `Config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    metrics_grid: Option<GridDims>,
    system_grid: Option<GridDims>,
    color_scheme: Option<String>,
    per_plot_color_scheme: Option<String>,
    system_color_scheme: Option<String>,
    system_color_mode: Option<String>,
    single_run_color_mode: Option<String>,
    heartbeat_interval_seconds: Option<u64>,
    left_sidebar_visible: Option<bool>,
    right_sidebar_visible: Option<bool>,
}

/// Resolved, validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub metrics_grid: GridDims,
    pub system_grid: GridDims,
    pub color_scheme: ColorScheme,
    pub per_plot_color_scheme: ColorScheme,
    pub system_color_scheme: ColorScheme,
    pub system_color_mode: ColorMode,
    pub single_run_color_mode: ColorMode,
    pub heartbeat_interval_seconds: u64,
    pub left_sidebar_visible: bool,
    pub right_sidebar_visible: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metrics_grid: GridDims { rows: 2, cols: 3 },
            system_grid: GridDims { rows: 3, cols: 1 },
            color_scheme: ColorScheme::Default,
            per_plot_color_scheme: ColorScheme::Default,
            system_color_scheme: ColorScheme::Default,
            system_color_mode: ColorMode::PerPlot,
            single_run_color_mode: ColorMode::PerPlot,
            heartbeat_interval_seconds: DEFAULT_HEARTBEAT_SECS,
            left_sidebar_visible: true,
            right_sidebar_visible: true,
        }
    }
}

impl Config {
    fn from_file(file: ConfigFile) -> Self {
        let defaults = Config::default();
        let scheme = |raw: Option<String>, which: &str, fallback: ColorScheme| {
            let Some(name) = raw else { return fallback };
            match ColorScheme::parse(&name) {
                Some(s) => s,
                None => {
                    warn!(
                        target: "config",
                        option = which,
                        value = name.as_str(),
                        "unknown_color_scheme"
                    );
                    fallback
                }
            }
        };
        let mode = |raw: Option<String>, which: &str, fallback: ColorMode| {
            let Some(name) = raw else { return fallback };
            match ColorMode::parse(&name) {
                Some(m) => m,
                None => {
                    warn!(
                        target: "config",
                        option = which,
                        value = name.as_str(),
                        "unknown_color_mode"
                    );
                    fallback
                }
            }
        };

        let heartbeat = file
            .heartbeat_interval_seconds
            .unwrap_or(DEFAULT_HEARTBEAT_SECS)
            .max(1);

        Self {
            metrics_grid: file
                .metrics_grid
                .unwrap_or(defaults.metrics_grid)
                .clamped("metrics_grid"),
            system_grid: file
                .system_grid
                .unwrap_or(defaults.system_grid)
                .clamped("system_grid"),
            color_scheme: scheme(file.color_scheme, "color_scheme", defaults.color_scheme),
            per_plot_color_scheme: scheme(
                file.per_plot_color_scheme,
                "per_plot_color_scheme",
                defaults.per_plot_color_scheme,
            ),
            system_color_scheme: scheme(
                file.system_color_scheme,
                "system_color_scheme",
                defaults.system_color_scheme,
            ),
            system_color_mode: mode(
                file.system_color_mode,
                "system_color_mode",
                defaults.system_color_mode,
            ),
            single_run_color_mode: mode(
                file.single_run_color_mode,
                "single_run_color_mode",
                defaults.single_run_color_mode,
            ),
            heartbeat_interval_seconds: heartbeat,
            left_sidebar_visible: file
                .left_sidebar_visible
                .unwrap_or(defaults.left_sidebar_visible),
            right_sidebar_visible: file
                .right_sidebar_visible
                .unwrap_or(defaults.right_sidebar_visible),
        }
    }

    fn to_file(&self) -> ConfigFile {
        ConfigFile {
            metrics_grid: Some(self.metrics_grid),
            system_grid: Some(self.system_grid),
            color_scheme: Some(self.color_scheme.as_str().to_string()),
            per_plot_color_scheme: Some(self.per_plot_color_scheme.as_str().to_string()),
            system_color_scheme: Some(self.system_color_scheme.as_str().to_string()),
            system_color_mode: Some(self.system_color_mode.as_str().to_string()),
            single_run_color_mode: Some(self.single_run_color_mode.as_str().to_string()),
            heartbeat_interval_seconds: Some(self.heartbeat_interval_seconds),
            left_sidebar_visible: Some(self.left_sidebar_visible),
            right_sidebar_visible: Some(self.right_sidebar_visible),
        }
    }
}

/// Working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("runtop").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load from `path` (or the discovered location). Missing file and parse
/// failures both resolve to defaults; parse failures warn.
pub fn load_from(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Config::from_file(file),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Config::default()
        }
    }
}

/// Atomic save: temp file in the destination directory, then rename.
pub fn save_to(path: &Path, config: &Config) -> Result<()> {
    let serialized =
        toml::to_string_pretty(&config.to_file()).context("serializing configuration")?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating config directory {}", dir.display()))?;
    }
    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))
        .context("creating temp config file")?;
    tmp.write_all(serialized.as_bytes())
        .context("writing temp config file")?;
    tmp.persist(path)
        .with_context(|| format!("renaming config into place at {}", path.display()))?;
    info!(target: "config", path = %path.display(), "config_saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_from(Some(PathBuf::from("__no_such_config__.toml")));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn grid_dims_clamp_to_one_through_nine() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[metrics_grid]\nrows = 0\ncols = 40\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg.metrics_grid, GridDims { rows: 1, cols: 9 });
    }

    #[test]
    fn unknown_enumerations_fall_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "color_scheme = \"ultraviolet\"\nsystem_color_mode = \"rainbow\"\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg.color_scheme, ColorScheme::Default);
        assert_eq!(cfg.system_color_mode, ColorMode::PerPlot);
    }

    #[test]
    fn malformed_file_degrades_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "metrics_grid = not toml at all").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn heartbeat_interval_floors_at_one() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "heartbeat_interval_seconds = 0\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg.heartbeat_interval_seconds, 1);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut cfg = Config::default();
        cfg.metrics_grid = GridDims { rows: 4, cols: 2 };
        cfg.left_sidebar_visible = false;
        cfg.system_color_mode = ColorMode::PerSeries;
        save_to(&path, &cfg).unwrap();

        let loaded = load_from(Some(path.clone()));
        assert_eq!(loaded, cfg);

        // Overwrite is atomic and repeatable.
        cfg.right_sidebar_visible = false;
        save_to(&path, &cfg).unwrap();
        assert_eq!(load_from(Some(path)), cfg);
    }
}
