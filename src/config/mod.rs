use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::geometry::Color;
use crate::overlay::OverlayStyle;
use crate::pipeline::SchedulerConfig;
use crate::state::GatePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "picnote";
const APP_CONFIG_FILE: &str = "config.json";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub overlay_text: Option<String>,
    #[serde(default)]
    pub overlay_font_size: Option<f32>,
    #[serde(default)]
    pub overlay_color: Option<String>,
    #[serde(default)]
    pub decode_workers: Option<usize>,
    #[serde(default)]
    pub decode_queue_capacity: Option<usize>,
    #[serde(default)]
    pub reset_gate_on_failure: bool,
}

impl AppConfig {
    pub fn overlay_style(&self) -> OverlayStyle {
        let mut style = OverlayStyle::default();
        if let Some(text) = self.overlay_text.as_deref().filter(|text| !text.is_empty()) {
            style.text = text.to_string();
        }
        match self.overlay_font_size {
            Some(size) if size.is_finite() && size > 0.0 => style.font_size = size,
            Some(size) => {
                tracing::warn!(size, "invalid overlay_font_size in config.json; using default");
            }
            None => {}
        }
        if let Some(raw) = self.overlay_color.as_deref() {
            match Color::parse_hex(raw) {
                Some(color) => style.color = color,
                None => tracing::warn!(
                    raw,
                    "invalid overlay_color value in config.json; expected #RRGGBB"
                ),
            }
        }
        style
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        let defaults = SchedulerConfig::default();
        SchedulerConfig {
            workers: self.decode_workers.unwrap_or(defaults.workers).max(1),
            queue_capacity: self
                .decode_queue_capacity
                .unwrap_or(defaults.queue_capacity)
                .max(1),
        }
    }

    pub fn gate_policy(&self) -> GatePolicy {
        GatePolicy::from_reset_flag(self.reset_gate_on_failure)
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
