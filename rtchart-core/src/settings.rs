use crate::backend::ImageFormat;
use crate::validation::{Validator, DEFAULT_RENDER_PERIOD_MS, DEFAULT_THRESHOLD};
use sampling::{DEFAULT_CAPACITY, DEFAULT_GENERATION_STEP_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CHART_WIDTH: u32 = 600;
pub const DEFAULT_CHART_HEIGHT: u32 = 270;
pub const MIN_CHART_WIDTH: u32 = 200;
pub const MIN_CHART_HEIGHT: u32 = 120;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub generation_step_ms: u32,
    pub render_period_ms: u32,
    pub threshold: f64,
    pub running: bool,
    pub capacity: usize,
    pub chart: ChartSettings,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            generation_step_ms: DEFAULT_GENERATION_STEP_MS,
            render_period_ms: DEFAULT_RENDER_PERIOD_MS,
            threshold: DEFAULT_THRESHOLD,
            running: true,
            capacity: DEFAULT_CAPACITY,
            chart: ChartSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub y_axis_title: String,
    pub format: ImageFormat,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            title: "Realtime Chart Demonstration".to_string(),
            y_axis_title: "Price (USD)".to_string(),
            format: ImageFormat::Svg,
        }
    }
}

pub fn normalize_settings(mut settings: MonitorSettings) -> MonitorSettings {
    if settings.generation_step_ms == 0 {
        log::warn!(
            "generation_step_ms must be positive, using {DEFAULT_GENERATION_STEP_MS} ms"
        );
        settings.generation_step_ms = DEFAULT_GENERATION_STEP_MS;
    }
    settings.render_period_ms = Validator::clamp_render_period(settings.render_period_ms);
    settings.threshold = Validator::clamp_threshold(settings.threshold, DEFAULT_THRESHOLD);
    settings.capacity = settings.capacity.max(1);
    settings.chart.width = settings.chart.width.max(MIN_CHART_WIDTH);
    settings.chart.height = settings.chart.height.max(MIN_CHART_HEIGHT);
    settings
}

pub fn load_settings_file(path: &Path) -> Result<MonitorSettings, SettingsError> {
    let data = std::fs::read_to_string(path)?;
    let settings: MonitorSettings = toml::from_str(&data)?;
    Ok(normalize_settings(settings))
}

pub fn save_settings_file(path: &Path, settings: &MonitorSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let data = toml::to_string_pretty(settings)?;
    std::fs::write(path, data)?;
    Ok(())
}
