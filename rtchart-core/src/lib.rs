pub mod backend;
pub mod chart;
pub mod composer;
pub mod scheduler;
pub mod settings;
pub mod threshold;
pub mod validation;

pub use backend::{
    format_value, ChartArtifact, ChartImage, ImageFormat, LatestValues, RenderBackend,
    RenderError,
};
pub use chart::{series_style, ChartDescription, ChartPoint, Rgba, SeriesStyle, SERIES_STYLES};
pub use composer::{display_name, latest_values, ChartComposer};
pub use scheduler::RenderScheduler;
pub use settings::{
    load_settings_file, normalize_settings, save_settings_file, ChartSettings, MonitorSettings,
    SettingsError,
};
pub use threshold::{is_breached, ThresholdEvaluator};
pub use validation::Validator;
