use crate::chart::ChartDescription;
use sampling::Sample;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("render backend failed: {0}")]
    Backend(String),
    #[error("image encoding failed: {0}")]
    Encode(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(ImageFormat::Svg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

/// Encoded chart image as produced by a rendering backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Capability to turn a chart description into an image. The core never
/// talks to a drawing API directly.
pub trait RenderBackend {
    fn render(&self, description: &ChartDescription) -> Result<ChartImage, RenderError>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &B {
    fn render(&self, description: &ChartDescription) -> Result<ChartImage, RenderError> {
        (**self).render(description)
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn render(&self, description: &ChartDescription) -> Result<ChartImage, RenderError> {
        (**self).render(description)
    }
}

/// Formatted latest values shown next to the chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestValues {
    pub a: String,
    pub b: String,
    pub c: String,
}

impl LatestValues {
    pub fn from_sample(sample: &Sample) -> Self {
        Self {
            a: format_value(sample.a),
            b: format_value(sample.b),
            c: format_value(sample.c),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty() && self.c.is_empty()
    }
}

pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

/// Output of one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub description: ChartDescription,
    pub image: ChartImage,
    pub values: LatestValues,
}

impl ChartArtifact {
    pub fn save_image<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &self.image.bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling::Timestamp;

    #[test]
    fn values_use_two_decimals() {
        let values = LatestValues::from_sample(&Sample {
            timestamp: Timestamp::from_ticks(1),
            a: 30.990099,
            b: 150.0,
            c: 248.539_280_8,
        });
        assert_eq!(values.a, "30.99");
        assert_eq!(values.b, "150.00");
        assert_eq!(values.c, "248.54");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ImageFormat::from_path(Path::new("out/chart.PNG")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_path(Path::new("chart.svg")),
            Some(ImageFormat::Svg)
        );
        assert_eq!(ImageFormat::from_path(Path::new("chart")), None);
    }
}
