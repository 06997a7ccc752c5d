use sampling::{SeriesId, Timestamp};
use serde::{Deserialize, Serialize};

/// RGBA color. `a` is opacity, 255 being fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
            a: 0xff,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// Fixed presentation attributes of one of the three signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub id: SeriesId,
    /// Legend name shown on the chart
    pub name: &'static str,
    /// Name used next to the latest-value readouts
    pub display_name: &'static str,
    /// Line color
    pub color: Rgba,
    /// Highlight behind the value embedded in the legend label
    pub label_background: Rgba,
}

pub static SERIES_STYLES: [SeriesStyle; 3] = [
    SeriesStyle {
        id: SeriesId::A,
        name: "Software",
        display_name: "Alpha",
        color: Rgba::rgb(0xff0000),
        label_background: Rgba::rgb(0xffcccc),
    },
    SeriesStyle {
        id: SeriesId::B,
        name: "Hardware",
        display_name: "Beta",
        color: Rgba::rgb(0x00cc00),
        label_background: Rgba::rgb(0xccffcc),
    },
    SeriesStyle {
        id: SeriesId::C,
        name: "Services",
        display_name: "Gamma",
        color: Rgba::rgb(0x0000ff),
        label_background: Rgba::rgb(0xccccff),
    },
];

pub fn series_style(id: SeriesId) -> &'static SeriesStyle {
    &SERIES_STYLES[id.index()]
}

pub const CHART_BACKGROUND: Rgba = Rgba::rgb(0xf4f4f4);
pub const PLOT_BACKGROUND: Rgba = Rgba::rgb(0xffffff);
pub const GRID_COLOR: Rgba = Rgba::rgb(0xcccccc);
pub const TITLE_BACKGROUND: Rgba = Rgba::rgb(0xdddddd);
pub const THRESHOLD_COLOR: Rgba = Rgba::rgb(0xff0000);
pub const THRESHOLD_LABEL_BACKGROUND: Rgba = Rgba::rgb(0xffcccc);
pub const ALARM_TEXT_COLOR: Rgba = Rgba::rgb(0xffffff);
pub const ALARM_BACKGROUND: Rgba = Rgba::rgb(0xdd0000);
pub const EXCEEDANCE_FILL: Rgba = Rgba::rgb(0xff8888).with_alpha(0x80);

pub const ALARM_TEXT: &str = "Alarm - Latest Value Exceeded Threshold";
pub const TIME_LABEL_FORMAT: &str = "%H:%M:%S";
pub const AXIS_WIDTH: u32 = 2;

/// One plotted point on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: Timestamp,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDomain {
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    /// Visible time range; `None` until the window holds data
    pub domain: Option<TimeDomain>,
    /// strftime-style pattern for tick labels
    pub label_format: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueAxis {
    pub title: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub series: SeriesId,
    pub label: String,
    pub color: Rgba,
    pub label_background: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub series: SeriesId,
    /// Legend label with the formatted latest value embedded
    pub label: String,
    pub color: Rgba,
    pub points: Vec<ChartPoint>,
}

/// Horizontal marker at the alarm threshold, labelled on its left end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMark {
    pub value: f64,
    pub label: String,
    pub color: Rgba,
    pub label_background: Rgba,
}

/// Text box anchored to the top-right corner of the plot area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmAnnotation {
    pub text: String,
    pub color: Rgba,
    pub background: Rgba,
}

/// Area between a series line and the threshold wherever the series is above
/// it. Each polygon starts and ends on the threshold line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadedRegion {
    pub series: SeriesId,
    pub fill: Rgba,
    pub polygons: Vec<Vec<ChartPoint>>,
}

/// Backend-independent description of one chart frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescription {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub background: Rgba,
    pub title_background: Rgba,
    pub plot_background: Rgba,
    pub grid_color: Rgba,
    pub x_axis: TimeAxis,
    pub y_axis: ValueAxis,
    pub legend: Vec<LegendEntry>,
    pub lines: Vec<LineSeries>,
    pub threshold: Option<ThresholdMark>,
    pub alarm: Option<AlarmAnnotation>,
    pub shaded_regions: Vec<ShadedRegion>,
}

impl ChartDescription {
    pub fn has_data(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn line(&self, series: SeriesId) -> Option<&LineSeries> {
        self.lines.iter().find(|line| line.series == series)
    }

    /// Value range covering every line point and the threshold mark.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let values = self
            .lines
            .iter()
            .flat_map(|line| line.points.iter().map(|p| p.value))
            .chain(self.threshold.as_ref().map(|mark| mark.value))
            .filter(|v| v.is_finite());
        values.fold(None, |bounds, v| match bounds {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_literal_unpacks_channels() {
        let color = Rgba::rgb(0x00cc00);
        assert_eq!((color.r, color.g, color.b, color.a), (0, 0xcc, 0, 0xff));
        assert_eq!(EXCEEDANCE_FILL.a, 0x80);
    }

    #[test]
    fn styles_are_indexed_by_series() {
        for id in SeriesId::ALL {
            assert_eq!(series_style(id).id, id);
        }
    }
}
