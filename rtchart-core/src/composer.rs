use crate::backend::{format_value, ChartArtifact, LatestValues, RenderBackend, RenderError};
use crate::chart::{
    series_style, AlarmAnnotation, ChartDescription, ChartPoint, LegendEntry, LineSeries,
    ShadedRegion, ThresholdMark, TimeAxis, TimeDomain, ValueAxis, ALARM_BACKGROUND, ALARM_TEXT,
    ALARM_TEXT_COLOR, AXIS_WIDTH, CHART_BACKGROUND, EXCEEDANCE_FILL, GRID_COLOR, PLOT_BACKGROUND,
    SERIES_STYLES, THRESHOLD_COLOR, THRESHOLD_LABEL_BACKGROUND, TIME_LABEL_FORMAT,
    TITLE_BACKGROUND,
};
use crate::settings::ChartSettings;
use crate::threshold::{ThresholdEvaluator, ALARM_SERIES};
use sampling::{SeriesId, Timestamp, WindowSnapshot};

/// Builds chart descriptions from a window snapshot.
///
/// Composition holds no state besides the fixed layout settings, so equal
/// inputs always give equal descriptions.
#[derive(Debug, Clone, Default)]
pub struct ChartComposer {
    settings: ChartSettings,
}

impl ChartComposer {
    pub fn new(settings: ChartSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Describes the chart for `snapshot`.
    ///
    /// `period_ms` is the time covered by one window slot: the time axis
    /// spans `period_ms * capacity` milliseconds ending at the newest sample.
    pub fn describe(
        &self,
        snapshot: &WindowSnapshot,
        threshold: f64,
        period_ms: u32,
    ) -> ChartDescription {
        let mut description = self.frame();
        if !snapshot.is_populated() {
            description.legend = SERIES_STYLES
                .iter()
                .map(|style| LegendEntry {
                    series: style.id,
                    label: style.name.to_string(),
                    color: style.color,
                    label_background: style.label_background,
                })
                .collect();
            return description;
        }

        let latest = snapshot.latest();
        let span_ms = i64::from(period_ms).saturating_mul(snapshot.len() as i64);
        description.x_axis.domain = Some(TimeDomain {
            start: latest.timestamp.add_millis(-span_ms),
            end: latest.timestamp,
        });

        for style in &SERIES_STYLES {
            let label = format!("{}: {}", style.name, format_value(latest.value(style.id)));
            description.legend.push(LegendEntry {
                series: style.id,
                label: label.clone(),
                color: style.color,
                label_background: style.label_background,
            });
            description.lines.push(LineSeries {
                series: style.id,
                label,
                color: style.color,
                points: series_points(snapshot, style.id),
            });
        }

        description.threshold = Some(ThresholdMark {
            value: threshold,
            label: format!("Alarm = {threshold}"),
            color: THRESHOLD_COLOR,
            label_background: THRESHOLD_LABEL_BACKGROUND,
        });

        if ThresholdEvaluator::evaluate(snapshot, threshold) {
            description.alarm = Some(AlarmAnnotation {
                text: ALARM_TEXT.to_string(),
                color: ALARM_TEXT_COLOR,
                background: ALARM_BACKGROUND,
            });
        }

        description.shaded_regions = ALARM_SERIES
            .iter()
            .filter_map(|&series| {
                let line = description.line(series)?;
                Some(ShadedRegion {
                    series,
                    fill: EXCEEDANCE_FILL,
                    polygons: exceedance_polygons(&line.points, threshold),
                })
            })
            .collect();

        description
    }

    /// Describes the chart and asks `backend` for the image.
    pub fn compose<B: RenderBackend + ?Sized>(
        &self,
        snapshot: &WindowSnapshot,
        threshold: f64,
        period_ms: u32,
        backend: &B,
    ) -> Result<ChartArtifact, RenderError> {
        let description = self.describe(snapshot, threshold, period_ms);
        let image = backend.render(&description)?;
        Ok(ChartArtifact {
            description,
            image,
            values: latest_values(snapshot),
        })
    }

    fn frame(&self) -> ChartDescription {
        ChartDescription {
            width: self.settings.width,
            height: self.settings.height,
            title: self.settings.title.clone(),
            background: CHART_BACKGROUND,
            title_background: TITLE_BACKGROUND,
            plot_background: PLOT_BACKGROUND,
            grid_color: GRID_COLOR,
            x_axis: TimeAxis {
                domain: None,
                label_format: TIME_LABEL_FORMAT.to_string(),
                width: AXIS_WIDTH,
            },
            y_axis: ValueAxis {
                title: self.settings.y_axis_title.clone(),
                width: AXIS_WIDTH,
            },
            legend: Vec::new(),
            lines: Vec::new(),
            threshold: None,
            alarm: None,
            shaded_regions: Vec::new(),
        }
    }
}

/// Display strings for the newest row; empty before any data exists.
pub fn latest_values(snapshot: &WindowSnapshot) -> LatestValues {
    if snapshot.is_populated() {
        LatestValues::from_sample(&snapshot.latest())
    } else {
        LatestValues::default()
    }
}

pub fn display_name(series: SeriesId) -> &'static str {
    series_style(series).display_name
}

fn series_points(snapshot: &WindowSnapshot, series: SeriesId) -> Vec<ChartPoint> {
    snapshot
        .populated_samples()
        .map(|sample| ChartPoint {
            time: sample.timestamp,
            value: sample.value(series),
        })
        .collect()
}

/// Closed outlines of the parts of `points` strictly above `threshold`.
///
/// Crossings between two samples are interpolated linearly, and every
/// outline begins and ends on the threshold line.
pub fn exceedance_polygons(points: &[ChartPoint], threshold: f64) -> Vec<Vec<ChartPoint>> {
    let mut polygons = Vec::new();
    let mut current: Vec<ChartPoint> = Vec::new();
    let mut previous: Option<ChartPoint> = None;

    for &point in points {
        let above = point.value > threshold;
        match previous {
            Some(prev) if (prev.value > threshold) != above => {
                current.push(ChartPoint {
                    time: crossing_time(prev, point, threshold),
                    value: threshold,
                });
                if !above {
                    polygons.push(std::mem::take(&mut current));
                }
            }
            None if above => current.push(ChartPoint {
                time: point.time,
                value: threshold,
            }),
            _ => {}
        }
        if above {
            current.push(point);
        }
        previous = Some(point);
    }

    if let Some(last) = previous {
        if !current.is_empty() {
            current.push(ChartPoint {
                time: last.time,
                value: threshold,
            });
            polygons.push(current);
        }
    }
    polygons
}

fn crossing_time(from: ChartPoint, to: ChartPoint, threshold: f64) -> Timestamp {
    let fraction = (threshold - from.value) / (to.value - from.value);
    let span = (to.time.ticks() - from.time.ticks()) as f64;
    Timestamp::from_ticks(from.time.ticks() + (span * fraction).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(ticks: i64, value: f64) -> ChartPoint {
        ChartPoint {
            time: Timestamp::from_ticks(ticks),
            value,
        }
    }

    #[test]
    fn no_polygons_when_never_above() {
        let points = [pt(0, 1.0), pt(10, 5.0), pt(20, 5.0)];
        assert!(exceedance_polygons(&points, 5.0).is_empty());
    }

    #[test]
    fn interior_excursion_is_closed_on_threshold() {
        let points = [pt(0, 0.0), pt(10, 10.0), pt(20, 10.0), pt(30, 0.0)];
        let polygons = exceedance_polygons(&points, 5.0);
        assert_eq!(
            polygons,
            vec![vec![
                pt(5, 5.0),
                pt(10, 10.0),
                pt(20, 10.0),
                pt(25, 5.0)
            ]]
        );
    }

    #[test]
    fn excursions_at_edges_start_and_end_on_threshold() {
        let points = [pt(0, 8.0), pt(10, 2.0), pt(20, 2.0), pt(30, 8.0)];
        let polygons = exceedance_polygons(&points, 5.0);
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0], vec![pt(0, 5.0), pt(0, 8.0), pt(5, 5.0)]);
        assert_eq!(polygons[1], vec![pt(25, 5.0), pt(30, 8.0), pt(30, 5.0)]);
    }
}
