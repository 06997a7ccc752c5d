use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::backend::SVGBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rtchart_core::{
    ChartDescription, ChartImage, ChartPoint, ImageFormat, RenderBackend, RenderError, Rgba,
};
use sampling::{Timestamp, TICKS_PER_SECOND};

const TITLE_HEIGHT: u32 = 30;
const LABEL_PADDING: i32 = 3;
/// Visible span used before the window holds any data.
const EMPTY_SPAN_SECONDS: f64 = 60.0;

/// Draws chart descriptions with `plotters`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlottersBackend {
    format: ImageFormat,
}

impl PlottersBackend {
    pub fn new(format: ImageFormat) -> Self {
        Self { format }
    }

    pub fn svg() -> Self {
        Self::new(ImageFormat::Svg)
    }

    pub fn png() -> Self {
        Self::new(ImageFormat::Png)
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

impl RenderBackend for PlottersBackend {
    fn render(&self, description: &ChartDescription) -> Result<ChartImage, RenderError> {
        let image = match self.format {
            ImageFormat::Svg => render_svg(description)?,
            ImageFormat::Png => render_png(description)?,
        };
        log::debug!(
            "rendered {}x{} {} chart ({} bytes)",
            image.width,
            image.height,
            self.format.extension(),
            image.bytes.len()
        );
        Ok(image)
    }
}

pub fn render_svg(description: &ChartDescription) -> Result<ChartImage, RenderError> {
    let (width, height) = (description.width, description.height);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_chart(&root, description).map_err(RenderError::Backend)?;
        root.present()
            .map_err(|e| RenderError::Backend(e.to_string()))?;
    }
    Ok(ChartImage {
        format: ImageFormat::Svg,
        width,
        height,
        bytes: svg.into_bytes(),
    })
}

pub fn render_png(description: &ChartDescription) -> Result<ChartImage, RenderError> {
    let (width, height) = (description.width, description.height);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw_chart(&root, description).map_err(RenderError::Backend)?;
        root.present()
            .map_err(|e| RenderError::Backend(e.to_string()))?;
    }
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(ChartImage {
        format: ImageFormat::Png,
        width,
        height,
        bytes,
    })
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    description: &ChartDescription,
) -> Result<(), String> {
    root.fill(&rgba(description.background))
        .map_err(|e| e.to_string())?;

    let (title_area, body) = root.split_vertically(TITLE_HEIGHT);
    title_area
        .fill(&rgba(description.title_background))
        .map_err(|e| e.to_string())?;
    let title_style = ("sans-serif", 16)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    title_area
        .draw_text(
            &description.title,
            &title_style,
            ((description.width / 2) as i32, (TITLE_HEIGHT / 2) as i32),
        )
        .map_err(|e| e.to_string())?;

    let (x_min, x_max) = time_range(description);
    let (y_min, y_max) = value_range(description);

    let mut chart = ChartBuilder::on(&body)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 30)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| e.to_string())?;

    chart
        .plotting_area()
        .fill(&rgba(description.plot_background))
        .map_err(|e| e.to_string())?;

    let grid = rgba(description.grid_color);
    let label_format = description.x_axis.label_format.clone();
    let time_label = move |seconds: &f64| format_time(*seconds, &label_format);
    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(&grid)
        .bold_line_style(&grid)
        .axis_style(BLACK.stroke_width(description.y_axis.width))
        .y_desc(description.y_axis.title.as_str())
        .axis_desc_style(("sans-serif", 13).into_font().color(&BLACK))
        .label_style(("sans-serif", 11).into_font().color(&BLACK))
        .x_label_formatter(&time_label);
    if description.x_axis.domain.is_none() {
        mesh.x_labels(0);
    }
    mesh.draw().map_err(|e| e.to_string())?;

    for region in &description.shaded_regions {
        let fill = rgba(region.fill);
        chart
            .draw_series(region.polygons.iter().map(|outline| {
                Polygon::new(outline.iter().map(coord).collect::<Vec<_>>(), fill.filled())
            }))
            .map_err(|e| e.to_string())?;
    }

    for entry in &description.legend {
        let color = rgba(entry.color);
        let points: Vec<(f64, f64)> = description
            .line(entry.series)
            .map(|line| line.points.iter().map(coord).collect())
            .unwrap_or_default();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(1)))
            .map_err(|e| e.to_string())?
            .label(entry.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    if let Some(mark) = &description.threshold {
        let color = rgba(mark.color);
        chart
            .draw_series(LineSeries::new(
                vec![(x_min, mark.value), (x_max, mark.value)],
                color.stroke_width(2),
            ))
            .map_err(|e| e.to_string())?;
        let (x, y) = chart.backend_coord(&(x_min, mark.value));
        draw_label(
            root,
            &mark.label,
            rgba(mark.color),
            rgba(mark.label_background),
            (x + LABEL_PADDING, y),
            VPos::Bottom,
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 11).into_font().color(&BLACK))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(|e| e.to_string())?;

    if let Some(alarm) = &description.alarm {
        let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
        let style = ("sans-serif", 12).into_font().color(&rgba(alarm.color));
        let (text_width, _) = root
            .estimate_text_size(&alarm.text, &style)
            .map_err(|e| e.to_string())?;
        let left = x_pixels.end - text_width as i32 - 4 * LABEL_PADDING;
        draw_label(
            root,
            &alarm.text,
            rgba(alarm.color),
            rgba(alarm.background),
            (left, y_pixels.start + LABEL_PADDING),
            VPos::Top,
        )?;
    }

    Ok(())
}

/// Text on a filled box whose left edge sits at `anchor.0`. `vpos` says
/// whether the box hangs below or stands above `anchor.1`.
fn draw_label<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    text: &str,
    color: RGBAColor,
    background: RGBAColor,
    anchor: (i32, i32),
    vpos: VPos,
) -> Result<(), String> {
    let style = ("sans-serif", 12).into_font().color(&color);
    let (width, height) = root
        .estimate_text_size(text, &style)
        .map_err(|e| e.to_string())?;
    let (width, height) = (width as i32, height as i32);
    let top = match vpos {
        VPos::Top => anchor.1,
        VPos::Center => anchor.1 - height / 2 - LABEL_PADDING,
        VPos::Bottom => anchor.1 - height - 2 * LABEL_PADDING,
    };
    let bottom = top + height + 2 * LABEL_PADDING;
    let right = anchor.0 + width + 2 * LABEL_PADDING;
    root.draw(&Rectangle::new(
        [(anchor.0, top), (right, bottom)],
        background.filled(),
    ))
    .map_err(|e| e.to_string())?;
    root.draw_text(
        text,
        &style,
        (anchor.0 + LABEL_PADDING, top + LABEL_PADDING),
    )
    .map_err(|e| e.to_string())?;
    Ok(())
}

fn rgba(color: Rgba) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.opacity())
}

fn coord(point: &ChartPoint) -> (f64, f64) {
    (point.time.as_seconds(), point.value)
}

fn time_range(description: &ChartDescription) -> (f64, f64) {
    match description.x_axis.domain {
        Some(domain) if domain.end > domain.start => {
            (domain.start.as_seconds(), domain.end.as_seconds())
        }
        Some(domain) => {
            let end = domain.end.as_seconds();
            (end - 1.0, end)
        }
        None => (0.0, EMPTY_SPAN_SECONDS),
    }
}

/// Value range over every drawn line and the threshold mark, padded so
/// nothing sits on the plot border.
fn value_range(description: &ChartDescription) -> (f64, f64) {
    match description.value_bounds() {
        Some((low, high)) => {
            let padding = ((high - low) * 0.05).max(1.0);
            (low - padding, high + padding)
        }
        None => (0.0, 100.0),
    }
}

fn format_time(seconds: f64, format: &str) -> String {
    let ticks = (seconds * TICKS_PER_SECOND as f64).round() as i64;
    Timestamp::from_ticks(ticks)
        .to_datetime()
        .map(|time| time.format(format).to_string())
        .unwrap_or_default()
}
