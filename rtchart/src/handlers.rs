use crate::commands::*;
use crate::output::*;
use chrono::{DateTime, Utc};
use rtchart_core::{
    load_settings_file, normalize_settings, save_settings_file, ChartComposer, ChartDescription,
    ImageFormat, MonitorSettings,
};
use rtchart_render::PlottersBackend;
use rtchart_runtime::{MonitorService, RuntimeEvent};
use sampling::{SampleClock, SlidingWindowBuffer, Timestamp, WindowSnapshot};
use std::path::{Path, PathBuf};
use std::time::Duration;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub fn handle_command(command: Commands) -> CommandResult {
    match command {
        Commands::Run {
            duration_seconds,
            config,
            threshold,
            period_ms,
            freeze,
            output,
        } => {
            let mut settings = load_or_default(config.as_deref())?;
            if let Some(threshold) = threshold {
                settings.threshold = threshold;
            }
            if let Some(period_ms) = period_ms {
                settings.render_period_ms = period_ms;
            }
            if freeze {
                settings.running = false;
            }
            handle_run(
                normalize_settings(settings),
                Duration::from_secs(duration_seconds),
                output,
            )?;
        }
        Commands::Render { window, output } => handle_render(&window, &output)?,
        Commands::Describe { window } => {
            let (settings, snapshot) = offline_window(&window)?;
            let description = ChartComposer::new(settings.chart.clone()).describe(
                &snapshot,
                settings.threshold,
                settings.generation_step_ms,
            );
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        Commands::Config { command } => handle_config_command(command)?,
    }
    Ok(())
}

fn handle_run(
    settings: MonitorSettings,
    duration: Duration,
    output: Option<PathBuf>,
) -> CommandResult {
    let format = output
        .as_deref()
        .and_then(ImageFormat::from_path)
        .unwrap_or(settings.chart.format);
    let service = MonitorService::new(&settings, PlottersBackend::new(format))?;
    print_info(&format!(
        "Monitoring for {}s (threshold {}, chart every {} ms{})",
        duration.as_secs(),
        settings.threshold,
        settings.render_period_ms,
        if settings.running { "" } else { ", frozen" }
    ));

    let mut charts = 0usize;
    service.run_for_duration(duration, |event| match event {
        RuntimeEvent::Values(values) => print_values(&values),
        RuntimeEvent::Artifact(artifact) => {
            charts += 1;
            if let Some(path) = &output {
                if let Err(err) = artifact.save_image(path) {
                    print_error(&format!("Failed to write {}: {err}", path.display()));
                }
            }
        }
    })?;
    service.shutdown()?;

    match &output {
        Some(path) if charts > 0 => {
            print_info(&format!("{charts} charts rendered, latest in {}", path.display()))
        }
        _ => print_info(&format!("{charts} charts rendered")),
    }
    Ok(())
}

fn handle_render(window: &WindowArgs, output: &Path) -> CommandResult {
    let (settings, snapshot) = offline_window(window)?;
    let format = ImageFormat::from_path(output).unwrap_or(settings.chart.format);
    let artifact = ChartComposer::new(settings.chart.clone()).compose(
        &snapshot,
        settings.threshold,
        settings.generation_step_ms,
        &PlottersBackend::new(format),
    )?;
    artifact.save_image(output)?;
    print_info(&format!(
        "Chart written to {} ({})",
        output.display(),
        alarm_summary(&artifact.description)
    ));
    print_values(&artifact.values);
    Ok(())
}

fn handle_config_command(command: ConfigCommands) -> CommandResult {
    match command {
        ConfigCommands::Init { path, force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists, pass --force to overwrite",
                    path.display()
                )
                .into());
            }
            save_settings_file(&path, &MonitorSettings::default())?;
            print_info(&format!("Default settings written to {}", path.display()));
        }
        ConfigCommands::Show { path } => {
            let settings = load_settings_file(&path)?;
            print_info(&format!("Settings from {}:", path.display()));
            print!("{}", toml::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}

fn load_or_default(path: Option<&Path>) -> Result<MonitorSettings, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_settings_file(path)?),
        None => Ok(MonitorSettings::default()),
    }
}

/// Fills a window from a fixed start time so the same arguments always
/// produce the same chart.
fn offline_window(
    args: &WindowArgs,
) -> Result<(MonitorSettings, WindowSnapshot), Box<dyn std::error::Error>> {
    let mut settings = load_or_default(args.config.as_deref())?;
    if let Some(threshold) = args.threshold {
        settings.threshold = threshold;
    }
    if let Some(step_ms) = args.step_ms {
        settings.generation_step_ms = step_ms;
    }
    let settings = normalize_settings(settings);

    let start_time = DateTime::parse_from_rfc3339(&args.start)?.with_timezone(&Utc);
    let start = Timestamp::try_from(start_time)?;
    let step = settings.generation_step_ms;

    // Samples older than the window would be evicted anyway, so the clock
    // starts at the first one that survives.
    let kept = args.samples.min(settings.capacity);
    let offset_ms = |count: usize| {
        i64::try_from(count)
            .ok()
            .and_then(|count| count.checked_mul(i64::from(step)))
    };
    let (first, end) = offset_ms(args.samples - kept)
        .and_then(|skipped| start.checked_add_millis(skipped))
        .and_then(|first| {
            offset_ms(kept)
                .and_then(|span| first.checked_add_millis(span))
                .map(|end| (first, end))
        })
        .ok_or_else(|| {
            format!(
                "{} samples of {step} ms from {} run past the representable time range",
                args.samples, args.start
            )
        })?;

    let mut clock = SampleClock::new(first);
    let mut buffer = SlidingWindowBuffer::new(settings.capacity);
    buffer.extend(&clock.advance_and_generate(end, step));
    log::debug!(
        "generated the last {kept} of {} samples from {} in steps of {step} ms",
        args.samples,
        args.start
    );
    Ok((settings, buffer.snapshot()))
}

fn alarm_summary(description: &ChartDescription) -> &'static str {
    if description.alarm.is_some() {
        "alarm raised"
    } else {
        "no alarm"
    }
}
