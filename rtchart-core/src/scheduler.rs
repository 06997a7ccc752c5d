use crate::backend::{ChartArtifact, LatestValues, RenderBackend};
use crate::composer::ChartComposer;
use crate::settings::{normalize_settings, MonitorSettings};
use crate::validation::Validator;
use sampling::{SampleClock, SharedWindow, Timestamp, WindowSnapshot};

/// Drives sample generation and chart rendering on two independent cadences.
///
/// The scheduler does no timing of its own: a driver calls
/// [`on_generation_tick`](Self::on_generation_tick) every generation step and
/// [`on_render_tick`](Self::on_render_tick) every render period. Render ticks
/// are ignored while frozen; generation always proceeds.
pub struct RenderScheduler<B> {
    clock: SampleClock,
    window: SharedWindow,
    composer: ChartComposer,
    backend: B,
    generation_step_ms: u32,
    render_period_ms: u32,
    threshold: f64,
    running: bool,
    latest_values: LatestValues,
    last_artifact: Option<ChartArtifact>,
}

impl<B: RenderBackend> RenderScheduler<B> {
    /// Creates a scheduler whose first sample is due at `start`.
    pub fn new(settings: &MonitorSettings, start: Timestamp, backend: B) -> Self {
        let settings = normalize_settings(settings.clone());
        Self {
            clock: SampleClock::new(start),
            window: SharedWindow::new(settings.capacity),
            composer: ChartComposer::new(settings.chart),
            backend,
            generation_step_ms: settings.generation_step_ms,
            render_period_ms: settings.render_period_ms,
            threshold: settings.threshold,
            running: settings.running,
            latest_values: LatestValues::default(),
            last_artifact: None,
        }
    }

    /// Handle to the window for readers on other threads.
    pub fn window(&self) -> SharedWindow {
        self.window.clone()
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.window.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn render_period_ms(&self) -> u32 {
        self.render_period_ms
    }

    pub fn generation_step_ms(&self) -> u32 {
        self.generation_step_ms
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn latest_values(&self) -> &LatestValues {
        &self.latest_values
    }

    /// Most recent successfully rendered artifact, kept while frozen.
    pub fn last_artifact(&self) -> Option<&ChartArtifact> {
        self.last_artifact.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Appends every sample due by `now` and refreshes the value strings.
    /// Runs regardless of the running flag. Returns the number of samples
    /// appended.
    pub fn on_generation_tick(&mut self, now: Timestamp) -> usize {
        let samples = self
            .clock
            .advance_and_generate(now, self.generation_step_ms);
        self.window.append_all(&samples);
        if self.window.is_populated() {
            self.latest_values = LatestValues::from_sample(&self.window.latest());
        }
        samples.len()
    }

    /// Renders a new artifact if running; `None` while frozen.
    pub fn on_render_tick(&mut self) -> Option<ChartArtifact> {
        if !self.running {
            return None;
        }
        self.render()
    }

    /// Renders once right away, independent of the cadence and of the
    /// running flag.
    pub fn request_immediate_render(&mut self) -> Option<ChartArtifact> {
        self.render()
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            log::info!(
                "chart updates {}",
                if running { "resumed" } else { "frozen" }
            );
        }
        self.running = running;
    }

    /// Applies a new render period, returning the value actually used.
    pub fn set_render_period(&mut self, period_ms: u32) -> u32 {
        self.render_period_ms = Validator::clamp_render_period(period_ms);
        self.render_period_ms
    }

    /// Applies a new threshold and renders once so the change shows up
    /// without waiting for the next render tick. The window is untouched.
    pub fn set_threshold(&mut self, value: f64) -> Option<ChartArtifact> {
        self.threshold = Validator::clamp_threshold(value, self.threshold);
        self.request_immediate_render()
    }

    /// The time axis spans `generation_step_ms * capacity`, the time the
    /// window actually covers, not the render period.
    fn render(&mut self) -> Option<ChartArtifact> {
        let snapshot = self.window.snapshot();
        match self.composer.compose(
            &snapshot,
            self.threshold,
            self.generation_step_ms,
            &self.backend,
        ) {
            Ok(artifact) => {
                self.last_artifact = Some(artifact.clone());
                Some(artifact)
            }
            Err(err) => {
                log::warn!("chart render failed, keeping previous image: {err}");
                None
            }
        }
    }
}
