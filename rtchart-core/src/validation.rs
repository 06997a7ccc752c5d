pub const THRESHOLD_MIN: f64 = 0.0;
pub const THRESHOLD_MAX: f64 = 400.0;
pub const DEFAULT_THRESHOLD: f64 = 210.0;

pub const RENDER_PERIOD_MIN_MS: u32 = 250;
pub const RENDER_PERIOD_MAX_MS: u32 = 2_000;
pub const RENDER_PERIOD_STEP_MS: u32 = 250;
pub const DEFAULT_RENDER_PERIOD_MS: u32 = 1_000;

pub struct Validator;

impl Validator {
    /// Clamps into `[THRESHOLD_MIN, THRESHOLD_MAX]`. Non-finite input keeps
    /// `current`.
    pub fn clamp_threshold(value: f64, current: f64) -> f64 {
        if !value.is_finite() {
            log::warn!("ignoring non-finite threshold {value}, keeping {current}");
            return current;
        }
        let clamped = value.clamp(THRESHOLD_MIN, THRESHOLD_MAX);
        if clamped != value {
            log::warn!("threshold {value} out of range, clamped to {clamped}");
        }
        clamped
    }

    /// Snaps to the nearest step and clamps into the allowed period range.
    pub fn clamp_render_period(period_ms: u32) -> u32 {
        let half_step = RENDER_PERIOD_STEP_MS / 2;
        let snapped =
            period_ms.saturating_add(half_step) / RENDER_PERIOD_STEP_MS * RENDER_PERIOD_STEP_MS;
        let clamped = snapped.clamp(RENDER_PERIOD_MIN_MS, RENDER_PERIOD_MAX_MS);
        if clamped != period_ms {
            log::warn!("render period {period_ms} ms adjusted to {clamped} ms");
        }
        clamped
    }
}
