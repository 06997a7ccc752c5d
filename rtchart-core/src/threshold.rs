use sampling::{SeriesId, WindowSnapshot};

/// Series that take part in alarm evaluation. Series A is plotted but never
/// raises the alarm.
pub const ALARM_SERIES: [SeriesId; 2] = [SeriesId::B, SeriesId::C];

/// True iff either designated latest value is strictly above the threshold.
pub fn is_breached(latest_b: f64, latest_c: f64, threshold: f64) -> bool {
    latest_c > threshold || latest_b > threshold
}

pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    /// Evaluates the newest row of the window. An unpopulated window never
    /// breaches.
    pub fn evaluate(snapshot: &WindowSnapshot, threshold: f64) -> bool {
        if !snapshot.is_populated() {
            return false;
        }
        let latest = snapshot.latest();
        is_breached(latest.b, latest.c, threshold)
    }
}
