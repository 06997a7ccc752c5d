use crate::{Sample, Timestamp, TICKS_PER_SECOND};

/// Closed-form synthetic signal source.
///
/// Every value is a pure function of the sample timestamp, so a window filled
/// from a given start time and step is reproducible bit for bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalGenerator;

impl SignalGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Phase `p` shared by all three formulas: elapsed seconds times four.
    pub fn phase(timestamp: Timestamp) -> f64 {
        timestamp.ticks() as f64 / TICKS_PER_SECOND as f64 * 4.0
    }

    pub fn generate(&self, timestamp: Timestamp) -> Sample {
        let p = Self::phase(timestamp);
        Sample {
            timestamp,
            a: value_a(p),
            b: value_b(p),
            c: value_c(p),
        }
    }
}

pub fn value_a(p: f64) -> f64 {
    20.0 + (p * 129241.0).cos() * 10.0 + 1.0 / (p.cos() * p.cos() + 0.01)
}

pub fn value_b(p: f64) -> f64 {
    150.0 + 100.0 * (p / 27.7).sin() * (p / 10.1).sin()
}

pub fn value_c(p: f64) -> f64 {
    150.0 + 100.0 * (p / 6.7).cos() * (p / 11.9).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    // (raw ticks, A, B, C)
    const REFERENCE: [(i64, f64, f64, f64); 5] = [
        (0, 30.99009900990099, 150.0, 250.0),
        (
            2_500_000,
            17.74330001085386,
            150.35677525396937,
            248.53928082565434,
        ),
        (
            10_000_000,
            15.171639810661626,
            155.55131001719207,
            228.0734833975162,
        ),
        (
            123_456_789,
            31.601466107421658,
            53.76543454324279,
            125.20804244483463,
        ),
        (
            600_000_000,
            19.313793415896683,
            82.45023342058481,
            142.44656567651234,
        ),
    ];

    #[test]
    fn matches_reference_table() {
        let generator = SignalGenerator::new();
        for (ticks, a, b, c) in REFERENCE {
            let sample = generator.generate(Timestamp::from_ticks(ticks));
            assert_eq!(sample.timestamp.ticks(), ticks);
            assert!((sample.a - a).abs() < TOLERANCE, "A at {ticks}: {}", sample.a);
            assert!((sample.b - b).abs() < TOLERANCE, "B at {ticks}: {}", sample.b);
            assert!((sample.c - c).abs() < TOLERANCE, "C at {ticks}: {}", sample.c);
        }
    }

    #[test]
    fn phase_is_four_times_elapsed_seconds() {
        assert_eq!(SignalGenerator::phase(Timestamp::from_ticks(2_500_000)), 1.0);
        assert_eq!(SignalGenerator::phase(Timestamp::UNFILLED), 0.0);
    }

    #[test]
    fn generation_is_deterministic() {
        let ts = Timestamp::from_ticks(638_500_000_000_000_000);
        let generator = SignalGenerator::new();
        assert_eq!(generator.generate(ts), generator.generate(ts));
    }

    #[test]
    fn b_and_c_stay_within_amplitude() {
        let generator = SignalGenerator::new();
        for step in 0..2_000i64 {
            let sample = generator.generate(Timestamp::from_ticks(step * 2_500_000));
            assert!((50.0..=250.0).contains(&sample.b));
            assert!((50.0..=250.0).contains(&sample.c));
        }
    }
}
