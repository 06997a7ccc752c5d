use crate::generator::SignalGenerator;
use crate::{Sample, Timestamp, TICKS_PER_MILLISECOND};

pub const DEFAULT_GENERATION_STEP_MS: u32 = 250;

/// Source of "now" for the sample clock.
pub trait WallClock: Send {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Tracks the next scheduled sample timestamp and produces evenly spaced
/// samples no matter how late or coalesced the driving ticks are.
#[derive(Debug, Clone)]
pub struct SampleClock {
    next_due: Timestamp,
    generator: SignalGenerator,
}

impl SampleClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            next_due: start,
            generator: SignalGenerator::new(),
        }
    }

    pub fn starting_now() -> Self {
        Self::new(Timestamp::now())
    }

    pub fn next_due(&self) -> Timestamp {
        self.next_due
    }

    /// Emits one sample per generation period that has fully elapsed by
    /// `now`, oldest first, and advances the schedule past them.
    ///
    /// The period starting at the scheduled timestamp `t` is complete once
    /// `t + step <= now`. A wall clock at or behind the schedule yields
    /// nothing, as does a zero step.
    pub fn advance_and_generate(&mut self, now: Timestamp, step_ms: u32) -> Vec<Sample> {
        let mut samples = Vec::new();
        if step_ms == 0 {
            return samples;
        }
        let step_ticks = i64::from(step_ms) * TICKS_PER_MILLISECOND;
        while let Some(period_end) = self.next_due.ticks().checked_add(step_ticks) {
            if period_end > now.ticks() {
                break;
            }
            samples.push(self.generator.generate(self.next_due));
            self.next_due = Timestamp::from_ticks(period_end);
        }
        if samples.len() > 1 {
            log::debug!(
                "caught up {} generation periods, next sample due at {}",
                samples.len(),
                self.next_due
            );
        }
        samples
    }

    pub fn advance_with<C: WallClock + ?Sized>(&mut self, clock: &C, step_ms: u32) -> Vec<Sample> {
        self.advance_and_generate(clock.now(), step_ms)
    }
}
