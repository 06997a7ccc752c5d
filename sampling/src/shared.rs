use crate::buffer::{SlidingWindowBuffer, WindowSnapshot};
use crate::Sample;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Window shared between the generation writer and readers on other threads.
///
/// Appends of a whole catch-up batch and snapshot copies both happen under
/// one lock, so a reader never sees a timestamp from one append next to a
/// value from another.
#[derive(Debug, Clone, Default)]
pub struct SharedWindow {
    inner: Arc<Mutex<SlidingWindowBuffer>>,
}

impl SharedWindow {
    pub fn new(capacity: usize) -> Self {
        Self::from_buffer(SlidingWindowBuffer::new(capacity))
    }

    pub fn from_buffer(buffer: SlidingWindowBuffer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlidingWindowBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append_all(&self, samples: &[Sample]) {
        if samples.is_empty() {
            return;
        }
        self.lock().extend(samples);
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.lock().snapshot()
    }

    pub fn latest(&self) -> Sample {
        self.lock().latest()
    }

    pub fn is_populated(&self) -> bool {
        self.lock().is_populated()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SeriesId, Timestamp};
    use std::thread;

    #[test]
    fn concurrent_reader_sees_consistent_rows() {
        let window = SharedWindow::new(16);
        let writer = window.clone();
        let handle = thread::spawn(move || {
            for k in 1..=2_000i64 {
                let value = k as f64;
                writer.append_all(&[Sample {
                    timestamp: Timestamp::from_ticks(k),
                    a: value,
                    b: value,
                    c: value,
                }]);
            }
        });
        for _ in 0..200 {
            let snapshot = window.snapshot();
            for sample in snapshot.populated_samples() {
                let expected = sample.timestamp.ticks() as f64;
                assert_eq!(sample.a, expected);
                assert_eq!(sample.b, expected);
                assert_eq!(sample.c, expected);
            }
        }
        handle.join().unwrap();
        assert_eq!(window.latest().value(SeriesId::C), 2_000.0);
    }
}
