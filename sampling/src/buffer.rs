use crate::{Sample, SeriesId, Timestamp};

pub const DEFAULT_CAPACITY: usize = 240;

/// Fixed-capacity FIFO window over the timestamp sequence and the three value
/// series.
///
/// Storage is a ring: `head` is the slot holding the oldest sample and the
/// slot the next append overwrites. Every append writes all four sequences at
/// the same index, so `timestamps[i]` is always the acquisition time of the
/// three values stored at `i`.
#[derive(Debug, Clone)]
pub struct SlidingWindowBuffer {
    capacity: usize,
    head: usize,
    timestamps: Vec<Timestamp>,
    series_a: Vec<f64>,
    series_b: Vec<f64>,
    series_c: Vec<f64>,
    populated: bool,
}

impl Default for SlidingWindowBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SlidingWindowBuffer {
    /// Allocates a window with every timestamp set to the unfilled marker.
    /// A zero capacity is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            head: 0,
            timestamps: vec![Timestamp::UNFILLED; capacity],
            series_a: vec![0.0; capacity],
            series_b: vec![0.0; capacity],
            series_c: vec![0.0; capacity],
            populated: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once at least one real timestamp has been appended.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Evicts the oldest sample and stores the new one as the newest.
    pub fn append(&mut self, timestamp: Timestamp, a: f64, b: f64, c: f64) {
        let slot = self.head;
        self.timestamps[slot] = timestamp;
        self.series_a[slot] = a;
        self.series_b[slot] = b;
        self.series_c[slot] = c;
        self.head = (self.head + 1) % self.capacity;
        if !timestamp.is_unfilled() {
            self.populated = true;
        }
    }

    pub fn append_sample(&mut self, sample: &Sample) {
        self.append(sample.timestamp, sample.a, sample.b, sample.c);
    }

    pub fn extend<'a, I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        for sample in samples {
            self.append_sample(sample);
        }
    }

    fn newest_slot(&self) -> usize {
        (self.head + self.capacity - 1) % self.capacity
    }

    /// Newest sample; the unfilled marker sample before the first append.
    pub fn latest(&self) -> Sample {
        let slot = self.newest_slot();
        Sample {
            timestamp: self.timestamps[slot],
            a: self.series_a[slot],
            b: self.series_b[slot],
            c: self.series_c[slot],
        }
    }

    /// Owned copy of all four sequences, oldest first.
    pub fn snapshot(&self) -> WindowSnapshot {
        let order = (self.head..self.capacity).chain(0..self.head);
        let mut snapshot = WindowSnapshot {
            timestamps: Vec::with_capacity(self.capacity),
            series: [
                Vec::with_capacity(self.capacity),
                Vec::with_capacity(self.capacity),
                Vec::with_capacity(self.capacity),
            ],
            populated: self.populated,
        };
        for slot in order {
            snapshot.timestamps.push(self.timestamps[slot]);
            snapshot.series[0].push(self.series_a[slot]);
            snapshot.series[1].push(self.series_b[slot]);
            snapshot.series[2].push(self.series_c[slot]);
        }
        snapshot
    }
}

/// Immutable view of a window taken at a single version: index 0 is the
/// oldest slot and the last index the newest.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    timestamps: Vec<Timestamp>,
    series: [Vec<f64>; 3],
    populated: bool,
}

impl WindowSnapshot {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn series(&self, id: SeriesId) -> &[f64] {
        &self.series[id.index()]
    }

    pub fn sample(&self, index: usize) -> Option<Sample> {
        let timestamp = *self.timestamps.get(index)?;
        Some(Sample {
            timestamp,
            a: self.series[0][index],
            b: self.series[1][index],
            c: self.series[2][index],
        })
    }

    pub fn latest(&self) -> Sample {
        self.len()
            .checked_sub(1)
            .and_then(|index| self.sample(index))
            .unwrap_or(Sample::UNFILLED)
    }

    /// Samples in slot order, skipping slots that were never written.
    pub fn populated_samples(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len())
            .filter_map(|index| self.sample(index))
            .filter(|sample| !sample.timestamp.is_unfilled())
    }
}
