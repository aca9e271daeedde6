//! Ring buffer for trace records.
//!
//! Keeps the most recent records up to a fixed size, tagged with the
//! evaluation cycle that produced them.

use std::collections::{HashMap, VecDeque};

use super::record::{TraceEvent, TraceRecord};

// =============================================================================
// Trace Buffer
// =============================================================================

/// Bounded record store. Once full, each push evicts the oldest record.
///
/// Record ids keep increasing across evictions and [`clear`](Self::clear),
/// so an id is never reused within one buffer.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    issued: u64,
}

impl TraceBuffer {
    /// An empty buffer holding at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            issued: 0,
        }
    }

    /// Appends an event and returns the id given to its record.
    pub fn push(&mut self, cycle: u64, timestamp_ns: u64, event: TraceEvent) -> u64 {
        let id = self.issued;
        self.issued += 1;

        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        if self.capacity > 0 {
            self.records
                .push_back(TraceRecord::new(id, cycle, timestamp_ns, event));
        }
        id
    }

    /// Number of buffered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most records kept at once.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// The newest record.
    #[must_use]
    pub fn last(&self) -> Option<&TraceRecord> {
        self.records.back()
    }

    /// Records tagged with `cycle`.
    #[must_use]
    pub fn records_for_cycle(&self, cycle: u64) -> Vec<&TraceRecord> {
        self.filter(|r| r.cycle == cycle)
    }

    /// Up to `count` newest records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let skip = self.records.len().saturating_sub(count);
        self.records.range(skip..).collect()
    }

    /// Records accepted by `keep`, oldest first.
    pub fn filter<F>(&self, keep: F) -> Vec<&TraceRecord>
    where
        F: Fn(&TraceRecord) -> bool,
    {
        self.records.iter().filter(|r| keep(r)).collect()
    }

    /// Records whose [`TraceEvent::event_type`] is `event_type`.
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.filter(|r| r.event_type() == event_type)
    }

    /// Distinct cycles present, oldest first.
    #[must_use]
    pub fn cycles(&self) -> Vec<u64> {
        let mut cycles: Vec<u64> = self.records.iter().map(|r| r.cycle).collect();
        cycles.dedup();
        cycles
    }

    /// Counts per event type plus the cycle range.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        let mut event_counts: HashMap<&'static str, usize> = HashMap::new();
        for record in &self.records {
            *event_counts.entry(record.event_type()).or_default() += 1;
        }

        TraceBufferStats {
            record_count: self.records.len(),
            max_size: self.capacity,
            oldest_cycle: self.records.front().map(|r| r.cycle),
            newest_cycle: self.records.back().map(|r| r.cycle),
            event_counts,
        }
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(10_000)
    }
}

// =============================================================================
// Buffer Statistics
// =============================================================================

/// Snapshot summary of a [`TraceBuffer`].
#[derive(Clone, Debug)]
pub struct TraceBufferStats {
    /// Records buffered.
    pub record_count: usize,
    /// Buffer capacity.
    pub max_size: usize,
    /// Cycle of the oldest record.
    pub oldest_cycle: Option<u64>,
    /// Cycle of the newest record.
    pub newest_cycle: Option<u64>,
    /// Records per event type.
    pub event_counts: HashMap<&'static str, usize>,
}

impl TraceBufferStats {
    /// Buffered records of one event type.
    #[must_use]
    pub fn count(&self, event_type: &str) -> usize {
        self.event_counts.get(event_type).copied().unwrap_or(0)
    }
}
