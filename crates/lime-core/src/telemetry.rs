//! Job telemetry view-models
//!
//! One [`JobView`] exists per configured job while the QoS section is
//! active. Each holds the latest rounded rate and a bounded window of
//! `(timestamp, rate)` points used by the time-series chart.

use std::collections::VecDeque;

use crate::prelude::*;
use crate::protocol::Datapoint;

/// Number of chart points kept per job
pub const JOB_WINDOW_CAPACITY: usize = 60;

// ── RingBuffer<T> ────────────────────────────────────────────────────────────

/// A fixed-capacity FIFO buffer that evicts the oldest entry when full.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    /// Number of items currently stored.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Maximum capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over items from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    /// Get the most recently pushed item.
    pub fn latest(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Get the oldest item.
    pub fn oldest(&self) -> Option<&T> {
        self.buf.front()
    }

    /// Clear all items.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

// ── JobView ──────────────────────────────────────────────────────────────────

/// One chart point: epoch milliseconds and a rounded rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePoint {
    pub timestamp_ms: i64,
    pub rate: i64,
}

impl RatePoint {
    /// Build a point from a wire datapoint (seconds, fractional rate)
    pub fn from_datapoint(datapoint: &Datapoint) -> Self {
        Self {
            timestamp_ms: (datapoint.time * 1000.0).round() as i64,
            rate: datapoint.rate.round() as i64,
        }
    }
}

/// View-model for a single monitored job
#[derive(Debug, Clone)]
pub struct JobView {
    pub job_id: String,
    /// Rounded rate of the latest datapoint
    pub current_rate: Option<i64>,
    /// Rate history, oldest first
    pub window: RingBuffer<RatePoint>,
    /// Last limit requested for this job from the console
    pub rate_limit: Option<f64>,
}

impl JobView {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            current_rate: None,
            window: RingBuffer::new(JOB_WINDOW_CAPACITY),
            rate_limit: None,
        }
    }

    /// Update the displayed value and append to the window
    pub fn record(&mut self, datapoint: &Datapoint) {
        let point = RatePoint::from_datapoint(datapoint);
        self.current_rate = Some(point.rate);
        self.window.push(point);
    }

    /// Largest rate currently in the window
    pub fn peak_rate(&self) -> Option<i64> {
        self.window.iter().map(|p| p.rate).max()
    }

    /// `(oldest, newest)` timestamps of the window
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        match (self.window.oldest(), self.window.latest()) {
            (Some(first), Some(last)) => Some((first.timestamp_ms, last.timestamp_ms)),
            _ => None,
        }
    }
}

// ── JobBoard ─────────────────────────────────────────────────────────────────

/// Ordered set of job view-models with unique identifiers
#[derive(Debug, Clone, Default)]
pub struct JobBoard {
    jobs: Vec<JobView>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view-model for `job_id`.
    ///
    /// A second registration of the same id is rejected and leaves the
    /// existing view-model untouched.
    pub fn register(&mut self, job_id: &str) -> Result<()> {
        if self.get(job_id).is_some() {
            return Err(Error::duplicate_job(job_id));
        }
        self.jobs.push(JobView::new(job_id));
        Ok(())
    }

    /// Route a datapoint to its job
    pub fn apply(&mut self, datapoint: &Datapoint) -> Result<()> {
        let job = self
            .get_mut(&datapoint.job_id)
            .ok_or_else(|| Error::unknown_job(&datapoint.job_id))?;
        job.record(datapoint);
        trace!(
            "job {} rate={:?} points={}",
            job.job_id,
            job.current_rate,
            job.window.len()
        );
        Ok(())
    }

    pub fn get(&self, job_id: &str) -> Option<&JobView> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }

    pub fn get_mut(&mut self, job_id: &str) -> Option<&mut JobView> {
        self.jobs.iter_mut().find(|job| job.job_id == job_id)
    }

    pub fn get_index(&self, index: usize) -> Option<&JobView> {
        self.jobs.get(index)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut JobView> {
        self.jobs.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobView> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop every view-model
    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datapoint(job_id: &str, rate: f64, time: f64) -> Datapoint {
        Datapoint {
            job_id: job_id.to_string(),
            rate,
            time,
        }
    }

    // ── RingBuffer ──────────────────────────────────
    #[test]
    fn test_ring_buffer_basic() {
        let mut buf = RingBuffer::new(3);
        buf.push(1);
        buf.push(2);
        buf.push(3);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.latest(), Some(&3));
        assert_eq!(buf.oldest(), Some(&1));
    }

    #[test]
    fn test_ring_buffer_overflow() {
        let mut buf = RingBuffer::new(3);
        buf.push(1);
        buf.push(2);
        buf.push(3);
        buf.push(4);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.oldest(), Some(&2)); // 1 was evicted
        let items: Vec<_> = buf.iter().copied().collect();
        assert_eq!(items, vec![2, 3, 4]);
    }

    #[test]
    fn test_ring_buffer_clear() {
        let mut buf = RingBuffer::new(3);
        buf.push(1);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.latest(), None);
    }

    // ── JobView ─────────────────────────────────────
    #[test]
    fn test_record_rounds_rate_and_scales_time() {
        let mut job = JobView::new("job_0");
        job.record(&datapoint("job_0", 42.7, 1000.0));

        assert_eq!(job.current_rate, Some(43));
        assert_eq!(
            job.window.latest(),
            Some(&RatePoint {
                timestamp_ms: 1_000_000,
                rate: 43
            })
        );
    }

    #[test]
    fn test_record_keeps_fractional_seconds() {
        let mut job = JobView::new("job_0");
        job.record(&datapoint("job_0", 0.4, 1497000000.25));
        assert_eq!(job.current_rate, Some(0));
        assert_eq!(job.window.latest().unwrap().timestamp_ms, 1_497_000_000_250);
    }

    #[test]
    fn test_window_never_exceeds_sixty_points() {
        let mut job = JobView::new("job_0");
        for i in 0..61 {
            job.record(&datapoint("job_0", i as f64, i as f64));
        }

        assert_eq!(job.window.len(), JOB_WINDOW_CAPACITY);
        // The 61st push evicted the very first point
        assert_eq!(job.window.oldest().unwrap().rate, 1);
        assert_eq!(job.window.latest().unwrap().rate, 60);
        assert_eq!(job.time_bounds(), Some((1000, 60_000)));
    }

    #[test]
    fn test_peak_rate() {
        let mut job = JobView::new("j");
        assert_eq!(job.peak_rate(), None);
        job.record(&datapoint("j", 5.0, 1.0));
        job.record(&datapoint("j", 12.2, 2.0));
        job.record(&datapoint("j", 3.0, 3.0));
        assert_eq!(job.peak_rate(), Some(12));
    }

    // ── JobBoard ────────────────────────────────────
    #[test]
    fn test_register_rejects_duplicate_without_mutation() {
        let mut board = JobBoard::new();
        board.register("job_0").unwrap();
        board.apply(&datapoint("job_0", 10.0, 1.0)).unwrap();

        let err = board.register("job_0").unwrap_err();
        assert!(matches!(err, Error::DuplicateJob { .. }));

        assert_eq!(board.len(), 1);
        let job = board.get("job_0").unwrap();
        assert_eq!(job.current_rate, Some(10));
        assert_eq!(job.window.len(), 1);
    }

    #[test]
    fn test_apply_unknown_job_is_rejected() {
        let mut board = JobBoard::new();
        board.register("job_0").unwrap();

        let err = board.apply(&datapoint("job_9", 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, Error::UnknownJob { .. }));
        assert!(board.get("job_0").unwrap().window.is_empty());
    }

    #[test]
    fn test_board_preserves_registration_order() {
        let mut board = JobBoard::new();
        board.register("b").unwrap();
        board.register("a").unwrap();
        let ids: Vec<_> = board.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(board.get_index(1).unwrap().job_id, "a");
    }

    #[test]
    fn test_clear_drops_all_jobs() {
        let mut board = JobBoard::new();
        board.register("a").unwrap();
        board.clear();
        assert!(board.is_empty());
        assert!(board.register("a").is_ok());
    }
}
