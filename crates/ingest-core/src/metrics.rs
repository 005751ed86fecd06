//! Global atomic counters for integrity checking.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a batch).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters.
pub struct Metrics {
    tasks_performed: AtomicU64,
    conflicts_recorded: AtomicU64,
    nodes_visited: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            tasks_performed: AtomicU64::new(0),
            conflicts_recorded: AtomicU64::new(0),
            nodes_visited: AtomicU64::new(0),
        }
    }

    pub fn inc_tasks_performed(&self) {
        self.tasks_performed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "tasks_performed", "counter incremented");
    }

    pub fn inc_conflicts_recorded(&self) {
        self.conflicts_recorded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "conflicts_recorded", "counter incremented");
    }

    /// Add the size of one finished walk.
    pub fn add_nodes_visited(&self, n: u64) {
        self.nodes_visited.fetch_add(n, Ordering::Relaxed);
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            tasks_performed = self.tasks_performed(),
            conflicts_recorded = self.conflicts_recorded(),
            nodes_visited = self.nodes_visited(),
        );
    }

    pub fn tasks_performed(&self) -> u64 {
        self.tasks_performed.load(Ordering::Relaxed)
    }

    pub fn conflicts_recorded(&self) -> u64 {
        self.conflicts_recorded.load(Ordering::Relaxed)
    }

    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.tasks_performed.store(0, Ordering::Relaxed);
        self.conflicts_recorded.store(0, Ordering::Relaxed);
        self.nodes_visited.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let m = Metrics::new();
        m.inc_tasks_performed();
        m.inc_tasks_performed();
        m.inc_conflicts_recorded();
        m.add_nodes_visited(7);
        m.add_nodes_visited(3);
        assert_eq!(m.tasks_performed(), 2);
        assert_eq!(m.conflicts_recorded(), 1);
        assert_eq!(m.nodes_visited(), 10);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.inc_tasks_performed();
        m.inc_conflicts_recorded();
        m.add_nodes_visited(4);
        m.reset();
        assert_eq!(m.tasks_performed(), 0);
        assert_eq!(m.conflicts_recorded(), 0);
        assert_eq!(m.nodes_visited(), 0);
    }
}
