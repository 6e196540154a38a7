//! Shared run registry keyed by run id.
//!
//! Distinct runs are inserted and looked up under a registry-wide lock that
//! is held only briefly. Appends to one run are serialized by that run's
//! own mutex, so runs never contend with each other while recording.
//!
//! The registry is bounded: once `capacity` is exceeded the oldest closed
//! runs are evicted. Open runs are never evicted.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::domain::foundation::RunId;
use crate::domain::telemetry::ToolEvent;

use super::{RecordOutcome, Run};

/// Default number of runs retained.
pub const DEFAULT_RUN_CAPACITY: usize = 500;

#[derive(Default)]
struct RegistryInner {
    runs: HashMap<RunId, Arc<Mutex<Run>>>,
    order: VecDeque<RunId>,
}

/// Concurrent, bounded map of run id to [`Run`].
pub struct RunRegistry {
    inner: RwLock<RegistryInner>,
    capacity: usize,
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_CAPACITY)
    }
}

impl RunRegistry {
    /// Creates a registry retaining at least `capacity` runs (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Opens an empty run for `query`.
    ///
    /// Returns false if the id is already registered.
    pub fn open(&self, run_id: RunId, query: impl Into<String>) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.runs.contains_key(&run_id) {
            return false;
        }
        inner
            .runs
            .insert(run_id, Arc::new(Mutex::new(Run::open(run_id, query))));
        inner.order.push_back(run_id);
        self.evict_closed(&mut inner);
        true
    }

    /// Appends a tool event to an open run.
    ///
    /// Returns `None` when the run is unknown (never opened or evicted).
    pub fn record(&self, run_id: RunId, event: &ToolEvent) -> Option<RecordOutcome> {
        let run = self.handle(run_id)?;
        let outcome = lock(&run).record(event);
        Some(outcome)
    }

    /// Closes a run and returns its final snapshot.
    pub fn close(
        &self,
        run_id: RunId,
        response: &str,
        success: bool,
        response_time: f64,
        preview_chars: usize,
    ) -> Option<Run> {
        let run = self.handle(run_id)?;
        let snapshot = {
            let mut guard = lock(&run);
            guard.close(response, success, response_time, preview_chars);
            guard.clone()
        };

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        self.evict_closed(&mut inner);
        Some(snapshot)
    }

    /// Snapshot of one run.
    pub fn get(&self, run_id: RunId) -> Option<Run> {
        self.handle(run_id).map(|run| lock(&run).clone())
    }

    /// Snapshots of all retained runs, oldest first.
    pub fn list(&self) -> Vec<Run> {
        let handles: Vec<Arc<Mutex<Run>>> = {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            inner
                .order
                .iter()
                .filter_map(|id| inner.runs.get(id).cloned())
                .collect()
        };
        handles.iter().map(|run| lock(run).clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .runs
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, run_id: RunId) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .runs
            .contains_key(&run_id)
    }

    fn handle(&self, run_id: RunId) -> Option<Arc<Mutex<Run>>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .runs
            .get(&run_id)
            .cloned()
    }

    fn evict_closed(&self, inner: &mut RegistryInner) {
        let mut excess = inner.runs.len().saturating_sub(self.capacity);
        if excess == 0 {
            return;
        }

        let mut kept = VecDeque::with_capacity(inner.order.len());
        while let Some(id) = inner.order.pop_front() {
            let closed = inner
                .runs
                .get(&id)
                .map(|run| lock(run).is_closed())
                .unwrap_or(true);

            if excess > 0 && closed {
                inner.runs.remove(&id);
                excess -= 1;
                tracing::debug!(run_id = %id, "evicted closed run");
            } else {
                kept.push_back(id);
            }
        }
        inner.order = kept;
    }
}

fn lock(run: &Mutex<Run>) -> MutexGuard<'_, Run> {
    run.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{ParameterSnapshot, Section};
    use serde_json::json;
    use std::thread;

    fn start(name: &str) -> ToolEvent {
        ToolEvent::start(name, Section::S3, ParameterSnapshot::new())
    }

    fn close(registry: &RunRegistry, run_id: RunId) {
        registry.close(run_id, "done", true, 0.1, 400).unwrap();
    }

    #[test]
    fn open_rejects_duplicate_ids() {
        let registry = RunRegistry::default();
        let run_id = RunId::new();
        assert!(registry.open(run_id, "q"));
        assert!(!registry.open(run_id, "again"));
        assert_eq!(registry.get(run_id).unwrap().query(), "q");
    }

    #[test]
    fn record_on_unknown_run_returns_none() {
        let registry = RunRegistry::default();
        assert!(registry.record(RunId::new(), &start("comms")).is_none());
    }

    #[test]
    fn record_and_close_round_trip() {
        let registry = RunRegistry::default();
        let run_id = RunId::new();
        registry.open(run_id, "comms?");

        registry.record(run_id, &start("check_comms_status"));
        registry.record(
            run_id,
            &ToolEvent::complete("check_comms_status", Section::S3, json!({}), 0.01),
        );
        let closed = registry.close(run_id, "All nets up", true, 0.2, 400).unwrap();

        assert!(closed.is_closed());
        assert_eq!(closed.tools().len(), 1);
        assert!(closed.tools()[0].succeeded());
        assert_eq!(registry.get(run_id).unwrap(), closed);
    }

    #[test]
    fn oldest_closed_runs_are_evicted_over_capacity() {
        let registry = RunRegistry::new(2);
        let first = RunId::new();
        let second = RunId::new();
        let third = RunId::new();

        registry.open(first, "1");
        close(&registry, first);
        registry.open(second, "2");
        close(&registry, second);
        registry.open(third, "3");

        assert_eq!(registry.len(), 2);
        assert!(!registry.contains(first));
        assert!(registry.contains(second));
        assert!(registry.contains(third));
    }

    #[test]
    fn open_runs_are_never_evicted() {
        let registry = RunRegistry::new(1);
        let first = RunId::new();
        let second = RunId::new();

        registry.open(first, "1");
        registry.open(second, "2");
        assert_eq!(registry.len(), 2);

        close(&registry, first);
        assert!(!registry.contains(first));
        assert!(registry.contains(second));
    }

    #[test]
    fn list_is_oldest_first() {
        let registry = RunRegistry::default();
        let ids: Vec<RunId> = (0..3).map(|_| RunId::new()).collect();
        for (i, id) in ids.iter().enumerate() {
            registry.open(*id, format!("q{}", i));
        }
        let queries: Vec<String> = registry.list().iter().map(|r| r.query().to_string()).collect();
        assert_eq!(queries, vec!["q0", "q1", "q2"]);
    }

    #[test]
    fn concurrent_appends_to_one_run_are_all_kept() {
        let registry = Arc::new(RunRegistry::default());
        let run_id = RunId::new();
        registry.open(run_id, "parallel tools");

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        registry.record(run_id, &start(&format!("tool_{}", i)));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(registry.get(run_id).unwrap().tools().len(), 200);
    }
}
