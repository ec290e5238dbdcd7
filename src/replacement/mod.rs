//! Page replacement simulation.
//!
//! A working set of `capacity` frames is driven through an ordered sequence
//! of page requests. Every request is either a hit (the page is resident) or
//! a fault (the page is admitted, evicting one page first when the frames
//! are full). The simulation produces one [`AccessRecord`] per request with a
//! snapshot of the resident pages and the cumulative fault count.
//!
//! Which page gets evicted is decided by an [`EvictionPolicy`]; [`simulate`]
//! uses LRU.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::config_err;
use crate::error::Result;

pub mod engine;
pub mod list;
pub mod lru_k;
pub mod optimal;
pub mod policy;

pub use engine::{Engine, WorkingSet};
pub use policy::{new_policy, EvictionPolicy, FifoPolicy, LruPolicy, PolicyType};

/// What happened to a single page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outcome<P> {
    Hit,
    /// The page was not resident. `evicted` is the page that made room for
    /// it, None if a frame was free.
    Fault { evicted: Option<P> },
}

/// Trace record of a single page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord<P> {
    pub requested: P,
    /// Resident pages just after the request, in admission order.
    pub memory_state: Vec<P>,
    /// Faults from the start of the run through this request, inclusive.
    pub cumulative_faults: usize,
    pub outcome: Outcome<P>,
}

impl<P> AccessRecord<P> {
    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, Outcome::Hit)
    }

    pub fn is_fault(&self) -> bool {
        !self.is_hit()
    }

    pub fn evicted(&self) -> Option<&P> {
        match &self.outcome {
            Outcome::Fault { evicted } => evicted.as_ref(),
            Outcome::Hit => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult<P> {
    pub capacity: usize,
    pub records: Vec<AccessRecord<P>>,
    pub total_faults: usize,
}

impl<P> SimulationResult<P> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.records.iter().filter(|r| r.is_hit()).count()
    }

    /// Faults per request, 0.0 for an empty trace.
    pub fn fault_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.total_faults as f64 / self.records.len() as f64
    }

    /// Cumulative fault count after each request.
    pub fn fault_progression(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.cumulative_faults).collect()
    }
}

/// Simulate LRU replacement over `accesses` with `capacity` frames.
///
/// Fails with `InvalidConfiguration`, before looking at any request, if
/// capacity is zero.
pub fn simulate<P, I>(accesses: I, capacity: usize) -> Result<SimulationResult<P>>
where
    P: Eq + Hash + Clone + Debug,
    I: IntoIterator<Item = P>,
{
    Engine::lru(capacity)?.run(accesses)
}

/// Same as [`simulate`] with an explicit eviction policy.
pub fn simulate_with<P, I, E>(accesses: I, capacity: usize, policy: E) -> Result<SimulationResult<P>>
where
    P: Eq + Hash + Clone + Debug,
    I: IntoIterator<Item = P>,
    E: EvictionPolicy<P>,
{
    Engine::new(capacity, policy)?.run(accesses)
}

/// Total faults of one run in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub frames: usize,
    pub faults: usize,
}

/// Run one independent simulation per capacity, in the given order, and
/// report the total faults of each. Every capacity is validated before the
/// first run.
pub fn sweep<P>(
    accesses: &[P],
    capacities: &[usize],
    typ: PolicyType,
    k: usize,
) -> Result<Vec<SweepPoint>>
where
    P: Eq + Hash + Clone + Debug + 'static,
{
    if let Some(&capacity) = capacities.iter().find(|&&c| c < 1) {
        return Err(config_err!("frame capacity must be at least 1, got {}", capacity));
    }
    let mut points = Vec::with_capacity(capacities.len());
    for &frames in capacities {
        let policy = new_policy(typ, k, accesses)?;
        let result = simulate_with(accesses.iter().cloned(), frames, policy)?;
        points.push(SweepPoint { frames, faults: result.total_faults });
    }
    Ok(points)
}
