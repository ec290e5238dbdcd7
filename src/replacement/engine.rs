use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, info};

use super::list::LinkedSet;
use super::policy::{EvictionPolicy, LruPolicy};
use super::{AccessRecord, Outcome, SimulationResult};
use crate::config_err;
use crate::error::{Error, Result};

/// WorkingSet holds the pages currently resident in the frames.
///
/// Pages are kept in admission order: an admitted page goes to the back and
/// an evicted page is removed in place. This order is only used for the
/// memory state snapshots, eviction order is the policy's business.
#[derive(Debug, Clone)]
pub struct WorkingSet<P> {
    capacity: usize,
    resident: LinkedSet<P>,
}

impl<P> WorkingSet<P>
where
    P: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        WorkingSet { capacity, resident: LinkedSet::with_capacity(capacity) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.resident.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resident.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.resident.len() >= self.capacity
    }

    pub fn contains(&self, page: &P) -> bool {
        self.resident.contains(page)
    }

    /// Resident pages in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.resident.iter()
    }

    pub fn snapshot(&self) -> Vec<P> {
        self.resident.iter().cloned().collect()
    }
}

fn check_capacity(capacity: usize) -> Result<()> {
    if capacity < 1 {
        return Err(config_err!("frame capacity must be at least 1, got {}", capacity));
    }
    Ok(())
}

/// Engine drives a working set of fixed capacity through a sequence of page
/// requests, delegating the choice of the victim to an eviction policy.
///
/// Per page there are two states, resident and not resident. A hit keeps the
/// page resident and refreshes it with the policy. A fault admits the page,
/// evicting exactly one resident page first if every frame is taken.
///
/// An `Internal` error from `access` means the policy and the working set no
/// longer agree. Every later access fails the same way until `reset`.
pub struct Engine<P, E = LruPolicy<P>> {
    working_set: WorkingSet<P>,
    policy: E,
    faults: usize,
    out_of_sync: bool,
}

impl<P> Engine<P, LruPolicy<P>>
where
    P: Eq + Hash + Clone + Debug,
{
    pub fn lru(capacity: usize) -> Result<Self> {
        Engine::new(capacity, LruPolicy::with_capacity(capacity))
    }
}

impl<P, E> Engine<P, E>
where
    P: Eq + Hash + Clone + Debug,
    E: EvictionPolicy<P>,
{
    /// Create an engine with `capacity` frames. Fails with
    /// `InvalidConfiguration` if capacity is zero.
    pub fn new(capacity: usize, mut policy: E) -> Result<Self> {
        check_capacity(capacity)?;
        policy.reset();
        Ok(Engine { working_set: WorkingSet::new(capacity), policy, faults: 0, out_of_sync: false })
    }

    pub fn capacity(&self) -> usize {
        self.working_set.capacity
    }

    /// Faults observed since construction or the last reset.
    pub fn faults(&self) -> usize {
        self.faults
    }

    pub fn working_set(&self) -> &WorkingSet<P> {
        &self.working_set
    }

    pub fn is_resident(&self, page: &P) -> bool {
        self.working_set.contains(page)
    }

    pub fn policy(&self) -> &E {
        &self.policy
    }

    /// Process one page request and return its trace record.
    pub fn access(&mut self, page: P) -> Result<AccessRecord<P>> {
        if self.out_of_sync {
            return Err(Error::internal(
                "engine is out of sync with its eviction policy, reset it first",
            ));
        }
        let outcome = if self.working_set.contains(&page) {
            self.policy.record_access(&page);
            Outcome::Hit
        } else {
            let evicted = if self.working_set.is_full() { Some(self.evict()?) } else { None };
            self.faults += 1;
            self.working_set.resident.push_back(page.clone());
            self.policy.record_admission(&page);
            debug!("page fault #{} on {:?}, evicted {:?}", self.faults, page, evicted);
            Outcome::Fault { evicted }
        };
        debug_assert_eq!(self.policy.len(), self.working_set.len());

        Ok(AccessRecord {
            requested: page,
            memory_state: self.working_set.snapshot(),
            cumulative_faults: self.faults,
            outcome,
        })
    }

    /// Process every request in order, starting from an empty working set.
    /// The returned result carries one record per request and the faults of
    /// this run only.
    pub fn run<I>(&mut self, accesses: I) -> Result<SimulationResult<P>>
    where
        I: IntoIterator<Item = P>,
    {
        self.clear(self.capacity());
        let accesses = accesses.into_iter();
        let mut records = Vec::with_capacity(accesses.size_hint().0);
        for page in accesses {
            records.push(self.access(page)?);
        }
        info!(
            "simulated {} accesses on {} frames, {} page faults",
            records.len(),
            self.capacity(),
            self.faults
        );
        Ok(SimulationResult { capacity: self.capacity(), records, total_faults: self.faults })
    }

    /// Empty the working set and the fault counter, possibly changing the
    /// capacity. Nothing is changed if the new capacity is invalid.
    pub fn reset(&mut self, capacity: usize) -> Result<()> {
        check_capacity(capacity)?;
        self.clear(capacity);
        Ok(())
    }

    fn clear(&mut self, capacity: usize) {
        self.working_set = WorkingSet::new(capacity);
        self.policy.reset();
        self.faults = 0;
        self.out_of_sync = false;
    }

    fn evict(&mut self) -> Result<P> {
        let Some(victim) = self.policy.evict() else {
            self.out_of_sync = true;
            return Err(Error::internal("eviction policy has no victim for a full working set"));
        };
        if self.working_set.resident.remove(&victim).is_none() {
            self.out_of_sync = true;
            return Err(Error::internal(format!(
                "eviction policy chose {:?} which is not resident",
                victim
            )));
        }
        Ok(victim)
    }
}
