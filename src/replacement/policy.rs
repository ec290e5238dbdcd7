use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::list::LinkedSet;
use super::lru_k::LruKPolicy;
use super::optimal::OptimalPolicy;
use crate::config_err;
use crate::error::{Error, Result};

/// EvictionPolicy decides which resident page leaves the working set when
/// a fault happens on a full set.
///
/// The engine owns residency; a policy only keeps whatever bookkeeping it
/// needs to pick a victim. The engine keeps both in lockstep: every page
/// admitted is announced with `record_admission`, every hit with
/// `record_access`, and a page chosen by `evict` is forgotten by the policy
/// before the call returns.
pub trait EvictionPolicy<P> {
    /// Record a hit on a resident page.
    fn record_access(&mut self, page: &P);

    /// Record that a page was admitted into the working set after a fault.
    fn record_admission(&mut self, page: &P);

    /// Select the page to evict and drop its bookkeeping.
    ///
    /// Return None if the policy is not tracking any page.
    fn evict(&mut self) -> Option<P>;

    /// Number of pages tracked by the policy.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every tracked page.
    fn reset(&mut self);
}

impl<P, E> EvictionPolicy<P> for Box<E>
where
    E: EvictionPolicy<P> + ?Sized,
{
    fn record_access(&mut self, page: &P) {
        (**self).record_access(page)
    }

    fn record_admission(&mut self, page: &P) {
        (**self).record_admission(page)
    }

    fn evict(&mut self) -> Option<P> {
        (**self).evict()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// LruPolicy evicts the least recently used page.
///
/// The recency list keeps the least recently used page at the front and the
/// most recently used one at the back, so promotion and victim selection
/// are both O(1).
#[derive(Debug, Clone)]
pub struct LruPolicy<P> {
    recency: LinkedSet<P>,
}

impl<P> LruPolicy<P>
where
    P: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        LruPolicy { recency: LinkedSet::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LruPolicy { recency: LinkedSet::with_capacity(capacity) }
    }

    /// Pages from the least recently used to the most recently used.
    pub fn recency(&self) -> impl Iterator<Item = &P> {
        self.recency.iter()
    }
}

impl<P> Default for LruPolicy<P>
where
    P: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EvictionPolicy<P> for LruPolicy<P>
where
    P: Eq + Hash + Clone,
{
    fn record_access(&mut self, page: &P) {
        self.recency.move_to_back(page);
    }

    fn record_admission(&mut self, page: &P) {
        if !self.recency.push_back(page.clone()) {
            self.recency.move_to_back(page);
        }
    }

    fn evict(&mut self) -> Option<P> {
        self.recency.pop_front()
    }

    fn len(&self) -> usize {
        self.recency.len()
    }

    fn reset(&mut self) {
        self.recency.clear()
    }
}

/// FifoPolicy evicts the page that has been resident the longest. Hits do
/// not change the order.
#[derive(Debug, Clone)]
pub struct FifoPolicy<P> {
    queue: LinkedSet<P>,
}

impl<P> FifoPolicy<P>
where
    P: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        FifoPolicy { queue: LinkedSet::new() }
    }
}

impl<P> Default for FifoPolicy<P>
where
    P: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EvictionPolicy<P> for FifoPolicy<P>
where
    P: Eq + Hash + Clone,
{
    fn record_access(&mut self, _page: &P) {}

    fn record_admission(&mut self, page: &P) {
        self.queue.push_back(page.clone());
    }

    fn evict(&mut self) -> Option<P> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn reset(&mut self) {
        self.queue.clear()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyType {
    #[default]
    Lru,
    Fifo,
    #[serde(alias = "lruk")]
    LruK,
    #[serde(alias = "opt")]
    Optimal,
}

impl PolicyType {
    pub const ALL: [PolicyType; 4] =
        [PolicyType::Lru, PolicyType::Fifo, PolicyType::LruK, PolicyType::Optimal];
}

impl Display for PolicyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PolicyType::Lru => "lru",
            PolicyType::Fifo => "fifo",
            PolicyType::LruK => "lru-k",
            PolicyType::Optimal => "optimal",
        };
        f.write_str(name)
    }
}

impl FromStr for PolicyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(PolicyType::Lru),
            "fifo" => Ok(PolicyType::Fifo),
            "lru-k" | "lruk" => Ok(PolicyType::LruK),
            "optimal" | "opt" => Ok(PolicyType::Optimal),
            other => Err(config_err!("unknown eviction policy '{}'", other)),
        }
    }
}

/// Build the policy of the given type as a trait object.
///
/// `k` is only used by LRU-K and must be positive there. The optimal policy
/// looks ahead, so it needs the whole access sequence up front; the other
/// policies ignore `accesses`.
pub fn new_policy<P>(
    typ: PolicyType,
    k: usize,
    accesses: &[P],
) -> Result<Box<dyn EvictionPolicy<P>>>
where
    P: Eq + Hash + Clone + 'static,
{
    match typ {
        PolicyType::Lru => Ok(Box::new(LruPolicy::new())),
        PolicyType::Fifo => Ok(Box::new(FifoPolicy::new())),
        PolicyType::LruK => Ok(Box::new(LruKPolicy::try_new(k)?)),
        PolicyType::Optimal => Ok(Box::new(OptimalPolicy::new(accesses))),
    }
}
