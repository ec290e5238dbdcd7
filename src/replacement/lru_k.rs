use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use super::policy::EvictionPolicy;
use crate::config_err;
use crate::error::Result;

/// Eviction candidate ordering key. Sorting ascending puts the best victim
/// first: the largest backward k-distance, then the oldest last access.
#[derive(Debug, Eq, PartialEq)]
struct KDistance {
    distance: usize,
    last_access_at: usize,
}

impl PartialOrd for KDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.distance.cmp(&other.distance).reverse() {
            Ordering::Equal => self.last_access_at.cmp(&other.last_access_at),
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
struct LruKNode {
    k: usize,
    /// history of last seen K timestamp of the given page.
    /// Least recent timestamp stored in front.
    history: VecDeque<usize>,
}

impl LruKNode {
    fn new(k: usize) -> Self {
        LruKNode { history: VecDeque::with_capacity(k), k }
    }

    fn record_access(&mut self, timestamp: usize) {
        if self.history.len() == self.k {
            self.history.pop_front();
        }
        self.history.push_back(timestamp)
    }

    /// Backward k-distance at `now`. A page with less than k recorded
    /// accesses is at +inf.
    fn k_distance(&self, now: usize) -> KDistance {
        let last_access_at = self.history.back().copied().unwrap_or(0);
        let distance = match self.history.front() {
            Some(&kth) if self.history.len() == self.k => now - kth,
            _ => usize::MAX,
        };
        KDistance { distance, last_access_at }
    }
}

/// LruKPolicy implements the LRU-k replacement policy.
///
/// The victim is the page whose backward k-distance is maximum of all pages.
/// Backward k-distance is computed as the difference in time between the
/// current timestamp and the timestamp of k-th previous access.
///
/// A page with less than k history references is given +inf as its backward
/// k-distance. When multiple pages have +inf backward k-distance, classical
/// LRU is used to choose the victim.
///
/// Victim selection scans every tracked page, so eviction is O(frames).
#[derive(Debug, Clone)]
pub struct LruKPolicy<P> {
    nodes: HashMap<P, LruKNode>,
    current_timestamp: usize,
    k: usize,
}

impl<P> LruKPolicy<P>
where
    P: Eq + Hash + Clone,
{
    pub fn try_new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(config_err!("lru-k requires k >= 1, got {}", k));
        }
        Ok(LruKPolicy { nodes: HashMap::new(), current_timestamp: 0, k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn touch(&mut self, page: &P) {
        let k = self.k;
        let node = self.nodes.entry(page.clone()).or_insert_with(|| LruKNode::new(k));
        node.record_access(self.current_timestamp);
        self.current_timestamp += 1;
    }
}

impl<P> EvictionPolicy<P> for LruKPolicy<P>
where
    P: Eq + Hash + Clone,
{
    fn record_access(&mut self, page: &P) {
        if self.nodes.contains_key(page) {
            self.touch(page);
        }
    }

    fn record_admission(&mut self, page: &P) {
        self.touch(page);
    }

    fn evict(&mut self) -> Option<P> {
        let now = self.current_timestamp;
        let victim = self
            .nodes
            .iter()
            .min_by(|(_, a), (_, b)| a.k_distance(now).cmp(&b.k_distance(now)))
            .map(|(page, _)| page.clone())?;
        self.nodes.remove(&victim);
        Some(victim)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.current_timestamp = 0;
    }
}
