use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

use log::warn;

use super::policy::EvictionPolicy;

/// Marks a page that is never requested again.
const NEVER: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Entry {
    /// position in the access sequence of the next request for the page.
    next_use: usize,
    /// admission sequence number, breaks ties between pages never used again.
    admitted: usize,
}

/// OptimalPolicy implements Belady's replacement policy: evict the page
/// whose next request lies farthest in the future.
///
/// It needs the whole access sequence up front and expects to be driven
/// with exactly that sequence, one `record_access`/`record_admission` per
/// request. A page reported out of sequence is treated as never requested
/// again. It serves as the lower bound when comparing other policies.
#[derive(Debug, Clone)]
pub struct OptimalPolicy<P> {
    accesses: Vec<P>,
    /// next_use[i] is the position of the next request for accesses[i].
    next_use: Vec<usize>,
    cursor: usize,
    admitted: usize,
    resident: HashMap<P, Entry>,
}

impl<P> OptimalPolicy<P>
where
    P: Eq + Hash + Clone,
{
    pub fn new(accesses: &[P]) -> Self {
        let mut next_use = vec![NEVER; accesses.len()];
        let mut seen: HashMap<&P, usize> = HashMap::new();
        for (i, page) in accesses.iter().enumerate().rev() {
            if let Some(&next) = seen.get(page) {
                next_use[i] = next;
            }
            seen.insert(page, i);
        }
        OptimalPolicy {
            accesses: accesses.to_vec(),
            next_use,
            cursor: 0,
            admitted: 0,
            resident: HashMap::new(),
        }
    }

    /// Consume one position of the access sequence and return the next
    /// request position for the given page.
    fn advance(&mut self, page: &P) -> usize {
        let next = match self.accesses.get(self.cursor) {
            Some(expected) if expected == page => self.next_use[self.cursor],
            _ => {
                warn!("optimal policy driven out of sequence at position {}", self.cursor);
                NEVER
            }
        };
        self.cursor += 1;
        next
    }
}

impl<P> EvictionPolicy<P> for OptimalPolicy<P>
where
    P: Eq + Hash + Clone,
{
    fn record_access(&mut self, page: &P) {
        let next = self.advance(page);
        if let Some(entry) = self.resident.get_mut(page) {
            entry.next_use = next;
        }
    }

    fn record_admission(&mut self, page: &P) {
        let next_use = self.advance(page);
        let admitted = self.admitted;
        self.admitted += 1;
        self.resident.insert(page.clone(), Entry { next_use, admitted });
    }

    fn evict(&mut self) -> Option<P> {
        let victim = self
            .resident
            .iter()
            .max_by_key(|(_, entry)| (entry.next_use, Reverse(entry.admitted)))
            .map(|(page, _)| page.clone())?;
        self.resident.remove(&victim);
        Some(victim)
    }

    fn len(&self) -> usize {
        self.resident.len()
    }

    /// Forget resident pages and rewind to the start of the sequence.
    fn reset(&mut self) {
        self.resident.clear();
        self.cursor = 0;
        self.admitted = 0;
    }
}
