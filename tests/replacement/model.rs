use pagesim::replacement::{AccessRecord, Outcome};

/// Straightforward list-based LRU: a resident list in admission order and a
/// recency list scanned linearly. Slow, but obviously right, which is what
/// the engine is checked against.
pub fn naive_lru(accesses: &[u8], frames: usize) -> Vec<AccessRecord<u8>> {
    let mut memory: Vec<u8> = vec![];
    // least recently used first
    let mut recency: Vec<u8> = vec![];
    let mut faults = 0;
    let mut records = vec![];
    for &page in accesses {
        let outcome = if let Some(pos) = recency.iter().position(|&p| p == page) {
            recency.remove(pos);
            recency.push(page);
            Outcome::Hit
        } else {
            faults += 1;
            let mut evicted = None;
            if recency.len() >= frames {
                let old = recency.remove(0);
                memory.retain(|&p| p != old);
                evicted = Some(old);
            }
            memory.push(page);
            recency.push(page);
            Outcome::Fault { evicted }
        };
        records.push(AccessRecord {
            requested: page,
            memory_state: memory.clone(),
            cumulative_faults: faults,
            outcome,
        });
    }
    records
}
