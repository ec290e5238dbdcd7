use std::collections::HashSet;

use pagesim::replacement::lru_k::LruKPolicy;
use pagesim::replacement::optimal::OptimalPolicy;
use pagesim::replacement::{simulate, simulate_with, FifoPolicy, LruPolicy};
use proptest::prelude::*;

use super::model::naive_lru;

fn accesses() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..12, 0..200)
}

proptest! {
    #[test]
    fn prop_matches_list_based_lru(accesses in accesses(), frames in 1usize..8) {
        let result = simulate(accesses.clone(), frames).unwrap();
        let expected = naive_lru(&accesses, frames);
        prop_assert_eq!(&expected, &result.records);
        prop_assert_eq!(expected.last().map_or(0, |r| r.cumulative_faults), result.total_faults);
    }

    #[test]
    fn prop_faults_are_monotonic(accesses in accesses(), frames in 1usize..8) {
        let result = simulate(accesses, frames).unwrap();
        let mut previous = 0;
        for record in &result.records {
            let step = record.cumulative_faults - previous;
            prop_assert!(step <= 1);
            prop_assert_eq!(step == 1, record.is_fault());
            previous = record.cumulative_faults;
        }
    }

    #[test]
    fn prop_memory_state_is_bounded(accesses in accesses(), frames in 1usize..8) {
        let result = simulate(accesses, frames).unwrap();
        for record in &result.records {
            prop_assert!(record.memory_state.len() <= frames);
            prop_assert!(record.memory_state.contains(&record.requested));
            let distinct: HashSet<_> = record.memory_state.iter().collect();
            prop_assert_eq!(distinct.len(), record.memory_state.len());
        }
    }

    #[test]
    fn prop_repeated_request_is_hit(accesses in accesses(), frames in 1usize..8) {
        let result = simulate(accesses, frames).unwrap();
        for pair in result.records.windows(2) {
            if pair[0].requested == pair[1].requested {
                prop_assert!(pair[1].is_hit());
            }
        }
    }

    #[test]
    fn prop_evicts_least_recently_used(accesses in accesses(), frames in 1usize..8) {
        let result = simulate(accesses.clone(), frames).unwrap();
        for (i, record) in result.records.iter().enumerate() {
            let Some(evicted) = record.evicted() else {
                continue;
            };
            let before = &result.records[i - 1].memory_state;
            prop_assert_eq!(before.len(), frames);
            // the victim is the resident page whose last request is oldest.
            let last_use = |page: &u8| accesses[..i].iter().rposition(|p| p == page);
            let victim = before.iter().min_by_key(|p| last_use(p)).unwrap();
            prop_assert_eq!(victim, evicted);
            prop_assert_eq!(record.memory_state.len(), frames);
            prop_assert!(!record.memory_state.contains(evicted));
        }
    }

    #[test]
    fn prop_deterministic(accesses in accesses(), frames in 1usize..8) {
        let a = simulate(accesses.clone(), frames).unwrap();
        let b = simulate(accesses, frames).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_optimal_is_a_lower_bound(accesses in accesses(), frames in 1usize..8) {
        let optimal = simulate_with(accesses.clone(), frames, OptimalPolicy::new(&accesses)).unwrap();
        let lru = simulate_with(accesses.clone(), frames, LruPolicy::new()).unwrap();
        let fifo = simulate_with(accesses, frames, FifoPolicy::new()).unwrap();
        prop_assert!(optimal.total_faults <= lru.total_faults);
        prop_assert!(optimal.total_faults <= fifo.total_faults);
    }

    #[test]
    fn prop_lru_1_is_lru(accesses in accesses(), frames in 1usize..8) {
        let lru = simulate(accesses.clone(), frames).unwrap();
        let lru_1 = simulate_with(accesses, frames, LruKPolicy::try_new(1).unwrap()).unwrap();
        prop_assert_eq!(lru, lru_1);
    }
}
