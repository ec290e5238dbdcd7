use std::collections::HashSet;

use log::info;
use pagesim::error::{Error, Result};
use pagesim::generate::reference_string;
use pagesim::input::{read_pages, PAGE_COLUMN};
use pagesim::replacement::{new_policy, simulate, simulate_with, sweep, Engine, PolicyType};
use rand::{thread_rng, Rng};

#[test]
fn test_reference_csv() -> Result<()> {
    setup!();
    let file = std::fs::File::open("data/pages.csv")?;
    let pages = read_pages(file, PAGE_COLUMN)?;
    let result = simulate(pages, 3)?;

    assert_eq!(vec![1, 2, 3, 3, 3, 4, 5], result.fault_progression());
    assert_eq!(5, result.total_faults);
    let last = result.records.last().map(|r| r.memory_state.clone());
    assert_eq!(Some(vec!["1".to_string(), "4".to_string(), "5".to_string()]), last);
    Ok(())
}

#[test]
fn test_single_frame() -> Result<()> {
    setup!();
    let result = simulate([1, 1, 2, 1], 1)?;
    assert_eq!(vec![1, 1, 2, 3], result.fault_progression());
    Ok(())
}

#[test]
fn test_boundaries() -> Result<()> {
    setup!();
    assert!(matches!(simulate([1, 2, 3], 0), Err(Error::InvalidConfiguration(_))));

    let result = simulate(Vec::<i64>::new(), 1)?;
    assert!(result.records.is_empty());
    assert_eq!(0, result.total_faults);
    Ok(())
}

#[test]
fn test_independent_engines() -> Result<()> {
    setup!();
    let accesses = reference_string(500, 16, 0.4, 3)?;

    // one engine per capacity, driven in lockstep: none of them sees the
    // others' state.
    let mut engines: Vec<Engine<u32>> =
        (1..=10).map(Engine::lru).collect::<Result<Vec<_>>>()?;
    for &page in &accesses {
        for engine in engines.iter_mut() {
            engine.access(page)?;
        }
    }
    for engine in &engines {
        let alone = simulate(accesses.iter().copied(), engine.capacity())?;
        assert_eq!(alone.total_faults, engine.faults());
    }

    // LRU is a stack algorithm, more frames never hurt.
    let faults: Vec<usize> = engines.iter().map(|e| e.faults()).collect();
    info!("faults per capacity: {:?}", faults);
    assert!(faults.windows(2).all(|w| w[0] >= w[1]));
    Ok(())
}

#[test]
fn test_every_policy_respects_capacity() -> Result<()> {
    setup!();
    let mut rng = thread_rng();
    for _ in 0..20 {
        let len = rng.gen_range(0..300);
        let accesses: Vec<u16> = (0..len).map(|_| rng.gen_range(0..20)).collect();
        let frames = rng.gen_range(1..=10);
        for typ in PolicyType::ALL {
            let policy = new_policy(typ, 2, &accesses)?;
            let result = simulate_with(accesses.iter().copied(), frames, policy)?;
            assert_eq!(accesses.len(), result.records.len());
            assert!(result.records.iter().all(|r| r.memory_state.len() <= frames));

            let distinct: HashSet<_> = accesses.iter().collect();
            assert!(result.total_faults >= distinct.len());
            if frames >= distinct.len() {
                // everything fits, only cold misses
                assert_eq!(distinct.len(), result.total_faults);
            }
        }
    }
    Ok(())
}

#[test]
fn test_sweep_matches_single_runs() -> Result<()> {
    setup!();
    let accesses = reference_string(200, 12, 0.3, 11)?;
    let capacities: Vec<usize> = (1..=10).collect();
    for typ in PolicyType::ALL {
        let points = sweep(&accesses, &capacities, typ, 2)?;
        for point in points {
            let policy = new_policy(typ, 2, &accesses)?;
            let single = simulate_with(accesses.iter().copied(), point.frames, policy)?;
            assert_eq!(single.total_faults, point.faults);
        }
    }
    Ok(())
}
