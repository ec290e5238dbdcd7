use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config_err;
use crate::error::Result;

/// How many of the most recent requests a local request may repeat.
const LOCALITY_WINDOW: usize = 4;

/// Generate a reference string of `len` page ids drawn from `0..pages`.
///
/// With probability `locality` a request repeats one of the last few
/// requests instead of drawing a fresh page, which gives LRU something to
/// work with. The same seed always yields the same string.
pub fn reference_string(len: usize, pages: u32, locality: f64, seed: u64) -> Result<Vec<u32>> {
    if pages == 0 {
        return Err(config_err!("page universe must hold at least one page"));
    }
    if !(0.0..=1.0).contains(&locality) {
        return Err(config_err!("locality must be within 0.0..=1.0, got {}", locality));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut out: Vec<u32> = Vec::with_capacity(len);
    for _ in 0..len {
        let window = out.len().min(LOCALITY_WINDOW);
        let page = if window > 0 && rng.gen_bool(locality) {
            out[out.len() - 1 - rng.gen_range(0..window)]
        } else {
            rng.gen_range(0..pages)
        };
        out.push(page);
    }
    Ok(out)
}
