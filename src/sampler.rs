//! Weighted word sampling

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{QuizError, Result};
use crate::pool::WeightedPool;

/// Draw one word, uniformly over the pool's flattened multiset.
pub fn draw<'a, R: Rng + ?Sized>(pool: &'a WeightedPool, rng: &mut R) -> Result<&'a str> {
    let entries: Vec<(&str, usize)> = pool.iter().collect();
    entries
        .iter()
        .try_fold(0usize, |total, (_, count)| total.checked_add(*count))
        .ok_or(QuizError::PoolOverflow)?;
    // Fails on an empty pool and on a pool whose counts are all zero.
    let dist = WeightedIndex::<usize>::new(entries.iter().map(|(_, count)| *count))
        .map_err(|_| QuizError::EmptyPool)?;
    Ok(entries[dist.sample(rng)].0)
}
