use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::Question;

/// Picks a random candidate whose id is not in `previous`.
///
/// Returns `None` once the pool is exhausted: either `previous` is as long as
/// the pool, or every candidate id has already been seen.
pub fn next_question<R: Rng + ?Sized>(
    mut candidates: Vec<Question>,
    previous: &[i64],
    rng: &mut R,
) -> Option<Question> {
    if previous.len() == candidates.len() {
        return None;
    }
    let seen: HashSet<i64> = previous.iter().copied().collect();
    candidates.shuffle(rng);
    candidates.into_iter().find(|q| !seen.contains(&q.id))
}
