use rand::{Rng, seq::SliceRandom};

/// Picks up to `max` elements in random order from `filtered`, or from `all` if nothing was
/// filtered. Every element of the pool has the same probability of being picked.
pub fn select<T: Clone, G: Rng + ?Sized>(
    filtered: &[T],
    all: &[T],
    max: usize,
    rng: &mut G,
) -> Vec<T> {
    let pool = if filtered.is_empty() { all } else { filtered };
    let mut selection = pool.to_vec();
    selection.shuffle(rng);
    selection.truncate(max);
    selection
}
