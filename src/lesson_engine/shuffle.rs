use rand::seq::index;
use rand::Rng;

/// Shuffle `items` in place.
pub fn shuffle<T, R: Rng>(rng: &mut R, items: &mut [T]) {
    // Fisher-Yates shuffle
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Consume `items` and return them in random order.
pub fn shuffled<T, R: Rng>(rng: &mut R, mut items: Vec<T>) -> Vec<T> {
    shuffle(rng, &mut items);
    items
}

/// Draw up to `n` items without replacement. Fewer come back when the pool is short.
pub fn sample<T: Clone, R: Rng>(rng: &mut R, pool: &[T], n: usize) -> Vec<T> {
    let n = n.min(pool.len());
    index::sample(rng, pool.len(), n)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect()
}

/// Pick one item uniformly at random.
pub fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.gen_range(0..items.len()))
    }
}
