use rand::Rng;

/// Fisher-Yates: walks from the back, swapping each slot with a uniformly drawn
/// slot at or before it. O(n) time, no extra allocation.
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffles a copy, leaving `items` untouched.
pub fn shuffled<T, R>(items: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut copy = items.to_vec();
    shuffle(&mut copy, rng);
    copy
}
