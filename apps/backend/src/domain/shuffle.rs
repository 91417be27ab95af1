//! Uniform random permutations (Fisher-Yates).

use rand::Rng;

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T>(items: &mut [T], rng: &mut impl Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Consume a vector and return a shuffled copy of it.
pub fn shuffled<T>(mut items: Vec<T>, rng: &mut impl Rng) -> Vec<T> {
    shuffle(&mut items, rng);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn shuffled_is_a_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let items: Vec<u32> = (0..50).collect();
        let mut out = shuffled(items.clone(), &mut rng);
        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn shuffle_is_deterministic_for_equal_seeds() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(7);
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);
        let a = shuffled((0..20).collect::<Vec<u32>>(), &mut rng1);
        let b = shuffled((0..20).collect::<Vec<u32>>(), &mut rng2);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(1);
        let mut rng2 = ChaCha8Rng::seed_from_u64(2);
        let a = shuffled((0..20).collect::<Vec<u32>>(), &mut rng1);
        let b = shuffled((0..20).collect::<Vec<u32>>(), &mut rng2);
        assert_ne!(a, b);
    }

    #[test]
    fn degenerate_inputs_are_fine() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(shuffled(Vec::<u8>::new(), &mut rng), Vec::<u8>::new());
        assert_eq!(shuffled(vec![9u8], &mut rng), vec![9u8]);
    }
}
