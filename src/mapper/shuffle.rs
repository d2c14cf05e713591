use rand::Rng;

/// In-place Fisher-Yates shuffle.
///
/// The randomness source is an argument so callers can seed it and get a
/// reproducible permutation.
pub fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn permutes_without_losing_elements() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<u32> = (0..50).collect();
        fisher_yates(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
        assert_ne!(items, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn same_seed_same_permutation() {
        let mut first: Vec<u32> = (0..20).collect();
        let mut second = first.clone();
        fisher_yates(&mut first, &mut StdRng::seed_from_u64(42));
        fisher_yates(&mut second, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
