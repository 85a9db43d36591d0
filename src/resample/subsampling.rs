use rand::Rng;

/// Pick `k` distinct positions of `data` uniformly at random.
///
/// If `data` has fewer than `k` rows, every row is returned (in a random
/// order).
///
/// Adaptive algorithm selection:
/// - small `k` (< 25% of n): reservoir sampling, O(n) time, O(k) space
/// - large `k`: partial Fisher-Yates on a copy, O(n) copy + O(k) swaps
pub fn draw_without_replacement<T: Copy, R: Rng + ?Sized>(
    data: &[T],
    k: usize,
    rng: &mut R,
) -> Vec<T> {
    let n = data.len();
    let k = k.min(n);
    if k == 0 {
        return Vec::new();
    }

    if k < n / 4 {
        let mut reservoir: Vec<T> = data.iter().take(k).copied().collect();
        for (i, item) in data.iter().enumerate().skip(k) {
            // Only j < k lands in the reservoir
            if let Some(slot) = reservoir.get_mut(rng.gen_range(0..=i)) {
                *slot = *item;
            }
        }
        reservoir
    } else {
        let mut buffer = data.to_vec();
        // Shuffle only the last k slots, then keep them
        for i in (n - k..n).rev() {
            let j = rng.gen_range(0..=i);
            buffer.swap(i, j);
        }
        buffer.split_off(n - k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn draws_are_distinct_rows() {
        let data: Vec<u32> = (0..1000).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        // 10 exercises the reservoir path, 600 the Fisher-Yates path
        for k in [1, 10, 249, 250, 600, 1000] {
            let drawn = draw_without_replacement(&data, k, &mut rng);
            assert_eq!(drawn.len(), k);
            assert_eq!(drawn.iter().unique().count(), k, "duplicates for k = {k}");
            assert!(drawn.iter().all(|v| *v < 1000));
        }
    }

    #[test]
    fn oversized_request_returns_everything() {
        let data = [3, 1, 2];
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let drawn = draw_without_replacement(&data, 10, &mut rng);
        assert_eq!(drawn.into_iter().sorted().collect_vec(), vec![1, 2, 3]);
        assert!(draw_without_replacement::<u8, _>(&[], 4, &mut rng).is_empty());
    }

    #[test]
    fn every_row_is_reachable() {
        let data: Vec<usize> = (0..40).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let seen = (0..200)
            .flat_map(|_| draw_without_replacement(&data, 5, &mut rng))
            .unique()
            .count();
        assert_eq!(seen, 40);
    }

    #[test]
    fn seeded_draws_repeat() {
        let data: Vec<i32> = (0..100).collect();
        let a = draw_without_replacement(&data, 30, &mut Xoshiro256PlusPlus::seed_from_u64(77));
        let b = draw_without_replacement(&data, 30, &mut Xoshiro256PlusPlus::seed_from_u64(77));
        assert_eq!(a, b);
    }
}
