use rand::Rng;

/// Uniformly distributed integer in `[min, max]` inclusive.
///
/// Panics if `min > max` (an inverted range is a programming error, not a
/// runtime condition). `min == max` is a valid single-value range.
pub fn random_integer(min: usize, max: usize) -> usize {
    assert!(min <= max, "random_integer: min must be <= max");
    rand::thread_rng().gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_integer_within_bounds() {
        for _ in 0..1000 {
            let n = random_integer(0, 8);
            assert!(n <= 8);
        }
    }

    #[test]
    fn test_random_integer_wide_range() {
        for _ in 0..1000 {
            let n = random_integer(600, 1200);
            assert!((600..=1200).contains(&n));
        }
    }

    #[test]
    fn test_random_integer_degenerate_range() {
        for _ in 0..10 {
            assert_eq!(random_integer(7, 7), 7);
        }
        assert_eq!(random_integer(0, 0), 0);
    }

    #[test]
    fn test_random_integer_covers_range() {
        // Over enough draws a small range should produce every value.
        let mut seen = [false; 3];
        for _ in 0..1000 {
            seen[random_integer(0, 2)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic]
    fn test_random_integer_inverted_range_panics() {
        random_integer(5, 4);
    }
}
