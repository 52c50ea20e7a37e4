//! Percentage sampling of point sets.
//!
//! The pitch map only clusters a share of all events (e.g. "50% of passes
//! shown"). Sampling is kept separate from clustering so the clusterer works
//! on whatever set the caller hands it.

use rand::{Rng, seq::index};

/// Returns the number of items kept when sampling `percent` of `len` items.
///
/// `percent` is clamped to `[0, 100]` and the result is rounded to the
/// nearest item. NaN keeps nothing.
///
/// ```
/// use touchline_analytics::sampling;
///
/// assert_eq!(sampling::sample_size(10, 50.0), 5);
/// assert_eq!(sampling::sample_size(3, 50.0), 2);
/// assert_eq!(sampling::sample_size(10, 250.0), 10);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn sample_size(len: usize, percent: f64) -> usize {
    if percent.is_nan() {
        return 0;
    }
    let percent = percent.clamp(0.0, 100.0);
    let size = (len as f64 * percent / 100.0).round() as usize;
    size.min(len)
}

/// Samples `percent` of `items` uniformly without replacement.
///
/// The sampled items keep their original relative order.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use touchline_analytics::sampling;
///
/// let items = (0..100).collect::<Vec<_>>();
/// let mut rng = Pcg32::seed_from_u64(42);
/// let sample = sampling::sample_percent(&items, 25.0, &mut rng);
///
/// assert_eq!(sample.len(), 25);
/// assert!(sample.is_sorted());
/// ```
pub fn sample_percent<'a, T, R>(items: &'a [T], percent: f64, rng: &mut R) -> Vec<&'a T>
where
    R: Rng + ?Sized,
{
    let amount = sample_size(items.len(), percent);
    let mut indices = index::sample(rng, items.len(), amount).into_vec();
    indices.sort_unstable();
    indices.into_iter().map(|i| &items[i]).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_sample_size_bounds() {
        assert_eq!(sample_size(0, 50.0), 0);
        assert_eq!(sample_size(10, 0.0), 0);
        assert_eq!(sample_size(10, -5.0), 0);
        assert_eq!(sample_size(10, 100.0), 10);
        assert_eq!(sample_size(10, f64::NAN), 0);
        assert_eq!(sample_size(10, f64::INFINITY), 10);
    }

    #[test]
    fn test_full_sample_keeps_everything_in_order() {
        let items = ["a", "b", "c", "d"];
        let mut rng = Pcg32::seed_from_u64(1);
        let sample = sample_percent(&items, 100.0, &mut rng);
        assert_eq!(sample, [&"a", &"b", &"c", &"d"]);
    }

    #[test]
    fn test_sample_is_subset_without_duplicates() {
        let items = (0..200).collect::<Vec<u32>>();
        let mut rng = Pcg32::seed_from_u64(7);
        let sample = sample_percent(&items, 30.0, &mut rng);
        assert_eq!(sample.len(), 60);
        assert!(sample.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_seed_same_sample() {
        let items = (0..50).collect::<Vec<u32>>();
        let a = sample_percent(&items, 40.0, &mut Pcg32::seed_from_u64(3));
        let b = sample_percent(&items, 40.0, &mut Pcg32::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_items() {
        let items: [u8; 0] = [];
        let mut rng = Pcg32::seed_from_u64(0);
        assert!(sample_percent(&items, 50.0, &mut rng).is_empty());
    }
}
