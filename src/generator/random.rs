//! generator::random
//!
//! Seeded random source shared by all generators of a session.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use uuid::Uuid;

const ALPHA_UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHA_LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

/// A seeded random source.
///
/// The seed is recorded so a failing fixture can be reproduced.
#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
    seed: u64,
}

impl Random {
    /// Create a source from a fixed seed, or draw one when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Integer in `min..=max`. Bounds are swapped if inverted.
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = ordered(min, max);
        self.rng.random_range(lo..=hi)
    }

    /// Size in `min..=max`. Bounds are swapped if inverted.
    pub fn usize_range(&mut self, min: usize, max: usize) -> usize {
        let (lo, hi) = ordered(min, max);
        self.rng.random_range(lo..=hi)
    }

    /// Float in `min..=max`.
    pub fn float_range(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        // Blending the bounds stays finite even when `hi - lo` would not.
        let t: f64 = self.rng.random();
        (lo * (1.0 - t) + hi * t).max(lo).min(hi)
    }

    pub fn bool(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// `true` with probability `p`, clamped to `[0, 1]`.
    pub fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        self.rng.random_bool(p.min(1.0))
    }

    pub fn upper_char(&mut self) -> char {
        self.pick_byte(ALPHA_UPPER)
    }

    pub fn lower_char(&mut self) -> char {
        self.pick_byte(ALPHA_LOWER)
    }

    pub fn digit_char(&mut self) -> char {
        self.pick_byte(DIGITS)
    }

    pub fn alphanumeric_char(&mut self) -> char {
        match self.rng.random_range(0..3) {
            0 => self.upper_char(),
            1 => self.lower_char(),
            _ => self.digit_char(),
        }
    }

    /// Pick one element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..items.len());
        items.get(index)
    }

    /// A random (version 4) UUID drawn from this source.
    pub fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    fn pick_byte(&mut self, set: &[u8]) -> char {
        let index = self.rng.random_range(0..set.len());
        char::from(set[index])
    }
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Random::new(Some(42));
        let mut b = Random::new(Some(42));
        for _ in 0..50 {
            assert_eq!(a.int_range(0, 1000), b.int_range(0, 1000));
        }
        assert_eq!(a.uuid(), b.uuid());
    }

    #[test]
    fn records_seed() {
        assert_eq!(Random::new(Some(7)).seed(), 7);
    }

    #[test]
    fn ranges_are_inclusive_and_ordered() {
        let mut random = Random::new(Some(1));
        for _ in 0..200 {
            let v = random.int_range(5, 3);
            assert!((3..=5).contains(&v));
            let f = random.float_range(0.5, 0.75);
            assert!((0.5..=0.75).contains(&f));
        }
        assert_eq!(random.usize_range(4, 4), 4);
        assert_eq!(random.float_range(2.0, 2.0), 2.0);
    }

    #[test]
    fn float_range_spanning_all_of_f64() {
        let mut random = Random::new(Some(2));
        for _ in 0..100 {
            assert!(random.float_range(f64::MIN, f64::MAX).is_finite());
        }
    }

    #[test]
    fn chance_extremes() {
        let mut random = Random::new(Some(3));
        assert!(!random.chance(0.0));
        assert!(!random.chance(f64::NAN));
        assert!(random.chance(1.0));
        assert!(random.chance(2.0));
    }

    #[test]
    fn pick_from_empty_is_none() {
        let mut random = Random::new(Some(3));
        let empty: [u8; 0] = [];
        assert!(random.pick(&empty).is_none());
        assert_eq!(random.pick(&[9]), Some(&9));
    }

    #[test]
    fn uuid_is_version_4() {
        let mut random = Random::new(Some(11));
        assert_eq!(random.uuid().get_version_num(), 4);
    }

    #[test]
    fn character_classes() {
        let mut random = Random::new(Some(5));
        for _ in 0..100 {
            assert!(random.upper_char().is_ascii_uppercase());
            assert!(random.lower_char().is_ascii_lowercase());
            assert!(random.digit_char().is_ascii_digit());
            assert!(random.alphanumeric_char().is_ascii_alphanumeric());
        }
    }
}
