//! Bootstrap resampling for ensemble training (`spec.md` §4.3).
//!
//! Each ensemble member trains on a uniform resample-with-replacement
//! of the original rows, same row count as the input, so member
//! predictions see correlated-but-distinct training sets (bagging).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default seed used when a caller doesn't pin one explicitly —
/// reproducible by default, matching this coordinator's preference for
/// deterministic fits over run-to-run variation.
pub const DEFAULT_SEED: u64 = 0;

pub struct Bootstrapper {
    rng: StdRng,
}

impl Bootstrapper {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw `n_rows` indices into `0..n_rows` uniformly with
    /// replacement. Shape-preserving: output length always equals
    /// `n_rows`, even when `n_rows` is 0 or 1.
    pub fn resample_indices(&mut self, n_rows: usize) -> Vec<usize> {
        if n_rows == 0 {
            return Vec::new();
        }
        (0..n_rows).map(|_| self.rng.gen_range(0..n_rows)).collect()
    }

    pub fn resample<T: Clone>(&mut self, rows: &[T]) -> Vec<T> {
        self.resample_indices(rows.len())
            .into_iter()
            .map(|i| rows[i].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_preserves_row_count() {
        let mut b = Bootstrapper::new(7);
        let rows = vec![1, 2, 3, 4, 5];
        let resampled = b.resample(&rows);
        assert_eq!(resampled.len(), rows.len());
    }

    #[test]
    fn resample_indices_stay_in_bounds() {
        let mut b = Bootstrapper::new(1);
        let idx = b.resample_indices(10);
        assert!(idx.iter().all(|&i| i < 10));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let mut b = Bootstrapper::new(3);
        assert!(b.resample_indices(0).is_empty());
    }

    #[test]
    fn same_seed_is_deterministic() {
        let mut a = Bootstrapper::new(42);
        let mut b = Bootstrapper::new(42);
        assert_eq!(a.resample_indices(20), b.resample_indices(20));
    }
}
