use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The only source of non-determinism the reducer is allowed to use.
///
/// Role assignment, the initial president and every shuffle draw from here,
/// so substituting a seeded or scripted source makes a whole game reproducible.
pub trait RandomSource {
    /// Returns an index uniformly distributed over `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;

    /// Shuffles `items` in place (Fisher-Yates).
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Seeded ChaCha8 generator used by the server.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomSource for GameRng {
    fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GameRng::new(7);
        let mut b = GameRng::new(7);
        let xs: Vec<_> = (0..20).map(|_| a.index(10)).collect();
        let ys: Vec<_> = (0..20).map(|_| b.index(10)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|x| *x < 10));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = GameRng::new(3);
        let mut items: Vec<u32> = (0..17).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..17).collect::<Vec<_>>());
    }

    #[test]
    fn default_shuffle_uses_index() {
        struct AlwaysZero;
        impl RandomSource for AlwaysZero {
            fn index(&mut self, _len: usize) -> usize {
                0
            }
        }
        let mut items = [1, 2, 3, 4];
        AlwaysZero.shuffle(&mut items);
        // i=3 swaps with 0, i=2 swaps with 0, i=1 swaps with 0
        assert_eq!(items, [2, 3, 4, 1]);
    }
}
