use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    tiles: Vec<u32>,
    seed: u64,
}

impl Sequence {
    /// Fisher-Yates over `1..=total`; a zero total yields an empty board.
    pub fn generate(total: u32, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tiles: Vec<u32> = (1..=total).collect();
        tiles.shuffle(&mut rng);
        trace!(target: "sequence", "Dealt {} tiles with seed {}: {:?}", total, seed, tiles);
        Self { tiles, seed }
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rows(&self, side: usize) -> impl Iterator<Item = &[u32]> {
        self.tiles.chunks(side.max(1))
    }

    pub fn is_permutation(&self) -> bool {
        let mut sorted = self.tiles.clone();
        sorted.sort_unstable();
        sorted.iter().copied().eq(1..=self.tiles.len() as u32)
    }
}
