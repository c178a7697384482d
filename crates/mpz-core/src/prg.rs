//! Implement AES-based PRG.

use aes::Aes128;
use cipher::{BlockEncrypt, KeyInit};
use rand::Rng;
use rand_core::{
    block::{BlockRng, BlockRngCore},
    CryptoRng, RngCore, SeedableRng,
};

/// Number of AES blocks encrypted per refill.
const AES_BLOCK_COUNT: usize = 8;

/// Struct of PRG Core
#[derive(Clone)]
struct PrgCore {
    aes: Aes128,
    counter: u64,
}

impl BlockRngCore for PrgCore {
    type Item = u32;
    type Results = [u32; 4 * AES_BLOCK_COUNT];

    // Compute 8 encrypted counter blocks at a time.
    #[inline(always)]
    fn generate(&mut self, results: &mut Self::Results) {
        let mut states = [aes::Block::default(); AES_BLOCK_COUNT];
        for state in states.iter_mut() {
            state[..8].copy_from_slice(&self.counter.to_le_bytes());
            self.counter += 1;
        }
        self.aes.encrypt_blocks(&mut states);

        let mut bytes = [[0u8; 16]; AES_BLOCK_COUNT];
        for (out, state) in bytes.iter_mut().zip(states.iter()) {
            out.copy_from_slice(state);
        }
        *results = bytemuck::cast(bytes);
    }
}

impl SeedableRng for PrgCore {
    type Seed = [u8; 16];

    #[inline(always)]
    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            aes: Aes128::new(&seed.into()),
            counter: 0u64,
        }
    }
}

impl CryptoRng for PrgCore {}

/// AES-based PRG.
///
/// This PRG is based on AES128 used in counter-mode to generate pseudo-random data streams.
#[derive(Clone)]
pub struct Prg(BlockRng<PrgCore>);

opaque_debug::implement!(Prg);

impl RngCore for Prg {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline(always)]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl SeedableRng for Prg {
    type Seed = [u8; 16];

    #[inline(always)]
    fn from_seed(seed: Self::Seed) -> Self {
        Prg(BlockRng::<PrgCore>::from_seed(seed))
    }

    #[inline(always)]
    fn from_rng<R: RngCore>(rng: R) -> Result<Self, rand_core::Error> {
        BlockRng::<PrgCore>::from_rng(rng).map(Prg)
    }
}

impl CryptoRng for Prg {}

impl Prg {
    /// New Prg with random seed.
    #[inline(always)]
    pub fn new() -> Self {
        Prg::from_seed(rand::random::<[u8; 16]>())
    }

    /// Returns the current counter.
    pub fn counter(&self) -> u64 {
        self.0.core.counter
    }

    /// Generate a random bool value.
    #[inline(always)]
    pub fn random_bool(&mut self) -> bool {
        self.gen()
    }

    /// Fill a bool slice with random bool values.
    #[inline(always)]
    pub fn random_bools(&mut self, buf: &mut [bool]) {
        self.fill(buf);
    }

    /// Fill a byte slice with random values.
    #[inline(always)]
    pub fn random_bytes(&mut self, buf: &mut [u8]) {
        self.fill_bytes(buf);
    }
}

impl Default for Prg {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
