use num_bigint::{BigUint, RandBigInt};
use rand::{SeedableRng, RngCore};
use rand_chacha::ChaCha20Rng;
use tracing::trace;
use blake3;

use super::number_theory::are_coprime;
use crate::Error;

pub const PRNG_SEED_BYTES: usize = 64;

/// Default bit bound of blinding factor candidates.
pub const DEFAULT_BLINDING_BOUND_BITS: u64 = 256;

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PRNGSeed(pub [u8; PRNG_SEED_BYTES]);

impl Default for PRNGSeed {
    fn default() -> Self {
        PRNGSeed([0; PRNG_SEED_BYTES])
    }
}

impl AsMut<[u8]> for PRNGSeed {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl AsRef<[u8]> for PRNGSeed {
    fn as_ref(self: &PRNGSeed) -> &[u8] {&self.0}
}

impl PRNGSeed {
    /// Expand a short integer seed into a full seed, for command-line use.
    pub fn from_u64(seed: u64) -> Self {
        let mut hash = blake3::Hasher::new();
        hash.update(b"hyperplane-seed");
        hash.update(&seed.to_le_bytes());
        let mut bytes = [0; PRNG_SEED_BYTES];
        hash.finalize_xof().fill(&mut bytes);
        PRNGSeed(bytes)
    }
}

pub struct BlakeRNGFactory {
    use_random_seed: bool,
    seed: PRNGSeed,
}

impl Default for BlakeRNGFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BlakeRNGFactory {
    pub fn new() -> Self {
        Self {
            use_random_seed: true,
            seed: PRNGSeed::default(),
        }
    }

    pub fn from_seed(seed: PRNGSeed) -> Self {
        Self {
            use_random_seed: false,
            seed,
        }
    }

    pub fn set_seed(&mut self, seed: PRNGSeed) {
        self.use_random_seed = false;
        self.seed = seed;
    }

    pub fn get_rng(&self) -> BlakeRNG {
        if self.use_random_seed {
            let mut seed = [0; PRNG_SEED_BYTES];
            ChaCha20Rng::from_entropy().fill_bytes(&mut seed);
            BlakeRNG::from_seed(PRNGSeed(seed))
        } else {
            BlakeRNG::from_seed(self.seed)
        }
    }
}

const BUFFER_SIZE: usize = 4096;

pub struct BlakeRNG {
    buffer: [u8; BUFFER_SIZE],
    seed: PRNGSeed,
    counter: u64,
    buffer_current: usize,
}

impl SeedableRng for BlakeRNG {
    type Seed = PRNGSeed;

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed,
            counter: 0,
            buffer: [0; BUFFER_SIZE],
            buffer_current: BUFFER_SIZE,
        }
    }

}

impl BlakeRNG {

    fn refill_buffer(&mut self) {
        let mut hash = blake3::Hasher::new();
        hash.update(self.seed.as_ref());
        hash.update(&self.counter.to_le_bytes());
        hash.finalize_xof().fill(&mut self.buffer);
        self.buffer_current = 0;
        self.counter = self.counter.wrapping_add(1);
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        if self.buffer_current + N > BUFFER_SIZE {
            self.refill_buffer();
        }
        let mut out = [0; N];
        out.copy_from_slice(&self.buffer[self.buffer_current..self.buffer_current + N]);
        self.buffer_current += N;
        out
    }

}

impl RngCore for BlakeRNG {

    fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take::<4>())
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take::<8>())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        while i < dest.len() {
            if self.buffer_current >= BUFFER_SIZE {
                self.refill_buffer();
            }
            let len = std::cmp::min(dest.len() - i, BUFFER_SIZE - self.buffer_current);
            dest[i..i+len].copy_from_slice(&self.buffer[self.buffer_current..self.buffer_current+len]);
            i += len;
            self.buffer_current += len;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }

}

/// Draws blinding factors invertible modulo the public modulus.
///
/// Candidates are uniform in `[0, 2^bound_bits)` and are redrawn until
/// `gcd(r, n) = 1`. There is no retry limit: the prime factors of `n` are
/// rare among large candidates, and `1` is always reachable.
#[derive(Clone, Copy, Debug)]
pub struct BlindingSource {
    bound_bits: u64,
}

impl Default for BlindingSource {
    fn default() -> Self {
        Self { bound_bits: DEFAULT_BLINDING_BOUND_BITS }
    }
}

impl BlindingSource {

    pub fn new(bound_bits: u64) -> crate::Result<Self> {
        if bound_bits == 0 {
            return Err(Error::InvalidParameter("blinding bound must be at least one bit"));
        }
        Ok(Self { bound_bits })
    }

    pub fn bound_bits(&self) -> u64 {
        self.bound_bits
    }

    pub fn sample<R: RngCore + ?Sized>(&self, modulus: &BigUint, rng: &mut R) -> BigUint {
        let mut attempts = 1usize;
        let mut r = rng.gen_biguint(self.bound_bits);
        while !are_coprime(&r, modulus) {
            attempts += 1;
            r = rng.gen_biguint(self.bound_bits);
        }
        trace!(attempts, bits = r.bits(), "blinding factor accepted");
        r
    }

}
