//! Seeded pseudo-random stream.
//!
//! A Park–Miller minimal-standard generator keyed by a string seed. Identical
//! seeds always replay identical streams, which is what makes a map shareable
//! by its seed alone.

use rand::RngCore;

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 16_807;

/// Deterministic uniform stream derived from a string seed.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
    initial: u64,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        let initial = initial_state(seed);
        Self { state: initial, initial }
    }

    /// Next value in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Uniform float in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.uniform() * (max - min)
    }

    /// Uniform integer in `[min, max]`.
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.range(min as f64, (max + 1) as f64).floor() as i64
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        ((self.uniform() * len as f64).floor() as usize).min(len - 1)
    }

    /// Rewind to the state right after seeding.
    pub fn reset(&mut self) {
        self.state = self.initial;
    }

    /// The state the stream was seeded with.
    pub fn initial_state(&self) -> u64 {
        self.initial
    }
}

/// Rolling 31× string hash over UTF-16 code units with 32-bit wraparound.
fn hash_seed(seed: &str) -> u64 {
    let hash = seed
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(unit as i32));
    (hash as i64).unsigned_abs()
}

fn initial_state(seed: &str) -> u64 {
    // A zero state is a fixed point of the recurrence.
    match hash_seed(seed) % MODULUS {
        0 => 1,
        state => state,
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        let hi = (self.uniform() * 65_536.0) as u32;
        let lo = (self.uniform() * 65_536.0) as u32;
        (hi << 16) | lo
    }

    fn next_u64(&mut self) -> u64 {
        ((self.next_u32() as u64) << 32) | self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
