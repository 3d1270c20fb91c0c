//! Duel randomness. `Rng` is a SplitMix64 stream: same seed, same duel.
//! Not cryptographically secure.

use std::time::{SystemTime, UNIX_EPOCH};

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Source of the two kinds of draws damage resolution needs.
///
/// The engine and resolver only ever see this trait, so tests can script
/// exact tier rolls and variances instead of searching for a lucky seed.
pub trait RandomSource {
    /// Uniform real in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in the closed range `[min, max]`. Swapped bounds are normalised.
    fn int_inclusive(&mut self, min: i32, max: i32) -> i32;
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds from OS entropy, falling back to the wall clock when entropy is unavailable.
    pub fn from_entropy() -> Self {
        Self::new(entropy_seed())
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

impl RandomSource for Rng {
    #[inline]
    fn unit(&mut self) -> f64 {
        // Top 53 bits fill the f64 mantissa exactly.
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn int_inclusive(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if max < min { (max, min) } else { (min, max) };
        let span = (hi as i64 - lo as i64 + 1) as u64;
        (lo as i64 + (self.next_u64() % span) as i64) as i32
    }
}

pub fn entropy_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            tracing::debug!(%err, "os entropy unavailable, seeding from clock");
            clock_seed()
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(SPLITMIX64_GOLDEN)
}
