//! Deterministic random stream
//!
//! One HMAC-SHA256 call per bet turns `(server_seed, client_seed, nonce)` into a
//! uniform float. Games that need more than one value seed a cheap secondary
//! sequence from that float, so the auditable step stays a single HMAC.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 2^52: the draw keeps the first 13 hex characters of the digest.
const DRAW_SCALE: f64 = 4_503_599_627_370_496.0;

/// 2^32, the modulus of the secondary generator.
const LCG_SCALE: f64 = 4_294_967_296.0;
const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Lower clamp bound used before dividing by a draw.
pub const DRAW_EPSILON: f64 = 1e-12;

/// Message fed to the HMAC: `"{client_seed}:{nonce}"`
pub fn draw_message(client_seed: &str, nonce: u64) -> String {
    format!("{}:{}", client_seed, nonce)
}

/// Full HMAC-SHA256 digest for a bet, hex-encoded
pub fn hmac_hex(server_seed: &str, client_seed: &str, nonce: u64) -> String {
    hex::encode(hmac_digest(server_seed, client_seed, nonce))
}

fn hmac_digest(server_seed: &str, client_seed: &str, nonce: u64) -> [u8; 32] {
    let Ok(mut mac) = HmacSha256::new_from_slice(server_seed.as_bytes()) else {
        unreachable!("HMAC-SHA256 accepts keys of any length");
    };
    mac.update(draw_message(client_seed, nonce).as_bytes());
    let bytes = mac.finalize().into_bytes();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&bytes);
    digest
}

/// Uniform float in [0, 1) with 52 bits of resolution.
///
/// Identical inputs always give the bit-identical float.
pub fn uniform_draw(server_seed: &str, client_seed: &str, nonce: u64) -> f64 {
    let digest = hmac_digest(server_seed, client_seed, nonce);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    // Top 52 bits of the first 8 bytes == first 13 hex characters.
    let bits = u64::from_be_bytes(head) >> 12;
    bits as f64 / DRAW_SCALE
}

/// Clamp a draw away from 0 and 1 before it is used as a divisor.
pub fn clamp_draw(u: f64) -> f64 {
    u.clamp(DRAW_EPSILON, 1.0 - DRAW_EPSILON)
}

/// A sequence of floats in [0, 1) that game resolvers consume.
///
/// Resolvers depend only on this trait, so the generator behind it can be
/// swapped without touching game math.
pub trait SeededSequence {
    fn next_float(&mut self) -> f64;

    /// Uniform index in `0..len`
    fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_float() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

/// Linear-congruential generator seeded from one uniform draw
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Seed with `floor(u * 2^32)`
    pub fn from_draw(u: f64) -> Self {
        let seed = (u.clamp(0.0, 1.0) * LCG_SCALE).floor().min(u32::MAX as f64) as u32;
        Self { state: seed }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

impl SeededSequence for Lcg {
    fn next_float(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state as f64 / LCG_SCALE
    }
}

/// Secondary generator for multi-draw games
pub fn seed_secondary_generator(u: f64) -> Lcg {
    Lcg::from_draw(u)
}

/// In-place Fisher-Yates shuffle driven by a seeded sequence
pub fn fisher_yates<T, S: SeededSequence + ?Sized>(items: &mut [T], rng: &mut S) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}
