//! String seeds and the 32-bit stream they key.
//!
//! [`hash_seed`] folds a string into four 32-bit words with multiplicative mixing and
//! [`SeededRng`] (mulberry32) turns the first word into a stream. Both use wrapping
//! integer arithmetic only, so a seed yields the same stream on every platform.
use rand::RngCore;

const SEED_INIT: [u32; 4] = [1_779_033_703, 3_144_134_277, 1_013_904_242, 2_773_480_762];
const SEED_MUL: [u32; 4] = [597_399_067, 2_869_860_233, 951_274_213, 2_716_044_179];
const STREAM_INCREMENT: u32 = 0x6D2B_79F5;

/// Hash a string seed into four 32-bit words.
///
/// Characters are consumed as UTF-16 code units. The empty string yields the initial
/// constants.
pub fn hash_seed(seed: &str) -> [u32; 4] {
    let [mut h1, mut h2, mut h3, mut h4] = SEED_INIT;
    for unit in seed.encode_utf16() {
        let k = unit as u32;
        h1 = h2 ^ (h1 ^ k).wrapping_mul(SEED_MUL[0]);
        h2 = h3 ^ (h2 ^ k).wrapping_mul(SEED_MUL[1]);
        h3 = h4 ^ (h3 ^ k).wrapping_mul(SEED_MUL[2]);
        h4 = h1 ^ (h4 ^ k).wrapping_mul(SEED_MUL[3]);
    }
    [h1, h2, h3, h4]
}

/// Deterministic 32-bit random stream (mulberry32).
///
/// One instance belongs to one generation pass; build a fresh one per call to keep
/// results reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a stream from a raw 32-bit state.
    pub fn new(state: u32) -> Self {
        Self { state }
    }

    /// Create a stream keyed by the first word of [`hash_seed`].
    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(hash_seed(seed)[0])
    }

    /// Current internal state.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Next float in `[0, 1)` with full 32-bit resolution.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STREAM_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.step() as u64;
        let lo = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_seed_keeps_initial_constants() {
        assert_eq!(hash_seed(""), SEED_INIT);
    }

    #[test]
    fn hash_matches_reference_words() {
        assert_eq!(
            hash_seed("hanna"),
            [3_569_907_781, 1_380_859_655, 960_309_890, 3_331_418_934]
        );
    }

    #[test]
    fn stream_matches_reference_values() {
        let mut zero = SeededRng::new(0);
        assert_eq!(zero.next_u32(), 1_144_304_738);
        assert_eq!(zero.next_u32(), 1_416_247);
        assert_eq!(zero.next_u32(), 958_946_056);

        let mut hanna = SeededRng::from_seed_str("hanna");
        let draws: Vec<u32> = (0..4).map(|_| hanna.next_u32()).collect();
        assert_eq!(
            draws,
            vec![1_018_703_683, 3_104_751_252, 134_960_035, 1_604_532_023]
        );
    }

    #[test]
    fn next_f64_is_in_unit_interval() {
        let mut rng = SeededRng::from_seed_str("bounds");
        for _ in 0..1_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_stream_different_seed_diverges() {
        let mut a = SeededRng::from_seed_str("track");
        let mut b = SeededRng::from_seed_str("track");
        let mut c = SeededRng::from_seed_str("Track");
        let sa: Vec<u32> = (0..16).map(|_| a.next_u32()).collect();
        let sb: Vec<u32> = (0..16).map(|_| b.next_u32()).collect();
        let sc: Vec<u32> = (0..16).map(|_| c.next_u32()).collect();
        assert_eq!(sa, sb);
        assert_ne!(sa, sc);
    }

    #[test]
    fn fill_bytes_handles_partial_chunks() {
        let mut a = SeededRng::new(7);
        let mut b = SeededRng::new(7);
        let mut buf = [0u8; 6];
        a.fill_bytes(&mut buf);
        let first = b.next_u32().to_le_bytes();
        let second = b.next_u32().to_le_bytes();
        assert_eq!(&buf[..4], &first);
        assert_eq!(&buf[4..], &second[..2]);
    }
}
