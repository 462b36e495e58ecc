//! Deterministic randomness seam for deck and pile shuffling.
//!
//! All shuffling in the engine flows through the [`DeckRng`] trait so that a
//! run can be replayed from its seed. Nothing in game-core reads ambient
//! entropy; the runtime picks the seed when a run starts.
//!
//! # Determinism
//!
//! Implementations must be deterministic: given the same seed, they must
//! produce the same sequence of values. This is what makes the boss-last
//! deck invariant and reshuffle behavior testable independent of shuffle
//! outcome.

/// Source of deterministic random values for shuffling and pool picks.
pub trait DeckRng {
    /// Generate the next random u32 value.
    fn next_u32(&mut self) -> u32;

    /// Generate a uniform index in `0..len`.
    ///
    /// Returns 0 for empty or single-element ranges.
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u32() as usize) % len
    }
}

/// Uniform Fisher-Yates shuffle driven by a [`DeckRng`].
pub fn fisher_yates<T>(rng: &mut dyn DeckRng, items: &mut [T]) {
    if items.len() <= 1 {
        return;
    }
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG is a family of simple, fast, space-efficient RNGs with excellent
/// statistical quality. This implementation uses PCG-XSH-RR, which produces
/// 32-bit output from 64-bit state.
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces same output
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Create a generator from a run seed.
    pub fn seeded(seed: u64) -> Self {
        // One warm-up step so nearby seeds diverge immediately
        Self {
            state: Self::step(seed ^ Self::INCREMENT),
        }
    }

    /// Advance the PCG state by one LCG step.
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl DeckRng for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}
