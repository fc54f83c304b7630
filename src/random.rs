use std::fmt;

use rug::rand::RandState;
use rug::Integer;
use tracing::trace;

use crate::error::Result;
use crate::functions::seed_from_entropy;

/// Number of bits of operating system entropy drawn for every (re)seed.
pub const RAND_SEED_BITS: usize = 256;

/// Seeded PRNG handle used by every operation that samples randomness.
///
/// The generator is GMP's default (Mersenne Twister). It is not a CSPRNG on
/// its own: security comes from seeding it with [`RAND_SEED_BITS`] of OS
/// entropy and calling [`RandomState::reseed`] periodically. A handle must
/// not be shared between threads without external synchronization.
pub struct RandomState {
    state: RandState<'static>,
}

impl RandomState {
    /// Creates a generator seeded from the operating system entropy source.
    pub fn new() -> Result<Self> {
        let seed = seed_from_entropy(RAND_SEED_BITS)?;
        let mut state = RandState::new();
        state.seed(&seed);
        trace!(seed_bits = RAND_SEED_BITS, "random state seeded");
        Ok(RandomState { state })
    }

    /// Draws fresh entropy and reseeds. On failure the current generator is
    /// left untouched.
    pub fn reseed(&mut self) -> Result<()> {
        let seed = seed_from_entropy(RAND_SEED_BITS)?;
        self.state.seed(&seed);
        trace!(seed_bits = RAND_SEED_BITS, "random state reseeded");
        Ok(())
    }

    /// Reproducible generator for tests. Never use outside of testing.
    #[cfg(any(test, feature = "insecure-deterministic-rng"))]
    pub fn from_seed_insecure(seed: u64) -> Self {
        let mut state = RandState::new();
        state.seed(&Integer::from(seed));
        RandomState { state }
    }

    pub(crate) fn state_mut(&mut self) -> &mut RandState<'static> {
        &mut self.state
    }

    pub(crate) fn below(&mut self, bound: &Integer) -> Integer {
        Integer::from(bound.random_below_ref(&mut self.state))
    }
}

impl fmt::Debug for RandomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomState").finish_non_exhaustive()
    }
}
