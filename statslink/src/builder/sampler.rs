use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Mutex, PoisonError};

/// Per-link sampling decision.
///
/// The generator is seeded once when the link is built and shared by every
/// thread emitting through that link, so it lives behind a mutex. The lock
/// is held only for a single draw.
#[derive(Debug)]
pub(crate) struct Sampler {
    rng: Mutex<ChaCha8Rng>,
}

impl Sampler {
    pub fn from_entropy() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Sampler { rng: Mutex::new(rng) }
    }

    /// Full rates never touch the generator. Otherwise draw `p` uniformly in
    /// `[0, 1)` and send when `rate > p`, which makes rates of zero or below
    /// (and NaN) never send.
    pub fn should_send(&self, rate: f32) -> bool {
        if rate >= 1.0 {
            return true;
        }

        if rate.is_nan() || rate <= 0.0 {
            return false;
        }

        let p: f32 = self.rng.lock().unwrap_or_else(PoisonError::into_inner).gen();
        rate > p
    }
}
