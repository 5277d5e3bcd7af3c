use rand::{rngs::StdRng, SeedableRng};

/// What to do when the user submits against an offering that was displayed
/// from the demo dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackWrites {
    /// Refuse the submission without contacting the backend.
    #[default]
    Block,
    /// Send the submission to the backend anyway.
    Allow,
}

/// Parameters shared by all screens.
/// # Default Values
/// - `fallback_writes`: `FallbackWrites::Block`
/// - `seed`: `None` (placeholders are drawn from OS entropy)
#[derive(Debug, Clone, Default)]
pub struct ScreenOptions {
    pub fallback_writes: FallbackWrites,
    /// Seed for the generator behind placeholder values (review counts,
    /// fees, availability) when the backend omits them.
    pub seed: Option<u64>,
}

impl ScreenOptions {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_fallback_writes(mut self, fallback_writes: FallbackWrites) -> Self {
        self.fallback_writes = fallback_writes;
        self
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub(crate) fn blocks_fallback_writes(&self) -> bool {
        self.fallback_writes == FallbackWrites::Block
    }
}
