use rand::{Rng, SeedableRng, rngs::StdRng};

/// Where tree colours come from.
pub trait ColourSource {
    /// An opaque RGB colour, every component in `[0, 1)`.
    fn next_colour(&mut self) -> [f32; 3];
}

/// Uniformly random colours. Seed it to make a park reproducible.
#[derive(Clone, Debug)]
pub struct RandomColours {
    rng: StdRng,
}

impl RandomColours {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColours {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ColourSource for RandomColours {
    fn next_colour(&mut self) -> [f32; 3] {
        [self.rng.r#gen(), self.rng.r#gen(), self.rng.r#gen()]
    }
}
