use crate::sampler::DitherSampler;
use crate::Point2f;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

pub struct RandomSampler {
    rng: Xoshiro256Plus,
}

impl RandomSampler {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(seed),
        }
    }
}

impl DitherSampler for RandomSampler {
    fn next_offset(&mut self) -> Point2f {
        Point2f::new(self.rng.gen(), self.rng.gen())
    }
}
