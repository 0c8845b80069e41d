//! Template selection
//!
//! Every tag picks its background independently. The picker is injected so
//! tests and reproducible runs can fix the sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses a template index for each tag
pub trait TemplatePicker {
    /// Index in `0..count`; `count` is never zero
    fn pick(&mut self, count: usize) -> usize;
}

/// Uniform random choice
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TemplatePicker for RandomPicker {
    fn pick(&mut self, count: usize) -> usize {
        if count <= 1 {
            0
        } else {
            self.rng.gen_range(0..count)
        }
    }
}

/// Replays a fixed list of indices, wrapping around
#[derive(Debug, Clone)]
pub struct SequencePicker {
    sequence: Vec<usize>,
    position: usize,
}

impl SequencePicker {
    pub fn new(sequence: Vec<usize>) -> Self {
        Self {
            sequence,
            position: 0,
        }
    }

    /// Always picks the first template
    pub fn first() -> Self {
        Self::new(vec![0])
    }
}

impl TemplatePicker for SequencePicker {
    fn pick(&mut self, count: usize) -> usize {
        if self.sequence.is_empty() || count == 0 {
            return 0;
        }
        let value = self.sequence[self.position % self.sequence.len()];
        self.position += 1;
        value % count
    }
}
