use std::collections::VecDeque;

use muster_policy::StateVector;
use rand::Rng;

/// One recorded decision: the state the drafter saw, the action it took,
/// the terminal reward assigned after the episode, and the state that
/// resulted. Reward starts at zero and is written exactly once, when the
/// episode's outcome is known.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub state: StateVector,
    pub action: usize,
    pub reward: f32,
    pub next_state: StateVector,
}

/// Bounded, ordered store of past decisions.
///
/// Eviction is batch-amortized: nothing is evicted until the size exceeds
/// the configured capacity, and then [`ReplayMemory::trim`] discards down
/// to the newest `capacity / 2` entries in one pass rather than evicting
/// single items.
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    examples: VecDeque<TrainingExample>,
    capacity: usize,
}

impl ReplayMemory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            examples: VecDeque::new(),
            capacity,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates stored examples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TrainingExample> + '_ {
        self.examples.iter()
    }

    /// Commits a completed episode's examples, in pick order.
    pub fn extend<I>(&mut self, examples: I)
    where
        I: IntoIterator<Item = TrainingExample>,
    {
        self.examples.extend(examples);
    }

    /// Draws `count` examples uniformly at random, with replacement.
    ///
    /// Returns an empty batch when the memory is empty.
    #[must_use]
    pub fn sample_batch<R>(&self, rng: &mut R, count: usize) -> Vec<&TrainingExample>
    where
        R: Rng + ?Sized,
    {
        if self.examples.is_empty() {
            return Vec::new();
        }
        (0..count)
            .map(|_| &self.examples[rng.random_range(0..self.examples.len())])
            .collect()
    }

    /// Applies the eviction policy: when the size exceeds the capacity,
    /// keep only the newest `capacity / 2` examples.
    pub fn trim(&mut self) {
        if self.examples.len() > self.capacity {
            let keep = self.capacity / 2;
            let drop = self.examples.len() - keep;
            self.examples.drain(..drop);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn example(tag: usize) -> TrainingExample {
        TrainingExample {
            state: vec![tag as f32],
            action: tag,
            reward: 0.0,
            next_state: vec![tag as f32 + 0.5],
        }
    }

    #[test]
    fn test_trim_is_a_no_op_at_or_below_capacity() {
        let mut memory = ReplayMemory::new(10);
        memory.extend((0..10).map(example));
        memory.trim();
        assert_eq!(memory.len(), 10);
    }

    #[test]
    fn test_trim_keeps_newest_half_of_capacity() {
        // Scenario: 20000 examples against a capacity of 10000.
        let mut memory = ReplayMemory::new(10_000);
        memory.extend((0..20_000).map(example));
        memory.trim();
        assert_eq!(memory.len(), 5_000);

        // The survivors are the newest entries.
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let batch = memory.sample_batch(&mut rng, 64);
        assert!(batch.iter().all(|e| e.action >= 15_000));
    }

    #[test]
    fn test_sample_batch_draws_with_replacement() {
        let mut memory = ReplayMemory::new(100);
        memory.extend((0..2).map(example));
        let mut rng = Pcg64Mcg::seed_from_u64(5);

        // More draws than stored examples is fine with replacement.
        let batch = memory.sample_batch(&mut rng, 32);
        assert_eq!(batch.len(), 32);
        assert!(batch.iter().all(|e| e.action < 2));
    }

    #[test]
    fn test_sampling_empty_memory_yields_empty_batch() {
        let memory = ReplayMemory::new(100);
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        assert!(memory.sample_batch(&mut rng, 8).is_empty());
    }
}
