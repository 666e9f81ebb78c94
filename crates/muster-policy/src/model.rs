use muster_engine::BoxError;

use crate::{ActionMask, StateVector};

/// One batched training step's worth of examples, column-wise.
///
/// The implied training target for example `i` is an all-zero vector over
/// the action space with `rewards[i]` written at `actions[i]`; the model is
/// expected to fit its output distribution against that masked-by-action
/// scalar target.
#[derive(Debug, Clone, Default)]
pub struct TrainBatch {
    pub states: Vec<StateVector>,
    pub actions: Vec<usize>,
    pub rewards: Vec<f32>,
}

impl TrainBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// The function-approximation seam: exactly two operations, internals
/// opaque. Any numeric backend can be substituted here without touching the
/// drafting or training logic.
///
/// `predict` must return a probability distribution over the action space
/// that is already normalized across only the masked-eligible entries;
/// ineligible entries carry zero mass. That normalization is part of this
/// contract, not the caller's job.
pub trait PolicyModel {
    fn predict(&self, state: &[f32], mask: &ActionMask) -> Result<Vec<f32>, BoxError>;

    /// Performs one training step over the batch, returning the loss.
    fn train_step(&mut self, batch: &TrainBatch) -> Result<f32, BoxError>;
}
