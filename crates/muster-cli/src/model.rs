use muster_engine::BoxError;
use muster_policy::{ActionMask, PolicyModel, TrainBatch};
use rand::Rng;

/// A small linear-softmax policy model.
///
/// This is the concrete stand-in behind the [`PolicyModel`] seam: one
/// dense layer from the encoded state to action logits, a softmax, and
/// plain gradient descent on the categorical cross-entropy against the
/// masked-by-action scalar targets the trainer produces. Any heavier
/// function approximator can replace it without touching the drafting or
/// training code.
#[derive(Debug, Clone)]
pub(crate) struct LinearPolicyModel {
    state_size: usize,
    action_size: usize,
    learning_rate: f32,
    /// Action-major weight matrix: `weights[action * state_size + input]`.
    weights: Vec<f32>,
    bias: Vec<f32>,
}

impl LinearPolicyModel {
    pub(crate) fn new<R>(
        state_size: usize,
        action_size: usize,
        learning_rate: f32,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = (0..state_size * action_size)
            .map(|_| rng.random_range(-0.05..0.05))
            .collect();
        Self {
            state_size,
            action_size,
            learning_rate,
            weights,
            bias: vec![0.0; action_size],
        }
    }

    fn logits(&self, state: &[f32]) -> Vec<f32> {
        (0..self.action_size)
            .map(|action| {
                let row = &self.weights[action * self.state_size..(action + 1) * self.state_size];
                let dot = row
                    .iter()
                    .zip(state)
                    .map(|(w, s)| w * s)
                    .sum::<f32>();
                self.bias[action] + dot
            })
            .collect()
    }

    fn check_state(&self, state: &[f32]) -> Result<(), BoxError> {
        if state.len() == self.state_size {
            Ok(())
        } else {
            Err(format!(
                "state vector length {} does not match model input size {}",
                state.len(),
                self.state_size
            )
            .into())
        }
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.iter().map(|l| (l - max).exp()).collect::<Vec<_>>();
    let sum = exps.iter().sum::<f32>();
    exps.into_iter().map(|e| e / sum).collect()
}

impl PolicyModel for LinearPolicyModel {
    fn predict(&self, state: &[f32], mask: &ActionMask) -> Result<Vec<f32>, BoxError> {
        self.check_state(state)?;
        let probabilities = softmax(&self.logits(state));
        let masked = probabilities
            .iter()
            .zip(mask.values())
            .map(|(p, m)| p * m)
            .collect::<Vec<_>>();
        let sum = masked.iter().sum::<f32>();
        Ok(masked.into_iter().map(|p| p / (sum + 1e-8)).collect())
    }

    #[expect(clippy::cast_precision_loss)]
    fn train_step(&mut self, batch: &TrainBatch) -> Result<f32, BoxError> {
        if batch.is_empty() {
            return Err("training batch is empty".into());
        }
        if batch.actions.len() != batch.len() || batch.rewards.len() != batch.len() {
            return Err("training batch columns have mismatched lengths".into());
        }

        let mut total_loss = 0.0;
        for ((state, action), reward) in batch
            .states
            .iter()
            .zip(&batch.actions)
            .zip(&batch.rewards)
        {
            self.check_state(state)?;
            if *action >= self.action_size {
                return Err(format!(
                    "action {action} is out of range for {} outputs",
                    self.action_size
                )
                .into());
            }

            let probabilities = softmax(&self.logits(state));
            total_loss -= reward * (probabilities[*action] + 1e-8).ln();

            // Cross-entropy gradient for the one-slot target vector:
            // d loss / d logit_a = p_a * reward - target_a.
            for a in 0..self.action_size {
                let target = if a == *action { *reward } else { 0.0 };
                let grad = probabilities[a] * reward - target;
                self.bias[a] -= self.learning_rate * grad;
                let row = &mut self.weights[a * self.state_size..(a + 1) * self.state_size];
                for (w, s) in row.iter_mut().zip(state) {
                    if *s != 0.0 {
                        *w -= self.learning_rate * grad * s;
                    }
                }
            }
        }
        Ok(total_loss / batch.len() as f32)
    }
}
