use muster_engine::{BoxError, DraftConfig, Force, Formation};
use rand::{Rng, seq::IndexedRandom};

use crate::{ActionMask, PolicyModel, encode_state};

/// A chosen action index plus how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub action: usize,
    /// True when the pick came from the uniform exploration branch rather
    /// than the model's distribution.
    pub exploration: bool,
}

/// Errors raised while selecting an action.
#[derive(Debug, derive_more::Display)]
pub enum SelectActionError {
    /// The legality mask has no eligible entry. Surfaced as a distinct
    /// signal so the draft engine can treat it as a stall instead of
    /// propagating an undefined action index.
    #[display("no eligible action remains for the current force")]
    NoEligibleAction,
    #[display("policy model prediction failed: {_0}")]
    Model(BoxError),
}

impl std::error::Error for SelectActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoEligibleAction => None,
            Self::Model(source) => Some(source.as_ref() as &(dyn std::error::Error + 'static)),
        }
    }
}

/// Epsilon-greedy drafter that samples picks from the policy model's
/// masked probability distribution.
///
/// With probability `epsilon` it explores: a uniform random pick among the
/// currently eligible actions. Otherwise it exploits: it encodes the draft
/// state, queries the model, and samples one action by walking the
/// distribution in index order against a single uniform draw.
///
/// `epsilon = 0.0` is the greedy-with-sampling evaluation mode;
/// `epsilon = 1.0` is pure exploration. The drafter itself is stateless;
/// model and randomness are supplied per call.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilitySamplingDrafter {
    epsilon: f64,
}

impl ProbabilitySamplingDrafter {
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Selects the next pick for the player owning `force`.
    pub fn select_action<M, R>(
        &self,
        model: &M,
        rng: &mut R,
        config: &DraftConfig<'_>,
        force: &Force,
        formation: Formation,
    ) -> Result<Selection, SelectActionError>
    where
        M: PolicyModel + ?Sized,
        R: Rng + ?Sized,
    {
        let mask = ActionMask::build(config.catalog, force, formation);
        if !mask.has_eligible() {
            return Err(SelectActionError::NoEligibleAction);
        }

        if rng.random::<f64>() < self.epsilon {
            let action = pick_uniform(&mask, rng).ok_or(SelectActionError::NoEligibleAction)?;
            return Ok(Selection {
                action,
                exploration: true,
            });
        }

        let state = encode_state(config, formation.state_size(config.catalog));
        let probabilities = model
            .predict(&state, &mask)
            .map_err(SelectActionError::Model)?;

        // Single uniform draw, cumulative walk in index order.
        let threshold = rng.random::<f64>();
        let mut cumulative = 0.0_f64;
        for (action, probability) in probabilities.iter().enumerate() {
            cumulative += f64::from(*probability);
            if threshold <= cumulative {
                return Ok(Selection {
                    action,
                    exploration: false,
                });
            }
        }

        // Floating-point underflow: the accumulated mass never reached the
        // threshold. Recover with a uniform eligible pick; this is a
        // required safety net, not an error path.
        let action = pick_uniform(&mask, rng).ok_or(SelectActionError::NoEligibleAction)?;
        Ok(Selection {
            action,
            exploration: false,
        })
    }
}

fn pick_uniform<R>(mask: &ActionMask, rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let eligible = mask.eligible_indices().collect::<Vec<_>>();
    eligible.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use muster_engine::{Catalog, SkillRef, UnitId, UnitType};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::TrainBatch;

    fn catalog() -> Catalog {
        let units = (1..=4).map(|n| {
            (
                UnitId(n),
                UnitType {
                    name: format!("unit-{n}"),
                    kind: 1,
                    sub_kind: 1,
                    attack: 10,
                    defense: 10,
                    level: 1,
                    unique: n == 4,
                    skills: vec![SkillRef {
                        skill_id: 1,
                        chance: 1.0,
                    }],
                },
            )
        });
        Catalog::from_units(units).unwrap()
    }

    const FORMATION: Formation = Formation {
        units: 5,
        reinforcements: 1,
    };

    /// Model returning a fixed distribution regardless of state.
    struct FixedModel(Vec<f32>);

    impl PolicyModel for FixedModel {
        fn predict(&self, _state: &[f32], _mask: &ActionMask) -> Result<Vec<f32>, BoxError> {
            Ok(self.0.clone())
        }

        fn train_step(&mut self, _batch: &TrainBatch) -> Result<f32, BoxError> {
            Ok(0.0)
        }
    }

    struct FailingModel;

    impl PolicyModel for FailingModel {
        fn predict(&self, _state: &[f32], _mask: &ActionMask) -> Result<Vec<f32>, BoxError> {
            Err("backend unavailable".into())
        }

        fn train_step(&mut self, _batch: &TrainBatch) -> Result<f32, BoxError> {
            Err("backend unavailable".into())
        }
    }

    #[test]
    fn test_pure_exploration_only_picks_eligible_actions() {
        let catalog = catalog();
        let config = DraftConfig::new(&catalog);
        // Unique id 4 already drafted: index 3 must never come up.
        let force = Force::from_parts(vec![UnitId(4)], vec![]);
        let drafter = ProbabilitySamplingDrafter::new(1.0);
        let model = FixedModel(vec![0.0, 0.0, 0.0, 1.0]);
        let mut rng = Pcg64Mcg::seed_from_u64(7);

        for _ in 0..200 {
            let selection = drafter
                .select_action(&model, &mut rng, &config, &force, FORMATION)
                .unwrap();
            assert!(selection.exploration);
            assert_ne!(selection.action, 3);
        }
    }

    #[test]
    fn test_exploitation_samples_from_model_distribution() {
        let catalog = catalog();
        let config = DraftConfig::new(&catalog);
        let force = Force::new();
        let drafter = ProbabilitySamplingDrafter::new(0.0);
        // All mass on index 2: the cumulative walk must always land there.
        let model = FixedModel(vec![0.0, 0.0, 1.0, 0.0]);
        let mut rng = Pcg64Mcg::seed_from_u64(11);

        for _ in 0..50 {
            let selection = drafter
                .select_action(&model, &mut rng, &config, &force, FORMATION)
                .unwrap();
            assert!(!selection.exploration);
            assert_eq!(selection.action, 2);
        }
    }

    #[test]
    fn test_underflow_falls_back_to_uniform_eligible_pick() {
        let catalog = catalog();
        let config = DraftConfig::new(&catalog);
        let force = Force::new();
        let drafter = ProbabilitySamplingDrafter::new(0.0);
        // Degenerate all-zero distribution: the walk exhausts its mass.
        let model = FixedModel(vec![0.0, 0.0, 0.0, 0.0]);
        let mut rng = Pcg64Mcg::seed_from_u64(13);

        for _ in 0..50 {
            let selection = drafter
                .select_action(&model, &mut rng, &config, &force, FORMATION)
                .unwrap();
            assert!(!selection.exploration);
            assert!(selection.action < 4);
        }
    }

    #[test]
    fn test_all_zero_mask_is_a_distinct_signal() {
        let catalog = catalog();
        let config = DraftConfig::new(&catalog);
        let formation = Formation {
            units: 0,
            reinforcements: 0,
        };
        let drafter = ProbabilitySamplingDrafter::new(0.5);
        let model = FixedModel(vec![0.25; 4]);
        let mut rng = Pcg64Mcg::seed_from_u64(17);

        let result = drafter.select_action(&model, &mut rng, &config, &Force::new(), formation);
        assert!(matches!(result, Err(SelectActionError::NoEligibleAction)));
    }

    #[test]
    fn test_model_failure_is_surfaced_with_source() {
        let catalog = catalog();
        let config = DraftConfig::new(&catalog);
        let drafter = ProbabilitySamplingDrafter::new(0.0);
        let mut rng = Pcg64Mcg::seed_from_u64(19);

        let result =
            drafter.select_action(&FailingModel, &mut rng, &config, &Force::new(), FORMATION);
        match result {
            Err(SelectActionError::Model(source)) => {
                assert_eq!(source.to_string(), "backend unavailable");
            }
            other => panic!("expected model error, got {other:?}"),
        }
    }
}
