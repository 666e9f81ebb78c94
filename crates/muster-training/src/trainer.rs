use muster_engine::{
    BattleOutcome, BattleResolver, BoxError, Catalog, DraftError, DraftSession, Formation, Player,
};
use muster_policy::{
    PolicyModel, ProbabilitySamplingDrafter, SelectActionError, TrainBatch, encode_state,
};
use rand::Rng;

use crate::{ReplayMemory, TrainingExample};

/// Terminal reward for the winning player's picks.
pub const WINNING_REWARD: f32 = 1.0;
/// Terminal reward for the losing player's picks.
pub const LOSING_REWARD: f32 = -1.0;
/// Terminal reward for every pick of a drawn battle.
pub const DRAW_REWARD: f32 = 0.0;

/// Construction-time parameters for a [`DrafterTrainer`].
#[derive(Debug, Clone, Copy)]
pub struct TrainerOptions {
    /// Examples per policy update; also the warm-up episode count.
    pub batch_size: usize,
    /// Replay memory capacity.
    pub replay_capacity: usize,
    /// Optional cross-check of the caller's expected state vector length
    /// against the catalog/formation-derived size.
    pub state_size: Option<usize>,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            batch_size: 16,
            replay_capacity: 10_000,
            state_size: None,
        }
    }
}

/// Configuration errors detected before any episode runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ConfigError {
    #[display("catalog has no units")]
    EmptyCatalog,
    #[display("formation has no slots to draft")]
    NoSlots,
    #[display("batch size must be positive")]
    ZeroBatchSize,
    #[display("epsilon decay interval must be positive")]
    ZeroDecayInterval,
    #[display("declared state size {declared} does not match the required {expected}")]
    StateSizeMismatch { expected: usize, declared: usize },
}

impl std::error::Error for ConfigError {}

/// Errors that abort an episode. Whatever examples the episode had
/// recorded are discarded, never committed to replay memory.
#[derive(Debug, derive_more::Display)]
pub enum EpisodeError {
    #[display("policy model failed: {_0}")]
    Model(BoxError),
    #[display("battle resolver failed: {_0}")]
    Resolver(BoxError),
    #[display("draft engine rejected an action: {_0}")]
    Draft(DraftError),
}

impl std::error::Error for EpisodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(source) | Self::Resolver(source) => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            Self::Draft(source) => Some(source),
        }
    }
}

/// Errors raised by a policy update step.
#[derive(Debug, derive_more::Display)]
pub enum TrainError {
    #[display("policy model training step failed: {_0}")]
    Model(BoxError),
}

impl std::error::Error for TrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(source) => Some(source.as_ref() as &(dyn std::error::Error + 'static)),
        }
    }
}

/// What one completed episode did.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeReport {
    /// Training examples recorded (= picks actually applied).
    pub picks: usize,
    pub outcome: BattleOutcome,
    /// True when the draft ended on a no-eligible-action stall.
    pub stalled: bool,
}

/// Runs self-play episodes and batched policy updates.
///
/// The trainer owns the policy model, the battle resolver, and the replay
/// memory for the lifetime of a training run; episodes borrow the shared
/// catalog read-only. One episode runs to full completion - including its
/// terminal battle resolution - before its examples are committed and
/// before the next episode starts.
#[derive(Debug)]
pub struct DrafterTrainer<'a, M, B> {
    catalog: &'a Catalog,
    formation: Formation,
    model: M,
    resolver: B,
    batch_size: usize,
    state_size: usize,
    replay: ReplayMemory,
    episode_count: usize,
}

impl<'a, M, B> DrafterTrainer<'a, M, B>
where
    M: PolicyModel,
    B: BattleResolver,
{
    /// Validates the configuration and builds a trainer. Fails fast on
    /// inconsistent parameters, before any episode can run.
    pub fn new(
        catalog: &'a Catalog,
        formation: Formation,
        model: M,
        resolver: B,
        options: TrainerOptions,
    ) -> Result<Self, ConfigError> {
        if catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if formation.total_slots() == 0 {
            return Err(ConfigError::NoSlots);
        }
        if options.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        let state_size = formation.state_size(catalog);
        if let Some(declared) = options.state_size {
            if declared != state_size {
                return Err(ConfigError::StateSizeMismatch {
                    expected: state_size,
                    declared,
                });
            }
        }
        Ok(Self {
            catalog,
            formation,
            model,
            resolver,
            batch_size: options.batch_size,
            state_size,
            replay: ReplayMemory::new(options.replay_capacity),
            episode_count: 0,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    #[must_use]
    pub fn formation(&self) -> Formation {
        self.formation
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn replay(&self) -> &ReplayMemory {
        &self.replay
    }

    /// Episodes completed and committed so far.
    #[must_use]
    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    /// Resolves a finished configuration through the owned battle resolver.
    pub(crate) fn resolve(
        &mut self,
        config: &muster_engine::DraftConfig<'_>,
    ) -> Result<BattleOutcome, EpisodeError> {
        self.resolver.resolve(config).map_err(EpisodeError::Resolver)
    }

    /// Runs one full self-play episode: draft to completion, resolve the
    /// battle, backfill terminal rewards, commit to replay memory.
    ///
    /// Both drafters share the policy model and the same `epsilon`. One
    /// `TrainingExample` is recorded per applied pick, with `next_state`
    /// encoded immediately after the pick was applied; rewards are assigned
    /// only after the outcome is known, by which player made each pick.
    pub fn run_episode<R>(
        &mut self,
        epsilon: f64,
        rng: &mut R,
    ) -> Result<EpisodeReport, EpisodeError>
    where
        R: Rng + ?Sized,
    {
        let mut session = DraftSession::new(self.catalog, self.formation);
        let drafters = [
            ProbabilitySamplingDrafter::new(epsilon),
            ProbabilitySamplingDrafter::new(epsilon),
        ];
        let mut episode = Vec::new();

        while session.can_continue() {
            let player = session.current_player();
            let drafter = &drafters[player.index()];
            let state = encode_state(session.config(), self.state_size);

            let selection = match drafter.select_action(
                &self.model,
                rng,
                session.config(),
                session.current_force(),
                self.formation,
            ) {
                Ok(selection) => selection,
                Err(SelectActionError::NoEligibleAction) => {
                    session.force_stall();
                    break;
                }
                Err(SelectActionError::Model(source)) => return Err(EpisodeError::Model(source)),
            };

            session
                .apply_action(selection.action)
                .map_err(EpisodeError::Draft)?;

            episode.push(TrainingExample {
                state,
                action: selection.action,
                reward: DRAW_REWARD,
                next_state: encode_state(session.config(), self.state_size),
            });
        }

        let stalled = session.is_stalled();
        let outcome = self.resolve(session.config())?;

        for (pick, example) in episode.iter_mut().enumerate() {
            example.reward = match outcome.winner {
                Some(winner) if winner == Player::from_pick_index(pick) => WINNING_REWARD,
                Some(_) => LOSING_REWARD,
                None => DRAW_REWARD,
            };
        }

        let picks = episode.len();
        self.replay.extend(episode);
        self.episode_count += 1;

        Ok(EpisodeReport {
            picks,
            outcome,
            stalled,
        })
    }

    /// Performs one batched policy update.
    ///
    /// A no-op returning zero loss while the replay memory holds fewer
    /// examples than one batch. Otherwise samples a batch with replacement,
    /// issues a single training step, and then applies the replay eviction
    /// policy.
    pub fn train_network<R>(&mut self, rng: &mut R) -> Result<f32, TrainError>
    where
        R: Rng + ?Sized,
    {
        if self.replay.len() < self.batch_size {
            return Ok(0.0);
        }

        let sampled = self.replay.sample_batch(rng, self.batch_size);
        let batch = TrainBatch {
            states: sampled.iter().map(|e| e.state.clone()).collect(),
            actions: sampled.iter().map(|e| e.action).collect(),
            rewards: sampled.iter().map(|e| e.reward).collect(),
        };

        let loss = self.model.train_step(&batch).map_err(TrainError::Model)?;
        self.replay.trim();
        Ok(loss)
    }
}
