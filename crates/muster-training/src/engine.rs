use muster_engine::{
    BattleOutcome, BattleResolver, Catalog, DraftSession, Formation, Player, UnitId,
};
use muster_policy::{PolicyModel, ProbabilitySamplingDrafter, SelectActionError};
use muster_stats::descriptive::DescriptiveStats;
use rand::Rng;

use crate::{ConfigError, DrafterTrainer, EpisodeError, TrainError, TrainerOptions};

/// Multiplicative exploration-rate decay schedule.
///
/// Every `decay_interval` episodes the current epsilon moves toward `min`:
/// `epsilon' = min + (epsilon - min) * decay`. The schedule never drops
/// below `min`.
#[derive(Debug, Clone, Copy)]
pub struct EpsilonSchedule {
    pub start: f64,
    pub min: f64,
    pub decay: f64,
    pub decay_interval: usize,
}

impl EpsilonSchedule {
    /// One decay step applied to the current value.
    #[must_use]
    pub fn step(&self, epsilon: f64) -> f64 {
        (self.min + (epsilon - self.min) * self.decay).max(self.min)
    }
}

/// Parameters for one training run.
#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    pub episodes: usize,
    pub epsilon: EpsilonSchedule,
}

/// Per-episode progress reported to the training callback.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeProgress {
    /// Zero-based episode index.
    pub episode: usize,
    /// Exploration rate the episode ran with.
    pub epsilon: f64,
    /// Picks applied during the episode.
    pub picks: usize,
    /// Loss of the policy update that followed, once warm-up is over.
    pub loss: Option<f32>,
    pub winner: Option<Player>,
    pub stalled: bool,
}

/// Aggregate result of a training run.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub episodes: usize,
    pub final_epsilon: f64,
    /// Losses of every policy update performed, in order.
    pub losses: Vec<f32>,
}

impl TrainSummary {
    /// Summary statistics over the recorded losses, if any updates ran.
    #[must_use]
    pub fn loss_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.losses.iter().copied())
    }
}

/// Errors that abort a training run.
#[derive(Debug, derive_more::Display)]
pub enum TrainRunError {
    #[display("invalid training configuration: {_0}")]
    Config(ConfigError),
    #[display("episode {episode} failed: {source}")]
    Episode { episode: usize, source: EpisodeError },
    #[display("policy update after episode {episode} failed: {source}")]
    Train { episode: usize, source: TrainError },
}

impl std::error::Error for TrainRunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(source) => Some(source),
            Self::Episode { source, .. } => Some(source),
            Self::Train { source, .. } => Some(source),
        }
    }
}

/// Drives training runs and evaluation drafts.
///
/// The engine owns a [`DrafterTrainer`] and layers the two outer control
/// loops on top of it: the episode/update/decay loop of a training run and
/// the single greedy self-play draft of an evaluation run. Epsilon
/// schedule, episode counter, and replay memory are all fields of this one
/// instance; several independent engines can train in the same process.
#[derive(Debug)]
pub struct ExecutionEngine<'a, M, B> {
    trainer: DrafterTrainer<'a, M, B>,
}

impl<'a, M, B> ExecutionEngine<'a, M, B>
where
    M: PolicyModel,
    B: BattleResolver,
{
    /// Builds an engine over a freshly validated trainer.
    pub fn new(
        catalog: &'a Catalog,
        formation: Formation,
        model: M,
        resolver: B,
        options: TrainerOptions,
    ) -> Result<Self, ConfigError> {
        let trainer = DrafterTrainer::new(catalog, formation, model, resolver, options)?;
        Ok(Self { trainer })
    }

    #[must_use]
    pub fn trainer(&self) -> &DrafterTrainer<'a, M, B> {
        &self.trainer
    }

    /// Runs a full training loop: `episodes` self-play episodes, a policy
    /// update after each episode once the warm-up count (one batch size) is
    /// reached, and a multiplicative epsilon decay every
    /// `decay_interval` episodes.
    ///
    /// `on_episode` observes progress between episodes; it cannot alter
    /// episode semantics.
    pub fn train<R, F>(
        &mut self,
        options: &TrainOptions,
        rng: &mut R,
        mut on_episode: F,
    ) -> Result<TrainSummary, TrainRunError>
    where
        R: Rng + ?Sized,
        F: FnMut(&EpisodeProgress),
    {
        if options.epsilon.decay_interval == 0 {
            return Err(TrainRunError::Config(ConfigError::ZeroDecayInterval));
        }

        let mut epsilon = options.epsilon.start;
        let mut losses = Vec::new();

        for episode in 0..options.episodes {
            let report = self
                .trainer
                .run_episode(epsilon, rng)
                .map_err(|source| TrainRunError::Episode { episode, source })?;

            let mut loss = None;
            if episode >= self.trainer.batch_size() {
                let value = self
                    .trainer
                    .train_network(rng)
                    .map_err(|source| TrainRunError::Train { episode, source })?;
                losses.push(value);
                loss = Some(value);
            }

            if episode > 0 && episode % options.epsilon.decay_interval == 0 {
                epsilon = options.epsilon.step(epsilon);
            }

            on_episode(&EpisodeProgress {
                episode,
                epsilon,
                picks: report.picks,
                loss,
                winner: report.outcome.winner,
                stalled: report.stalled,
            });
        }

        Ok(TrainSummary {
            episodes: options.episodes,
            final_epsilon: epsilon,
            losses,
        })
    }

    /// Runs one greedy (epsilon = 0) self-play draft with the current
    /// policy and resolves the resulting battle.
    ///
    /// `on_pick` observes every applied turn as `(player, chosen unit)`,
    /// with `None` reported for a pass.
    pub fn evaluate<R, F>(
        &mut self,
        rng: &mut R,
        mut on_pick: F,
    ) -> Result<BattleOutcome, EpisodeError>
    where
        R: Rng + ?Sized,
        F: FnMut(Player, Option<UnitId>),
    {
        let formation = self.trainer.formation();
        let mut session = DraftSession::new(self.trainer.catalog(), formation);
        let drafters = [
            ProbabilitySamplingDrafter::new(0.0),
            ProbabilitySamplingDrafter::new(0.0),
        ];

        while session.can_continue() {
            let player = session.current_player();
            let drafter = &drafters[player.index()];

            let selection = match drafter.select_action(
                self.trainer.model(),
                rng,
                session.config(),
                session.current_force(),
                formation,
            ) {
                Ok(selection) => selection,
                Err(SelectActionError::NoEligibleAction) => {
                    session.force_stall();
                    break;
                }
                Err(SelectActionError::Model(source)) => return Err(EpisodeError::Model(source)),
            };

            let applied = session
                .apply_action(selection.action)
                .map_err(EpisodeError::Draft)?;
            on_pick(player, applied.chosen_id());
        }

        self.trainer.resolve(session.config())
    }
}
