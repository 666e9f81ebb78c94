use std::path::PathBuf;

use muster_engine::Formation;
use muster_training::{EpsilonSchedule, ExecutionEngine, TrainOptions, TrainerOptions};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use crate::{data, model::LinearPolicyModel, resolver::ScrimmageResolver};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Self-play episodes to run
    #[arg(long, default_value_t = 200)]
    episodes: usize,
    /// Starting roster slots per player
    #[arg(long, default_value_t = 5)]
    units: usize,
    /// Reinforcement slots per player
    #[arg(long, default_value_t = 1)]
    reinforcements: usize,
    /// Initial exploration rate
    #[arg(long, default_value_t = 1.0)]
    epsilon_start: f64,
    /// Exploration rate floor
    #[arg(long, default_value_t = 0.01)]
    epsilon_min: f64,
    /// Multiplicative decay factor
    #[arg(long, default_value_t = 0.995)]
    epsilon_decay: f64,
    /// Episodes between decay steps
    #[arg(long, default_value_t = 10)]
    decay_interval: usize,
    /// Examples per policy update (also the warm-up episode count)
    #[arg(long, default_value_t = 16)]
    batch_size: usize,
    /// Replay memory capacity
    #[arg(long, default_value_t = 10_000)]
    replay_capacity: usize,
    /// Model learning rate
    #[arg(long, default_value_t = 0.001)]
    learning_rate: f32,
    /// Catalog data file (JSON); built-in demo roster when omitted
    #[arg(long)]
    data: Option<PathBuf>,
    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Print progress every N episodes
    #[arg(long, default_value_t = 10)]
    log_interval: usize,
    /// Run one greedy self-play draft after training
    #[arg(long)]
    evaluate: bool,
}

impl Default for TrainArg {
    fn default() -> Self {
        Self {
            episodes: 200,
            units: 5,
            reinforcements: 1,
            epsilon_start: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            decay_interval: 10,
            batch_size: 16,
            replay_capacity: 10_000,
            learning_rate: 0.001,
            data: None,
            seed: None,
            log_interval: 10,
            evaluate: false,
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let catalog = data::load_catalog(arg.data.as_deref())?;
    let formation = Formation {
        units: arg.units,
        reinforcements: arg.reinforcements,
    };
    let mut rng = match arg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    };

    let model = LinearPolicyModel::new(
        formation.state_size(&catalog),
        catalog.unit_count(),
        arg.learning_rate,
        &mut rng,
    );
    let resolver = ScrimmageResolver::new(Pcg64Mcg::from_rng(&mut rng));
    let mut engine = ExecutionEngine::new(
        &catalog,
        formation,
        model,
        resolver,
        TrainerOptions {
            batch_size: arg.batch_size,
            replay_capacity: arg.replay_capacity,
            state_size: None,
        },
    )?;

    let options = TrainOptions {
        episodes: arg.episodes,
        epsilon: EpsilonSchedule {
            start: arg.epsilon_start,
            min: arg.epsilon_min,
            decay: arg.epsilon_decay,
            decay_interval: arg.decay_interval,
        },
    };

    let log_interval = arg.log_interval.max(1);
    let summary = engine.train(&options, &mut rng, |progress| {
        if progress.episode % log_interval == 0 {
            let loss = progress
                .loss
                .map_or_else(|| "warm-up".to_owned(), |l| format!("{l:.4}"));
            println!(
                "episode {:>5}  epsilon {:.3}  picks {:>3}  loss {loss}",
                progress.episode, progress.epsilon, progress.picks
            );
        }
    })?;

    println!(
        "trained {} episodes, final epsilon {:.3}",
        summary.episodes, summary.final_epsilon
    );
    if let Some(stats) = summary.loss_stats() {
        println!(
            "loss: mean {:.4}  median {:.4}  min {:.4}  max {:.4}  std {:.4}",
            stats.mean, stats.median, stats.min, stats.max, stats.std_dev
        );
    }

    if arg.evaluate {
        let outcome = engine.evaluate(&mut rng, |player, unit| {
            let name = unit
                .and_then(|id| catalog.unit(id))
                .map_or("PASS", |u| u.name.as_str());
            println!("{player} selects: {name}");
        })?;
        match outcome.winner {
            Some(player) => println!("{player} wins"),
            None => println!("draw"),
        }
    }

    Ok(())
}
