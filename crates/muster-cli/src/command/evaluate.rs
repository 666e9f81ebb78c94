use std::path::PathBuf;

use muster_engine::Formation;
use muster_training::{ExecutionEngine, TrainerOptions};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use crate::{data, model::LinearPolicyModel, resolver::ScrimmageResolver};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Starting roster slots per player
    #[arg(long, default_value_t = 5)]
    units: usize,
    /// Reinforcement slots per player
    #[arg(long, default_value_t = 1)]
    reinforcements: usize,
    /// Catalog data file (JSON); built-in demo roster when omitted
    #[arg(long)]
    data: Option<PathBuf>,
    /// RNG seed for a reproducible draft
    #[arg(long)]
    seed: Option<u64>,
}

/// Runs one greedy self-play draft with a freshly initialized policy and
/// prints every pick plus the battle outcome. Mostly useful as a smoke
/// test of the full loop; training happens in `train`.
pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
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
        0.001,
        &mut rng,
    );
    let resolver = ScrimmageResolver::new(Pcg64Mcg::from_rng(&mut rng));
    let mut engine = ExecutionEngine::new(
        &catalog,
        formation,
        model,
        resolver,
        TrainerOptions::default(),
    )?;

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

    Ok(())
}
