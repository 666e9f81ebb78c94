use muster_engine::{
    BattleOutcome, BattleResolver, BoxError, DraftConfig, Force, Player, PlayerSetup,
};
use rand::Rng;

/// Relative score margin under which a battle counts as a draw.
const DRAW_MARGIN: f64 = 0.01;

/// A toy battle resolver for demo runs.
///
/// The real battle simulation is an external collaborator; the core only
/// ever sees its outcome. This stand-in scores each force from aggregate
/// unit stats (bench at half weight), scales by player power, applies a
/// multiplicative random jitter, and declares the higher score the winner.
/// It exists so the binary can close the self-play loop end to end.
#[derive(Debug)]
pub(crate) struct ScrimmageResolver<R> {
    rng: R,
    jitter: f64,
}

impl<R> ScrimmageResolver<R> {
    pub(crate) fn new(rng: R) -> Self {
        Self { rng, jitter: 0.1 }
    }

    #[cfg(test)]
    pub(crate) fn with_jitter(rng: R, jitter: f64) -> Self {
        Self { rng, jitter }
    }
}

fn force_strength(config: &DraftConfig<'_>, force: &Force) -> Result<f64, BoxError> {
    let mut strength = 0.0;
    for (id, weight) in force
        .units()
        .iter()
        .map(|id| (*id, 1.0))
        .chain(force.reinforcements().iter().map(|id| (*id, 0.5)))
    {
        let unit = config
            .catalog
            .unit(id)
            .ok_or_else(|| format!("unit id {id} is missing from the catalog"))?;
        strength += weight * f64::from((unit.attack + unit.defense) * unit.level);
    }
    Ok(strength)
}

impl<R> ScrimmageResolver<R>
where
    R: Rng,
{
    fn score(&mut self, config: &DraftConfig<'_>, setup: &PlayerSetup) -> Result<f64, BoxError> {
        let jitter = self.rng.random_range(1.0 - self.jitter..=1.0 + self.jitter);
        Ok(force_strength(config, &setup.force)? * setup.power * jitter)
    }
}

impl<R> BattleResolver for ScrimmageResolver<R>
where
    R: Rng,
{
    fn resolve(&mut self, config: &DraftConfig<'_>) -> Result<BattleOutcome, BoxError> {
        let score1 = self.score(config, &config.player1)?;
        let score2 = self.score(config, &config.player2)?;

        let margin = (score1 - score2).abs();
        let winner = if margin <= DRAW_MARGIN * score1.max(score2) {
            None
        } else if score1 > score2 {
            Some(Player::One)
        } else {
            Some(Player::Two)
        };
        Ok(BattleOutcome { winner })
    }
}

#[cfg(test)]
mod tests {
    use muster_engine::{Catalog, SkillRef, UnitId, UnitType};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn catalog() -> Catalog {
        let units = (1..=2).map(|n| {
            (
                UnitId(n),
                UnitType {
                    name: format!("unit-{n}"),
                    kind: 1,
                    sub_kind: 1,
                    attack: 38,
                    defense: 34,
                    level: 40,
                    unique: false,
                    skills: vec![SkillRef {
                        skill_id: 1,
                        chance: 1.0,
                    }],
                },
            )
        });
        Catalog::from_units(units).unwrap()
    }

    #[test]
    fn test_clearly_stronger_force_wins_through_jitter() {
        let catalog = catalog();
        let mut config = DraftConfig::new(&catalog);
        config.player1.force = Force::from_parts(vec![UnitId(1), UnitId(2)], vec![]);
        // Player 2 drafted nothing: zero strength no matter the jitter.
        let mut resolver = ScrimmageResolver::new(Pcg64Mcg::seed_from_u64(79));

        for _ in 0..20 {
            let outcome = resolver.resolve(&config).unwrap();
            assert_eq!(outcome.winner, Some(Player::One));
        }
    }

    #[test]
    fn test_identical_forces_without_jitter_draw() {
        let catalog = catalog();
        let mut config = DraftConfig::new(&catalog);
        config.player1.force = Force::from_parts(vec![UnitId(1)], vec![UnitId(2)]);
        config.player2.force = Force::from_parts(vec![UnitId(1)], vec![UnitId(2)]);
        let mut resolver = ScrimmageResolver::with_jitter(Pcg64Mcg::seed_from_u64(83), 0.0);

        let outcome = resolver.resolve(&config).unwrap();
        assert_eq!(outcome.winner, None);
    }

    #[test]
    fn test_unknown_unit_id_is_a_resolver_error() {
        let catalog = catalog();
        let mut config = DraftConfig::new(&catalog);
        config.player1.force = Force::from_parts(vec![UnitId(42)], vec![]);
        let mut resolver = ScrimmageResolver::new(Pcg64Mcg::seed_from_u64(89));

        assert!(resolver.resolve(&config).is_err());
    }
}
