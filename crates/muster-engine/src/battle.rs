use crate::{BoxError, Catalog, Force, Player, UnitId};

/// Default player power handed to the battle resolver, matching the value
/// the simulation expects for evenly matched sides.
pub const DEFAULT_POWER: f64 = 89.77;

/// One side of the battle configuration: the drafted force plus the
/// player's overall power rating.
#[derive(Debug, Clone)]
pub struct PlayerSetup {
    pub force: Force,
    pub power: f64,
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self {
            force: Force::new(),
            power: DEFAULT_POWER,
        }
    }
}

/// Full configuration handed to the battle resolver: both forces, the mode
/// flag, and the shared catalog the unit ids refer to.
///
/// During a draft this doubles as the live game state; the state encoder
/// reads the partially filled forces straight from it.
#[derive(Debug, Clone)]
pub struct DraftConfig<'a> {
    pub player1: PlayerSetup,
    pub player2: PlayerSetup,
    pub epic_mode: bool,
    pub catalog: &'a Catalog,
}

impl<'a> DraftConfig<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            player1: PlayerSetup::default(),
            player2: PlayerSetup::default(),
            epic_mode: false,
            catalog,
        }
    }

    #[must_use]
    pub fn force(&self, player: Player) -> &Force {
        match player {
            Player::One => &self.player1.force,
            Player::Two => &self.player2.force,
        }
    }

    pub fn force_mut(&mut self, player: Player) -> &mut Force {
        match player {
            Player::One => &mut self.player1.force,
            Player::Two => &mut self.player2.force,
        }
    }

    /// All picks made so far, in encoder order: player 1 units, player 1
    /// reinforcements, player 2 units, player 2 reinforcements.
    pub fn all_picks(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.player1
            .force
            .units()
            .iter()
            .chain(self.player1.force.reinforcements())
            .chain(self.player2.force.units())
            .chain(self.player2.force.reinforcements())
            .copied()
    }

    /// Total picks applied across both players.
    #[must_use]
    pub fn filled_slots(&self) -> usize {
        self.player1.force.filled_slots() + self.player2.force.filled_slots()
    }
}

/// Outcome reported by the battle resolver. `winner` is `None` on a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleOutcome {
    pub winner: Option<Player>,
}

/// Seam to the external battle simulation.
///
/// The resolver is an opaque collaborator: it receives the completed draft
/// configuration and reports who won. Combat mechanics are entirely its
/// business. A call completes exactly once and its result is observed
/// before the draft engine proceeds.
pub trait BattleResolver {
    fn resolve(&mut self, config: &DraftConfig<'_>) -> Result<BattleOutcome, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SkillRef, UnitType};

    fn catalog() -> Catalog {
        let units = (1..=3).map(|n| {
            (
                UnitId(n),
                UnitType {
                    name: format!("unit-{n}"),
                    kind: 1,
                    sub_kind: 1,
                    attack: 10,
                    defense: 10,
                    level: 1,
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
    fn test_all_picks_follow_encoder_order() {
        let catalog = catalog();
        let mut config = DraftConfig::new(&catalog);
        config.player1.force = Force::from_parts(vec![UnitId(1)], vec![UnitId(2)]);
        config.player2.force = Force::from_parts(vec![UnitId(3)], vec![]);

        let picks = config.all_picks().collect::<Vec<_>>();
        assert_eq!(picks, vec![UnitId(1), UnitId(2), UnitId(3)]);
        assert_eq!(config.filled_slots(), 3);
    }
}
