use serde::{Deserialize, Serialize};

use crate::{Catalog, PLAYER_COUNT, UnitId};

/// Required slot counts per player: starting roster size and bench size.
/// Identical for both players in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub units: usize,
    pub reinforcements: usize,
}

impl Formation {
    /// Slots one player must fill.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.units + self.reinforcements
    }

    /// Length of the encoded state vector for this formation and catalog:
    /// one one-hot block per slot, over both players.
    #[must_use]
    pub fn state_size(&self, catalog: &Catalog) -> usize {
        catalog.unit_count() * self.total_slots() * PLAYER_COUNT
    }
}

/// Where a drafted unit ended up when applied to a force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Appended to the starting roster.
    Unit(UnitId),
    /// Starting roster full, appended to the bench.
    Reinforcement(UnitId),
    /// Both sequences full, the pick was discarded.
    Dropped(UnitId),
}

impl Placement {
    /// Id of the unit that was actually placed, `None` when dropped.
    #[must_use]
    pub fn placed_id(&self) -> Option<UnitId> {
        match *self {
            Self::Unit(id) | Self::Reinforcement(id) => Some(id),
            Self::Dropped(_) => None,
        }
    }
}

/// One player's picks so far: ordered starting roster and bench.
///
/// A force only ever grows, and only through [`Force::draft`]; the lengths
/// never exceed the formation it is drafted against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Force {
    units: Vec<UnitId>,
    reinforcements: Vec<UnitId>,
}

impl Force {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a force with the given contents. Intended for tests and for
    /// resuming a draft from an externally supplied position.
    #[must_use]
    pub fn from_parts(units: Vec<UnitId>, reinforcements: Vec<UnitId>) -> Self {
        Self {
            units,
            reinforcements,
        }
    }

    #[must_use]
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    #[must_use]
    pub fn reinforcements(&self) -> &[UnitId] {
        &self.reinforcements
    }

    /// Total picks applied to this force so far.
    #[must_use]
    pub fn filled_slots(&self) -> usize {
        self.units.len() + self.reinforcements.len()
    }

    #[must_use]
    pub fn is_full(&self, formation: Formation) -> bool {
        self.units.len() >= formation.units
            && self.reinforcements.len() >= formation.reinforcements
    }

    /// How many times `id` appears in the starting roster.
    #[must_use]
    pub fn unit_count_of(&self, id: UnitId) -> usize {
        self.units.iter().filter(|u| **u == id).count()
    }

    #[must_use]
    pub fn has_reinforcement(&self, id: UnitId) -> bool {
        self.reinforcements.contains(&id)
    }

    /// Applies one drafted unit: starting roster first, then the bench,
    /// dropped once both are full.
    pub fn draft(&mut self, id: UnitId, formation: Formation) -> Placement {
        if self.units.len() < formation.units {
            self.units.push(id);
            Placement::Unit(id)
        } else if self.reinforcements.len() < formation.reinforcements {
            self.reinforcements.push(id);
            Placement::Reinforcement(id)
        } else {
            Placement::Dropped(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATION: Formation = Formation {
        units: 2,
        reinforcements: 1,
    };

    #[test]
    fn test_draft_fills_units_then_reinforcements_then_drops() {
        let mut force = Force::new();
        assert_eq!(
            force.draft(UnitId(1), FORMATION),
            Placement::Unit(UnitId(1))
        );
        assert_eq!(
            force.draft(UnitId(2), FORMATION),
            Placement::Unit(UnitId(2))
        );
        assert_eq!(
            force.draft(UnitId(3), FORMATION),
            Placement::Reinforcement(UnitId(3))
        );
        assert_eq!(
            force.draft(UnitId(4), FORMATION),
            Placement::Dropped(UnitId(4))
        );

        assert_eq!(force.units(), &[UnitId(1), UnitId(2)]);
        assert_eq!(force.reinforcements(), &[UnitId(3)]);
        assert_eq!(force.filled_slots(), 3);
        assert!(force.is_full(FORMATION));
    }

    #[test]
    fn test_unit_count_of_counts_duplicates() {
        let force = Force::from_parts(vec![UnitId(1), UnitId(1)], vec![UnitId(2)]);
        assert_eq!(force.unit_count_of(UnitId(1)), 2);
        assert_eq!(force.unit_count_of(UnitId(2)), 0);
        assert!(force.has_reinforcement(UnitId(2)));
    }

    #[test]
    fn test_dropped_placement_has_no_placed_id() {
        assert_eq!(Placement::Dropped(UnitId(7)).placed_id(), None);
        assert_eq!(Placement::Unit(UnitId(7)).placed_id(), Some(UnitId(7)));
    }
}
