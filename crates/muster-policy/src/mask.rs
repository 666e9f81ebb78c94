use muster_engine::{Catalog, Force, Formation, UnitId};

const ELIGIBLE: f32 = 1.0;
const INELIGIBLE: f32 = 0.0;

/// Binary legality mask over catalog indices: entry `i` is 1.0 iff the unit
/// at catalog index `i` may currently be drafted by the acting player.
///
/// An all-zero mask is a valid value; callers must treat it as a draft
/// stall, not sample from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMask(Vec<f32>);

impl ActionMask {
    /// Computes the mask for one player's current force.
    ///
    /// A unit is eligible iff all three hold:
    ///
    /// 1. the force still has capacity in either sequence,
    /// 2. a unique unit is not already in the starting roster,
    /// 3. the reinforcement axis allows it (see
    ///    [`reinforcement_axis_allows`]).
    #[must_use]
    pub fn build(catalog: &Catalog, force: &Force, formation: Formation) -> Self {
        let mut mask = vec![INELIGIBLE; catalog.unit_count()];
        let has_capacity = force.units().len() < formation.units
            || force.reinforcements().len() < formation.reinforcements;
        if has_capacity {
            for (index, (id, unit)) in catalog.entries().enumerate() {
                let unique_allowed = force.unit_count_of(id) == 0 || !unit.unique;
                if unique_allowed && reinforcement_axis_allows(catalog, force, id) {
                    mask[index] = ELIGIBLE;
                }
            }
        }
        Self(mask)
    }

    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn is_eligible(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(|v| *v > 0.0)
    }

    /// Indices of all currently eligible actions, in catalog order.
    pub fn eligible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, _)| i)
    }

    #[must_use]
    pub fn has_eligible(&self) -> bool {
        self.0.iter().any(|v| *v > 0.0)
    }
}

/// The reinforcement-eligibility axis of the legality rule.
///
/// A unit already sitting on the bench stays eligible as long as the
/// starting roster's length differs from the *total catalog size*. The
/// comparison against `catalog.unit_count()` (rather than the formation's
/// `units` capacity) matches the game's legality rule as shipped, suspected
/// unintended; it is isolated here so a confirmed correction is a one-line
/// change. See `DESIGN.md`.
#[must_use]
pub fn reinforcement_axis_allows(catalog: &Catalog, force: &Force, id: UnitId) -> bool {
    !force.has_reinforcement(id) || force.units().len() != catalog.unit_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_engine::{SkillRef, UnitType};

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

    #[test]
    fn test_empty_force_allows_everything() {
        let catalog = catalog();
        let mask = ActionMask::build(&catalog, &Force::new(), FORMATION);
        assert_eq!(mask.values(), &[1.0, 1.0, 1.0, 1.0]);
        assert!(mask.has_eligible());
        assert_eq!(mask.eligible_indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_exhausted_capacity_masks_everything() {
        let catalog = catalog();
        let formation = Formation {
            units: 1,
            reinforcements: 1,
        };
        let force = Force::from_parts(vec![UnitId(1)], vec![UnitId(2)]);
        let mask = ActionMask::build(&catalog, &force, formation);
        assert!(!mask.has_eligible());
    }

    #[test]
    fn test_drafted_unique_unit_is_masked_regardless_of_capacity() {
        let catalog = catalog();
        // Unique id 4 already in the starting roster, plenty of room left.
        let force = Force::from_parts(vec![UnitId(4)], vec![]);
        let mask = ActionMask::build(&catalog, &force, FORMATION);
        assert!(!mask.is_eligible(3));
        assert_eq!(mask.values(), &[1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_non_unique_units_may_repeat() {
        let catalog = catalog();
        let force = Force::from_parts(vec![UnitId(1), UnitId(1)], vec![]);
        let mask = ActionMask::build(&catalog, &force, FORMATION);
        assert!(mask.is_eligible(0));
    }

    #[test]
    fn test_reinforcement_axis_keeps_literal_catalog_size_comparison() {
        let catalog = catalog();

        // Benched unit, roster length != catalog size: still allowed.
        let force = Force::from_parts(vec![UnitId(1)], vec![UnitId(2)]);
        assert!(reinforcement_axis_allows(&catalog, &force, UnitId(2)));

        // Benched unit, roster length == catalog size (4): blocked. The
        // comparison is against the catalog size, not the formation's
        // roster capacity.
        let force = Force::from_parts(
            vec![UnitId(1), UnitId(2), UnitId(3), UnitId(1)],
            vec![UnitId(2)],
        );
        assert!(!reinforcement_axis_allows(&catalog, &force, UnitId(2)));
        let mask = ActionMask::build(&catalog, &force, FORMATION);
        assert!(!mask.is_eligible(1));
        assert!(mask.is_eligible(0));
    }
}
