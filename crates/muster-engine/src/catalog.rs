use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier of a unit type in the roster catalog.
///
/// Unit ids are assigned by the catalog data file and are stable across a
/// whole training run. They are distinct from *catalog indices*: ids identify
/// units in force lists and battle configurations, indices identify positions
/// in the encoder's one-hot blocks and in action masks. [`Catalog`] maintains
/// the bijection between the two.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct UnitId(pub u32);

/// Reference to a skill carried by a unit, with its trigger chance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRef {
    pub skill_id: u32,
    pub chance: f32,
}

/// Static metadata for one unit type. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u32,
    #[serde(rename = "sub_type")]
    pub sub_kind: u32,
    pub attack: u32,
    pub defense: u32,
    pub level: u32,
    /// Unique units may appear at most once in a player's starting roster.
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub skills: Vec<SkillRef>,
}

/// Errors raised while building a [`Catalog`].
#[derive(Debug, derive_more::Display)]
pub enum CatalogError {
    #[display("duplicate unit id {id} in catalog data")]
    DuplicateUnitId { id: UnitId },
}

impl std::error::Error for CatalogError {}

/// Ordered roster of unit types with total id↔index bijections.
///
/// The catalog assigns each unit a contiguous index in `[0, unit_count)`
/// following the order units were supplied in. [`Catalog::index_of_id`] and
/// [`Catalog::id_of_index`] are mutual inverses over that range; every other
/// component (encoder one-hot blocks, action masks, drafted action indices)
/// goes through these two lookups rather than assuming anything about the id
/// values themselves.
///
/// # Example
///
/// ```
/// use muster_engine::{Catalog, UnitId, UnitType};
///
/// let units = (1..=3).map(|n| {
///     (UnitId(n), UnitType {
///         name: format!("unit-{n}"),
///         kind: 1,
///         sub_kind: 1,
///         attack: 10,
///         defense: 10,
///         level: 1,
///         unique: false,
///         skills: vec![],
///     })
/// });
/// let catalog = Catalog::from_units(units).unwrap();
///
/// assert_eq!(catalog.unit_count(), 3);
/// assert_eq!(catalog.index_of_id(UnitId(2)), Some(1));
/// assert_eq!(catalog.id_of_index(1), Some(UnitId(2)));
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    units: Vec<(UnitId, UnitType)>,
    index_by_id: HashMap<UnitId, usize>,
}

impl Catalog {
    /// Builds a catalog from `(id, unit)` pairs, indexed in iteration order.
    pub fn from_units<I>(units: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (UnitId, UnitType)>,
    {
        let units = units.into_iter().collect::<Vec<_>>();
        let mut index_by_id = HashMap::with_capacity(units.len());
        for (index, (id, _)) in units.iter().enumerate() {
            if index_by_id.insert(*id, index).is_some() {
                return Err(CatalogError::DuplicateUnitId { id: *id });
            }
        }
        Ok(Self { units, index_by_id })
    }

    /// Number of unit types in the catalog.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Catalog index of the given unit id, if the id exists.
    #[must_use]
    pub fn index_of_id(&self, id: UnitId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    /// Unit id at the given catalog index, if in range.
    #[must_use]
    pub fn id_of_index(&self, index: usize) -> Option<UnitId> {
        self.units.get(index).map(|(id, _)| *id)
    }

    /// Unit metadata for the given id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitType> {
        self.index_of_id(id).map(|index| &self.units[index].1)
    }

    /// Iterates `(id, unit)` entries in catalog index order.
    pub fn entries(&self) -> impl Iterator<Item = (UnitId, &UnitType)> + '_ {
        self.units.iter().map(|(id, unit)| (*id, unit))
    }
}
