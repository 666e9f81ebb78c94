use std::{collections::HashMap, fs, path::Path};

use anyhow::Context as _;
use muster_engine::{Catalog, UnitId, UnitType};
use serde::Deserialize;

/// Built-in four-unit demo roster, used when no `--data` file is given.
const DEMO_DATA: &str = r#"{
    "units": {
        "1": {"name": "healer", "type": 1, "sub_type": 1, "attack": 38, "defense": 34,
              "level": 40, "skills": [{"skill_id": 1, "chance": 1}]},
        "2": {"name": "antihealer", "type": 1, "sub_type": 1, "attack": 38, "defense": 34,
              "level": 40, "skills": [{"skill_id": 2, "chance": 1}]},
        "3": {"name": "damager", "type": 1, "sub_type": 1, "attack": 38, "defense": 34,
              "level": 40, "skills": [{"skill_id": 3, "chance": 1}]},
        "4": {"name": "bigdamager", "type": 1, "sub_type": 1, "attack": 38, "defense": 34,
              "level": 40, "unique": true, "skills": [{"skill_id": 4, "chance": 1}]}
    },
    "skills": {
        "1": {"name": "HEAL", "heal": 20},
        "2": {"name": "ANTI", "antiheal": 32, "dmg": 2},
        "3": {"name": "DMG", "damage": 10},
        "4": {"name": "BIGDMG", "damage": 50}
    }
}"#;

/// The catalog-bearing portion of a game data file. Skill and type tables
/// are the battle simulation's business and are ignored here.
#[derive(Debug, Deserialize)]
struct DataFile {
    units: HashMap<String, UnitType>,
}

/// Loads the unit catalog from a JSON data file, falling back to the
/// built-in demo roster.
pub(crate) fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read data file {}", path.display()))?;
            parse_catalog(&text)
                .with_context(|| format!("invalid data file {}", path.display()))
        }
        None => parse_catalog(DEMO_DATA).context("built-in demo catalog is invalid"),
    }
}

fn parse_catalog(text: &str) -> anyhow::Result<Catalog> {
    let data: DataFile = serde_json::from_str(text)?;
    let mut units = data
        .units
        .into_iter()
        .map(|(id, unit)| {
            let id = id
                .parse::<u32>()
                .with_context(|| format!("unit id {id:?} is not a number"))?;
            Ok((UnitId(id), unit))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    // Data files key units by id string; index them in numeric id order.
    units.sort_by_key(|(id, _)| *id);
    Ok(Catalog::from_units(units)?)
}
