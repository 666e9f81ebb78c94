//! Draft-phase data model and turn-taking state machine.
//!
//! This crate holds everything the drafting core needs to describe a game
//! *before* the battle starts:
//!
//! - [`Catalog`] - the unit roster with id↔index bijections
//! - [`Formation`] and [`Force`] - slot capacities and the picks made so far
//! - [`DraftSession`] - the alternating-pick state machine for one draft
//! - [`BattleResolver`] - the seam to the external battle simulation
//!
//! Policy logic (state encoding, action masks, pick selection) lives in
//! `muster-policy`; the self-play training loop lives in `muster-training`.

pub use self::{battle::*, catalog::*, draft::*, force::*};

pub mod battle;
pub mod catalog;
pub mod draft;
pub mod force;

/// Number of players in a draft. Drafts are strictly two-sided.
pub const PLAYER_COUNT: usize = 2;

/// Opaque error reported by a boundary collaborator (battle resolver or
/// policy model). The core never inspects these beyond reporting them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
