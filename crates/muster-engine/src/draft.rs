use crate::{Catalog, DraftConfig, Formation, PLAYER_COUNT, Placement, UnitId};

/// One of the two drafting players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Player {
    #[display("player 1")]
    One,
    #[display("player 2")]
    Two,
}

impl Player {
    /// Zero-based player index.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Acting player for the `k`-th pick of a draft. Players alternate
    /// strictly, player 1 first, so this is `k mod 2`.
    #[must_use]
    pub fn from_pick_index(k: usize) -> Self {
        if k % PLAYER_COUNT == 0 {
            Self::One
        } else {
            Self::Two
        }
    }
}

/// Turn-taking state of a draft: whose pick it is and how many turns have
/// elapsed. The player indicator flips and the counter increments after
/// every completed pick; the counter bounds the maximum number of picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftState {
    pub current_player: Player,
    pub turn_counter: usize,
}

impl DraftState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_player: Player::One,
            turn_counter: 0,
        }
    }

    fn advance(&mut self) {
        self.current_player = self.current_player.opponent();
        self.turn_counter += 1;
    }
}

impl Default for DraftState {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a draft session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum DraftPhase {
    Drafting,
    Complete,
}

/// What a call to [`DraftSession::apply_action`] did to the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedAction {
    /// The unit was drafted into the acting player's force.
    Placed(Placement),
    /// The pass sentinel: nothing changed except the turn advancing.
    Pass,
}

impl AppliedAction {
    /// Id of the unit this action chose, `None` for a pass. Reported to
    /// per-pick observers; a dropped pick still names its unit.
    #[must_use]
    pub fn chosen_id(&self) -> Option<UnitId> {
        match *self {
            Self::Placed(
                Placement::Unit(id) | Placement::Reinforcement(id) | Placement::Dropped(id),
            ) => Some(id),
            Self::Pass => None,
        }
    }
}

/// Errors raised by the draft state machine.
#[derive(Debug, derive_more::Display)]
pub enum DraftError {
    #[display("action index {action} is out of range for a catalog of {unit_count} units")]
    UnknownAction { action: usize, unit_count: usize },
    #[display("draft is already complete")]
    DraftComplete,
}

impl std::error::Error for DraftError {}

/// The turn-taking state machine for one draft.
///
/// A session owns both forces and the draft state for the duration of one
/// draft. Each applied action appends to the acting player's force (starting
/// roster first, then bench), flips the player indicator, and increments the
/// turn counter. The session completes when every slot across both players
/// is filled or when the turn counter reaches that same bound, whichever
/// comes first; a caller that detects a stall (no eligible action) can force
/// completion with [`DraftSession::force_stall`].
///
/// Action indices are catalog indices; the *pass sentinel* is the catalog's
/// total unit count and applies as a no-op.
#[derive(Debug, Clone)]
pub struct DraftSession<'a> {
    config: DraftConfig<'a>,
    formation: Formation,
    state: DraftState,
    phase: DraftPhase,
    stalled: bool,
}

impl<'a> DraftSession<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, formation: Formation) -> Self {
        Self {
            config: DraftConfig::new(catalog),
            formation,
            state: DraftState::new(),
            phase: DraftPhase::Drafting,
            stalled: false,
        }
    }

    /// The live battle configuration, including both partial forces.
    #[must_use]
    pub fn config(&self) -> &DraftConfig<'a> {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> DraftState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> &DraftPhase {
        &self.phase
    }

    #[must_use]
    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    #[must_use]
    pub fn current_force(&self) -> &crate::Force {
        self.config.force(self.state.current_player)
    }

    #[must_use]
    pub fn formation(&self) -> Formation {
        self.formation
    }

    /// Slots to fill across both players; also the turn cap.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.formation.total_slots() * PLAYER_COUNT
    }

    /// The distinguished action index meaning "pass".
    #[must_use]
    pub fn pass_action(&self) -> usize {
        self.config.catalog.unit_count()
    }

    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.phase.is_drafting()
    }

    /// Whether the session was terminated defensively by [`Self::force_stall`].
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Applies one selected action for the current player and advances the
    /// turn. Returns what happened to the game state.
    pub fn apply_action(&mut self, action: usize) -> Result<AppliedAction, DraftError> {
        if self.phase.is_complete() {
            return Err(DraftError::DraftComplete);
        }

        let applied = if action == self.pass_action() {
            AppliedAction::Pass
        } else {
            let id = self
                .config
                .catalog
                .id_of_index(action)
                .ok_or(DraftError::UnknownAction {
                    action,
                    unit_count: self.config.catalog.unit_count(),
                })?;
            let player = self.state.current_player;
            let placement = self.config.force_mut(player).draft(id, self.formation);
            AppliedAction::Placed(placement)
        };

        self.state.advance();
        if self.config.filled_slots() >= self.total_slots()
            || self.state.turn_counter >= self.total_slots()
        {
            self.phase = DraftPhase::Complete;
        }
        Ok(applied)
    }

    /// Terminates the draft defensively after a no-eligible-action stall.
    /// The forces keep whatever picks were already applied.
    pub fn force_stall(&mut self) {
        self.stalled = true;
        self.phase = DraftPhase::Complete;
    }

    /// Consumes the session, yielding the final battle configuration.
    #[must_use]
    pub fn into_config(self) -> DraftConfig<'a> {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SkillRef, UnitType};

    fn catalog(count: u32) -> Catalog {
        let units = (1..=count).map(|n| {
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

    const FORMATION: Formation = Formation {
        units: 2,
        reinforcements: 1,
    };

    #[test]
    fn test_players_alternate_from_player_one() {
        assert_eq!(Player::from_pick_index(0), Player::One);
        assert_eq!(Player::from_pick_index(1), Player::Two);
        assert_eq!(Player::from_pick_index(2), Player::One);
        assert_eq!(Player::One.opponent(), Player::Two);
    }

    #[test]
    fn test_session_completes_when_all_slots_filled() {
        let catalog = catalog(4);
        let mut session = DraftSession::new(&catalog, FORMATION);
        assert_eq!(session.total_slots(), 6);

        for turn in 0..6 {
            assert!(session.can_continue(), "turn {turn} should be playable");
            let expected = Player::from_pick_index(turn);
            assert_eq!(session.current_player(), expected);
            session.apply_action(turn % 4).unwrap();
        }

        assert!(session.phase().is_complete());
        assert!(!session.is_stalled());
        let config = session.into_config();
        assert_eq!(config.player1.force.units().len(), 2);
        assert_eq!(config.player1.force.reinforcements().len(), 1);
        assert_eq!(config.player2.force.units().len(), 2);
        assert_eq!(config.player2.force.reinforcements().len(), 1);
    }

    #[test]
    fn test_pass_advances_turn_without_placing() {
        let catalog = catalog(4);
        let mut session = DraftSession::new(&catalog, FORMATION);
        let pass = session.pass_action();
        assert_eq!(pass, 4);

        let applied = session.apply_action(pass).unwrap();
        assert_eq!(applied, AppliedAction::Pass);
        assert_eq!(applied.chosen_id(), None);
        assert_eq!(session.state().turn_counter, 1);
        assert_eq!(session.current_player(), Player::Two);
        assert_eq!(session.config().filled_slots(), 0);
    }

    #[test]
    fn test_turn_cap_terminates_a_stalling_draft() {
        let catalog = catalog(4);
        let mut session = DraftSession::new(&catalog, FORMATION);
        let pass = session.pass_action();

        // Nothing but passes: slots never fill, the counter still stops it.
        for _ in 0..session.total_slots() {
            session.apply_action(pass).unwrap();
        }
        assert!(session.phase().is_complete());
        assert!(matches!(
            session.apply_action(0),
            Err(DraftError::DraftComplete)
        ));
    }

    #[test]
    fn test_out_of_range_action_is_rejected() {
        let catalog = catalog(4);
        let mut session = DraftSession::new(&catalog, FORMATION);
        assert!(matches!(
            session.apply_action(7),
            Err(DraftError::UnknownAction {
                action: 7,
                unit_count: 4
            })
        ));
        // A rejected action must not consume the turn.
        assert_eq!(session.state().turn_counter, 0);
    }

    #[test]
    fn test_force_stall_completes_with_partial_forces() {
        let catalog = catalog(4);
        let mut session = DraftSession::new(&catalog, FORMATION);
        session.apply_action(0).unwrap();
        session.force_stall();

        assert!(session.phase().is_complete());
        assert!(session.is_stalled());
        assert_eq!(session.config().filled_slots(), 1);
    }
}
