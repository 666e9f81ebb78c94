use muster_engine::DraftConfig;

/// Fixed-length numeric representation of a partial draft.
pub type StateVector = Vec<f32>;

/// Encodes a partial draft configuration into a fixed-length vector.
///
/// The picks already made are read in a fixed order - player 1 units,
/// player 1 reinforcements, player 2 units, player 2 reinforcements - and
/// the i-th pick in that concatenation one-hot encodes its catalog index
/// into the block `[i * unit_count, (i + 1) * unit_count)`. Blocks beyond
/// the picks made so far stay all-zero.
///
/// This is a *sequential-fill* encoding: a pick's block is determined by how
/// many picks precede it, not by which physical slot it occupies, so the
/// same slot lands at different vector positions in different drafts. That
/// positional behavior is relied on by the trained model and must not be
/// replaced with a per-slot layout.
///
/// `state_size` must be `unit_count * total_slots * 2`
/// ([`muster_engine::Formation::state_size`]); the caller is responsible
/// for supplying that exact size, and construction-time validation upstream
/// rejects inconsistent sizes before any episode runs. Picks whose block
/// would not fit are ignored rather than written out of bounds.
#[must_use]
pub fn encode_state(config: &DraftConfig<'_>, state_size: usize) -> StateVector {
    let unit_count = config.catalog.unit_count();
    let mut state = vec![0.0; state_size];
    for (pick, id) in config.all_picks().enumerate() {
        if let Some(unit_index) = config.catalog.index_of_id(id) {
            let position = pick * unit_count + unit_index;
            if position < state.len() {
                state[position] = 1.0;
            }
        }
    }
    state
}
