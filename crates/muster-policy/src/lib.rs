//! Drafting policy: state encoding, legality masks, and pick selection.
//!
//! This crate turns partial draft state into the numeric representation the
//! policy model consumes and samples the next pick from the model's output:
//!
//! - [`encoder`] - sequential-fill one-hot encoding of a partial draft
//! - [`mask`] - which catalog units are currently legal picks
//! - [`model`] - the opaque predict/train seam to the function approximator
//! - [`drafter`] - epsilon-greedy probability sampling over masked actions
//!
//! Everything here is a pure function of the draft configuration plus a
//! caller-supplied random source; no component keeps draft-local state.

pub use self::{drafter::*, encoder::*, mask::*, model::*};

pub mod drafter;
pub mod encoder;
pub mod mask;
pub mod model;
