//! Self-play training loop for the drafting policy.
//!
//! # How Training Works
//!
//! 1. **Episode** - Two drafters sharing one policy model play a full draft
//!    against each other ([`DrafterTrainer::run_episode`])
//! 2. **Resolution** - The finished configuration goes to the battle
//!    resolver, producing a winner (or a draw)
//! 3. **Reward backfill** - Every recorded decision receives the terminal
//!    reward of the player who made it: +1 win, -1 loss, 0 draw
//! 4. **Replay** - The episode's examples join a bounded replay memory
//! 5. **Update** - Batches sampled with replacement drive policy updates
//!    ([`DrafterTrainer::train_network`])
//! 6. **Repeat** - [`ExecutionEngine::train`] runs the outer loop with a
//!    decaying exploration rate
//!
//! # Architecture
//!
//! ```text
//! ExecutionEngine (outer control loop, epsilon schedule)
//!     ↓ drives
//! DrafterTrainer (episodes, reward backfill, batched updates)
//!     ↓ records into
//! ReplayMemory (bounded, oldest half evicted)
//!     ↓ sampled into
//! PolicyModel::train_step (muster-policy seam)
//! ```
//!
//! Execution is single-threaded and cooperative: one episode runs to full
//! completion - including its terminal battle resolution - before anything
//! is recorded or trained, and before the next episode starts. Examples
//! from a failed episode are discarded, never committed.

pub use self::{engine::*, replay::*, trainer::*};

pub mod engine;
pub mod replay;
pub mod trainer;
