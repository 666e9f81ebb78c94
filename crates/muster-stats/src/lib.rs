//! Statistical summaries for training telemetry.
//!
//! Training runs produce series of scalars - per-step losses, per-episode
//! rewards, pick counts - and the CLI wants a compact summary of each at
//! the end of a run. [`descriptive`] provides the usual measures.
//!
//! ```
//! use muster_stats::descriptive::DescriptiveStats;
//!
//! let losses = [0.9, 0.7, 0.4, 0.3, 0.2];
//! let stats = DescriptiveStats::new(losses).unwrap();
//! assert_eq!(stats.min, 0.2);
//! assert_eq!(stats.max, 0.9);
//! assert_eq!(stats.median, 0.4);
//! ```

pub mod descriptive;
