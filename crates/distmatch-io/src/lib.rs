//! DistMatch I/O - Scenario Files and Replay
//!
//! Scenarios bundle sequences, node settings and a recorded stream of
//! per-tick inputs, stored as RON or JSON. Replaying one drives a
//! [`distmatch_core::DistanceMatchingNode`] tick by tick and records what it did.

#![warn(missing_docs)]

pub mod error;
pub mod replay;
pub mod scenario;

pub use error::{IoError, Result};
pub use replay::{replay, TickRecord};
pub use scenario::{DriveTick, Scenario, MAX_SCENARIO_FILE_SIZE, SCENARIO_FILE_VERSION};
