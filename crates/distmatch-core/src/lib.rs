//! DistMatch Core - Distance Matching for Animation Playback
//!
//! This crate contains the core model and algorithms for distance matching:
//! - Float curves and animation sequences
//! - Curve buffers (borrowed views over curve keys)
//! - Distance to time lookup with a cached key
//! - The per-tick playback node that phase-locks playback to motion
//! - Curve diagnostics and logging configuration

#![warn(missing_docs)]

use thiserror::Error;

pub mod config;
pub mod curve;
pub mod curve_buffer;
pub mod diagnostics;
pub mod logging;
pub mod matcher;
pub mod player;

// --- Re-exports grouped by category ---

// Curves & Assets
pub use curve::{
    AnimSequence, CurveSource, FloatCurve, KeySample, TimePoint, DEFAULT_DISTANCE_CURVE_NAME,
};
pub use curve_buffer::CurveBuffer;

// Matching & Playback
pub use config::DistanceMatchingConfig;
pub use matcher::DistanceMatcher;
pub use player::{DistanceMatchingNode, PlaybackState, PoseSample, TickContext};

// Logging & Diagnostics
pub use diagnostics::{check_curve, check_sequence, CurveIssue, IssueSeverity};
pub use logging::LogConfig;

/// Core error types
///
/// None of these abort a tick; the node logs them and falls back to a safe default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The named distance curve does not exist on the asset
    #[error("Can't find the curve by name: {curve} (asset: {asset})")]
    MissingCurve {
        /// Asset that was searched
        asset: String,
        /// Requested curve name
        curve: String,
    },

    /// The curve exists but has no keys
    #[error("Curve {curve} on asset {asset} has no keys")]
    EmptyCurve {
        /// Asset that owns the curve
        asset: String,
        /// Curve name
        curve: String,
    },

    /// No animation asset is bound
    #[error("Sequence is null with name: {curve}")]
    NoAsset {
        /// Requested curve name
        curve: String,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
