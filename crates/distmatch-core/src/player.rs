//! Distance Matching Playback Node
//!
//! Plays an animation sequence whose time is driven by a traveled distance
//! instead of the wall clock. Each tick the node looks up the time at which
//! the sequence's distance curve reaches the current distance and either
//! snaps playback forward to it or keeps advancing normally.
//!
//! Host lifecycle: `initialize` once per (re)bind, then per tick
//! `update_asset_player` followed by `evaluate`.

use crate::config::DistanceMatchingConfig;
use crate::curve::AnimSequence;
use crate::curve_buffer::CurveBuffer;
use crate::matcher::DistanceMatcher;
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, trace, warn};

/// What the node did on its last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Ordinary elapsed-time playback
    #[default]
    NormalAdvance,
    /// Time driven by the distance curve
    Matched,
    /// Distance limit reached; plays normally until reset
    LimitHold,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::NormalAdvance => "normal",
            PlaybackState::Matched => "matched",
            PlaybackState::LimitHold => "limit-hold",
        };
        f.write_str(name)
    }
}

/// Per-tick input from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Seconds since the previous tick
    pub delta_time: f32,
    /// Runtime switch for the whole feature; off means ordinary playback
    pub feature_enabled: bool,
    /// Whether the bound sequence can drive the host skeleton
    pub skeleton_compatible: bool,
}

impl TickContext {
    /// Enabled tick with a compatible skeleton
    pub const fn new(delta_time: f32) -> Self {
        Self {
            delta_time,
            feature_enabled: true,
            skeleton_compatible: true,
        }
    }

    /// Builder-style feature switch
    pub const fn with_feature_enabled(mut self, enabled: bool) -> Self {
        self.feature_enabled = enabled;
        self
    }

    /// Builder-style skeleton compatibility
    pub const fn with_skeleton_compatible(mut self, compatible: bool) -> Self {
        self.skeleton_compatible = compatible;
        self
    }
}

impl Default for TickContext {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// What pose evaluation should sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseSample<'a> {
    /// Sample `sequence` at `time`
    Sequence {
        /// Sequence to sample
        sequence: &'a AnimSequence,
        /// Playback time in seconds
        time: f32,
    },
    /// No usable asset; use the reference pose
    ReferencePose,
}

/// Asset player that phase-locks a sequence to a distance value
///
/// Sequences are borrowed from the host, which must keep them alive for as
/// long as they are bound.
#[derive(Debug, Clone)]
pub struct DistanceMatchingNode<'a> {
    /// Node settings; `config.distance` is written by the driver every tick
    pub config: DistanceMatchingConfig,
    sequence: Option<&'a AnimSequence>,
    prev_sequence: Option<&'a AnimSequence>,
    built_curve_name: Option<String>,
    buffer: CurveBuffer<'a>,
    matcher: DistanceMatcher,
    accumulated_time: f32,
    state: PlaybackState,
    limit_latched: bool,
}

impl Default for DistanceMatchingNode<'_> {
    fn default() -> Self {
        Self::new(DistanceMatchingConfig::default())
    }
}

impl<'a> DistanceMatchingNode<'a> {
    /// Create a node without a sequence
    pub fn new(config: DistanceMatchingConfig) -> Self {
        Self {
            matcher: DistanceMatcher::from_config(&config),
            config,
            sequence: None,
            prev_sequence: None,
            built_curve_name: None,
            buffer: CurveBuffer::empty(),
            accumulated_time: 0.0,
            state: PlaybackState::NormalAdvance,
            limit_latched: false,
        }
    }

    /// Builder-style sequence binding
    pub fn with_sequence(mut self, sequence: &'a AnimSequence) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Bind a different sequence. Takes effect on the next initialize or tick.
    pub fn override_asset(&mut self, sequence: Option<&'a AnimSequence>) {
        self.sequence = sequence;
    }

    /// Currently bound sequence
    pub fn anim_asset(&self) -> Option<&'a AnimSequence> {
        self.sequence
    }

    /// Set the distance input for the next tick
    pub fn set_distance(&mut self, distance: f32) {
        self.config.distance = distance;
    }

    /// Current playback time in seconds
    pub fn current_asset_time(&self) -> f32 {
        self.accumulated_time
    }

    /// Play length of the bound sequence, 0 without one
    pub fn current_asset_length(&self) -> f32 {
        self.sequence.map_or(0.0, |s| s.play_length)
    }

    /// What the last tick did
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Curve view used for lookups
    pub fn curve_buffer(&self) -> &CurveBuffer<'a> {
        &self.buffer
    }

    /// Lookup state, including the cached key
    pub fn matcher(&self) -> &DistanceMatcher {
        &self.matcher
    }

    /// Reset playback and rebuild the curve buffer if the sequence changed
    pub fn initialize(&mut self) {
        if self.sequence.is_none() || self.needs_rebuild() {
            self.prev_sequence = self.sequence;
            self.update_curve_buffer();
        }
        self.reset_playback();
    }

    /// Advance playback by one tick
    pub fn update_asset_player(&mut self, ctx: &TickContext) {
        if self.needs_rebuild() {
            self.prev_sequence = self.sequence;
            self.update_curve_buffer();
            self.reset_playback();
        }
        self.matcher.apply_config(&self.config);

        let Some(sequence) = self.sequence else {
            self.accumulated_time = 0.0;
            self.transition(PlaybackState::NormalAdvance);
            return;
        };

        if !ctx.skeleton_compatible || !ctx.feature_enabled || !self.buffer.is_bound() {
            self.play_sequence(sequence, ctx);
            self.transition(PlaybackState::NormalAdvance);
        } else if self.config.limit_reached()
            || (self.limit_latched && self.config.distance_limit_enabled)
        {
            self.limit_latched = true;
            self.hold_past_limit(sequence, ctx);
            self.transition(PlaybackState::LimitHold);
        } else {
            self.match_distance(sequence, ctx);
            self.transition(PlaybackState::Matched);
        }

        trace!(
            name = %sequence.name,
            distance = self.config.distance,
            time = self.accumulated_time,
            state = %self.state,
            "distance matching tick"
        );
    }

    /// What pose evaluation should sample after this tick
    pub fn evaluate(&self, skeleton_compatible: bool) -> PoseSample<'a> {
        match self.sequence {
            Some(sequence) if skeleton_compatible => PoseSample::Sequence {
                sequence,
                time: self.accumulated_time,
            },
            _ => PoseSample::ReferencePose,
        }
    }

    /// One-line summary for debug overlays
    pub fn gather_debug_data(&self, node_name: &str) -> String {
        let asset = self.sequence.map_or("None", |s| s.name.as_str());
        format!(
            "{}('{}' Distance: {:.3}, Time: {:.3})",
            node_name, asset, self.config.distance, self.accumulated_time
        )
    }

    fn needs_rebuild(&self) -> bool {
        let same_sequence = match (self.sequence, self.prev_sequence) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        !same_sequence || self.built_curve_name.as_deref() != Some(&self.config.distance_curve_name)
    }

    fn update_curve_buffer(&mut self) {
        let curve_name = self.config.distance_curve_name.clone();

        match self.buffer.rebuild(self.sequence, &curve_name) {
            Ok(()) => debug!(
                "Bound curve {} with {} keys",
                curve_name,
                self.buffer.len()
            ),
            Err(err @ CoreError::EmptyCurve { .. }) => warn!("{}", err),
            Err(err) => error!("{}", err),
        }

        self.built_curve_name = Some(curve_name);
    }

    fn reset_playback(&mut self) {
        self.accumulated_time = 0.0;
        self.matcher.reset();
        self.state = PlaybackState::NormalAdvance;
        self.limit_latched = false;
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            debug!("Distance matching state {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// Ordinary playback: advance by elapsed time, no looping
    fn play_sequence(&mut self, sequence: &AnimSequence, ctx: &TickContext) {
        let advanced = self.accumulated_time + ctx.delta_time * sequence.rate_scale;
        self.accumulated_time = clamp_time(advanced, sequence.play_length);
    }

    fn hold_past_limit(&mut self, sequence: &AnimSequence, ctx: &TickContext) {
        if self.accumulated_time == 0.0 {
            let seed = self.matcher.lookup(&self.buffer, self.config.distance);
            self.accumulated_time = clamp_time(seed, sequence.play_length);
        }
        self.play_sequence(sequence, ctx);
    }

    fn match_distance(&mut self, sequence: &AnimSequence, ctx: &TickContext) {
        let target = clamp_time(
            self.matcher.lookup(&self.buffer, self.config.distance),
            sequence.play_length,
        );

        // Matched time only pulls playback forward
        let current = if target > self.accumulated_time {
            target
        } else {
            self.accumulated_time + ctx.delta_time * sequence.rate_scale
        };

        self.accumulated_time = clamp_time(current, sequence.play_length);
    }
}

fn clamp_time(time: f32, play_length: f32) -> f32 {
    time.clamp(0.0, play_length.max(0.0))
}
