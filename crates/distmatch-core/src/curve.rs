//! Keyframed Float Curves and Animation Sequences
//!
//! Provides the sample storage that the distance matcher searches:
//! named float curves made of `(time, value)` keys, bundled into
//! animation sequences that also carry play length and rate scale.

use serde::{Deserialize, Serialize};

/// Time in seconds
pub type TimePoint = f32;

/// Default curve name authored on locomotion sequences
pub const DEFAULT_DISTANCE_CURVE_NAME: &str = "Distance";

/// A single curve key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeySample {
    /// Time of the key in seconds
    pub time: TimePoint,
    /// Curve value at this key (traveled distance for distance curves)
    pub value: f32,
}

impl KeySample {
    /// Create a new key
    pub const fn new(time: TimePoint, value: f32) -> Self {
        Self { time, value }
    }
}

impl From<(f32, f32)> for KeySample {
    fn from((time, value): (f32, f32)) -> Self {
        Self::new(time, value)
    }
}

/// Named float curve - keys ordered by time
///
/// Values are not required to be monotonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatCurve {
    /// Curve name used for lookups
    pub name: String,
    /// Keys in non-decreasing time order
    pub keys: Vec<KeySample>,
}

impl FloatCurve {
    /// Create an empty curve
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
        }
    }

    /// Create a curve from `(time, value)` pairs, sorting them by time
    pub fn from_pairs<I>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        let mut curve = Self::new(name);
        for pair in pairs {
            curve.add_key(pair.into());
        }
        curve
    }

    /// Insert a key, keeping time order. Keys with equal time keep insertion order.
    pub fn add_key(&mut self, key: KeySample) {
        let index = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(index, key);
    }

    /// Keys in time order
    pub fn keys(&self) -> &[KeySample] {
        &self.keys
    }

    /// Get the time range covered by the keys
    pub fn time_range(&self) -> Option<(TimePoint, TimePoint)> {
        let first = self.keys.first()?.time;
        let last = self.keys.last()?.time;
        Some((first, last))
    }

    /// Evaluate the curve value at a given time (linear, clamped at both ends)
    pub fn evaluate(&self, time: TimePoint) -> f32 {
        let (first, last) = match self.keys.as_slice() {
            [] => return 0.0,
            [only] => return only.value,
            [first, .., last] => (first, last),
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let index = self.keys.partition_point(|k| k.time <= time);
        let before = self.keys[index - 1];
        let after = self.keys[index];
        let span = after.time - before.time;
        if span <= 0.0 {
            return before.value;
        }

        let t = ((time - before.time) / span).clamp(0.0, 1.0);
        before.value + (after.value - before.value) * t
    }
}

/// Anything that can hand out named float curves
pub trait CurveSource {
    /// Name of the source, used in diagnostics
    fn source_name(&self) -> &str;

    /// Find a curve by name
    fn find_curve(&self, name: &str) -> Option<&FloatCurve>;
}

fn default_rate_scale() -> f32 {
    1.0
}

/// Animation sequence asset
///
/// Pose data is owned elsewhere; the sequence only carries what playback
/// and distance matching need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimSequence {
    /// Asset name
    pub name: String,
    /// Play length in seconds
    pub play_length: f32,
    /// Playback rate multiplier (1.0 = normal)
    #[serde(default = "default_rate_scale")]
    pub rate_scale: f32,
    /// Skeleton the sequence was authored for
    #[serde(default)]
    pub skeleton: Option<String>,
    /// Float curves carried by the sequence
    #[serde(default)]
    pub curves: Vec<FloatCurve>,
}

impl AnimSequence {
    /// Create a new sequence without curves
    pub fn new(name: impl Into<String>, play_length: f32) -> Self {
        Self {
            name: name.into(),
            play_length,
            rate_scale: 1.0,
            skeleton: None,
            curves: Vec::new(),
        }
    }

    /// Builder-style curve insertion
    pub fn with_curve(mut self, curve: FloatCurve) -> Self {
        self.add_curve(curve);
        self
    }

    /// Builder-style skeleton assignment
    pub fn with_skeleton(mut self, skeleton: impl Into<String>) -> Self {
        self.skeleton = Some(skeleton.into());
        self
    }

    /// Builder-style rate scale
    pub fn with_rate_scale(mut self, rate_scale: f32) -> Self {
        self.rate_scale = rate_scale;
        self
    }

    /// Add a curve, replacing an existing one with the same name
    pub fn add_curve(&mut self, curve: FloatCurve) {
        match self.curves.iter_mut().find(|c| c.name == curve.name) {
            Some(existing) => *existing = curve,
            None => self.curves.push(curve),
        }
    }

    /// Whether poses from this sequence can be applied to `target`.
    ///
    /// A sequence without a skeleton, or a host without one, is treated as compatible.
    pub fn is_skeleton_compatible(&self, target: Option<&str>) -> bool {
        match (self.skeleton.as_deref(), target) {
            (Some(own), Some(target)) => own == target,
            _ => true,
        }
    }
}

impl CurveSource for AnimSequence {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn find_curve(&self, name: &str) -> Option<&FloatCurve> {
        self.curves.iter().find(|c| c.name == name)
    }
}
