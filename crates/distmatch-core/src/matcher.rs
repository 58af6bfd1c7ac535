//! Distance to Time Lookup
//!
//! Inverts a distance curve: given a traveled distance, find the playback
//! time at which the curve reaches it.
//!
//! Queries usually arrive once per frame with a smoothly changing distance,
//! so the key found last time is kept and the next search starts just after
//! it. The window is only used when the cached key's value is strictly below
//! the query; anything else falls back to a search over the whole curve, so a
//! distance that moved backward is still found.
//!
//! Non-monotonic curves are searched the same way. Results are deterministic
//! and always taken from the curve, but not necessarily meaningful.

use crate::config::DistanceMatchingConfig;
use crate::curve::KeySample;
use crate::curve_buffer::CurveBuffer;
use serde::{Deserialize, Serialize};

/// Inverse curve lookup with a hot-key cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceMatcher {
    /// Start searches after the last found key
    pub cache_enabled: bool,
    /// The first key's value is not repeated by its neighbor
    pub lower_bound_unique: bool,
    /// The last key's value is not repeated by its neighbor
    pub upper_bound_unique: bool,
    /// Floor key of the last lookup
    #[serde(skip)]
    cached_index: usize,
}

impl Default for DistanceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceMatcher {
    /// Create a matcher with caching on and unique bounds
    pub const fn new() -> Self {
        Self {
            cache_enabled: true,
            lower_bound_unique: true,
            upper_bound_unique: true,
            cached_index: 0,
        }
    }

    /// Create a matcher from node settings
    pub fn from_config(config: &DistanceMatchingConfig) -> Self {
        let mut matcher = Self::new();
        matcher.apply_config(config);
        matcher
    }

    /// Copy search flags from node settings, keeping the cached key
    pub fn apply_config(&mut self, config: &DistanceMatchingConfig) {
        self.cache_enabled = config.cache_enabled;
        self.lower_bound_unique = config.lower_bound_unique;
        self.upper_bound_unique = config.upper_bound_unique;
    }

    /// Forget the cached key
    pub fn reset(&mut self) {
        self.cached_index = 0;
    }

    /// Index of the key found by the last lookup
    pub fn cached_index(&self) -> usize {
        self.cached_index
    }

    /// Return the time at which the buffered curve reaches `distance`.
    ///
    /// Empty curves return 0 and single-key curves return that key's time.
    /// A NaN distance resolves to the first key's time.
    /// The result is always a key time or an interpolation between two
    /// adjacent key times; nothing is extrapolated.
    pub fn lookup(&mut self, buffer: &CurveBuffer<'_>, distance: f32) -> f32 {
        let samples = buffer.samples();
        let (first, last) = match samples {
            [] => return 0.0,
            [only] => return only.time,
            [first, .., last] => (*first, *last),
        };
        let last_index = samples.len() - 1;

        // The buffer may have been rebound to a shorter curve without a reset
        self.cached_index = self.cached_index.min(last_index);

        if !self.lower_bound_unique && distance == first.value {
            return first.time;
        }

        if distance >= last.value {
            return self.lookup_tail(samples, distance);
        }

        let start = self.window_start(samples, distance);
        let index = lower_bound(samples, start, distance).max(1);
        self.cached_index = index - 1;

        let floor = samples[index - 1];
        let ceil = samples[index];
        let diff = ceil.value - floor.value;

        let alpha = (distance - floor.value) / diff;
        if diff > 0.0 && alpha.is_finite() {
            lerp(floor.time, ceil.time, alpha.clamp(0.0, 1.0))
        } else {
            floor.time
        }
    }

    /// `distance` is at or past the last key's value
    fn lookup_tail(&mut self, samples: &[KeySample], distance: f32) -> f32 {
        let last_index = samples.len() - 1;

        if self.upper_bound_unique {
            return samples[last_index].time;
        }

        let cached = samples[self.cached_index];
        if self.cache_enabled && distance == cached.value {
            return cached.time;
        }

        match find_leftmost_exact(samples, distance) {
            Some(index) => {
                self.cached_index = index;
                samples[index].time
            }
            None => {
                self.cached_index = last_index;
                samples[last_index].time
            }
        }
    }

    /// First index the interior search may return
    fn window_start(&self, samples: &[KeySample], distance: f32) -> usize {
        if !self.cache_enabled {
            return 1;
        }

        // Only search forward when the query is past the cached key
        if samples[self.cached_index].value < distance {
            (self.cached_index + 1).min(samples.len() - 1)
        } else {
            1
        }
    }
}

/// First index in `[start, len - 1]` whose value is `>= distance`.
///
/// The last key acts as the sentinel and is returned when nothing earlier matches.
fn lower_bound(samples: &[KeySample], start: usize, distance: f32) -> usize {
    let last_index = samples.len() - 1;
    start + samples[start..last_index].partition_point(|s| s.value < distance)
}

/// Binary search for a key equal to `distance` whose predecessor is strictly smaller
fn find_leftmost_exact(samples: &[KeySample], distance: f32) -> Option<usize> {
    let mut lo = 0;
    let mut hi = samples.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let value = samples[mid].value;

        if value == distance && (mid == 0 || samples[mid - 1].value < distance) {
            return Some(mid);
        } else if distance > value {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    None
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(times: &[f32], values: &[f32]) -> Vec<KeySample> {
        times
            .iter()
            .zip(values)
            .map(|(&time, &value)| KeySample::new(time, value))
            .collect()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_empty_curve_returns_zero() {
        let mut matcher = DistanceMatcher::new();
        let buffer = CurveBuffer::empty();

        for distance in [-10.0, 0.0, 3.5, f32::MAX] {
            assert_eq!(matcher.lookup(&buffer, distance), 0.0);
        }
    }

    #[test]
    fn test_single_key_returns_its_time() {
        let samples = keys(&[0.75], &[12.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();

        for distance in [-1.0, 12.0, 100.0] {
            assert_eq!(matcher.lookup(&buffer, distance), 0.75);
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let samples = keys(&[0.0, 2.0], &[0.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();

        assert!(approx(matcher.lookup(&buffer, 5.0), 1.0));
    }

    #[test]
    fn test_leftmost_of_duplicate_run() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 5.0, 5.0, 5.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();

        assert!(approx(matcher.lookup(&buffer, 5.0), 1.0));
    }

    #[test]
    fn test_flat_segment_picks_first_match() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0], &[0.0, 5.0, 5.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();

        assert!(approx(matcher.lookup(&buffer, 5.0), 1.0));
        // Past the flat run, interpolate on the next rising segment
        let t = matcher.lookup(&buffer, 7.5);
        assert!(t.is_finite());
        assert!(approx(t, 2.5));
    }

    #[test]
    fn test_flat_start_returns_floor_time() {
        let samples = keys(&[0.0, 1.0, 2.0], &[5.0, 5.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();

        assert_eq!(matcher.lookup(&buffer, 3.0), 0.0);
    }

    #[test]
    fn test_inverted_segment_returns_floor_time() {
        let samples = keys(&[0.0, 1.0, 2.0], &[4.0, 2.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();
        matcher.cache_enabled = false;

        // Lower bound for 1.0 is key 1, which sits below key 0
        assert_eq!(matcher.lookup(&buffer, 1.0), 0.0);
        // Lower bound for 3.0 is key 2, interpolated from key 1
        assert!(approx(matcher.lookup(&buffer, 3.0), 1.125));
    }

    #[test]
    fn test_non_monotonic_curve_is_deterministic() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 10.0, 2.0, 8.0, 20.0]);
        let buffer = CurveBuffer::from_samples(&samples);

        for distance in [-3.0, 0.0, 1.0, 5.0, 9.0, 10.0, 15.0, 20.0, 25.0] {
            let mut a = DistanceMatcher::new();
            let mut b = DistanceMatcher::new();
            let ta = a.lookup(&buffer, distance);
            let tb = b.lookup(&buffer, distance);
            assert_eq!(ta.to_bits(), tb.to_bits());
            assert!((0.0..=4.0).contains(&ta));
        }
    }

    #[test]
    fn test_upper_bound_unique_returns_last_time() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0], &[0.0, 5.0, 10.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();

        assert_eq!(matcher.lookup(&buffer, 10.0), 3.0);
        assert_eq!(matcher.lookup(&buffer, 50.0), 3.0);
    }

    #[test]
    fn test_upper_bound_non_unique_with_cache() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0], &[0.0, 5.0, 10.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();
        matcher.upper_bound_unique = false;

        assert_eq!(matcher.lookup(&buffer, 10.0), 2.0);
        assert_eq!(matcher.cached_index(), 2);
        assert_eq!(matcher.lookup(&buffer, 10.0), 2.0);
        assert_eq!(matcher.cached_index(), 2);
    }

    #[test]
    fn test_upper_bound_non_unique_without_cache() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0], &[0.0, 5.0, 10.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();
        matcher.upper_bound_unique = false;
        matcher.cache_enabled = false;

        assert_eq!(matcher.lookup(&buffer, 10.0), 2.0);
        assert_eq!(matcher.lookup(&buffer, 10.0), 2.0);
    }

    #[test]
    fn test_beyond_last_without_exact_match_clamps_to_tail() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0], &[0.0, 5.0, 10.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();
        matcher.upper_bound_unique = false;

        assert_eq!(matcher.lookup(&buffer, 12.0), 3.0);
        assert_eq!(matcher.cached_index(), 3);
    }

    #[test]
    fn test_lower_bound_non_unique_returns_first_time() {
        // Standing still at the start of a start-to-walk animation
        let samples = keys(&[0.0, 0.5, 1.0, 2.0], &[0.0, 0.0, 0.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();
        matcher.lower_bound_unique = false;

        assert_eq!(matcher.lookup(&buffer, 0.0), 0.0);
    }

    #[test]
    fn test_below_first_key_does_not_extrapolate() {
        let samples = keys(&[0.5, 1.5], &[10.0, 20.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();

        assert_eq!(matcher.lookup(&buffer, -100.0), 0.5);
        assert_eq!(matcher.lookup(&buffer, f32::NEG_INFINITY), 0.5);
    }

    #[test]
    fn test_nan_distance_returns_key_time() {
        let samples = keys(&[0.5, 1.0, 1.5], &[10.0, 20.0, 30.0]);
        let buffer = CurveBuffer::from_samples(&samples);

        for cache_enabled in [true, false] {
            let mut matcher = DistanceMatcher::new();
            matcher.cache_enabled = cache_enabled;
            matcher.lookup(&buffer, 25.0);

            assert_eq!(matcher.lookup(&buffer, f32::NAN), 0.5);
            assert!(matcher.cached_index() < samples.len());
        }
    }

    #[test]
    fn test_backward_query_falls_back_to_full_search() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 10.0, 20.0, 30.0, 40.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();

        assert!(approx(matcher.lookup(&buffer, 35.0), 3.5));
        assert_eq!(matcher.cached_index(), 3);

        assert!(approx(matcher.lookup(&buffer, 5.0), 0.5));
        assert_eq!(matcher.cached_index(), 0);
    }

    #[test]
    fn test_cache_at_last_key_does_not_overrun() {
        let samples = keys(&[0.0, 1.0, 2.0, 3.0], &[0.0, 5.0, 10.0, 10.0]);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();
        matcher.upper_bound_unique = false;

        matcher.lookup(&buffer, 12.0);
        assert_eq!(matcher.cached_index(), 3);

        assert!(approx(matcher.lookup(&buffer, 7.5), 1.5));
    }

    #[test]
    fn test_stale_cache_is_clamped_to_new_curve() {
        let long = keys(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 1.0, 2.0, 3.0, 4.0]);
        let short = keys(&[0.0, 1.0], &[0.0, 1.0]);
        let mut matcher = DistanceMatcher::new();

        matcher.lookup(&CurveBuffer::from_samples(&long), 3.5);
        assert_eq!(matcher.cached_index(), 3);

        let t = matcher.lookup(&CurveBuffer::from_samples(&short), 0.5);
        assert!(approx(t, 0.5));
        assert!(matcher.cached_index() < short.len());
    }

    #[test]
    fn test_cached_and_uncached_agree_on_forward_sweep() {
        let samples = keys(
            &[0.0, 0.25, 0.5, 0.75, 1.0, 1.25],
            &[0.0, 3.0, 3.0, 9.0, 20.0, 21.0],
        );
        let buffer = CurveBuffer::from_samples(&samples);
        let mut cached = DistanceMatcher::new();
        let mut uncached = DistanceMatcher::new();
        uncached.cache_enabled = false;

        let mut distance = -1.0;
        while distance < 22.0 {
            let a = cached.lookup(&buffer, distance);
            let b = uncached.lookup(&buffer, distance);
            assert!(approx(a, b), "distance {distance}: {a} != {b}");
            distance += 0.37;
        }
    }

    #[test]
    fn test_from_config_copies_flags() {
        let config = DistanceMatchingConfig {
            cache_enabled: false,
            upper_bound_unique: false,
            ..Default::default()
        };
        let matcher = DistanceMatcher::from_config(&config);

        assert!(!matcher.cache_enabled);
        assert!(!matcher.upper_bound_unique);
        assert!(matcher.lower_bound_unique);
        assert_eq!(matcher.cached_index(), 0);
    }
}
