use distmatch_core::{CurveBuffer, DistanceMatcher, FloatCurve, KeySample};
use proptest::prelude::*;

/// Strictly increasing in time and value
fn rising_curve() -> impl Strategy<Value = Vec<KeySample>> {
    prop::collection::vec((0.01f32..1.0, 0.1f32..10.0), 2..40).prop_map(|steps| {
        let mut time = 0.0;
        let mut value = 0.0;
        steps
            .into_iter()
            .enumerate()
            .map(|(idx, (dt, dv))| {
                if idx > 0 {
                    time += dt;
                    value += dv;
                }
                KeySample::new(time, value)
            })
            .collect()
    })
}

/// Non-decreasing values, with flat runs
fn plateau_curve() -> impl Strategy<Value = Vec<KeySample>> {
    let step = prop_oneof![Just(0.0f32), 0.1f32..10.0];
    prop::collection::vec((0.01f32..1.0, step), 2..40).prop_map(|steps| {
        let mut time = 0.0;
        let mut value = 0.0;
        steps
            .into_iter()
            .enumerate()
            .map(|(idx, (dt, dv))| {
                if idx > 0 {
                    time += dt;
                    value += dv;
                }
                KeySample::new(time, value)
            })
            .collect()
    })
}

/// Sorted times, arbitrary values
fn wild_curve() -> impl Strategy<Value = Vec<KeySample>> {
    prop::collection::vec((0.0f32..1.0, -100.0f32..100.0), 0..40).prop_map(|steps| {
        let mut time = 0.0;
        steps
            .into_iter()
            .map(|(dt, value)| {
                time += dt;
                KeySample::new(time, value)
            })
            .collect()
    })
}

fn matcher_flags() -> impl Strategy<Value = DistanceMatcher> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(cache, lower, upper)| {
        let mut matcher = DistanceMatcher::new();
        matcher.cache_enabled = cache;
        matcher.lower_bound_unique = lower;
        matcher.upper_bound_unique = upper;
        matcher
    })
}

fn value_span(samples: &[KeySample]) -> (f32, f32) {
    (samples[0].value, samples[samples.len() - 1].value)
}

proptest! {
    #[test]
    fn lookup_stays_inside_key_times(
        samples in wild_curve(),
        mut matcher in matcher_flags(),
        queries in prop::collection::vec(-150.0f32..150.0, 1..50),
    ) {
        let buffer = CurveBuffer::from_samples(&samples);
        for distance in queries {
            let time = matcher.lookup(&buffer, distance);
            match samples.as_slice() {
                [] => prop_assert_eq!(time, 0.0),
                [first, .., last] => {
                    prop_assert!(time.is_finite());
                    prop_assert!(time >= first.time - 1e-4 && time <= last.time + 1e-4,
                        "time {} outside [{}, {}]", time, first.time, last.time);
                    prop_assert!(matcher.cached_index() < samples.len());
                }
                [only] => prop_assert_eq!(time, only.time),
            }
        }
    }

    #[test]
    fn lookup_is_non_decreasing_on_forward_sweep(
        samples in plateau_curve(),
        fractions in prop::collection::vec(0.0f32..=1.0, 1..60),
    ) {
        let (lo, hi) = value_span(&samples);
        let mut distances: Vec<f32> = fractions.iter().map(|f| lo + (hi - lo) * f).collect();
        distances.sort_by(|a, b| a.total_cmp(b));

        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();
        let mut previous = f32::NEG_INFINITY;

        for distance in distances {
            let time = matcher.lookup(&buffer, distance);
            prop_assert!(time >= previous - 1e-5, "{} after {} at distance {}", time, previous, distance);
            previous = time;
        }
    }

    #[test]
    fn cached_matches_full_search_in_any_order(
        samples in plateau_curve(),
        lower_bound_unique in any::<bool>(),
        fractions in prop::collection::vec(-0.2f32..=1.2, 1..60),
    ) {
        let (lo, hi) = value_span(&samples);
        let buffer = CurveBuffer::from_samples(&samples);

        let mut cached = DistanceMatcher::new();
        cached.lower_bound_unique = lower_bound_unique;
        let mut full = cached;
        full.cache_enabled = false;

        for fraction in fractions {
            let distance = lo + (hi - lo) * fraction;
            let a = cached.lookup(&buffer, distance);
            let b = full.lookup(&buffer, distance);
            prop_assert_eq!(a.to_bits(), b.to_bits(), "distance {}", distance);
        }
    }

    #[test]
    fn repeated_lookup_is_idempotent(
        samples in plateau_curve(),
        upper_bound_unique in any::<bool>(),
        fractions in prop::collection::vec(-0.2f32..=1.2, 1..30),
    ) {
        let (lo, hi) = value_span(&samples);
        let buffer = CurveBuffer::from_samples(&samples);
        let mut matcher = DistanceMatcher::new();
        matcher.upper_bound_unique = upper_bound_unique;

        for fraction in fractions {
            let distance = lo + (hi - lo) * fraction;
            let first = matcher.lookup(&buffer, distance);
            let second = matcher.lookup(&buffer, distance);
            prop_assert_eq!(first.to_bits(), second.to_bits(), "distance {}", distance);
        }
    }

    #[test]
    fn lookup_inverts_curve_evaluation(
        samples in rising_curve(),
        fractions in prop::collection::vec(0.0f32..=1.0, 1..30),
    ) {
        let curve = FloatCurve { name: "Distance".to_string(), keys: samples };
        let (start, end) = curve.time_range().unwrap();
        let buffer = CurveBuffer::from_samples(curve.keys());
        let mut matcher = DistanceMatcher::new();

        for fraction in fractions {
            let time = start + (end - start) * fraction;
            let found = matcher.lookup(&buffer, curve.evaluate(time));
            prop_assert!((found - time).abs() < 1e-2, "looked up {} for {}", found, time);
        }
    }
}

#[test]
fn duplicate_run_prefers_first_key() {
    let samples: Vec<KeySample> = [(0.0, 0.0), (1.0, 5.0), (2.0, 5.0), (3.0, 5.0), (4.0, 10.0)]
        .into_iter()
        .map(KeySample::from)
        .collect();
    let buffer = CurveBuffer::from_samples(&samples);

    for cache_enabled in [true, false] {
        let mut matcher = DistanceMatcher::new();
        matcher.cache_enabled = cache_enabled;
        assert_eq!(matcher.lookup(&buffer, 5.0), 1.0);
    }
}
