//! Distance matching node configuration

use crate::curve::DEFAULT_DISTANCE_CURVE_NAME;
use serde::{Deserialize, Serialize};

/// Per-node settings
///
/// `distance` is the live input and is expected to be written every tick by
/// whatever drives the character; the rest is authored once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceMatchingConfig {
    /// Name of the distance curve on the sequence
    pub distance_curve_name: String,
    /// Distance value to search for in the curve
    pub distance: f32,
    /// Start searches from the previously found key (requires resetting the node between uses)
    pub cache_enabled: bool,
    /// The last key's value is not repeated by its neighbor
    pub upper_bound_unique: bool,
    /// The first key's value is not repeated by its neighbor
    pub lower_bound_unique: bool,
    /// Continue playing normally once `distance_limit` is reached
    pub distance_limit_enabled: bool,
    /// Distance at which matching stops, see `distance_limit_enabled`
    pub distance_limit: f32,
}

impl Default for DistanceMatchingConfig {
    fn default() -> Self {
        Self {
            distance_curve_name: DEFAULT_DISTANCE_CURVE_NAME.to_string(),
            distance: 0.0,
            cache_enabled: true,
            upper_bound_unique: true,
            lower_bound_unique: true,
            distance_limit_enabled: false,
            distance_limit: 0.0,
        }
    }
}

impl DistanceMatchingConfig {
    /// Create a config for a custom curve name
    pub fn with_curve_name(name: impl Into<String>) -> Self {
        Self {
            distance_curve_name: name.into(),
            ..Default::default()
        }
    }

    /// Whether `distance` has reached the configured limit
    pub fn limit_reached(&self) -> bool {
        self.distance_limit_enabled && self.distance >= self.distance_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DistanceMatchingConfig::default();
        assert_eq!(config.distance_curve_name, "Distance");
        assert_eq!(config.distance, 0.0);
        assert!(config.cache_enabled);
        assert!(config.upper_bound_unique);
        assert!(config.lower_bound_unique);
        assert!(!config.distance_limit_enabled);
        assert_eq!(config.distance_limit, 0.0);
    }

    #[test]
    fn test_limit_reached_requires_enable() {
        let mut config = DistanceMatchingConfig {
            distance: 120.0,
            distance_limit: 100.0,
            ..Default::default()
        };
        assert!(!config.limit_reached());

        config.distance_limit_enabled = true;
        assert!(config.limit_reached());

        config.distance = 99.9;
        assert!(!config.limit_reached());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: DistanceMatchingConfig =
            ron::from_str("(distance_curve_name: \"Dist\", upper_bound_unique: false)").unwrap();

        assert_eq!(config.distance_curve_name, "Dist");
        assert!(!config.upper_bound_unique);
        assert!(config.cache_enabled);
        assert!(config.lower_bound_unique);
    }
}
