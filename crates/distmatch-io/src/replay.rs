//! Scenario replay
//!
//! Drives a node through a scenario's recorded ticks the way a host would:
//! bind, initialize, then per tick write the distance, update and record.

use crate::error::{IoError, Result};
use crate::scenario::Scenario;
use distmatch_core::{AnimSequence, DistanceMatchingNode, PlaybackState, TickContext};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What the node reported after one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Zero-based tick index
    pub tick: usize,
    /// Distance input of this tick
    pub distance: f32,
    /// Bound sequence after the tick
    pub asset: Option<String>,
    /// State after the tick
    pub state: PlaybackState,
    /// Playback time after the tick
    pub time: f32,
}

fn resolve<'a>(scenario: &'a Scenario, name: &str) -> Result<&'a AnimSequence> {
    scenario
        .find_sequence(name)
        .ok_or_else(|| IoError::UnknownSequence(name.to_string()))
}

/// Replay every tick of `scenario`
pub fn replay(scenario: &Scenario) -> Result<Vec<TickRecord>> {
    let mut node = DistanceMatchingNode::new(scenario.node.clone());
    if let Some(name) = &scenario.sequence {
        node.override_asset(Some(resolve(scenario, name)?));
    }
    node.initialize();

    info!(
        "Replaying '{}' ({} ticks)",
        scenario.name,
        scenario.ticks.len()
    );

    let mut records = Vec::with_capacity(scenario.ticks.len());
    for (tick, input) in scenario.ticks.iter().enumerate() {
        if let Some(name) = &input.switch_to {
            debug!("Tick {}: switching to {}", tick, name);
            node.override_asset(Some(resolve(scenario, name)?));
        }
        if input.reinitialize {
            node.initialize();
        }

        let skeleton_compatible = node
            .anim_asset()
            .map_or(true, |s| s.is_skeleton_compatible(scenario.host_skeleton.as_deref()));
        let ctx = TickContext::new(input.delta_time)
            .with_feature_enabled(input.feature_enabled)
            .with_skeleton_compatible(skeleton_compatible);

        node.set_distance(input.distance);
        node.update_asset_player(&ctx);

        records.push(TickRecord {
            tick,
            distance: input.distance,
            asset: node.anim_asset().map(|s| s.name.clone()),
            state: node.state(),
            time: node.current_asset_time(),
        });
    }

    Ok(records)
}
