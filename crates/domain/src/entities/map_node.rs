//! Geography nodes as far as story events are concerned.

use serde::{Deserialize, Serialize};

use crate::{EventId, MapNodeId, NodeAddress};

/// A story event offered on arrival at a map node, with its share of the roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedEvent {
    pub event_id: EventId,
    /// Percentage weight; the weights of one node sum to 100
    pub weight: u32,
}

impl WeightedEvent {
    pub fn new(event_id: EventId, weight: u32) -> Self {
        Self { event_id, weight }
    }
}

/// A location in the world graph that can host arrival story events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapNode {
    pub id: MapNodeId,
    pub address: NodeAddress,
    #[serde(default)]
    pub story_events: Vec<WeightedEvent>,
}

impl MapNode {
    pub fn new(address: NodeAddress) -> Self {
        Self {
            id: MapNodeId::new(),
            address,
            story_events: Vec::new(),
        }
    }

    pub fn with_story_event(mut self, event: WeightedEvent) -> Self {
        self.story_events.push(event);
        self
    }

    /// Pick the alternative whose cumulative weight covers `roll` (1-based).
    ///
    /// Returns None when the list is empty or the roll exceeds the total.
    pub fn pick_story_event(&self, roll: u32) -> Option<EventId> {
        let mut cumulative = 0u32;
        for candidate in &self.story_events {
            cumulative = cumulative.saturating_add(candidate.weight);
            if roll <= cumulative {
                return Some(candidate.event_id);
            }
        }
        None
    }
}
