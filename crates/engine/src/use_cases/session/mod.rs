//! Session use cases.
//!
//! Routing and activity changes that other systems drive: deciding whether a
//! line of input belongs to the dialogue engine, handing a player to combat,
//! and forgetting a player who disconnected.

use std::sync::Arc;

mod activity;

pub use activity::{BeginCombat, Disconnect, EndCombat, InputOwner, RouteInput};

/// Container for session use cases.
pub struct SessionUseCases {
    pub route_input: Arc<RouteInput>,
    pub begin_combat: Arc<BeginCombat>,
    pub end_combat: Arc<EndCombat>,
    pub disconnect: Arc<Disconnect>,
}

impl SessionUseCases {
    pub fn new(
        route_input: Arc<RouteInput>,
        begin_combat: Arc<BeginCombat>,
        end_combat: Arc<EndCombat>,
        disconnect: Arc<Disconnect>,
    ) -> Self {
        Self {
            route_input,
            begin_combat,
            end_combat,
            disconnect,
        }
    }
}
