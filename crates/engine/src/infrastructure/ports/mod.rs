//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Collaborator data (content store, quest ledger, players, actors, geography)
//! - Clock/Random (for testing)

mod error;
mod repos;
mod testing;

// =============================================================================
// Collaborator Ports
// =============================================================================
pub use repos::{ActorRepo, EventContentRepo, MapNodeRepo, PlayerRepo, QuestLedgerPort};

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{
    MockActorRepo, MockEventContentRepo, MockMapNodeRepo, MockPlayerRepo, MockQuestLedgerPort,
};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
