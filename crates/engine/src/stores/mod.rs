//! In-memory state storage modules.
//!
//! Stores manage runtime state that is never persisted:
//! - `SessionStore` - per-player activity, including the active event slot

pub mod session;

pub use session::{ActiveEventState, PlayerActivity, SessionStore};
