//! Mudtale Engine library.
//!
//! The dialogue and story event engine of a text MUD.
//!
//! ## Structure
//!
//! - `use_cases/` - Dialogue traversal, session routing, authoring pipeline
//! - `stores/` - Per-player in-memory session state
//! - `infrastructure/` - Collaborator ports, in-memory adapters, configuration
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
