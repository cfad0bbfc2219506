//! Use cases - player and authoring flows.
//!
//! Each module contains use cases for one area. Use cases orchestrate the
//! collaborator ports and the session store to fulfil a single request.

pub mod authoring;
pub mod dialogue;
pub mod session;

pub use authoring::AuthoringUseCases;
pub use dialogue::DialogueUseCases;
pub use session::SessionUseCases;
