//! Authoring pipeline for event content.
//!
//! Authored trees pass through three steps before they reach the content
//! store, and a failure at any step leaves nothing persisted:
//!
//! 1. [`validate_definition`] - structural rules, errors carry the tree path
//! 2. [`resolve_identities`] - every node and choice gets a canonical id
//! 3. `EventDefinition::try_from(draft)` - compile into the typed model

mod compile;
mod draft;
mod identity;
mod validation;

pub use compile::compile_node;
pub use draft::{ChoiceDraft, EventDefinitionDraft, NodeDraft, SkillCheckDraft, WireId};
pub use identity::{resolve_identities, resolve_node_identities, IdentityReport};
pub use validation::{
    validate_definition, validate_node, validate_weighted_events, TreeValidationError,
    ValidationIssue, WeightsError, STORY_EVENT_WEIGHT_TOTAL,
};
