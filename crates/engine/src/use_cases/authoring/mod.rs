//! Authoring use cases.
//!
//! Authored content reaches the content store only through [`PersistEvent`],
//! which runs the full pipeline: validate, resolve identities, compile, save.
//! A failure at any step leaves the store untouched.

use std::sync::Arc;

use mudtale_domain::authoring::{
    resolve_identities, validate_definition, validate_weighted_events, EventDefinitionDraft,
    TreeValidationError, WeightsError,
};
use mudtale_domain::{EventDefinition, WeightedEvent};

use crate::infrastructure::ports::{EventContentRepo, RandomPort, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum AuthoringError {
    #[error("Invalid event tree at {0}")]
    InvalidTree(#[from] TreeValidationError),
    #[error("Invalid story event weights: {0}")]
    InvalidWeights(#[from] WeightsError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Validate, identify, compile and store an authored event.
pub struct PersistEvent {
    content: Arc<dyn EventContentRepo>,
    random: Arc<dyn RandomPort>,
}

impl PersistEvent {
    pub fn new(content: Arc<dyn EventContentRepo>, random: Arc<dyn RandomPort>) -> Self {
        Self { content, random }
    }

    pub async fn execute(
        &self,
        mut draft: EventDefinitionDraft,
    ) -> Result<EventDefinition, AuthoringError> {
        // 1. Structural rules
        validate_definition(&draft)?;

        // 2. Identities
        let report = resolve_identities(&mut draft, || self.random.gen_uuid());
        if !report.is_noop() {
            tracing::debug!(
                title = %draft.title,
                generated = report.generated,
                normalized = report.normalized,
                "Resolved event identities"
            );
        }

        // 3. Typed model
        let definition = EventDefinition::try_from(draft)?;

        // 4. Store
        self.content.save(&definition).await?;
        tracing::info!(
            event_id = %definition.id,
            title = %definition.title,
            "Event persisted"
        );
        Ok(definition)
    }
}

/// Check a map node's weighted story events before they are published.
#[derive(Debug, Default)]
pub struct ValidateStoryWeights;

impl ValidateStoryWeights {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, events: &[WeightedEvent]) -> Result<(), AuthoringError> {
        validate_weighted_events(events)?;
        Ok(())
    }
}

/// Container for authoring use cases.
pub struct AuthoringUseCases {
    pub persist_event: Arc<PersistEvent>,
    pub validate_story_weights: Arc<ValidateStoryWeights>,
}

impl AuthoringUseCases {
    pub fn new(
        persist_event: Arc<PersistEvent>,
        validate_story_weights: Arc<ValidateStoryWeights>,
    ) -> Self {
        Self {
            persist_event,
            validate_story_weights,
        }
    }
}
