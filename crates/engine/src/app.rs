//! Application state and composition.

use std::sync::Arc;

use mudtale_domain::authoring::EventDefinitionDraft;
use mudtale_domain::{ActorId, EventDefinition, MobId, NodeAddress, PlayerId, WeightedEvent};

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::EngineConfig,
    memory::{ContentBundle, InMemoryWorld},
    ports::{
        ActorRepo, ClockPort, EventContentRepo, MapNodeRepo, PlayerRepo, QuestLedgerPort,
        RandomPort,
    },
};
use crate::stores::SessionStore;
use crate::use_cases;
use crate::use_cases::authoring::{AuthoringError, PersistEvent, ValidateStoryWeights};
use crate::use_cases::dialogue::{
    ChoiceFilter, DialogueError, DialoguePorts, DialogueResponse, EnterDialogue, EntryOutcome,
    RestrictionRegistry, SkillCheckResolver, SubmitChoice,
};
use crate::use_cases::session::{BeginCombat, Disconnect, EndCombat, RouteInput};

/// Main application state.
///
/// Holds the collaborator ports, the session store and all use cases. The
/// methods on `App` are the engine's inbound interface.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub sessions: Arc<SessionStore>,
    pub config: EngineConfig,
}

/// Container for the collaborator ports.
#[derive(Clone)]
pub struct Repositories {
    pub content: Arc<dyn EventContentRepo>,
    pub quests: Arc<dyn QuestLedgerPort>,
    pub players: Arc<dyn PlayerRepo>,
    pub actors: Arc<dyn ActorRepo>,
    pub map_nodes: Arc<dyn MapNodeRepo>,
}

impl Repositories {
    pub fn in_memory(world: &InMemoryWorld) -> Self {
        Self {
            content: world.content.clone(),
            quests: world.quests.clone(),
            players: world.players.clone(),
            actors: world.actors.clone(),
            map_nodes: world.map_nodes.clone(),
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub dialogue: use_cases::DialogueUseCases,
    pub session: use_cases::SessionUseCases,
    pub authoring: use_cases::AuthoringUseCases,
}

/// What loading a content bundle accepted and rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub actors: usize,
    pub events_loaded: usize,
    pub events_rejected: usize,
    pub map_nodes_loaded: usize,
    pub map_nodes_rejected: usize,
}

impl App {
    /// Create a new App with real time and randomness.
    pub fn new(repositories: Repositories, config: EngineConfig) -> Self {
        Self::with_ports(
            repositories,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
            RestrictionRegistry::with_builtins(),
            config,
        )
    }

    /// Create an App with injected clock, randomness and restriction predicates.
    pub fn with_ports(
        repositories: Repositories,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        restrictions: RestrictionRegistry,
        config: EngineConfig,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new());
        let filter = Arc::new(ChoiceFilter::new(restrictions));
        let skill_checks = Arc::new(SkillCheckResolver::new(config.skill_check, random.clone()));

        let dialogue_ports = DialoguePorts {
            content: repositories.content.clone(),
            quests: repositories.quests.clone(),
            players: repositories.players.clone(),
            actors: repositories.actors.clone(),
            map_nodes: repositories.map_nodes.clone(),
            random: random.clone(),
            clock,
        };

        let dialogue = use_cases::DialogueUseCases::new(
            Arc::new(EnterDialogue::new(
                dialogue_ports.clone(),
                sessions.clone(),
                filter.clone(),
                config.energy_cost,
            )),
            Arc::new(SubmitChoice::new(
                dialogue_ports,
                sessions.clone(),
                filter,
                skill_checks,
            )),
        );

        let session = use_cases::SessionUseCases::new(
            Arc::new(RouteInput::new(sessions.clone())),
            Arc::new(BeginCombat::new(sessions.clone())),
            Arc::new(EndCombat::new(sessions.clone())),
            Arc::new(Disconnect::new(sessions.clone())),
        );

        let authoring = use_cases::AuthoringUseCases::new(
            Arc::new(PersistEvent::new(repositories.content.clone(), random)),
            Arc::new(ValidateStoryWeights::new()),
        );

        Self {
            repositories,
            use_cases: UseCases {
                dialogue,
                session,
                authoring,
            },
            sessions,
            config,
        }
    }

    // =========================================================================
    // Dialogue
    // =========================================================================

    pub async fn enter_dialogue(
        &self,
        player_id: PlayerId,
        actor_id: ActorId,
    ) -> Result<EntryOutcome, DialogueError> {
        self.use_cases
            .dialogue
            .enter
            .execute(player_id, actor_id)
            .await
    }

    pub async fn enter_story_event(
        &self,
        player_id: PlayerId,
        address: &NodeAddress,
    ) -> Result<EntryOutcome, DialogueError> {
        self.use_cases
            .dialogue
            .enter
            .execute_story_event(player_id, address)
            .await
    }

    pub async fn submit_choice(
        &self,
        player_id: PlayerId,
        raw_text: &str,
    ) -> Result<DialogueResponse, DialogueError> {
        self.use_cases
            .dialogue
            .submit_choice
            .execute(player_id, raw_text)
            .await
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn owns_input(&self, player_id: PlayerId) -> bool {
        self.use_cases.session.route_input.owns_input(player_id)
    }

    pub async fn begin_combat(&self, player_id: PlayerId, mob_id: MobId) {
        self.use_cases
            .session
            .begin_combat
            .execute(player_id, mob_id)
            .await
    }

    pub async fn end_combat(&self, player_id: PlayerId) {
        self.use_cases.session.end_combat.execute(player_id).await
    }

    pub async fn disconnect(&self, player_id: PlayerId) {
        self.use_cases.session.disconnect.execute(player_id).await
    }

    // =========================================================================
    // Authoring
    // =========================================================================

    pub async fn persist_event(
        &self,
        draft: EventDefinitionDraft,
    ) -> Result<EventDefinition, AuthoringError> {
        self.use_cases.authoring.persist_event.execute(draft).await
    }

    pub fn validate_weighted_events(&self, events: &[WeightedEvent]) -> Result<(), AuthoringError> {
        self.use_cases
            .authoring
            .validate_story_weights
            .execute(events)
    }

    /// Load a content bundle into an in-memory world.
    ///
    /// Every event goes through the authoring pipeline and every map node's
    /// story weights are validated. Rejected entries are logged and skipped.
    pub async fn seed_world(&self, world: &InMemoryWorld, bundle: ContentBundle) -> SeedReport {
        let mut report = SeedReport::default();

        for actor in bundle.actors {
            world.actors.insert(actor).await;
            report.actors += 1;
        }
        for outline in bundle.quests {
            world.quests.add_outline(outline).await;
        }

        for draft in bundle.events {
            let title = draft.title.clone();
            match self.persist_event(draft).await {
                Ok(_) => report.events_loaded += 1,
                Err(e) => {
                    tracing::error!(title = %title, error = %e, "Rejected event from bundle");
                    report.events_rejected += 1;
                }
            }
        }

        for map_node in bundle.map_nodes {
            match self.validate_weighted_events(&map_node.story_events) {
                Ok(()) => {
                    world.map_nodes.insert(map_node).await;
                    report.map_nodes_loaded += 1;
                }
                Err(e) => {
                    tracing::error!(
                        address = %map_node.address,
                        error = %e,
                        "Rejected map node from bundle"
                    );
                    report.map_nodes_rejected += 1;
                }
            }
        }

        tracing::info!(
            actors = report.actors,
            events = report.events_loaded,
            map_nodes = report.map_nodes_loaded,
            "Content bundle loaded"
        );
        report
    }
}
