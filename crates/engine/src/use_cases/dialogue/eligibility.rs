//! Which choices a player is offered.
//!
//! A choice is judged by the node it leads to. The node is withheld when it
//! would activate a quest the player already has running, or when one of its
//! restriction tags rejects the player. Quest gates on the root node are only
//! checked when a flow is entered (see [`quest_gate_open`]).

use std::collections::HashMap;
use std::sync::Arc;

use mudtale_domain::{Choice, EventNode, PlayerRecord, QuestLedger, RestrictionTag};

/// Class name the `enforcerOnly` restriction admits.
pub const ENFORCER_CLASS: &str = "Enforcer";

/// The player state eligibility rules look at.
#[derive(Debug, Clone, Copy)]
pub struct PlayerContext<'a> {
    pub class_name: Option<&'a str>,
    pub ledger: &'a QuestLedger,
}

impl<'a> PlayerContext<'a> {
    pub fn new(player: &'a PlayerRecord, ledger: &'a QuestLedger) -> Self {
        Self {
            class_name: player.class_name.as_deref(),
            ledger,
        }
    }
}

/// Returns true when the player may see a node carrying the tag.
pub type RestrictionPredicate = Arc<dyn Fn(&PlayerContext<'_>) -> bool + Send + Sync>;

/// Named restriction predicates.
#[derive(Clone)]
pub struct RestrictionRegistry {
    predicates: HashMap<String, RestrictionPredicate>,
}

impl RestrictionRegistry {
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Registry with `noClass` and `enforcerOnly`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(RestrictionTag::NO_CLASS, |ctx| ctx.class_name.is_none());
        registry.register(RestrictionTag::ENFORCER_ONLY, |ctx| {
            ctx.class_name == Some(ENFORCER_CLASS)
        });
        registry
    }

    pub fn register<F>(&mut self, tag: impl Into<String>, predicate: F)
    where
        F: Fn(&PlayerContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(tag.into(), Arc::new(predicate));
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.predicates.contains_key(tag)
    }

    /// Unregistered tags admit everyone.
    pub fn allows(&self, tag: &RestrictionTag, ctx: &PlayerContext<'_>) -> bool {
        match self.predicates.get(tag.as_str()) {
            Some(predicate) => predicate(ctx),
            None => {
                tracing::warn!(tag = %tag, "Unknown restriction tag ignored");
                true
            }
        }
    }
}

impl Default for RestrictionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for RestrictionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&String> = self.predicates.keys().collect();
        tags.sort();
        f.debug_struct("RestrictionRegistry")
            .field("tags", &tags)
            .finish()
    }
}

/// Filters choices against a player.
#[derive(Debug, Clone, Default)]
pub struct ChoiceFilter {
    registry: RestrictionRegistry,
}

impl ChoiceFilter {
    pub fn new(registry: RestrictionRegistry) -> Self {
        Self { registry }
    }

    /// Whether the player may be shown `node`.
    pub fn node_allowed(&self, node: &EventNode, ctx: &PlayerContext<'_>) -> bool {
        if let Some(quest_id) = node.activate_quest_id {
            if ctx.ledger.is_active(quest_id) {
                return false;
            }
        }
        node.restrictions
            .iter()
            .all(|tag| self.registry.allows(tag, ctx))
    }

    /// The choices the player is offered, in their original order.
    ///
    /// Choices without a single destination (plain, combat, teleport, skill
    /// check) are always offered.
    pub fn eligible<'c>(&self, choices: &'c [Choice], ctx: &PlayerContext<'_>) -> Vec<&'c Choice> {
        choices
            .iter()
            .filter(|choice| match choice.destination() {
                Some(node) => self.node_allowed(node, ctx),
                None => true,
            })
            .collect()
    }
}

/// Whether an event's root quest requirements let the player enter it.
///
/// A required quest must be active or completed. A required quest event must
/// be the current event or a completed event of the required quest, or of
/// any quest when the root names none.
pub fn quest_gate_open(root: &EventNode, ledger: &QuestLedger) -> bool {
    if let Some(quest_id) = root.required_quest_id {
        if !ledger.has_started(quest_id) {
            return false;
        }
    }
    if let Some(quest_event_id) = root.required_quest_event_id {
        let reached = match root.required_quest_id {
            Some(quest_id) => ledger
                .get(quest_id)
                .is_some_and(|q| q.has_reached(quest_event_id)),
            None => ledger.quests.iter().any(|q| q.has_reached(quest_event_id)),
        };
        if !reached {
            return false;
        }
    }
    true
}
