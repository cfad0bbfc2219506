//! End-to-end dialogue flows against the in-memory world.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;

use mudtale_domain::authoring::EventDefinitionDraft;
use mudtale_domain::{
    Actor, EventDefinition, MapNode, MobId, NodeAddress, PlayerId, PlayerRecord, QuestEventId,
    QuestId, Stat, StatBlock, WeightedEvent,
};

use super::{DialogueError, DialogueResponse, EntryOutcome, RestrictionRegistry, EVENT_ENDED_TEXT};
use crate::app::{App, Repositories};
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::memory::{ContentBundle, InMemoryWorld, QuestOutline};
use crate::infrastructure::ports::QuestLedgerPort;

struct Scenario {
    app: App,
    world: InMemoryWorld,
}

impl Scenario {
    fn new(roll: i32) -> Self {
        let world = InMemoryWorld::new();
        let app = App::with_ports(
            Repositories::in_memory(&world),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
                    .single()
                    .expect("time"),
            )),
            Arc::new(FixedRandom(roll)),
            RestrictionRegistry::with_builtins(),
            EngineConfig::default(),
        );
        Self { app, world }
    }

    async fn player(&self, player: PlayerRecord) -> PlayerId {
        let id = player.id;
        self.world.players.insert(player).await;
        id
    }

    async fn actor(&self, name: &str) -> Actor {
        let actor = Actor::new(name);
        self.world.actors.insert(actor.clone()).await;
        actor
    }

    async fn persist(&self, draft: serde_json::Value) -> EventDefinition {
        let draft: EventDefinitionDraft = serde_json::from_value(draft).expect("draft json");
        self.app.persist_event(draft).await.expect("persist")
    }

    async fn talk(&self, player_id: PlayerId, actor: &Actor) -> EntryOutcome {
        self.app
            .enter_dialogue(player_id, actor.id)
            .await
            .expect("entry")
    }

    async fn answer(&self, player_id: PlayerId, raw: &str) -> DialogueResponse {
        self.app
            .submit_choice(player_id, raw)
            .await
            .expect("submit")
    }
}

fn started(outcome: EntryOutcome) -> DialogueResponse {
    match outcome {
        EntryOutcome::Started(response) => response,
        other => panic!("expected dialogue to start, got {other:?}"),
    }
}

fn who_are_you(actor: &Actor) -> serde_json::Value {
    json!({
        "title": "Introductions",
        "actorId": actor.id,
        "rootNode": {
            "prompt": "Who are you?",
            "choices": [
                {
                    "text": "I have no calling yet.",
                    "nextNode": {
                        "prompt": "Then let me tell you about the guilds.",
                        "restrictions": ["noClass"],
                        "choices": []
                    }
                },
                {
                    "text": "Just a traveller.",
                    "nextNode": {
                        "prompt": "Safe travels, then.",
                        "choices": [{ "text": "Goodbye." }]
                    }
                }
            ]
        }
    })
}

#[tokio::test]
async fn restricted_choice_is_hidden_and_numbering_stays_contiguous() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Elder").await;
    scenario.persist(who_are_you(&actor)).await;
    let player = scenario
        .player(PlayerRecord::new("Ada").with_class("Ranger"))
        .await;

    let root = started(scenario.talk(player, &actor).await);
    assert_eq!(root.text, "Who are you?\n1. Just a traveller.");
    assert_eq!(root.speaker.as_deref(), Some("Elder"));

    let next = scenario.answer(player, "1").await;
    assert_eq!(next.text, "Safe travels, then.\n1. Goodbye.");
    assert!(scenario.app.owns_input(player));
}

#[tokio::test]
async fn classless_player_sees_every_choice() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Elder").await;
    scenario.persist(who_are_you(&actor)).await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;

    let root = started(scenario.talk(player, &actor).await);

    assert_eq!(
        root.text,
        "Who are you?\n1. I have no calling yet.\n2. Just a traveller."
    );
}

fn guard_check() -> serde_json::Value {
    json!({
        "title": "Checkpoint",
        "rootNode": {
            "prompt": "A guard blocks the way.",
            "choices": [{
                "text": "Sneak past",
                "skillCheck": {
                    "stat": "agility",
                    "targetNumber": 5,
                    "successNode": {
                        "prompt": "You slip past.",
                        "choices": [{ "text": "Onward" }]
                    },
                    "failureNode": {
                        "prompt": "You are spotted.",
                        "choices": [{ "text": "Run" }]
                    }
                }
            }]
        }
    })
}

async fn run_skill_check(roll: i32) -> (DialogueResponse, String) {
    let scenario = Scenario::new(roll);
    let actor = scenario.actor("Guard").await;
    let mut draft = guard_check();
    draft["actorId"] = json!(actor.id);
    scenario.persist(draft).await;
    let player = scenario
        .player(PlayerRecord::new("Ada").with_stats(StatBlock::new().with(Stat::Agility, 5)))
        .await;

    started(scenario.talk(player, &actor).await);
    let response = scenario.answer(player, "1").await;
    let state = scenario
        .app
        .sessions
        .active_event(player)
        .expect("slot");
    (response, state.current_node_snapshot.prompt)
}

#[tokio::test]
async fn skill_check_success_moves_to_success_node() {
    let (response, prompt) = run_skill_check(1).await;
    assert_eq!(response.text, "You slip past.\n1. Onward");
    assert_eq!(prompt, "You slip past.");
}

#[tokio::test]
async fn skill_check_failure_moves_to_failure_node() {
    let (response, prompt) = run_skill_check(100).await;
    assert_eq!(response.text, "You are spotted.\n1. Run");
    assert_eq!(prompt, "You are spotted.");
}

#[tokio::test]
async fn exhausted_player_gets_notice_and_chat_still_works() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Trainer").await;
    scenario
        .persist(json!({
            "title": "Training",
            "actorId": actor.id,
            "requiresEnergy": true,
            "rootNode": {
                "prompt": "Ready to train?",
                "choices": [{ "text": "Yes" }]
            }
        }))
        .await;
    let player = scenario
        .player(PlayerRecord::new("Ada").with_energy(0))
        .await;

    let outcome = scenario.talk(player, &actor).await;

    assert_eq!(outcome, EntryOutcome::too_tired());
    assert!(!scenario.app.owns_input(player));
    assert!(scenario.app.sessions.active_event(player).is_none());
    // The next line of input is ordinary chat, not a dialogue answer.
    assert!(matches!(
        scenario.app.submit_choice(player, "hello everyone").await,
        Err(DialogueError::NotInDialogue)
    ));
}

#[tokio::test]
async fn energy_is_deducted_when_event_starts() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Trainer").await;
    scenario
        .persist(json!({
            "title": "Training",
            "actorId": actor.id,
            "requiresEnergy": true,
            "rootNode": { "prompt": "Ready?", "choices": [{ "text": "Yes" }] }
        }))
        .await;
    let player = scenario
        .player(PlayerRecord::new("Ada").with_energy(1))
        .await;

    started(scenario.talk(player, &actor).await);
    scenario.answer(player, "1").await;

    // The second attempt finds the player spent.
    assert_eq!(
        scenario.talk(player, &actor).await,
        EntryOutcome::too_tired()
    );
}

#[tokio::test]
async fn terminal_choice_clears_slot() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Elder").await;
    scenario.persist(who_are_you(&actor)).await;
    let player = scenario
        .player(PlayerRecord::new("Ada").with_class("Ranger"))
        .await;

    started(scenario.talk(player, &actor).await);
    scenario.answer(player, "1").await;
    let end = scenario.answer(player, "1").await;

    assert!(end.is_end);
    assert!(!end.has_choices);
    assert!(!end.error);
    assert!(!scenario.app.owns_input(player));
}

#[tokio::test]
async fn filtered_out_choices_end_like_an_empty_node() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Recruiter").await;
    scenario
        .persist(json!({
            "title": "Recruitment",
            "actorId": actor.id,
            "rootNode": {
                "prompt": "Looking for work?",
                "choices": [
                    {
                        "text": "Yes",
                        "nextNode": {
                            "prompt": "Choose a path.",
                            "choices": [{
                                "text": "The blade",
                                "nextNode": {
                                    "prompt": "Welcome, recruit.",
                                    "restrictions": ["noClass"],
                                    "choices": []
                                }
                            }]
                        }
                    },
                    {
                        "text": "Tell me more",
                        "nextNode": { "prompt": "Nothing more to say.", "choices": [] }
                    }
                ]
            }
        }))
        .await;
    let classed = scenario
        .player(PlayerRecord::new("Ada").with_class("Mage"))
        .await;
    let classless = scenario.player(PlayerRecord::new("Bo")).await;

    started(scenario.talk(classed, &actor).await);
    let filtered = scenario.answer(classed, "1").await;

    started(scenario.talk(classless, &actor).await);
    let empty = scenario.answer(classless, "2").await;

    assert_eq!(filtered.text, "Choose a path.");
    assert_eq!(empty.text, "Nothing more to say.");
    for response in [&filtered, &empty] {
        assert!(response.is_end);
        assert!(!response.has_choices);
    }
    assert!(!scenario.app.owns_input(classed));
    assert!(!scenario.app.owns_input(classless));
}

#[tokio::test]
async fn invalid_answer_leaves_position_untouched() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Elder").await;
    scenario.persist(who_are_you(&actor)).await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;
    started(scenario.talk(player, &actor).await);
    let before = scenario.app.sessions.active_event(player);

    let response = scenario.answer(player, "7").await;

    assert!(response.error);
    assert_eq!(response.text, "Please choose a number from 1 to 2.");
    assert_eq!(scenario.app.sessions.active_event(player), before);
}

#[tokio::test]
async fn quest_gate_unlocks_event_once_quest_starts() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Captain").await;
    let quest = QuestId::new();
    scenario
        .persist(json!({
            "title": "Report",
            "actorId": actor.id,
            "rootNode": {
                "prompt": "Report, soldier.",
                "requiredQuestId": quest,
                "choices": [{ "text": "All quiet, sir." }]
            }
        }))
        .await;
    scenario
        .persist(json!({
            "title": "Enlist",
            "actorId": actor.id,
            "rootNode": {
                "prompt": "We need soldiers.",
                "choices": [{
                    "text": "Sign me up.",
                    "nextNode": {
                        "prompt": "Welcome aboard.",
                        "activateQuestId": quest,
                        "choices": []
                    }
                }]
            }
        }))
        .await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;

    let first = started(scenario.talk(player, &actor).await);
    assert_eq!(first.text, "We need soldiers.\n1. Sign me up.");
    let enlisted = scenario.answer(player, "1").await;
    assert_eq!(enlisted.text, "Welcome aboard.");
    assert!(enlisted.is_end);

    let second = started(scenario.talk(player, &actor).await);
    assert_eq!(second.text, "Report, soldier.\n1. All quiet, sir.");
}

#[tokio::test]
async fn quest_event_gate_requires_reached_event() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Scholar").await;
    let quest = QuestId::new();
    let letter = QuestEventId::new();
    scenario
        .world
        .quests
        .add_outline(QuestOutline {
            id: quest,
            events: vec![letter],
        })
        .await;
    scenario
        .persist(json!({
            "title": "The letter",
            "actorId": actor.id,
            "rootNode": {
                "prompt": "You found the letter?",
                "requiredQuestEventId": letter,
                "choices": [{ "text": "Here it is." }]
            }
        }))
        .await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;

    assert_eq!(scenario.talk(player, &actor).await, EntryOutcome::NotOffered);

    scenario
        .world
        .quests
        .activate_quest(player, quest)
        .await
        .expect("activate");
    assert!(scenario.talk(player, &actor).await.is_started());
}

#[tokio::test]
async fn completions_apply_before_activation() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Herald").await;
    let quest = QuestId::new();
    let opening = QuestEventId::new();
    scenario
        .world
        .quests
        .add_outline(QuestOutline {
            id: quest,
            events: vec![opening, QuestEventId::new()],
        })
        .await;
    scenario
        .persist(json!({
            "title": "Call to arms",
            "actorId": actor.id,
            "rootNode": {
                "prompt": "Will you answer the call?",
                "choices": [{
                    "text": "I will.",
                    "nextNode": {
                        "prompt": "Then go.",
                        "questCompletionEvents": [opening],
                        "activateQuestId": quest,
                        "choices": []
                    }
                }]
            }
        }))
        .await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;

    started(scenario.talk(player, &actor).await);
    scenario.answer(player, "1").await;

    // The completion ran while the quest had not started yet, so it was a no-op
    // and activation then placed the player at the opening event.
    let ledger = scenario
        .world
        .quests
        .get_ledger(player)
        .await
        .expect("ledger");
    let progress = ledger.get(quest).expect("quest started");
    assert_eq!(progress.current_event_id, Some(opening));
    assert!(progress.completed_event_ids.is_empty());
}

#[tokio::test]
async fn edited_content_takes_effect_mid_flow() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Bard").await;
    let draft = |verse: &str| {
        json!({
            "id": "bard-song",
            "title": "A song",
            "actorId": actor.id,
            "rootNode": {
                "id": "bard-root",
                "prompt": "Care for a song?",
                "choices": [{
                    "id": "bard-yes",
                    "text": "Sing!",
                    "nextNode": {
                        "id": "bard-verse",
                        "prompt": verse,
                        "choices": [{ "text": "Bravo" }]
                    }
                }]
            }
        })
    };
    let original = scenario.persist(draft("Once upon a time...")).await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;
    started(scenario.talk(player, &actor).await);
    scenario.answer(player, "1").await;

    let edited = scenario.persist(draft("In a land far away...")).await;
    assert_eq!(original.id, edited.id);

    // The player's node is found again by identity in the edited tree.
    let state = scenario.app.sessions.active_event(player).expect("slot");
    let relocated = super::find_node(&edited.root_node, state.current_node_id).expect("node");
    assert_eq!(relocated.prompt, "In a land far away...");

    let end = scenario.answer(player, "1").await;
    assert!(end.is_end);
}

#[tokio::test]
async fn deleted_definition_ends_the_event() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Elder").await;
    let definition = scenario.persist(who_are_you(&actor)).await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;
    started(scenario.talk(player, &actor).await);

    assert!(scenario.world.content.delete(definition.id).await);
    let response = scenario.answer(player, "1").await;

    assert_eq!(response.text, EVENT_ENDED_TEXT);
    assert!(response.is_end);
    assert!(!scenario.app.owns_input(player));
}

#[tokio::test]
async fn combat_supersedes_dialogue() {
    let scenario = Scenario::new(50);
    let actor = scenario.actor("Elder").await;
    scenario.persist(who_are_you(&actor)).await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;
    started(scenario.talk(player, &actor).await);

    scenario.app.begin_combat(player, MobId::new()).await;

    assert!(!scenario.app.owns_input(player));
    assert!(matches!(
        scenario.app.submit_choice(player, "1").await,
        Err(DialogueError::NotInDialogue)
    ));
}

#[tokio::test]
async fn new_entry_replaces_existing_slot() {
    let scenario = Scenario::new(50);
    let elder = scenario.actor("Elder").await;
    let guard = scenario.actor("Guard").await;
    scenario.persist(who_are_you(&elder)).await;
    let mut checkpoint = guard_check();
    checkpoint["actorId"] = json!(guard.id);
    let checkpoint = scenario.persist(checkpoint).await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;

    started(scenario.talk(player, &elder).await);
    started(scenario.talk(player, &guard).await);

    let state = scenario.app.sessions.active_event(player).expect("slot");
    assert_eq!(state.event_id, checkpoint.id);
    assert_eq!(scenario.app.sessions.active_sessions(), 1);
}

#[tokio::test]
async fn story_event_follows_weighted_roll() {
    let scenario = Scenario::new(61);
    let ambush = scenario
        .persist(json!({
            "title": "Ambush",
            "rootNode": { "prompt": "Bandits!", "choices": [{ "text": "Run" }] }
        }))
        .await;
    let quiet = scenario
        .persist(json!({
            "title": "Quiet",
            "rootNode": { "prompt": "Birdsong.", "choices": [{ "text": "Listen" }] }
        }))
        .await;
    let weights = vec![
        WeightedEvent::new(ambush.id, 60),
        WeightedEvent::new(quiet.id, 40),
    ];
    scenario
        .app
        .validate_weighted_events(&weights)
        .expect("weights");
    let address = NodeAddress::new("forest-road");
    let mut map_node = MapNode::new(address.clone());
    map_node.story_events = weights;
    scenario.world.map_nodes.insert(map_node).await;
    let player = scenario.player(PlayerRecord::new("Ada")).await;

    let response = started(
        scenario
            .app
            .enter_story_event(player, &address)
            .await
            .expect("entry"),
    );

    assert_eq!(response.text, "Birdsong.\n1. Listen");
    assert_eq!(response.speaker, None);
    let state = scenario.app.sessions.active_event(player).expect("slot");
    assert!(state.is_story_event);
}

#[tokio::test]
async fn sample_world_loads_cleanly() {
    let scenario = Scenario::new(50);
    let bundle = ContentBundle::from_json(include_str!("../../../../../content/sample_world.json"))
        .expect("bundle");

    let report = scenario.app.seed_world(&scenario.world, bundle).await;

    assert_eq!(report.actors, 2);
    assert_eq!(report.events_loaded, 4);
    assert_eq!(report.events_rejected, 0);
    assert_eq!(report.map_nodes_loaded, 2);
    assert_eq!(report.map_nodes_rejected, 0);
}

#[tokio::test]
async fn bundle_rejects_bad_entries_and_keeps_the_rest() {
    let scenario = Scenario::new(50);
    let bundle = ContentBundle::from_json(
        &json!({
            "events": [
                { "title": "Good", "rootNode": { "prompt": "Hi", "choices": [] } },
                { "title": "Bad", "rootNode": { "prompt": "", "choices": [] } }
            ],
            "mapNodes": [{
                "id": mudtale_domain::MapNodeId::new(),
                "address": "swamp",
                "storyEvents": [{ "eventId": mudtale_domain::EventId::new(), "weight": 90 }]
            }]
        })
        .to_string(),
    )
    .expect("bundle");

    let report = scenario.app.seed_world(&scenario.world, bundle).await;

    assert_eq!(report.events_loaded, 1);
    assert_eq!(report.events_rejected, 1);
    assert_eq!(report.map_nodes_rejected, 1);
}
