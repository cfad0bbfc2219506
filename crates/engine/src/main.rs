//! Mudtale Engine - console entry point.
//!
//! Wires the engine to in-memory collaborators and reads commands from stdin:
//!
//! - `talk <actor>` - start a conversation
//! - `arrive <address>` - arrive at a map node and roll for a story event
//! - `fight <mob-uuid>` / `flee` - enter or leave combat
//! - a number while in a conversation - answer
//! - `quit` - exit
//!
//! Anything else is said out loud.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use mudtale_domain::{MobId, NodeAddress, PlayerId, PlayerRecord, Stat, StatBlock};
use mudtale_engine::app::{App, Repositories};
use mudtale_engine::infrastructure::config::EngineConfig;
use mudtale_engine::infrastructure::memory::{ContentBundle, InMemoryWorld};
use mudtale_engine::infrastructure::ports::ActorRepo;
use mudtale_engine::use_cases::dialogue::{DialogueResponse, EntryOutcome};

const SAMPLE_WORLD: &str = include_str!("../../../content/sample_world.json");
const DEFAULT_STAT: i32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mudtale_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Mudtale Engine");

    let config = EngineConfig::from_env();
    let bundle = match &config.content_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading content bundle");
            ContentBundle::read_from(path).await?
        }
        None => ContentBundle::from_json(SAMPLE_WORLD)?,
    };

    let world = InMemoryWorld::new();
    let app = Arc::new(App::new(Repositories::in_memory(&world), config.clone()));
    app.seed_world(&world, bundle).await;

    let player = console_player(&config);
    let player_id = player.id;
    world.players.insert(player).await;

    println!("You are {}. Type `talk <name>`, `arrive <place>` or `quit`.", config.player_name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        handle_line(&app, &world, player_id, line).await?;
    }

    app.disconnect(player_id).await;
    tracing::info!("Mudtale Engine stopped");
    Ok(())
}

async fn handle_line(
    app: &App,
    world: &InMemoryWorld,
    player_id: PlayerId,
    line: &str,
) -> anyhow::Result<()> {
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    match command.to_ascii_lowercase().as_str() {
        "talk" if !rest.is_empty() => {
            match world.actors.find_by_name(rest).await? {
                Some(actor) => {
                    let outcome = app.enter_dialogue(player_id, actor.id).await?;
                    print_entry(outcome, &format!("{} has nothing to say.", actor.name));
                }
                None => println!("There is no one called {rest} here."),
            }
        }
        "arrive" if !rest.is_empty() => {
            println!("You arrive at {rest}.");
            let outcome = app
                .enter_story_event(player_id, &NodeAddress::new(rest))
                .await?;
            print_entry(outcome, "Nothing happens.");
        }
        "fight" if !rest.is_empty() => match Uuid::parse_str(rest) {
            Ok(uuid) => {
                app.begin_combat(player_id, MobId::from_uuid(uuid)).await;
                println!("You attack!");
            }
            Err(_) => println!("That is not a creature you can fight."),
        },
        "flee" => {
            app.end_combat(player_id).await;
            println!("You get away.");
        }
        _ if app.owns_input(player_id) => {
            let response = app.submit_choice(player_id, line).await?;
            print_response(&response);
        }
        _ => println!("You say: {line}"),
    }
    Ok(())
}

fn print_entry(outcome: EntryOutcome, nothing_offered: &str) {
    match outcome {
        EntryOutcome::Started(response) => print_response(&response),
        EntryOutcome::TooTired { notice } => println!("{notice}"),
        EntryOutcome::NotOffered => println!("{nothing_offered}"),
    }
}

fn print_response(response: &DialogueResponse) {
    match &response.speaker {
        Some(speaker) => println!("{speaker}: {}", response.text),
        None => println!("{}", response.text),
    }
    if let Some(effect) = &response.effect {
        tracing::info!(?effect, "Hand-off requested");
    }
}

fn console_player(config: &EngineConfig) -> PlayerRecord {
    let stats = Stat::ALL
        .iter()
        .fold(StatBlock::new(), |block, stat| block.with(*stat, DEFAULT_STAT));
    let player = PlayerRecord::new(config.player_name.clone())
        .with_energy(config.player_energy)
        .with_stats(stats);
    match &config.player_class {
        Some(class_name) => player.with_class(class_name.clone()),
        None => player,
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
