//! Quest side effects of reaching a node.

use mudtale_domain::{EventNode, PlayerId};

use crate::infrastructure::ports::{QuestLedgerPort, RepoError};

/// Record the node's quest completions, then its quest activation.
///
/// Returns whether the ledger was touched.
pub async fn apply_quest_effects(
    quests: &dyn QuestLedgerPort,
    player_id: PlayerId,
    node: &EventNode,
) -> Result<bool, RepoError> {
    for quest_event_id in &node.quest_completion_events {
        quests.complete_event(player_id, *quest_event_id).await?;
        tracing::info!(
            player_id = %player_id,
            quest_event_id = %quest_event_id,
            "Quest event completed"
        );
    }
    if let Some(quest_id) = node.activate_quest_id {
        quests.activate_quest(player_id, quest_id).await?;
        tracing::info!(player_id = %player_id, quest_id = %quest_id, "Quest activated");
    }
    Ok(!node.quest_completion_events.is_empty() || node.activate_quest_id.is_some())
}
