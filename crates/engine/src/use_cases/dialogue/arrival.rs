//! Arriving at a node: side effects, filtering, rendering.

use mudtale_domain::{EventNode, NodeId, PlayerRecord, QuestLedger};

use super::effects::apply_quest_effects;
use super::eligibility::{ChoiceFilter, PlayerContext};
use super::format::{format_node, FormattedNode};
use crate::infrastructure::ports::{QuestLedgerPort, RandomPort, RepoError};

/// A node the player has just reached.
#[derive(Debug, Clone)]
pub(crate) struct Arrival {
    pub node_id: NodeId,
    /// The node with its identity filled in
    pub snapshot: EventNode,
    pub formatted: FormattedNode,
}

/// Apply the node's quest effects and render it for the player.
///
/// Choices are filtered against the ledger as it stands after the effects.
/// A node that arrives without an identity is given one here so the player's
/// position can still be recorded.
pub(crate) async fn arrive(
    quests: &dyn QuestLedgerPort,
    random: &dyn RandomPort,
    filter: &ChoiceFilter,
    player: &PlayerRecord,
    ledger: QuestLedger,
    node: &EventNode,
) -> Result<Arrival, RepoError> {
    let ledger = if apply_quest_effects(quests, player.id, node).await? {
        quests.get_ledger(player.id).await?
    } else {
        ledger
    };

    let ctx = PlayerContext::new(player, &ledger);
    let eligible = filter.eligible(&node.choices, &ctx);
    let formatted = format_node(node, &eligible);

    let mut snapshot = node.clone();
    let node_id = *snapshot.id.get_or_insert_with(|| {
        let id = NodeId::from_uuid(random.gen_uuid());
        tracing::debug!(node_id = %id, "Assigned identity to anonymous node");
        id
    });

    Ok(Arrival {
        node_id,
        snapshot,
        formatted,
    })
}
