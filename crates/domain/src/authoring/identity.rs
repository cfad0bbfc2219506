//! Node identity resolution.
//!
//! Gives every node and choice of a draft tree a canonical UUID before it is
//! persisted. The traversal engine relocates a player inside a freshly loaded
//! tree by these ids, so resolution must be idempotent: running it on an
//! already resolved tree changes nothing.

use uuid::Uuid;

use super::draft::{ChoiceDraft, EventDefinitionDraft, NodeDraft, WireId};

/// Namespace for name-based UUIDs derived from foreign string ids.
const FOREIGN_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d75_6474_616c_6549_6400_0000_0000_0001);

impl WireId {
    pub fn is_canonical(&self) -> bool {
        matches!(self, WireId::Canonical(_))
    }

    /// The canonical UUID for this id.
    ///
    /// Strings that already are UUIDs keep their value; any other string maps
    /// to the same name-based UUID every time.
    pub fn to_canonical(&self) -> Uuid {
        match self {
            WireId::Canonical(uuid) => *uuid,
            WireId::Wrapped { oid } => normalize_foreign(oid),
            WireId::Plain(raw) => normalize_foreign(raw),
        }
    }
}

fn normalize_foreign(raw: &str) -> Uuid {
    let trimmed = raw.trim();
    Uuid::parse_str(trimmed)
        .unwrap_or_else(|_| Uuid::new_v5(&FOREIGN_ID_NAMESPACE, trimmed.as_bytes()))
}

/// Counts of what a resolution pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityReport {
    pub generated: usize,
    pub normalized: usize,
}

impl IdentityReport {
    pub fn is_noop(&self) -> bool {
        self.generated == 0 && self.normalized == 0
    }
}

/// Resolve the definition id and every node and choice id in the tree.
///
/// `generate` supplies fresh ids for entities that have none.
pub fn resolve_identities<F>(draft: &mut EventDefinitionDraft, mut generate: F) -> IdentityReport
where
    F: FnMut() -> Uuid,
{
    let mut report = IdentityReport::default();
    resolve_slot(&mut draft.id, &mut generate, &mut report);
    if let Some(root) = draft.root_node.as_mut() {
        resolve_node(root, &mut generate, &mut report);
    }
    report
}

/// Resolve a single node subtree.
pub fn resolve_node_identities<F>(node: &mut NodeDraft, mut generate: F) -> IdentityReport
where
    F: FnMut() -> Uuid,
{
    let mut report = IdentityReport::default();
    resolve_node(node, &mut generate, &mut report);
    report
}

fn resolve_node<F>(node: &mut NodeDraft, generate: &mut F, report: &mut IdentityReport)
where
    F: FnMut() -> Uuid,
{
    resolve_slot(&mut node.id, generate, report);
    for choice in node.choices.iter_mut().flatten() {
        resolve_choice(choice, generate, report);
    }
}

fn resolve_choice<F>(choice: &mut ChoiceDraft, generate: &mut F, report: &mut IdentityReport)
where
    F: FnMut() -> Uuid,
{
    resolve_slot(&mut choice.id, generate, report);
    if let Some(next) = choice.next_node.as_deref_mut() {
        resolve_node(next, generate, report);
    }
    if let Some(check) = choice.skill_check.as_mut() {
        if let Some(success) = check.success_node.as_deref_mut() {
            resolve_node(success, generate, report);
        }
        if let Some(failure) = check.failure_node.as_deref_mut() {
            resolve_node(failure, generate, report);
        }
    }
}

fn resolve_slot<F>(slot: &mut Option<WireId>, generate: &mut F, report: &mut IdentityReport)
where
    F: FnMut() -> Uuid,
{
    match slot {
        None => {
            *slot = Some(WireId::Canonical(generate()));
            report.generated += 1;
        }
        Some(id) if !id.is_canonical() => {
            *slot = Some(WireId::Canonical(id.to_canonical()));
            report.normalized += 1;
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authoring::draft::SkillCheckDraft;

    fn sample_tree() -> EventDefinitionDraft {
        let check = ChoiceDraft {
            skill_check: Some(SkillCheckDraft {
                stat: Some("agility".to_string()),
                target_number: Some(5),
                success_node: Some(Box::new(NodeDraft::new("Over the wall."))),
                failure_node: Some(Box::new(NodeDraft {
                    id: Some(WireId::Wrapped {
                        oid: "64b7f0c2a1".to_string(),
                    }),
                    ..NodeDraft::new("You fall.")
                })),
            }),
            ..ChoiceDraft::new("Climb")
        };
        let root = NodeDraft {
            id: Some(WireId::Plain("gate-root".to_string())),
            ..NodeDraft::new("A wall.")
        }
        .with_choice(check)
        .with_choice(ChoiceDraft::new("Knock").leading_to(NodeDraft::new("Nobody answers.")));

        EventDefinitionDraft {
            title: "Wall".to_string(),
            root_node: Some(root),
            ..EventDefinitionDraft::default()
        }
    }

    #[test]
    fn assigns_missing_and_normalizes_foreign_ids() {
        let mut draft = sample_tree();
        let report = resolve_identities(&mut draft, Uuid::new_v4);

        // definition, success node, knock target node, two choices
        assert_eq!(report.generated, 5);
        // plain root id and wrapped failure node id
        assert_eq!(report.normalized, 2);

        let root = draft.root_node.as_ref().expect("root");
        assert_eq!(
            root.id,
            Some(WireId::Canonical(normalize_foreign("gate-root")))
        );
        let failure = root.choices.as_ref().expect("choices")[0]
            .skill_check
            .as_ref()
            .and_then(|c| c.failure_node.as_ref())
            .expect("failure");
        assert_eq!(
            failure.id,
            Some(WireId::Canonical(normalize_foreign("64b7f0c2a1")))
        );
    }

    #[test]
    fn second_pass_is_a_noop() {
        let mut draft = sample_tree();
        resolve_identities(&mut draft, Uuid::new_v4);
        let first = serde_json::to_string(&draft).expect("serialize");

        let report = resolve_identities(&mut draft, Uuid::new_v4);
        let second = serde_json::to_string(&draft).expect("serialize");

        assert!(report.is_noop());
        assert_eq!(first, second);
    }

    #[test]
    fn resolved_tree_survives_a_wire_round_trip() {
        let mut draft = sample_tree();
        resolve_identities(&mut draft, Uuid::new_v4);
        let json = serde_json::to_string(&draft).expect("serialize");

        let mut reloaded: EventDefinitionDraft = serde_json::from_str(&json).expect("parse");
        let report = resolve_identities(&mut reloaded, Uuid::new_v4);

        assert!(report.is_noop());
        assert_eq!(reloaded, draft);
    }

    #[test]
    fn uuid_shaped_foreign_strings_keep_their_value() {
        let uuid = Uuid::new_v4();
        let id = WireId::Wrapped {
            oid: uuid.to_string(),
        };
        assert_eq!(id.to_canonical(), uuid);
    }

    #[test]
    fn normalization_is_deterministic() {
        let a = WireId::Plain("node-1".to_string()).to_canonical();
        let b = WireId::Wrapped {
            oid: "node-1".to_string(),
        }
        .to_canonical();
        assert_eq!(a, b);
    }
}
