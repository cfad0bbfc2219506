//! Relocating a player's position inside a freshly loaded tree.

use std::collections::VecDeque;

use mudtale_domain::{EventNode, NodeId};

/// Breadth-first search for the node with `node_id`.
///
/// Walks next-node links and both branches of every skill check.
pub fn find_node(root: &EventNode, node_id: NodeId) -> Option<&EventNode> {
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        if node.id == Some(node_id) {
            return Some(node);
        }
        queue.extend(node.children());
    }
    None
}
