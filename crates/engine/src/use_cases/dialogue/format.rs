//! Rendering a node for the client.

use mudtale_domain::{Choice, EventNode};

/// A node as the player sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedNode {
    pub text: String,
    pub has_choices: bool,
    pub is_end: bool,
}

/// Render the prompt followed by the eligible choices numbered from 1.
///
/// Numbering follows the eligible list only, so filtered-out choices leave no
/// gaps.
pub fn format_node(node: &EventNode, eligible: &[&Choice]) -> FormattedNode {
    let mut text = node.prompt.clone();
    for (index, choice) in eligible.iter().enumerate() {
        text.push('\n');
        text.push_str(&format!("{}. {}", index + 1, choice.text));
    }
    let has_choices = !eligible.is_empty();
    FormattedNode {
        text,
        has_choices,
        is_end: !has_choices,
    }
}
