//! Pure preorder walks over a reasoning tree.
//!
//! All three walks visit the node first, then its children left to right,
//! so they produce identical orderings for the same tree.

use crate::schema::{NodeKind, ReasoningNode};

/// Render the tree as a human-readable indented trace, one node per line:
/// `- statement (kind)`, indented two spaces per depth level.
pub fn format_trace(root: &ReasoningNode) -> String {
    let mut lines = Vec::new();
    walk_trace(root, 0, &mut lines);
    lines.join("\n")
}

fn walk_trace(node: &ReasoningNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    lines.push(format!("{indent}- {} ({})", node.statement, node.kind));
    for child in &node.children {
        walk_trace(child, depth + 1, lines);
    }
}

/// All story-fact statements, in preorder.
pub fn story_facts(root: &ReasoningNode) -> Vec<String> {
    collect(root, NodeKind::StoryFact)
}

/// All rule-fact statements, in preorder.
pub fn rule_signals(root: &ReasoningNode) -> Vec<String> {
    collect(root, NodeKind::RuleFact)
}

fn collect(root: &ReasoningNode, kind: NodeKind) -> Vec<String> {
    let mut out = Vec::new();
    walk_collect(root, kind, &mut out);
    out
}

fn walk_collect(node: &ReasoningNode, kind: NodeKind, out: &mut Vec<String>) {
    if node.kind == kind {
        out.push(node.statement.clone());
    }
    for child in &node.children {
        walk_collect(child, kind, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ReasoningNode {
        let mut root = ReasoningNode::new(NodeKind::DeducedFact, "conclusion");
        let mut left = ReasoningNode::new(NodeKind::StoryFact, "left");
        left.children
            .push(ReasoningNode::new(NodeKind::RuleFact, "left rule"));
        left.children
            .push(ReasoningNode::new(NodeKind::StoryFact, "left child"));
        root.children.push(left);
        root.children
            .push(ReasoningNode::new(NodeKind::StoryFact, "right"));
        root
    }

    #[test]
    fn trace_indents_two_spaces_per_level() {
        let trace = format_trace(&sample_tree());
        let lines: Vec<&str> = trace.lines().collect();
        assert_eq!(lines[0], "- conclusion (deduced_fact)");
        assert_eq!(lines[1], "  - left (story_fact)");
        assert_eq!(lines[2], "    - left rule (rule_fact)");
        assert_eq!(lines[3], "    - left child (story_fact)");
        assert_eq!(lines[4], "  - right (story_fact)");
    }

    #[test]
    fn story_facts_preorder_no_omissions() {
        let facts = story_facts(&sample_tree());
        assert_eq!(facts, vec!["left", "left child", "right"]);
    }

    #[test]
    fn rule_signals_only_rule_nodes() {
        let rules = rule_signals(&sample_tree());
        assert_eq!(rules, vec!["left rule"]);
    }

    #[test]
    fn walks_share_one_traversal_order() {
        // The trace visits nodes in the same order the extractors do.
        let root = sample_tree();
        let trace = format_trace(&root);
        let trace_statements: Vec<&str> = trace
            .lines()
            .filter(|l| l.contains("(story_fact)"))
            .map(|l| l.trim_start_matches([' ', '-']).trim())
            .collect();
        let extracted: Vec<String> = story_facts(&root)
            .into_iter()
            .map(|s| format!("{s} (story_fact)"))
            .collect();
        assert_eq!(trace_statements, extracted.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    }
}
