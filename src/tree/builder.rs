//! Depth-bounded recursive expansion of a reasoning tree.
//!
//! Every expansion step re-reads the accumulated story facts from the whole
//! tree with a fresh preorder walk before invoking the oracle, so the
//! oracle always sees everything appended by earlier recursive calls —
//! including siblings' already-expanded descendants. That makes
//! construction O(n²) in the number of generated facts; the freshness of
//! the oracle-visible context is the contract, so the walk must not be
//! replaced by a running cache.
//!
//! The builder performs no deduplication and no consistency validation:
//! repeated or contradictory statements are accepted as-is.

use tracing::debug;

use crate::oracle::{Oracle, OracleError, render_prompt};
use crate::schema::{NodeKind, ReasoningNode};

use super::extract;

/// Literal prefixes recognized in oracle replies.
const STORY_FACT_PREFIX: &str = "Story Fact:";
const RULE_PREFIX: &str = "Rule:";

/// Per-domain policy for one expansion run.
#[derive(Debug, Clone)]
pub struct ExpansionPolicy<'a> {
    /// Deepest level at which nodes are still expanded; children can
    /// therefore reach depth `max_depth + 1`, never more.
    pub max_depth: usize,
    /// Rule corpus injected verbatim into every expansion prompt.
    pub rule_corpus: &'a [&'a str],
    /// Lowercased terms that force a story fact down to a deduced fact so
    /// the tree cannot leak the conclusion at the wrong level.
    pub forbidden_terms: &'a [&'a str],
    /// Prompt skeleton with `{fact}`, `{story_facts}` and `{rules}` parameters.
    pub prompt: &'a str,
}

/// Expand `root` in place, depth-first and left-to-right, until the depth
/// bound is reached. Oracle failures propagate untouched; a node is only
/// appended once its full statement is known, so no partial node is ever
/// committed.
pub fn expand_tree(
    root: &mut ReasoningNode,
    policy: &ExpansionPolicy<'_>,
    oracle: &dyn Oracle,
) -> Result<(), OracleError> {
    expand_at(root, &[], 0, policy, oracle)
}

/// Expand the node addressed by `path` (indices from the root).
///
/// Paths stay valid across recursion because children are only ever
/// appended, never removed or re-parented.
fn expand_at(
    root: &mut ReasoningNode,
    path: &[usize],
    depth: usize,
    policy: &ExpansionPolicy<'_>,
    oracle: &dyn Oracle,
) -> Result<(), OracleError> {
    if depth > policy.max_depth {
        return Ok(());
    }

    // Fresh snapshot of every story fact in the tree so far.
    let story_facts = extract::story_facts(root);
    let statement = node_at(root, path).statement.clone();

    let facts_block = story_facts
        .iter()
        .map(|fact| format!("- {fact}"))
        .collect::<Vec<_>>()
        .join("\n");
    let rules_block = format!(
        "You can use the following rule set:\n{}",
        policy
            .rule_corpus
            .iter()
            .map(|rule| format!("- {rule}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
    let prompt = render_prompt(
        policy.prompt,
        &[
            ("fact", statement.as_str()),
            ("story_facts", facts_block.as_str()),
            ("rules", rules_block.as_str()),
        ],
    );

    let reply = oracle.complete(&prompt)?;

    for raw in reply.text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(STORY_FACT_PREFIX) {
            let statement = clean_statement(rest);
            if statement.is_empty() {
                continue;
            }
            let kind = if contains_forbidden_term(&statement, policy.forbidden_terms) {
                NodeKind::DeducedFact
            } else {
                NodeKind::StoryFact
            };
            let child_path = append_child(root, path, ReasoningNode::new(kind, statement));
            // Recurse immediately, before the next reply line: later
            // siblings must see this subtree in their fact snapshot.
            // Reclassified deduced facts stay expandable.
            expand_at(root, &child_path, depth + 1, policy, oracle)?;
        } else if let Some(rest) = line.strip_prefix(RULE_PREFIX) {
            let statement = clean_statement(rest);
            if statement.is_empty() {
                continue;
            }
            // Rule facts are leaves; never recursed into.
            append_child(root, path, ReasoningNode::new(NodeKind::RuleFact, statement));
        } else {
            debug!(line = raw, "discarding unrecognized expansion line");
        }
    }

    Ok(())
}

fn clean_statement(text: &str) -> String {
    text.trim().replace('"', "")
}

fn contains_forbidden_term(statement: &str, terms: &[&str]) -> bool {
    let lowered = statement.to_lowercase();
    terms.iter().any(|term| lowered.contains(term))
}

fn node_at<'t>(root: &'t ReasoningNode, path: &[usize]) -> &'t ReasoningNode {
    let mut node = root;
    for &idx in path {
        node = &node.children[idx];
    }
    node
}

fn node_at_mut<'t>(root: &'t mut ReasoningNode, path: &[usize]) -> &'t mut ReasoningNode {
    let mut node = root;
    for &idx in path {
        node = &mut node.children[idx];
    }
    node
}

/// Append `child` under the node at `path`, returning the child's path.
fn append_child(root: &mut ReasoningNode, path: &[usize], child: ReasoningNode) -> Vec<usize> {
    let parent = node_at_mut(root, path);
    parent.children.push(child);
    let mut child_path = path.to_vec();
    child_path.push(parent.children.len() - 1);
    child_path
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::oracle::OracleReply;

    use super::*;

    /// Replays a fixed list of replies and records every prompt it saw.
    struct ScriptedOracle {
        replies: RefCell<Vec<String>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedOracle {
        fn new(replies: &[&str]) -> Self {
            // Popped from the back.
            Self {
                replies: RefCell::new(replies.iter().rev().map(|s| s.to_string()).collect()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl Oracle for ScriptedOracle {
        fn complete(&self, prompt: &str) -> Result<OracleReply, OracleError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            let text = self.replies.borrow_mut().pop().unwrap_or_default();
            Ok(OracleReply::text_only(text))
        }
    }

    const PROMPT: &str = "Fact: {fact}\nFacts so far:\n{story_facts}\n{rules}";

    fn policy<'a>(max_depth: usize, forbidden: &'a [&'a str]) -> ExpansionPolicy<'a> {
        ExpansionPolicy {
            max_depth,
            rule_corpus: &["rule one", "rule two"],
            forbidden_terms: forbidden,
            prompt: PROMPT,
        }
    }

    fn max_node_depth(node: &ReasoningNode) -> usize {
        node.children
            .iter()
            .map(|c| 1 + max_node_depth(c))
            .max()
            .unwrap_or(0)
    }

    /// An oracle that always expands keeps the tree within max_depth + 1.
    #[test]
    fn depth_bound_holds() {
        struct AlwaysExpand;
        impl Oracle for AlwaysExpand {
            fn complete(&self, _prompt: &str) -> Result<OracleReply, OracleError> {
                Ok(OracleReply::text_only(
                    "Story Fact: \"another layer\"\nRule: \"a rule\"",
                ))
            }
        }

        for max_depth in 0..4 {
            let mut root = ReasoningNode::new(NodeKind::DeducedFact, "conclusion");
            let policy = policy(max_depth, &[]);
            expand_tree(&mut root, &policy, &AlwaysExpand).unwrap();
            assert_eq!(max_node_depth(&root), max_depth + 1);
        }
    }

    #[test]
    fn forbidden_terms_force_deduced_fact() {
        let oracle = ScriptedOracle::new(&[
            "Story Fact: \"The couple should file jointly.\"\nStory Fact: \"They both work.\"",
            "", // expansion of the reclassified child
            "", // expansion of the second child
        ]);
        let mut root = ReasoningNode::new(NodeKind::DeducedFact, "conclusion");
        let policy = policy(1, &["jointly"]);
        expand_tree(&mut root, &policy, &oracle).unwrap();

        assert_eq!(root.children[0].kind, NodeKind::DeducedFact);
        assert_eq!(root.children[0].statement, "The couple should file jointly.");
        assert_eq!(root.children[1].kind, NodeKind::StoryFact);
    }

    #[test]
    fn unrecognized_and_empty_lines_are_discarded() {
        let oracle = ScriptedOracle::new(&[
            "Here are some facts:\nStory Fact: \"\"\nRule:   \nStory Fact: \"kept\"\nnonsense line",
            "",
        ]);
        let mut root = ReasoningNode::new(NodeKind::DeducedFact, "conclusion");
        let policy = policy(0, &[]);
        expand_tree(&mut root, &policy, &oracle).unwrap();

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].statement, "kept");
    }

    #[test]
    fn quotes_are_stripped_from_statements() {
        let oracle = ScriptedOracle::new(&["Rule: \"Quoted rule text.\""]);
        let mut root = ReasoningNode::new(NodeKind::DeducedFact, "conclusion");
        let policy = policy(0, &[]);
        expand_tree(&mut root, &policy, &oracle).unwrap();
        assert_eq!(root.children[0].statement, "Quoted rule text.");
        assert_eq!(root.children[0].kind, NodeKind::RuleFact);
    }

    /// The fact snapshot fed to the oracle must include earlier siblings'
    /// descendants: depth-first, left-to-right, re-walked from the root.
    #[test]
    fn snapshot_includes_prior_siblings_descendants() {
        let oracle = ScriptedOracle::new(&[
            // Root expansion: two children.
            "Story Fact: \"first\"\nStory Fact: \"second\"",
            // Expansion of "first": one grandchild (at the depth bound,
            // so the grandchild itself is never expanded).
            "Story Fact: \"first-child\"",
            // Expansion of "second": nothing.
            "",
        ]);
        let mut root = ReasoningNode::new(NodeKind::DeducedFact, "conclusion");
        let policy = policy(1, &[]);
        expand_tree(&mut root, &policy, &oracle).unwrap();

        let prompts = oracle.prompts.borrow();
        assert_eq!(prompts.len(), 3);
        // When "second" is expanded, the snapshot already contains the
        // grandchild appended under "first".
        assert!(prompts[2].contains("Fact: second"));
        assert!(prompts[2].contains("- first\n- first-child\n- second"));
    }

    #[test]
    fn rule_nodes_are_never_expanded() {
        let oracle = ScriptedOracle::new(&["Rule: \"only a rule\""]);
        let mut root = ReasoningNode::new(NodeKind::DeducedFact, "conclusion");
        let policy = policy(3, &[]);
        expand_tree(&mut root, &policy, &oracle).unwrap();

        // One oracle call for the root; the rule leaf triggered none.
        assert_eq!(oracle.prompts.borrow().len(), 1);
        assert!(root.children[0].children.is_empty());
    }

    #[test]
    fn oracle_failure_propagates() {
        struct Failing;
        impl Oracle for Failing {
            fn complete(&self, _prompt: &str) -> Result<OracleReply, OracleError> {
                Err(OracleError::RequestFailed {
                    message: "boom".into(),
                })
            }
        }

        let mut root = ReasoningNode::new(NodeKind::DeducedFact, "conclusion");
        let policy = policy(2, &[]);
        assert!(expand_tree(&mut root, &policy, &Failing).is_err());
        // Nothing was committed.
        assert!(root.children.is_empty());
    }
}
