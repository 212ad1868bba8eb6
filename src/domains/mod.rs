//! Benchmark domains: template construction, tree completion, narrative
//! generation, and case assembly.
//!
//! A domain bundles everything case generation needs for one kind of
//! question: a rule corpus, prompt skeletons, a forbidden-vocabulary
//! policy, and the logic that turns a (possibly engine-grounded) template
//! into a finished case. Domains are looked up by name; an unknown name is
//! a fatal configuration error.

pub mod home_office;
pub mod joint_assessment;

use rand::RngCore;

use crate::error::{CaseError, ConfigError};
use crate::oracle::{Oracle, render_prompt};
use crate::schema::{GeneratedCase, ReasoningTree, StoryTemplate};
use crate::tree::extract;

/// Default maximum depth for reasoning-tree expansion.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// A benchmark domain.
pub trait Domain {
    /// Registry identifier; also names the per-domain output set.
    fn name(&self) -> &str;

    /// The closed option set for this domain's question.
    fn options(&self) -> Vec<String>;

    /// Stage 1: create gold facts and diversity facts.
    fn construct_template(&self, rng: &mut dyn RngCore) -> StoryTemplate;

    /// Stage 2: expand facts into a full reasoning tree.
    fn complete_reasoning_tree(
        &self,
        template: &StoryTemplate,
        oracle: &dyn Oracle,
    ) -> Result<ReasoningTree, CaseError>;

    /// Stage 3: convert reasoning tree leaves into a narrative.
    fn generate_story(
        &self,
        tree: &ReasoningTree,
        oracle: &dyn Oracle,
    ) -> Result<String, CaseError>;

    /// Puts all the generated pieces together.
    fn assemble_case(
        &self,
        template: &StoryTemplate,
        tree: ReasoningTree,
        narrative: String,
    ) -> GeneratedCase;
}

/// Look up a domain by registry name.
pub fn domain_by_name(name: &str, max_depth: usize) -> Result<Box<dyn Domain>, ConfigError> {
    match name {
        "joint_assessment" => Ok(Box::new(joint_assessment::JointAssessmentDomain::new(
            max_depth,
        ))),
        "grounded_joint_assessment" => Ok(Box::new(
            joint_assessment::GroundedJointAssessmentDomain::new(max_depth),
        )),
        "home_office_deduction" => {
            Ok(Box::new(home_office::HomeOfficeDomain::new(max_depth)))
        }
        _ => Err(ConfigError::UnknownDomain { name: name.into() }),
    }
}

// Shared stage-3/4 plumbing: the current domains narrate and assemble the
// same way, differing only in prompts and option sets.

/// Narrate the tree's story facts through the oracle. Empty output is a
/// named error that aborts this case only.
pub(crate) fn narrate(
    domain: &str,
    narrative_prompt: &str,
    tree: &ReasoningTree,
    oracle: &dyn Oracle,
) -> Result<String, CaseError> {
    let mut facts = extract::story_facts(&tree.root);
    dedup_preserving_order(&mut facts);

    let facts_list = format!("- {}", facts.join("\n- "));
    let prompt = render_prompt(narrative_prompt, &[("facts_list", facts_list.as_str())]);

    let reply = oracle.complete(&prompt)?;
    if reply.text.is_empty() {
        return Err(CaseError::EmptyNarrative {
            domain: domain.into(),
        });
    }
    Ok(reply.text)
}

fn dedup_preserving_order(facts: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    facts.retain(|fact| seen.insert(fact.clone()));
}

/// Pure extraction over the frozen tree plus the template and narrative.
pub(crate) fn assemble(
    domain: &str,
    options: Vec<String>,
    template: &StoryTemplate,
    tree: ReasoningTree,
    narrative: String,
) -> GeneratedCase {
    GeneratedCase {
        domain: domain.into(),
        question: template.question.clone(),
        answer: template.answer.clone(),
        options,
        rule_signals: extract::rule_signals(&tree.root),
        reasoning_trace: extract::format_trace(&tree.root),
        underlying_facts: extract::story_facts(&tree.root),
        narrative,
        reasoning_tree: tree,
    }
}
