//! Home-office deduction benchmark domain.
//!
//! Flatrate-vs-pro-rata cases: whether the working space qualifies as a
//! deductible home office or only the flat rate can be claimed. No
//! forbidden vocabulary; the conclusion terms are safe to surface.

pub mod prompts;
pub mod rules;

use rand::{Rng, RngCore};

use crate::error::CaseError;
use crate::oracle::Oracle;
use crate::schema::{GeneratedCase, NodeKind, ReasoningNode, ReasoningTree, StoryTemplate};
use crate::tree::{ExpansionPolicy, expand_tree};

use super::{Domain, assemble, narrate};

const QUESTION: &str =
    "Can the narrator deduct the pro-rata costs for the home office or should they claim the flatrate?";

const JOBS: &[&str] = &[
    "Software Engineer",
    "Teacher",
    "Graphic Designer",
    "Photographer",
    "Interpreter",
    "Professor",
    "Secretary",
    "Writer",
    "Accountant",
    "Salesperson",
];

pub struct HomeOfficeDomain {
    max_depth: usize,
}

impl HomeOfficeDomain {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Domain for HomeOfficeDomain {
    fn name(&self) -> &str {
        "home_office_deduction"
    }

    fn options(&self) -> Vec<String> {
        vec!["pro-rata".into(), "flatrate".into()]
    }

    fn construct_template(&self, rng: &mut dyn RngCore) -> StoryTemplate {
        let answer = if rng.gen_bool(0.3) {
            "pro-rata"
        } else {
            "flatrate"
        };

        let gold_fact = if answer == "pro-rata" {
            "The home office is eligible and the pro-rata costs can be deducted."
        } else {
            "The home office is not eligible, but the taxpayer can use the home office flatrate."
        };

        let rooms = if rng.gen_bool(0.5) { 2 } else { 3 };
        let diversity_facts = vec![
            format!(
                "The narrator works as a {}.",
                JOBS[rng.gen_range(0..JOBS.len())]
            ),
            format!("The narrator lives in an apartment with {rooms} rooms."),
        ];

        StoryTemplate {
            gold_facts: vec![gold_fact.into()],
            diversity_facts,
            question: QUESTION.into(),
            answer: answer.into(),
            rule_signals: None,
            meta_data: serde_json::Map::new(),
        }
    }

    fn complete_reasoning_tree(
        &self,
        template: &StoryTemplate,
        oracle: &dyn Oracle,
    ) -> Result<ReasoningTree, CaseError> {
        let mut root = ReasoningNode::new(NodeKind::DeducedFact, template.gold_facts[0].clone());
        root.children = template
            .diversity_facts
            .iter()
            .map(|fact| ReasoningNode::new(NodeKind::StoryFact, fact.clone()))
            .collect();

        let policy = ExpansionPolicy {
            max_depth: self.max_depth,
            rule_corpus: rules::TAX_RULES,
            forbidden_terms: &[],
            prompt: prompts::FACT_EXPANSION_PROMPT,
        };
        expand_tree(&mut root, &policy, oracle)?;
        Ok(ReasoningTree { root })
    }

    fn generate_story(
        &self,
        tree: &ReasoningTree,
        oracle: &dyn Oracle,
    ) -> Result<String, CaseError> {
        narrate(self.name(), prompts::NARRATIVE_PROMPT, tree, oracle)
    }

    fn assemble_case(
        &self,
        template: &StoryTemplate,
        tree: ReasoningTree,
        narrative: String,
    ) -> GeneratedCase {
        assemble(self.name(), self.options(), template, tree, narrative)
    }
}
