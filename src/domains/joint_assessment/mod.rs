//! Joint-assessment benchmark domains.
//!
//! Two variants share the expansion machinery: [`JointAssessmentDomain`]
//! samples its answer freely, while [`GroundedJointAssessmentDomain`]
//! samples a couple input and derives the answer from the assessment
//! engine, so the narrative stays consistent with an exactly reproducible
//! computation.

pub mod prompts;
pub mod rules;

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::error::CaseError;
use crate::oracle::Oracle;
use crate::schema::{GeneratedCase, NodeKind, ReasoningNode, ReasoningTree, StoryTemplate};
use crate::tax::assessment::{Recommendation, compare_assessments};
use crate::tax::sampler::sample_couple_input;
use crate::tax::tariff::{Tariff, Tariff2025};
use crate::tree::{ExpansionPolicy, expand_tree};

use super::{Domain, assemble, narrate};

const QUESTION: &str =
    "Should the couple opt for joint assessment or individual assessment to minimize their tax burden?";

/// Story facts naming the conclusion itself get demoted to deduced facts.
const FORBIDDEN_TERMS: &[&str] = &["joint assessment", "individual assessment"];

const ELIGIBILITY_RULE: &str = "Couples are eligible for joint assessment if married, both are fully liable for tax in Germany and have lived together for at least one day of the assessment year.";

const JOBS: &[&str] = &[
    "Software Engineer",
    "Teacher",
    "Doctor",
    "Graphic Designer",
    "Chef",
    "Mechanic",
    "Nurse",
    "Photographer",
    "Electrician",
    "Plumber",
    "Carpenter",
    "Secretary",
    "Writer",
    "Accountant",
    "Salesperson",
];

const CHILD_WEIGHTS: [f64; 4] = [0.20, 0.24, 0.38, 0.18];

fn sample_children(rng: &mut dyn RngCore) -> u32 {
    WeightedIndex::new(CHILD_WEIGHTS)
        .map(|dist| dist.sample(rng) as u32)
        .unwrap_or(0)
}

fn children_fact(children: u32) -> String {
    match children {
        0 => "The couple has no children.".into(),
        1 => "The couple has 1 child.".into(),
        n => format!("The couple has {n} children."),
    }
}

fn pick<'a>(rng: &mut dyn RngCore, choices: &'a [&'a str]) -> &'a str {
    choices[rng.gen_range(0..choices.len())]
}

fn expansion_policy<'a>(max_depth: usize) -> ExpansionPolicy<'a> {
    ExpansionPolicy {
        max_depth,
        rule_corpus: rules::TAX_RULES,
        forbidden_terms: FORBIDDEN_TERMS,
        prompt: prompts::FACT_EXPANSION_PROMPT,
    }
}

/// Builds the root from a conclusion and seed facts, then expands it.
fn complete_tree(
    conclusion: &str,
    seed_facts: &[String],
    max_depth: usize,
    oracle: &dyn Oracle,
) -> Result<ReasoningTree, CaseError> {
    let mut root = ReasoningNode::new(NodeKind::DeducedFact, conclusion);
    root.children = seed_facts
        .iter()
        .map(|fact| ReasoningNode::new(NodeKind::StoryFact, fact.clone()))
        .collect();

    expand_tree(&mut root, &expansion_policy(max_depth), oracle)?;
    Ok(ReasoningTree { root })
}

fn joint_options() -> Vec<String> {
    vec!["joint".into(), "individual".into()]
}

// ---------------------------------------------------------------------------
// Free-form variant
// ---------------------------------------------------------------------------

/// Joint-assessment cases whose gold answer is sampled, not computed.
pub struct JointAssessmentDomain {
    max_depth: usize,
}

impl JointAssessmentDomain {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Domain for JointAssessmentDomain {
    fn name(&self) -> &str {
        "joint_assessment"
    }

    fn options(&self) -> Vec<String> {
        joint_options()
    }

    fn construct_template(&self, rng: &mut dyn RngCore) -> StoryTemplate {
        let answer = if rng.gen_bool(0.3) {
            Recommendation::Individual
        } else {
            Recommendation::Joint
        };

        let gold_fact = match answer {
            Recommendation::Joint => {
                "The couple is eligible for joint assessment and should opt for it to minimize their tax burden."
            }
            Recommendation::Individual => {
                if rng.gen_bool(0.5) {
                    "The couple is not eligible for joint assessment and must file individual assessments."
                } else {
                    "The couple is eligible for joint assessment, but should opt for individual assessment to minimize their tax burden."
                }
            }
        };

        // Diversity facts add color but never touch the tax decision.
        let diversity_facts = vec![children_fact(sample_children(rng))];

        StoryTemplate {
            gold_facts: vec![gold_fact.into()],
            diversity_facts,
            question: QUESTION.into(),
            answer: answer.as_str().into(),
            rule_signals: None,
            meta_data: serde_json::Map::new(),
        }
    }

    fn complete_reasoning_tree(
        &self,
        template: &StoryTemplate,
        oracle: &dyn Oracle,
    ) -> Result<ReasoningTree, CaseError> {
        // The single gold fact doubles as the expected conclusion; only the
        // diversity facts seed the story level.
        complete_tree(
            &template.gold_facts[0],
            &template.diversity_facts,
            self.max_depth,
            oracle,
        )
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

// ---------------------------------------------------------------------------
// Grounded variant
// ---------------------------------------------------------------------------

/// Samples couple facts and computes the answer with the assessment engine.
pub struct GroundedJointAssessmentDomain {
    max_depth: usize,
    tariff: &'static dyn Tariff,
}

impl GroundedJointAssessmentDomain {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            tariff: &Tariff2025,
        }
    }
}

impl Domain for GroundedJointAssessmentDomain {
    fn name(&self) -> &str {
        "grounded_joint_assessment"
    }

    fn options(&self) -> Vec<String> {
        joint_options()
    }

    fn construct_template(&self, rng: &mut dyn RngCore) -> StoryTemplate {
        let couple = sample_couple_input(rng);
        let result = compare_assessments(&couple, self.tariff);

        let eligible = couple.married
            && couple.a.fully_liable_for_tax
            && couple.b.fully_liable_for_tax
            && couple.live_together;
        // Ineligible couples must file individually no matter the numbers.
        let answer = if eligible {
            result.recommendation
        } else {
            Recommendation::Individual
        };

        // Gold facts are exactly the inputs the decision depends on.
        let mut gold_facts = vec![
            format!(
                "Person A and Person B are {}.",
                if couple.married { "married" } else { "not married" }
            ),
            if couple.a.income > 0.0 {
                format!("Person A has a taxable income of {} euros.", couple.a.income)
            } else {
                "Person A has no taxable income.".into()
            },
            if couple.b.income > 0.0 {
                format!("Person B has a taxable income of {} euros.", couple.b.income)
            } else {
                "Person B has no taxable income.".into()
            },
        ];
        if !couple.a.fully_liable_for_tax {
            gold_facts.push("Person A is not fully liable for tax in Germany.".into());
        }
        if !couple.b.fully_liable_for_tax {
            gold_facts.push("Person B is not fully liable for tax in Germany.".into());
        }
        if couple.live_together {
            gold_facts.push("The couple lived together at least for one day during the year.".into());
        } else {
            gold_facts.push("The couple did not live together at any point during the year.".into());
        }
        if couple.a.wage_replacement > 0.0 {
            gold_facts.push(format!(
                "Person A received {} euros in wage replacement benefits.",
                couple.a.wage_replacement
            ));
        }
        if couple.b.wage_replacement > 0.0 {
            gold_facts.push(format!(
                "Person B received {} euros in wage replacement benefits.",
                couple.b.wage_replacement
            ));
        }
        if couple.a.medical_costs > 0.0 {
            gold_facts.push(format!(
                "Person A paid {} euros in medical costs out of pocket.",
                couple.a.medical_costs
            ));
        }
        if couple.b.medical_costs > 0.0 {
            gold_facts.push(format!(
                "Person B paid {} euros in medical costs out of pocket.",
                couple.b.medical_costs
            ));
        }
        if couple.a.pays_church_tax || couple.b.pays_church_tax {
            gold_facts.push(format!(
                "The church tax rate is {} percent.",
                couple.church_tax_rate * 100.0
            ));
            if couple.a.pays_church_tax && couple.b.pays_church_tax {
                gold_facts.push(
                    "Both Person A and Person B are members of a church that requires church tax."
                        .into(),
                );
            } else if couple.a.pays_church_tax {
                gold_facts
                    .push("Only Person A is a member of a church that requires church tax.".into());
            } else {
                gold_facts
                    .push("Only Person B is a member of a church that requires church tax.".into());
            }
        }

        let mut diversity_facts = vec![
            if couple.a.income > 0.0 {
                format!("Person A is working as a {}.", pick(rng, JOBS))
            } else {
                "Person A is currently unemployed.".into()
            },
            if couple.b.income > 0.0 {
                format!("Person B is working as a {}.", pick(rng, JOBS))
            } else {
                "Person B is currently unemployed.".into()
            },
        ];
        diversity_facts.push(children_fact(couple.children));

        let mut meta_data = serde_json::Map::new();
        meta_data.insert(
            "couple_facts".into(),
            serde_json::to_value(&couple).unwrap_or_default(),
        );

        StoryTemplate {
            gold_facts,
            diversity_facts,
            question: QUESTION.into(),
            answer: answer.as_str().into(),
            rule_signals: Some(vec![ELIGIBILITY_RULE.into()]),
            meta_data,
        }
    }

    fn complete_reasoning_tree(
        &self,
        template: &StoryTemplate,
        oracle: &dyn Oracle,
    ) -> Result<ReasoningTree, CaseError> {
        let conclusion = if template.answer == "individual" {
            "The couple should file individual assessments."
        } else {
            "The couple should opt for joint assessment to minimize their tax burden."
        };

        // All gold and diversity facts seed the story level.
        let seed_facts: Vec<String> = template
            .gold_facts
            .iter()
            .chain(template.diversity_facts.iter())
            .cloned()
            .collect();

        complete_tree(conclusion, &seed_facts, self.max_depth, oracle)
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

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::oracle::{OracleError, OracleReply};

    use super::*;

    /// Never expands; narrative stage echoes a fixed story.
    struct QuietOracle;

    impl Oracle for QuietOracle {
        fn complete(&self, prompt: &str) -> Result<OracleReply, OracleError> {
            if prompt.contains("mini story") {
                Ok(OracleReply::text_only("We married in spring."))
            } else {
                Ok(OracleReply::text_only(""))
            }
        }
    }

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn template_answer_matches_gold_fact() {
        let domain = JointAssessmentDomain::new(1);
        let mut rng = seeded_rng();
        for _ in 0..50 {
            let template = domain.construct_template(&mut rng);
            assert_eq!(template.gold_facts.len(), 1);
            match template.answer.as_str() {
                "joint" => assert!(template.gold_facts[0].contains("should opt for it")),
                "individual" => assert!(
                    template.gold_facts[0].contains("individual assessment")
                        || template.gold_facts[0].contains("individual assessments")
                ),
                other => panic!("unexpected answer {other}"),
            }
        }
    }

    #[test]
    fn grounded_template_records_couple_facts() {
        let domain = GroundedJointAssessmentDomain::new(1);
        let mut rng = seeded_rng();
        let template = domain.construct_template(&mut rng);

        assert!(template.meta_data.contains_key("couple_facts"));
        assert!(template.rule_signals.is_some());
        assert!(matches!(template.answer.as_str(), "joint" | "individual"));
        // The income facts always lead the gold facts.
        assert!(template.gold_facts[0].contains("married"));
    }

    #[test]
    fn grounded_tree_seeds_all_facts_as_story_level() {
        let domain = GroundedJointAssessmentDomain::new(0);
        let mut rng = seeded_rng();
        let template = domain.construct_template(&mut rng);
        let tree = domain
            .complete_reasoning_tree(&template, &QuietOracle)
            .unwrap();

        assert_eq!(tree.root.kind, NodeKind::DeducedFact);
        let seeded = template.gold_facts.len() + template.diversity_facts.len();
        assert_eq!(tree.root.children.len(), seeded);
        assert!(
            tree.root
                .children
                .iter()
                .all(|child| child.kind == NodeKind::StoryFact)
        );
    }

    #[test]
    fn assembled_case_carries_extraction_outputs() {
        let domain = GroundedJointAssessmentDomain::new(0);
        let mut rng = seeded_rng();
        let template = domain.construct_template(&mut rng);
        let tree = domain
            .complete_reasoning_tree(&template, &QuietOracle)
            .unwrap();
        let narrative = domain.generate_story(&tree, &QuietOracle).unwrap();
        let case = domain.assemble_case(&template, tree, narrative);

        assert_eq!(case.domain, "grounded_joint_assessment");
        assert_eq!(case.options, vec!["joint", "individual"]);
        assert!(!case.underlying_facts.is_empty());
        assert!(case.reasoning_trace.contains("(deduced_fact)"));
        assert_eq!(case.narrative, "We married in spring.");
    }
}
