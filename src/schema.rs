//! Core data model: persons, couples, reasoning trees, and case records.
//!
//! Everything here serializes with serde; the wire field names define the
//! case-record format, so they are stable (`node_type`, not `kind`).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Assessment inputs
// ---------------------------------------------------------------------------

/// One taxpayer. Immutable once sampled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Taxable income in euros.
    pub income: f64,
    /// Church membership triggering the church charge.
    #[serde(default)]
    pub pays_church_tax: bool,
    /// Tax-free wage replacement (Elterngeld, Krankengeld, ALG1, Kurzarbeit).
    /// Affects only the rate on the taxable income, never the base.
    #[serde(default)]
    pub wage_replacement: f64,
    /// Out-of-pocket medical costs; only the part above an income-dependent
    /// threshold is deductible.
    #[serde(default)]
    pub medical_costs: f64,
    /// False for people with no residence in Germany.
    #[serde(default = "default_true")]
    pub fully_liable_for_tax: bool,
}

impl Default for Person {
    fn default() -> Self {
        Self {
            income: 0.0,
            pays_church_tax: false,
            wage_replacement: 0.0,
            medical_costs: 0.0,
            fully_liable_for_tax: true,
        }
    }
}

/// The couple under assessment. Produced once per case by the sampler,
/// consumed only by the assessment engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoupleInput {
    pub a: Person,
    pub b: Person,
    /// 9% typical; 8% in Bavaria and Baden-Württemberg.
    #[serde(default = "default_church_tax_rate")]
    pub church_tax_rate: f64,
    #[serde(default = "default_true")]
    pub married: bool,
    #[serde(default)]
    pub children: u32,
    /// True if the couple lived together for at least one day of the year.
    #[serde(default = "default_true")]
    pub live_together: bool,
}

impl Default for CoupleInput {
    fn default() -> Self {
        Self {
            a: Person::default(),
            b: Person::default(),
            church_tax_rate: default_church_tax_rate(),
            married: true,
            children: 0,
            live_together: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_church_tax_rate() -> f64 {
    0.09
}

// ---------------------------------------------------------------------------
// Reasoning trees
// ---------------------------------------------------------------------------

/// Closed set of claim kinds in a reasoning tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A detail stated directly by the eventual narrative.
    StoryFact,
    /// An abstract rule justifying an inference; always a leaf.
    RuleFact,
    /// An intermediate conclusion that must not surface verbatim.
    DeducedFact,
}

impl NodeKind {
    /// Wire-format name, also used in the human-readable trace.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::StoryFact => "story_fact",
            NodeKind::RuleFact => "rule_fact",
            NodeKind::DeducedFact => "deduced_fact",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single node in the reasoning tree. Children are owned exclusively by
/// their parent and only ever appended, so the structure is a tree by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningNode {
    pub statement: String,
    #[serde(rename = "node_type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<ReasoningNode>,
}

impl ReasoningNode {
    /// A childless node of the given kind.
    pub fn new(kind: NodeKind, statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            kind,
            children: Vec::new(),
        }
    }
}

/// The complete reasoning tree for a case; frozen once the build finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningTree {
    pub root: ReasoningNode,
}

// ---------------------------------------------------------------------------
// Templates and cases
// ---------------------------------------------------------------------------

/// Stage-1 output: the facts a story must be built around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryTemplate {
    /// Facts relevant to the gold answer, in presentation order.
    pub gold_facts: Vec<String>,
    /// Context facts that enrich the story without affecting the answer.
    pub diversity_facts: Vec<String>,
    pub question: String,
    pub answer: String,
    /// Rule hints the case should trigger, when the domain knows them upfront.
    #[serde(default)]
    pub rule_signals: Option<Vec<String>>,
    /// Opaque provenance, e.g. the sampled couple input that grounds the case.
    #[serde(default)]
    pub meta_data: serde_json::Map<String, serde_json::Value>,
}

/// The final, complete output for a single generated case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCase {
    pub domain: String,

    /// The first-person narrative.
    pub narrative: String,

    /// Flattened story facts the narrative must imply.
    pub underlying_facts: Vec<String>,

    /// The rule(s) / heuristic(s) the case should trigger.
    pub rule_signals: Vec<String>,

    /// Human-readable indented reasoning trace.
    pub reasoning_trace: String,

    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub options: Vec<String>,

    /// The raw tree.
    pub reasoning_tree: ReasoningTree,
}

/// Output of one evaluation-workflow run over a single example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutput {
    pub predicted_answer: String,
    pub reasoning: String,
    #[serde(default)]
    pub token_usage: serde_json::Map<String, serde_json::Value>,
}
