//! # fallwerk
//!
//! Synthesizes structured reasoning-benchmark cases for German tax law.
//! Each case is a short narrative that implies a set of underlying facts,
//! a question, and a gold answer, together with an explicit reasoning tree
//! that justifies the answer.
//!
//! ## Architecture
//!
//! - **Assessment engine** (`tax`): exact piecewise income-tax computations
//!   deciding whether joint or individual assessment minimizes a couple's
//!   total liability
//! - **Reasoning trees** (`tree`): depth-bounded recursive expansion of a
//!   root conclusion into a typed claim tree via a text-generation oracle
//! - **Oracle** (`oracle`): synchronous text-generation capability with an
//!   Ollama-backed client
//! - **Domains** (`domains`): per-domain template construction, rule
//!   corpora, prompts, and case assembly
//! - **Pipeline** (`generator`, `evaluate`): case generation with JSONL
//!   persistence and an oracle-backed evaluation harness
//!
//! ## Library usage
//!
//! ```
//! use fallwerk::schema::{CoupleInput, Person};
//! use fallwerk::tax::assessment::{compare_assessments, Recommendation};
//! use fallwerk::tax::tariff::Tariff2025;
//!
//! let couple = CoupleInput {
//!     a: Person { income: 95_000.0, ..Person::default() },
//!     b: Person { income: 22_000.0, ..Person::default() },
//!     ..CoupleInput::default()
//! };
//! let result = compare_assessments(&couple, &Tariff2025);
//! assert_eq!(result.recommendation, Recommendation::Joint);
//! ```

pub mod domains;
pub mod error;
pub mod evaluate;
pub mod generator;
pub mod oracle;
pub mod schema;
pub mod tax;
pub mod tree;
