//! Case-generation pipeline and JSONL persistence.
//!
//! One case runs through four stages: template construction, reasoning-tree
//! completion, narrative generation, assembly. A failure aborts that case
//! only — the pipeline logs it and continues, and cases already appended to
//! the output set are never touched again.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::domains::Domain;
use crate::error::{CaseError, DatasetError};
use crate::oracle::Oracle;
use crate::schema::GeneratedCase;

/// Orchestrates the case-generation workflow for one domain.
pub struct CaseGenerator<'a> {
    domain: Box<dyn Domain>,
    oracle: &'a dyn Oracle,
}

impl<'a> CaseGenerator<'a> {
    pub fn new(domain: Box<dyn Domain>, oracle: &'a dyn Oracle) -> Self {
        Self { domain, oracle }
    }

    pub fn domain_name(&self) -> &str {
        self.domain.name()
    }

    /// Generate up to `num_cases` cases; failed cases are skipped.
    pub fn generate(&self, num_cases: usize) -> Vec<GeneratedCase> {
        let mut rng = rand::thread_rng();
        self.generate_with_rng(num_cases, &mut rng)
    }

    /// Like [`Self::generate`] with a caller-supplied RNG.
    pub fn generate_with_rng(&self, num_cases: usize, rng: &mut dyn RngCore) -> Vec<GeneratedCase> {
        info!(
            domain = self.domain.name(),
            num_cases, "generating cases"
        );

        let mut cases = Vec::with_capacity(num_cases);
        for index in 0..num_cases {
            match self.generate_one(rng) {
                Ok(case) => {
                    debug!(case = index, "case complete");
                    cases.push(case);
                }
                Err(error) => {
                    warn!(
                        domain = self.domain.name(),
                        case = index,
                        %error,
                        "skipping failed case"
                    );
                }
            }
        }
        cases
    }

    fn generate_one(&self, rng: &mut dyn RngCore) -> Result<GeneratedCase, CaseError> {
        // Stage 1: template construction.
        let template = self.domain.construct_template(rng);

        // Stage 2: reasoning-tree completion.
        let tree = self.domain.complete_reasoning_tree(&template, self.oracle)?;

        // Stage 3: narrative generation.
        let narrative = self.domain.generate_story(&tree, self.oracle)?;

        // Final assembly.
        Ok(self.domain.assemble_case(&template, tree, narrative))
    }
}

/// Append cases to `<dir>/<domain>_cases.jsonl`, one self-describing record
/// per line. Records are appended, never rewritten in place.
pub fn append_cases(
    dir: &Path,
    domain: &str,
    cases: &[GeneratedCase],
) -> Result<PathBuf, DatasetError> {
    std::fs::create_dir_all(dir).map_err(|source| DatasetError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let path = dir.join(format!("{domain}_cases.jsonl"));
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;

    for case in cases {
        let line = serde_json::to_string(case).map_err(|e| DatasetError::Serialize {
            message: e.to_string(),
        })?;
        writeln!(file, "{line}").map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }

    info!(path = %path.display(), count = cases.len(), "appended cases");
    Ok(path)
}
