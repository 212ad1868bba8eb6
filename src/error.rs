//! Rich diagnostic error types for the fallwerk pipeline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. The top-level
//! [`FallwerkError`] preserves the full diagnostic chain through to the user.

use miette::Diagnostic;
use thiserror::Error;

use crate::oracle::OracleError;

/// Convenience alias for results carrying the top-level error.
pub type FallwerkResult<T> = std::result::Result<T, FallwerkError>;

/// Top-level error type for the fallwerk pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum FallwerkError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Case(#[from] CaseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dataset(#[from] DatasetError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Fatal configuration errors, surfaced immediately with no partial output.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown domain: \"{name}\"")]
    #[diagnostic(
        code(fallwerk::config::unknown_domain),
        help(
            "Available domains: joint_assessment, grounded_joint_assessment, \
             home_office_deduction."
        )
    )]
    UnknownDomain { name: String },

    #[error("no tariff schedule registered for assessment year {year}")]
    #[diagnostic(
        code(fallwerk::config::unknown_tariff_year),
        help("Currently only the 2025 schedule is bundled.")
    )]
    UnknownTariffYear { year: u16 },
}

// ---------------------------------------------------------------------------
// Per-case errors
// ---------------------------------------------------------------------------

/// Errors during the construction of a single case.
///
/// A failed case is skipped; cases already written are never affected.
#[derive(Debug, Error, Diagnostic)]
pub enum CaseError {
    #[error("narrative stage returned empty text for domain \"{domain}\"")]
    #[diagnostic(
        code(fallwerk::case::empty_narrative),
        help(
            "The model produced no output for the narrative prompt. \
             Retry, or raise max_tokens / adjust temperature."
        )
    )]
    EmptyNarrative { domain: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Oracle(#[from] OracleError),
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Errors reading or writing case records and evaluation datasets.
#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("I/O error on {path}")]
    #[diagnostic(
        code(fallwerk::dataset::io),
        help(
            "Check that the path exists, has correct permissions, \
             and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {message}")]
    #[diagnostic(
        code(fallwerk::dataset::parse),
        help("Each line of a .jsonl dataset must be one self-contained JSON object.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize case record: {message}")]
    #[diagnostic(code(fallwerk::dataset::serialize))]
    Serialize { message: String },

    #[error("unsupported dataset format: {path}")]
    #[diagnostic(
        code(fallwerk::dataset::format),
        help("Datasets must be .json (array of records) or .jsonl (one record per line).")
    )]
    UnsupportedFormat { path: String },
}
