//! Error taxonomy for the estimation engine.
//!
//! Two failure classes exist: inputs that are malformed or mutually
//! inconsistent ([`RetestError::Configuration`]), and numeric degeneracy
//! discovered mid-computation ([`RetestError::Computation`]). Every error is
//! raised at the point of detection and never retried or swallowed — the
//! sampler, injector, and kappa estimator are deterministic functions, so an
//! invalid input is a programming error at the call site. The bootstrap
//! procedures deliberately do not skip a failing repetition: silently dropping
//! a resample would bias the resulting distribution.

use thiserror::Error;

/// Errors produced by the retest estimation engine.
#[derive(Debug, Error)]
pub enum RetestError {
    /// Malformed or inconsistent inputs: mismatched matrix shapes, a
    /// reliability fraction outside [0, 1], a weighted request without item
    /// value domains, a probability mass not summing to 1, and the like.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Numeric degeneracy, e.g. an expected random agreement of exactly 1
    /// driving a division by zero in the pooled kappa formula.
    #[error("computation failed: {0}")]
    Computation(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RetestError>;

impl RetestError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        RetestError::Configuration(msg.into())
    }
}
