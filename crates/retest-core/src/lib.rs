//! # retest-core
//!
//! **Sample-size planning for test–retest reliability studies.**
//!
//! `retest-core` estimates the test–retest reliability of multi-item
//! categorical questionnaires via a pooled, optionally weighted, Cohen's
//! kappa, and uses bootstrap resampling to answer the question researchers
//! actually have before collecting data: *how many respondents do I need to
//! reliably detect a given agreement level?*
//!
//! ## Quick Start
//!
//! ```
//! use retest_core::{Item, SampleSizeConfig, sample_size_search};
//!
//! // A four-item questionnaire, five uniform choices each.
//! let questions: Vec<Item> = (0..4)
//!     .map(|_| Item::uniform_choices(5).unwrap())
//!     .collect();
//!
//! let config = SampleSizeConfig {
//!     reliability: 0.1,   // agreement level to detect
//!     n_bootstrap: 200,
//!     seed: Some(42),
//!     ..SampleSizeConfig::default()
//! };
//! let result = sample_size_search(&questions, 100, &config).unwrap();
//!
//! println!("need n = {:?}", result.sample_size);
//! for row in &result.sweep {
//!     println!("n={:3}  power={:.2}", row.n, row.power);
//! }
//! ```
//!
//! ## Architecture
//!
//! Sampler → {CI estimator, power search} → reliability injector → pooled
//! kappa → aggregated statistics.
//!
//! - [`sample_questionnaire`] draws synthetic response matrices from a
//!   per-item categorical distribution.
//! - [`make_reliable`] overwrites a controlled fraction of a retest with the
//!   original test, simulating a ground-truth agreement level.
//! - [`pooled_kappa`] is the algorithmic heart: column-wise observed and
//!   expected-random agreements pooled across items (De Vries et al., 2008),
//!   with optional linear or quadratic ordinal weighting.
//! - [`confidence_interval`] and [`sample_size_search`] are bootstrap
//!   orchestration layers over the above.
//!
//! Everything is synchronous, CPU-bound, and free of I/O; randomness is the
//! only side effect, and a seed pins it down completely.

pub mod bootstrap;
pub mod error;
pub mod kappa;
pub mod questionnaire;
pub mod reliability;
pub mod sampler;

pub use bootstrap::{
    CiConfig, CiInfo, SampleSizeConfig, SampleSizeInfo, SweepRow, confidence_interval,
    sample_size_search, sample_size_search_with_progress,
};
pub use error::{Result, RetestError};
pub use kappa::{WeightScheme, pooled_kappa};
pub use questionnaire::Item;
pub use reliability::make_reliable;
pub use sampler::{ResponseMatrix, sample_questionnaire, sample_questionnaire_rng};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
