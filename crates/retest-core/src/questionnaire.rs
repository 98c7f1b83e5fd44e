//! Questionnaire item definitions.
//!
//! An [`Item`] pairs an ordered value domain with a probability mass over it.
//! A questionnaire is an ordered slice of items; response matrices align with
//! it column-by-column by index. Items are validated once at construction and
//! immutable afterwards, so every downstream component can assume the
//! probabilities sum to 1 and align 1:1 with the values.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetestError};

/// Tolerance when checking that a probability mass sums to 1.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// A single questionnaire item: an ordered set of possible response values
/// and the probability of each being chosen.
///
/// The value *order* matters: weighted kappa treats the domain as ordinal and
/// scores disagreements by index distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    values: Vec<String>,
    probabilities: Vec<f64>,
}

impl Item {
    /// Create an item, validating the value/probability pairing.
    ///
    /// Fails with [`RetestError::Configuration`] when fewer than two values
    /// are given, the two vectors differ in length, any probability is
    /// negative or non-finite, or the mass does not sum to 1.
    pub fn new(values: Vec<String>, probabilities: Vec<f64>) -> Result<Self> {
        let item = Item {
            values,
            probabilities,
        };
        item.validate()?;
        Ok(item)
    }

    /// Re-check the construction invariants.
    ///
    /// [`Item::new`] already enforces these; this exists for items that
    /// arrive through deserialization and therefore bypass the constructor.
    pub fn validate(&self) -> Result<()> {
        if self.values.len() < 2 {
            return Err(RetestError::config(format!(
                "an item needs at least 2 possible values, got {}",
                self.values.len()
            )));
        }
        if self.values.len() != self.probabilities.len() {
            return Err(RetestError::config(format!(
                "item has {} values but {} probabilities",
                self.values.len(),
                self.probabilities.len()
            )));
        }
        if self.probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(RetestError::config(
                "item probabilities must be finite and non-negative",
            ));
        }
        let sum: f64 = self.probabilities.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(RetestError::config(format!(
                "item probabilities must sum to 1, got {sum}"
            )));
        }
        Ok(())
    }

    /// Create an item with a uniform probability mass over `values`.
    pub fn uniform(values: Vec<String>) -> Result<Self> {
        let c = values.len();
        if c < 2 {
            return Err(RetestError::config(format!(
                "an item needs at least 2 possible values, got {c}"
            )));
        }
        let probabilities = vec![1.0 / c as f64; c];
        Item::new(values, probabilities)
    }

    /// Create a uniform item over `n_choices` generic labels ("1", "2", …).
    pub fn uniform_choices(n_choices: usize) -> Result<Self> {
        Item::uniform((1..=n_choices).map(|v| v.to_string()).collect())
    }

    /// Ordered value domain.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Probability mass, index-aligned with [`Item::values`].
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of possible values (the `c` in the weight formulas).
    pub fn domain_size(&self) -> usize {
        self.values.len()
    }

    /// Label of the value at `index`, if in range.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}
