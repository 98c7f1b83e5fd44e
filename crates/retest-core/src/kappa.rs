//! Pooled Cohen's kappa over two questionnaire administrations.
//!
//! Implements the pooled kappa of De Vries, Elliott, Kanouse & Teleki (2008),
//! "Using pooled kappa to summarize interrater agreement across many items"
//! (Field Methods 20(3), 272–282): per-column observed and expected-random
//! agreements are each averaged across items, and a single kappa is formed
//! from the pooled pair:
//!
//! ```text
//! k_p = (mean_agreement - mean_expected) / (1 - mean_expected)
//! ```
//!
//! Two weighting families exist and intentionally use *different* expected
//! agreement constructions. The unweighted branch sums products of empirical
//! marginal frequencies over the values actually observed in a column pair.
//! The weighted branches (linear, quadratic) build a contingency table over
//! the item's full declared value domain and weight both the observed table
//! and the independence-expected table by ordinal index distance. Unifying
//! the two would change numeric outputs, so the asymmetry is preserved.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetestError};
use crate::questionnaire::Item;
use crate::sampler::ResponseMatrix;

/// Guard against a vanishing pooled denominator `1 - mean_expected`.
const DEGENERATE_DENOMINATOR: f64 = 1e-12;

/// Disagreement weighting over an ordinal value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightScheme {
    /// Identity weighting: exact matches score 1, everything else 0.
    #[default]
    None,
    /// Partial credit decaying linearly with index distance.
    Linear,
    /// Partial credit decaying with squared index distance.
    Quadratic,
}

impl fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Linear => write!(f, "linear"),
            Self::Quadratic => write!(f, "quadratic"),
        }
    }
}

impl FromStr for WeightScheme {
    type Err = RetestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "linear" => Ok(Self::Linear),
            "quadratic" => Ok(Self::Quadratic),
            other => Err(RetestError::config(format!(
                "unrecognized weight scheme '{other}' (expected none, linear, or quadratic)"
            ))),
        }
    }
}

/// Agreement weight for domain indices `i`, `k` in a domain of size `c`.
///
/// - none: 1 if `i == k`, else 0
/// - linear: `1 - |i - k| / (c - 1)`
/// - quadratic: `1 - (|i - k| / (c - 1))²`
fn weight(scheme: WeightScheme, i: usize, k: usize, c: usize) -> f64 {
    if i == k {
        return 1.0;
    }
    let distance = i.abs_diff(k) as f64 / (c - 1) as f64;
    match scheme {
        WeightScheme::None => 0.0,
        WeightScheme::Linear => 1.0 - distance,
        WeightScheme::Quadratic => 1.0 - distance * distance,
    }
}

/// Compute the pooled Cohen's kappa for two equal-shaped response matrices.
///
/// `questions` is required for the weighted schemes (it supplies each
/// column's declared value domain) and ignored for [`WeightScheme::None`].
///
/// Edge cases: zero rows or zero columns yield `Ok(0.0)`. Mismatched shapes,
/// a weighted request without items, an item count differing from the column
/// count, or a cell outside its item's domain fail with
/// [`RetestError::Configuration`]. A pooled expected agreement of exactly 1
/// fails with [`RetestError::Computation`] instead of dividing by zero.
pub fn pooled_kappa(
    a: &ResponseMatrix,
    b: &ResponseMatrix,
    scheme: WeightScheme,
    questions: Option<&[Item]>,
) -> Result<f64> {
    let (n, m) = a.shape();
    if n == 0 || m == 0 {
        return Ok(0.0);
    }
    if b.shape() != (n, m) {
        return Err(RetestError::config(format!(
            "matrices must share a shape, got {:?} and {:?}",
            a.shape(),
            b.shape()
        )));
    }

    let weighted_items = match scheme {
        WeightScheme::None => None,
        _ => {
            let questions = questions.ok_or_else(|| {
                RetestError::config(format!(
                    "weight scheme '{scheme}' requires the questionnaire items"
                ))
            })?;
            if questions.len() != m {
                return Err(RetestError::config(format!(
                    "questionnaire has {} items but matrices have {m} columns",
                    questions.len()
                )));
            }
            Some(questions)
        }
    };

    let mut sum_agreement = 0.0;
    let mut sum_expected = 0.0;
    for col in 0..m {
        let (agreement, expected) = match weighted_items {
            None => column_agreement_unweighted(a, b, col),
            Some(items) => {
                column_agreement_weighted(a, b, col, scheme, items[col].domain_size())?
            }
        };
        sum_agreement += agreement;
        sum_expected += expected;
    }

    let mean_agreement = sum_agreement / m as f64;
    let mean_expected = sum_expected / m as f64;
    let denominator = 1.0 - mean_expected;
    if denominator.abs() < DEGENERATE_DENOMINATOR {
        return Err(RetestError::Computation(format!(
            "expected random agreement is {mean_expected}, pooled kappa is undefined"
        )));
    }
    Ok((mean_agreement - mean_expected) / denominator)
}

/// Observed and expected-random agreement for one column, identity weighting.
///
/// Observed agreement is the fraction of exactly matching rows. Expected
/// agreement sums, over the values observed in either column, the product of
/// the two empirical marginal frequencies.
fn column_agreement_unweighted(a: &ResponseMatrix, b: &ResponseMatrix, col: usize) -> (f64, f64) {
    let n = a.n_rows();
    let mut matches = 0usize;
    // (count in a, count in b) per observed value; ordered map keeps the
    // float summation order stable across runs.
    let mut counts: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for (va, vb) in a.column(col).zip(b.column(col)) {
        if va == vb {
            matches += 1;
        }
        counts.entry(va).or_default().0 += 1;
        counts.entry(vb).or_default().1 += 1;
    }

    let agreement = matches as f64 / n as f64;
    let expected = counts
        .values()
        .map(|&(ca, cb)| (ca as f64 / n as f64) * (cb as f64 / n as f64))
        .sum();
    (agreement, expected)
}

/// Observed and expected-random agreement for one column under ordinal
/// weighting over the item's declared domain of size `c`.
///
/// The observed side is the sum of the weighted joint-frequency table. The
/// expected side weights the independence table formed from the marginal
/// counts of the unweighted joint-count table: `w(i,k) * row_i * col_k / n²`.
fn column_agreement_weighted(
    a: &ResponseMatrix,
    b: &ResponseMatrix,
    col: usize,
    scheme: WeightScheme,
    c: usize,
) -> Result<(f64, f64)> {
    let n = a.n_rows();

    // Unweighted joint counts over the full declared domain.
    let mut counts = vec![0usize; c * c];
    for (row, (va, vb)) in a.column(col).zip(b.column(col)).enumerate() {
        if va >= c || vb >= c {
            return Err(RetestError::config(format!(
                "row {row}, column {col}: response index {} outside the item's domain of size {c}",
                va.max(vb)
            )));
        }
        counts[va * c + vb] += 1;
    }

    let mut row_sums = vec![0usize; c];
    let mut col_sums = vec![0usize; c];
    for i in 0..c {
        for k in 0..c {
            row_sums[i] += counts[i * c + k];
            col_sums[k] += counts[i * c + k];
        }
    }

    let n_f = n as f64;
    let mut agreement = 0.0;
    let mut expected = 0.0;
    for i in 0..c {
        for k in 0..c {
            let w = weight(scheme, i, k, c);
            agreement += w * counts[i * c + k] as f64 / n_f;
            expected += w * (row_sums[i] * col_sums[k]) as f64 / (n_f * n_f);
        }
    }
    Ok((agreement, expected))
}
