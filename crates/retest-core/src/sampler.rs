//! Categorical questionnaire sampler.
//!
//! Draws synthetic [`ResponseMatrix`] instances: n respondents × m items,
//! each cell sampled independently from its column's item probability mass.
//! Cells hold *category indices* into the owning item's value domain, which
//! is the ordinal-indexable representation the weighted kappa variants need;
//! [`Item::value`](crate::Item::value) maps an index back to its label.
//!
//! Two entry points exist. [`sample_questionnaire`] takes an optional seed
//! and builds its own generator. [`sample_questionnaire_rng`] threads a
//! caller-owned RNG through the draw, which is what the bootstrap procedures
//! use so that one seed governs an entire resampling run and independent
//! workers can each own their own stream.

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RetestError};
use crate::questionnaire::Item;

/// An n×m matrix of categorical responses, row-major.
///
/// Rows are respondents, columns align 1:1 with the questionnaire's item
/// sequence. Each cell is an index into the corresponding item's value
/// domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMatrix {
    n_rows: usize,
    n_cols: usize,
    cells: Vec<usize>,
}

impl ResponseMatrix {
    /// Build a matrix from row-major cells.
    ///
    /// Fails with [`RetestError::Configuration`] when the cell count does not
    /// equal `n_rows * n_cols`.
    pub fn from_cells(n_rows: usize, n_cols: usize, cells: Vec<usize>) -> Result<Self> {
        if cells.len() != n_rows * n_cols {
            return Err(RetestError::config(format!(
                "expected {} cells for a {n_rows}x{n_cols} matrix, got {}",
                n_rows * n_cols,
                cells.len()
            )));
        }
        Ok(ResponseMatrix {
            n_rows,
            n_cols,
            cells,
        })
    }

    /// Number of respondents (rows).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of items (columns).
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// `(rows, columns)` pair.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Cell at `(row, col)`.
    ///
    /// # Panics
    /// Panics when the position is out of bounds, like slice indexing.
    pub fn get(&self, row: usize, col: usize) -> usize {
        assert!(row < self.n_rows && col < self.n_cols, "cell out of bounds");
        self.cells[row * self.n_cols + col]
    }

    /// One respondent's responses across all items.
    pub fn row(&self, row: usize) -> &[usize] {
        let start = row * self.n_cols;
        &self.cells[start..start + self.n_cols]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [usize] {
        let start = row * self.n_cols;
        &mut self.cells[start..start + self.n_cols]
    }

    /// All responses to one item, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = usize> + '_ {
        assert!(col < self.n_cols, "column out of bounds");
        self.cells.iter().skip(col).step_by(self.n_cols).copied()
    }
}

/// Draw an n-row response matrix for `questions`.
///
/// With `seed` given, output is bit-identical across runs for identical
/// inputs; without it, a fresh OS-seeded generator is used.
pub fn sample_questionnaire(
    questions: &[Item],
    n: usize,
    seed: Option<u64>,
) -> Result<ResponseMatrix> {
    let mut rng = rng_from_seed(seed);
    sample_questionnaire_rng(questions, n, &mut rng)
}

/// Draw an n-row response matrix using a caller-owned RNG.
pub fn sample_questionnaire_rng<R: Rng + ?Sized>(
    questions: &[Item],
    n: usize,
    rng: &mut R,
) -> Result<ResponseMatrix> {
    let distributions = item_distributions(questions)?;
    let m = questions.len();
    let mut cells = Vec::with_capacity(n * m);
    for _ in 0..n {
        for dist in &distributions {
            cells.push(dist.sample(rng));
        }
    }
    ResponseMatrix::from_cells(n, m, cells)
}

/// Build an `StdRng`, seeded when requested, OS-seeded otherwise.
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// One categorical distribution per item, validated.
fn item_distributions(questions: &[Item]) -> Result<Vec<WeightedIndex<f64>>> {
    questions
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.validate()
                .map_err(|e| RetestError::config(format!("item {i}: {e}")))?;
            WeightedIndex::new(item.probabilities().iter().copied())
                .map_err(|e| RetestError::config(format!("item {i}: {e}")))
        })
        .collect()
}
