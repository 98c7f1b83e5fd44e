//! Reliability injection for simulated retests.
//!
//! [`make_reliable`] overwrites a controlled fraction of one response matrix
//! with the corresponding cells of another, simulating a ground-truth
//! agreement level between a test and its retest. The overwrite is
//! deterministic and positional: whole leading rows first, then a prefix of
//! one additional row. Row and column order carry no meaning in this model,
//! so the positional bias is harmless for the pooled statistic, but callers
//! must not assume the overwritten cells are uniformly distributed.

use crate::error::{Result, RetestError};
use crate::sampler::ResponseMatrix;

/// Overwrite a fraction `reliability` of the cells of `a` with the matching
/// cells of `b`, in place.
///
/// The overwritten cell count is `round(reliability * n * m)`: first
/// `count / m` whole rows are copied from `b` into `a`, then the first
/// `count % m` cells of the next row. Re-applying the same fraction to the
/// result is a no-op, since the same leading cells are copied again.
///
/// Fails with [`RetestError::Configuration`] when `reliability` is outside
/// [0, 1] or the matrices differ in shape.
pub fn make_reliable(a: &mut ResponseMatrix, b: &ResponseMatrix, reliability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&reliability) {
        return Err(RetestError::config(format!(
            "reliability must be within [0, 1], got {reliability}"
        )));
    }
    if a.shape() != b.shape() {
        return Err(RetestError::config(format!(
            "matrices must share a shape, got {:?} and {:?}",
            a.shape(),
            b.shape()
        )));
    }

    let (n, m) = a.shape();
    if n == 0 || m == 0 {
        return Ok(());
    }

    let n_cells = (reliability * (n * m) as f64).round() as usize;
    let full_rows = n_cells / m;
    let remainder = n_cells % m;

    for row in 0..full_rows {
        a.row_mut(row).copy_from_slice(b.row(row));
    }
    if remainder > 0 {
        a.row_mut(full_rows)[..remainder].copy_from_slice(&b.row(full_rows)[..remainder]);
    }
    Ok(())
}
