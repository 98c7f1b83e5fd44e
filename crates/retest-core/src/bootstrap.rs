//! Bootstrap procedures built on the sampler and the pooled kappa estimator.
//!
//! Two orchestration layers live here:
//!
//! - [`confidence_interval`] characterizes the *null* sampling distribution
//!   of pooled kappa for two fully independent administrations of a
//!   questionnaire at a fixed sample size. It is an under-the-null noise
//!   floor, not an interval around an observed empirical kappa.
//! - [`sample_size_search`] sweeps a grid of candidate sample sizes and, for
//!   each, estimates the power to detect a target injected reliability
//!   against a one-sided threshold taken from the null distribution. The
//!   whole grid is always evaluated; power is expected to grow with n but
//!   that is never assumed.
//!
//! Both procedures thread a single `StdRng` through every draw, so one seed
//! reproduces an entire run bit-for-bit. A failure inside any repetition
//! aborts the whole procedure: skipping a bad resample would bias the
//! resulting distribution.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetestError};
use crate::kappa::{WeightScheme, pooled_kappa};
use crate::questionnaire::Item;
use crate::reliability::make_reliable;
use crate::sampler::{rng_from_seed, sample_questionnaire_rng};

/// Configuration for [`confidence_interval`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiConfig {
    /// Disagreement weighting passed through to the kappa estimator.
    pub weight: WeightScheme,
    /// Number of bootstrap repetitions.
    pub n_bootstrap: usize,
    /// Type I error rate; the interval covers `1 - alpha`.
    pub alpha: f64,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for CiConfig {
    fn default() -> Self {
        CiConfig {
            weight: WeightScheme::default(),
            n_bootstrap: 1000,
            alpha: 0.05,
            seed: None,
        }
    }
}

/// Summary of the empirical kappa distribution from a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CiInfo {
    pub mean: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub std_dev: f64,
}

/// Configuration for [`sample_size_search`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSizeConfig {
    /// Disagreement weighting passed through to the kappa estimator.
    pub weight: WeightScheme,
    /// First candidate sample size.
    pub start_n: usize,
    /// Spacing of the candidate grid.
    pub n_step: usize,
    /// Fraction of retest cells copied from the test under the alternative,
    /// i.e. the ground-truth agreement level to detect.
    pub reliability: f64,
    /// Number of bootstrap repetitions per candidate size and condition.
    pub n_bootstrap: usize,
    /// Type I error rate for the one-sided null threshold.
    pub alpha: f64,
    /// Target power.
    pub beta: f64,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SampleSizeConfig {
    fn default() -> Self {
        SampleSizeConfig {
            weight: WeightScheme::default(),
            start_n: 10,
            n_step: 10,
            reliability: 0.1,
            n_bootstrap: 1000,
            alpha: 0.05,
            beta: 0.8,
            seed: None,
        }
    }
}

/// One row of the power sweep: a candidate sample size and what the
/// bootstrap saw there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Candidate sample size.
    pub n: usize,
    /// Fraction of alternative-condition kappas above the null threshold.
    pub power: f64,
    /// One-sided upper critical value taken from the null distribution.
    pub upper_bound_ci: f64,
    /// Mean kappa under the null (independent administrations).
    pub mean_kappa_h0: f64,
    /// Mean kappa under the alternative (injected reliability).
    pub mean_kappa_h1: f64,
}

/// Outcome of a sample-size search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeInfo {
    /// Smallest tested n reaching the target power, if any did.
    pub sample_size: Option<usize>,
    /// Every tested candidate, in increasing n.
    pub sweep: Vec<SweepRow>,
}

/// Estimate the null sampling distribution of pooled kappa at sample size `n`
/// and report its mean, standard deviation, and two-sided percentile bounds.
///
/// Each repetition draws two independent n-row matrices for `questions` and
/// computes their pooled kappa. The sorted empirical distribution yields the
/// bounds at ranks `⌊B·α/2⌋` and `⌊B·(1−α/2)⌋`.
pub fn confidence_interval(questions: &[Item], n: usize, config: &CiConfig) -> Result<CiInfo> {
    validate_bootstrap_params(config.n_bootstrap, config.alpha)?;

    let mut rng = rng_from_seed(config.seed);
    let b = config.n_bootstrap;
    let mut kappas = Vec::with_capacity(b);
    for _ in 0..b {
        let samples_a = sample_questionnaire_rng(questions, n, &mut rng)?;
        let samples_b = sample_questionnaire_rng(questions, n, &mut rng)?;
        kappas.push(pooled_kappa(
            &samples_a,
            &samples_b,
            config.weight,
            Some(questions),
        )?);
    }
    kappas.sort_by(f64::total_cmp);

    let lower_bound = percentile(&kappas, config.alpha / 2.0);
    let upper_bound = percentile(&kappas, 1.0 - config.alpha / 2.0);
    let (mean, std_dev) = mean_and_std(&kappas);
    Ok(CiInfo {
        mean,
        lower_bound,
        upper_bound,
        std_dev,
    })
}

/// Find the smallest sample size in `{start_n, start_n + n_step, …, ≤ max_n}`
/// whose estimated power to detect the configured reliability reaches
/// `config.beta`.
///
/// Per candidate n and repetition, one independent matrix pair gives a null
/// kappa and a second, reliability-injected pair gives an alternative kappa.
/// The null threshold is the sorted null kappa at rank `⌊B·(1−α)⌋`; power is
/// the fraction of alternative kappas strictly above it. The full sweep is
/// returned alongside the selection, which is `None` when no candidate
/// qualifies.
pub fn sample_size_search(
    questions: &[Item],
    max_n: usize,
    config: &SampleSizeConfig,
) -> Result<SampleSizeInfo> {
    sample_size_search_with_progress(questions, max_n, config, |_| {})
}

/// [`sample_size_search`] with a per-row observer, called after each
/// candidate size finishes. Long sweeps are slow; this is the hook for
/// progress rendering, which is deliberately not part of the core.
pub fn sample_size_search_with_progress(
    questions: &[Item],
    max_n: usize,
    config: &SampleSizeConfig,
    mut on_row: impl FnMut(&SweepRow),
) -> Result<SampleSizeInfo> {
    validate_bootstrap_params(config.n_bootstrap, config.alpha)?;
    if !(0.0 < config.beta && config.beta <= 1.0) {
        return Err(RetestError::config(format!(
            "beta must be within (0, 1], got {}",
            config.beta
        )));
    }
    if config.n_step == 0 {
        return Err(RetestError::config("n_step must be at least 1"));
    }
    if config.start_n == 0 || config.start_n > max_n {
        return Err(RetestError::config(format!(
            "start_n must be within [1, max_n = {max_n}], got {}",
            config.start_n
        )));
    }
    if !(0.0..=1.0).contains(&config.reliability) {
        return Err(RetestError::config(format!(
            "reliability must be within [0, 1], got {}",
            config.reliability
        )));
    }

    let mut rng = rng_from_seed(config.seed);
    let b = config.n_bootstrap;
    let mut sweep = Vec::new();

    for n in (config.start_n..=max_n).step_by(config.n_step) {
        let mut null_kappas = Vec::with_capacity(b);
        let mut alt_kappas = Vec::with_capacity(b);
        for _ in 0..b {
            let samples_a = sample_questionnaire_rng(questions, n, &mut rng)?;
            let samples_b = sample_questionnaire_rng(questions, n, &mut rng)?;
            null_kappas.push(pooled_kappa(
                &samples_a,
                &samples_b,
                config.weight,
                Some(questions),
            )?);

            let mut retest = sample_questionnaire_rng(questions, n, &mut rng)?;
            let test = sample_questionnaire_rng(questions, n, &mut rng)?;
            make_reliable(&mut retest, &test, config.reliability)?;
            alt_kappas.push(pooled_kappa(
                &retest,
                &test,
                config.weight,
                Some(questions),
            )?);
        }
        null_kappas.sort_by(f64::total_cmp);

        let threshold = percentile(&null_kappas, 1.0 - config.alpha);
        let power = alt_kappas.iter().filter(|&&k| k > threshold).count() as f64 / b as f64;
        let (mean_kappa_h0, _) = mean_and_std(&null_kappas);
        let (mean_kappa_h1, _) = mean_and_std(&alt_kappas);

        let row = SweepRow {
            n,
            power,
            upper_bound_ci: threshold,
            mean_kappa_h0,
            mean_kappa_h1,
        };
        log::debug!(
            "sweep n={n}: power={power:.3} threshold={threshold:.4} \
             h0={mean_kappa_h0:.4} h1={mean_kappa_h1:.4}"
        );
        on_row(&row);
        sweep.push(row);
    }

    let sample_size = sweep
        .iter()
        .find(|row| row.power >= config.beta)
        .map(|row| row.n);
    Ok(SampleSizeInfo { sample_size, sweep })
}

fn validate_bootstrap_params(n_bootstrap: usize, alpha: f64) -> Result<()> {
    if n_bootstrap == 0 {
        return Err(RetestError::config("n_bootstrap must be at least 1"));
    }
    if !(0.0 < alpha && alpha < 1.0) {
        return Err(RetestError::config(format!(
            "alpha must be within (0, 1), got {alpha}"
        )));
    }
    Ok(())
}

/// Value at sorted rank `⌊len · q⌋`, clamped to the last element.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = ((sorted.len() as f64 * q) as usize).min(sorted.len() - 1);
    sorted[rank]
}

/// Mean and population standard deviation.
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_questionnaire(n_items: usize, n_choices: usize) -> Vec<Item> {
        (0..n_items)
            .map(|_| Item::uniform_choices(n_choices).unwrap())
            .collect()
    }

    #[test]
    fn percentile_ranks() {
        let sorted: Vec<f64> = (0..1000).map(|v| v as f64).collect();
        assert_eq!(percentile(&sorted, 0.025), 25.0);
        assert_eq!(percentile(&sorted, 0.975), 975.0);
        assert_eq!(percentile(&sorted, 0.95), 950.0);
        // Clamped at the top.
        assert_eq!(percentile(&sorted, 1.0), 999.0);
    }

    #[test]
    fn mean_and_std_population() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ci_rejects_bad_params() {
        let questions = uniform_questionnaire(2, 3);
        let mut config = CiConfig {
            n_bootstrap: 0,
            ..CiConfig::default()
        };
        assert!(confidence_interval(&questions, 10, &config).is_err());
        config.n_bootstrap = 100;
        config.alpha = 0.0;
        assert!(confidence_interval(&questions, 10, &config).is_err());
        config.alpha = 1.0;
        assert!(confidence_interval(&questions, 10, &config).is_err());
    }

    #[test]
    fn ci_is_reproducible_under_seed() {
        let questions = uniform_questionnaire(3, 4);
        let config = CiConfig {
            n_bootstrap: 50,
            seed: Some(11),
            ..CiConfig::default()
        };
        let first = confidence_interval(&questions, 20, &config).unwrap();
        let second = confidence_interval(&questions, 20, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn ci_bounds_bracket_the_mean() {
        let questions = uniform_questionnaire(3, 4);
        let config = CiConfig {
            n_bootstrap: 200,
            seed: Some(5),
            ..CiConfig::default()
        };
        let info = confidence_interval(&questions, 50, &config).unwrap();
        assert!(info.lower_bound <= info.mean);
        assert!(info.mean <= info.upper_bound);
        assert!(info.std_dev > 0.0);
    }

    #[test]
    fn search_rejects_bad_grid() {
        let questions = uniform_questionnaire(2, 3);
        let mut config = SampleSizeConfig {
            n_bootstrap: 10,
            seed: Some(1),
            ..SampleSizeConfig::default()
        };
        config.n_step = 0;
        assert!(sample_size_search(&questions, 50, &config).is_err());
        config.n_step = 10;
        config.start_n = 60;
        assert!(sample_size_search(&questions, 50, &config).is_err());
        config.start_n = 10;
        config.reliability = 1.5;
        assert!(sample_size_search(&questions, 50, &config).is_err());
        config.reliability = 0.1;
        config.beta = 0.0;
        assert!(sample_size_search(&questions, 50, &config).is_err());
    }

    #[test]
    fn sweep_covers_the_whole_grid() {
        let questions = uniform_questionnaire(2, 3);
        let config = SampleSizeConfig {
            n_bootstrap: 20,
            start_n: 10,
            n_step: 15,
            seed: Some(3),
            ..SampleSizeConfig::default()
        };
        let info = sample_size_search(&questions, 60, &config).unwrap();
        let sizes: Vec<usize> = info.sweep.iter().map(|row| row.n).collect();
        assert_eq!(sizes, vec![10, 25, 40, 55]);
    }

    #[test]
    fn progress_observer_sees_every_row() {
        let questions = uniform_questionnaire(2, 3);
        let config = SampleSizeConfig {
            n_bootstrap: 10,
            seed: Some(9),
            ..SampleSizeConfig::default()
        };
        let mut seen = Vec::new();
        let info =
            sample_size_search_with_progress(&questions, 40, &config, |row| seen.push(row.n))
                .unwrap();
        assert_eq!(seen, vec![10, 20, 30, 40]);
        assert_eq!(seen.len(), info.sweep.len());
    }

    #[test]
    fn full_reliability_is_detected_immediately() {
        // r = 1 copies the whole retest, so alternative kappas sit at 1 and
        // every candidate size has full power.
        let questions = uniform_questionnaire(3, 4);
        let config = SampleSizeConfig {
            reliability: 1.0,
            n_bootstrap: 50,
            seed: Some(17),
            ..SampleSizeConfig::default()
        };
        let info = sample_size_search(&questions, 30, &config).unwrap();
        assert_eq!(info.sample_size, Some(10));
        assert!(info.sweep[0].power > 0.99);
        assert!((info.sweep[0].mean_kappa_h1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unreachable_power_returns_none_with_full_sweep() {
        // r = 0 injects nothing: the alternative is the null, so power stays
        // around alpha and never reaches beta.
        let questions = uniform_questionnaire(3, 4);
        let config = SampleSizeConfig {
            reliability: 0.0,
            n_bootstrap: 100,
            seed: Some(23),
            ..SampleSizeConfig::default()
        };
        let info = sample_size_search(&questions, 40, &config).unwrap();
        assert_eq!(info.sample_size, None);
        assert_eq!(info.sweep.len(), 4);
        for row in &info.sweep {
            assert!(row.power < 0.5, "n={} power={}", row.n, row.power);
        }
    }
}
