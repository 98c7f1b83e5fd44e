use std::error::Error;

use retest_core::{SampleSizeConfig, WeightScheme, sample_size_search_with_progress};

use super::QuestionnaireArgs;

#[allow(clippy::too_many_arguments)]
pub fn run(
    questionnaire: &QuestionnaireArgs,
    max_n: usize,
    start_n: usize,
    n_step: usize,
    reliability: f64,
    weight: WeightScheme,
    bootstrap: usize,
    alpha: f64,
    beta: f64,
    seed: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let questions = questionnaire.load()?;
    let config = SampleSizeConfig {
        weight,
        start_n,
        n_step,
        reliability,
        n_bootstrap: bootstrap,
        alpha,
        beta,
        seed,
    };

    if !json {
        println!(
            "Power sweep: n from {start_n} to {max_n} step {n_step}, \
             detecting reliability {reliability} at power {beta}"
        );
        println!(
            "{:>6} {:>8} {:>12} {:>14} {:>14}",
            "n", "power", "threshold", "mean kappa H0", "mean kappa H1"
        );
    }

    let info = sample_size_search_with_progress(&questions, max_n, &config, |row| {
        if !json {
            println!(
                "{:>6} {:>8.3} {:>12.4} {:>14.4} {:>14.4}",
                row.n, row.power, row.upper_bound_ci, row.mean_kappa_h0, row.mean_kappa_h1
            );
        }
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    match info.sample_size {
        Some(n) => println!("\nSmallest sample size reaching power {beta}: n = {n}"),
        None => println!(
            "\nNo tested sample size reached power {beta}; raise --max-n or lower the target."
        ),
    }
    Ok(())
}
