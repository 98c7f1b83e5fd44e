use std::error::Error;

use retest_core::{CiConfig, WeightScheme, confidence_interval};

use super::QuestionnaireArgs;

pub fn run(
    questionnaire: &QuestionnaireArgs,
    n: usize,
    weight: WeightScheme,
    bootstrap: usize,
    alpha: f64,
    seed: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let questions = questionnaire.load()?;
    let config = CiConfig {
        weight,
        n_bootstrap: bootstrap,
        alpha,
        seed,
    };
    let info = confidence_interval(&questions, n, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!(
        "Null pooled-kappa distribution: {} items, n = {n}, {bootstrap} bootstrap draws",
        questions.len()
    );
    println!("  weighting:   {weight}");
    println!("  mean:        {:+.4}", info.mean);
    println!("  std dev:     {:.4}", info.std_dev);
    println!(
        "  {:.0}% interval: [{:+.4}, {:+.4}]",
        (1.0 - alpha) * 100.0,
        info.lower_bound,
        info.upper_bound
    );
    println!("\nAn observed kappa above the upper bound is unlikely to be chance agreement.");
    Ok(())
}
