use std::error::Error;

use retest_core::{WeightScheme, make_reliable, pooled_kappa, sample_questionnaire};

use super::QuestionnaireArgs;

pub fn run(
    questionnaire: &QuestionnaireArgs,
    n: usize,
    reliability: f64,
    weight: WeightScheme,
    seed: Option<u64>,
) -> Result<(), Box<dyn Error>> {
    let questions = questionnaire.load()?;

    let test = sample_questionnaire(&questions, n, seed)?;
    let mut retest = sample_questionnaire(&questions, n, seed.map(|s| s.wrapping_add(1)))?;
    if reliability > 0.0 {
        make_reliable(&mut retest, &test, reliability)?;
    }
    let kappa = pooled_kappa(&test, &retest, weight, Some(&questions))?;

    println!(
        "Simulated test/retest pair: {} respondents x {} items",
        n,
        questions.len()
    );
    println!("  injected reliability: {reliability}");
    println!("  weighting:            {weight}");
    println!("  pooled kappa:         {kappa:.4}");
    Ok(())
}
