use std::error::Error;

use retest_core::sample_questionnaire;

use super::QuestionnaireArgs;

pub fn run(
    questionnaire: &QuestionnaireArgs,
    n: usize,
    seed: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let questions = questionnaire.load()?;
    let matrix = sample_questionnaire(&questions, n, seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
        return Ok(());
    }

    // Header: item index per column.
    let header: Vec<String> = (1..=matrix.n_cols()).map(|i| format!("item{i}")).collect();
    println!("{}", header.join(","));
    for row in 0..matrix.n_rows() {
        let labels: Vec<&str> = matrix
            .row(row)
            .iter()
            .enumerate()
            .map(|(col, &v)| questions[col].value(v).unwrap_or("?"))
            .collect();
        println!("{}", labels.join(","));
    }
    Ok(())
}
