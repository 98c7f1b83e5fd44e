pub mod ci;
pub mod kappa;
pub mod sample;
pub mod sample_size;

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use retest_core::Item;

/// How the commands obtain their questionnaire: either a uniform synthetic
/// one (`--items`/`--choices`) or a JSON file of items.
#[derive(Args)]
pub struct QuestionnaireArgs {
    /// Number of items in a uniform synthetic questionnaire
    #[arg(long, default_value_t = 4, conflicts_with = "questionnaire")]
    pub items: usize,

    /// Choices per item in a uniform synthetic questionnaire
    #[arg(long, default_value_t = 5, conflicts_with = "questionnaire")]
    pub choices: usize,

    /// JSON questionnaire file: an array of
    /// {"values": [...], "probabilities": [...]} objects
    #[arg(long, short = 'q')]
    pub questionnaire: Option<PathBuf>,
}

impl QuestionnaireArgs {
    /// Load or synthesize the questionnaire, validating every item.
    pub fn load(&self) -> Result<Vec<Item>, Box<dyn Error>> {
        match &self.questionnaire {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .map_err(|e| format!("reading {}: {e}", path.display()))?;
                let items: Vec<Item> = serde_json::from_str(&raw)
                    .map_err(|e| format!("parsing {}: {e}", path.display()))?;
                for (i, item) in items.iter().enumerate() {
                    item.validate()
                        .map_err(|e| format!("{}, item {i}: {e}", path.display()))?;
                }
                Ok(items)
            }
            None => {
                let items: Result<Vec<Item>, _> = (0..self.items)
                    .map(|_| Item::uniform_choices(self.choices))
                    .collect();
                Ok(items?)
            }
        }
    }
}
