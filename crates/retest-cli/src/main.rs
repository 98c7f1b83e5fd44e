//! CLI for retest — sample-size planning for test–retest reliability studies.

mod commands;

use clap::{Parser, Subcommand};

use commands::QuestionnaireArgs;
use retest_core::WeightScheme;

#[derive(Parser)]
#[command(name = "retest")]
#[command(about = "retest — pooled Cohen's kappa reliability estimation and sample-size planning")]
#[command(version = retest_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a synthetic response matrix and print it
    Sample {
        #[command(flatten)]
        questionnaire: QuestionnaireArgs,

        /// Number of respondents to draw
        #[arg(short, long, default_value_t = 10)]
        n: usize,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the matrix as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Simulate a test/retest pair and report its pooled kappa
    Kappa {
        #[command(flatten)]
        questionnaire: QuestionnaireArgs,

        /// Number of respondents per administration
        #[arg(short, long, default_value_t = 100)]
        n: usize,

        /// Ground-truth reliability injected into the retest (0 = independent)
        #[arg(short, long, default_value_t = 0.0)]
        reliability: f64,

        /// Disagreement weighting: none, linear, or quadratic
        #[arg(short, long, default_value_t = WeightScheme::None)]
        weight: WeightScheme,

        /// Seed for a reproducible simulation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Bootstrap the null distribution of pooled kappa at a fixed sample size
    Ci {
        #[command(flatten)]
        questionnaire: QuestionnaireArgs,

        /// Sample size per administration
        #[arg(short, long, default_value_t = 100)]
        n: usize,

        /// Disagreement weighting: none, linear, or quadratic
        #[arg(short, long, default_value_t = WeightScheme::None)]
        weight: WeightScheme,

        /// Number of bootstrap repetitions
        #[arg(short = 'b', long, default_value_t = 1000)]
        bootstrap: usize,

        /// Type I error rate
        #[arg(long, default_value_t = 0.05)]
        alpha: f64,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Find the smallest sample size that reaches a target power
    SampleSize {
        #[command(flatten)]
        questionnaire: QuestionnaireArgs,

        /// Largest candidate sample size
        #[arg(long, default_value_t = 100)]
        max_n: usize,

        /// First candidate sample size
        #[arg(long, default_value_t = 10)]
        start_n: usize,

        /// Spacing between candidate sizes
        #[arg(long, default_value_t = 10)]
        n_step: usize,

        /// Ground-truth reliability the study should detect
        #[arg(short, long, default_value_t = 0.1)]
        reliability: f64,

        /// Disagreement weighting: none, linear, or quadratic
        #[arg(short, long, default_value_t = WeightScheme::None)]
        weight: WeightScheme,

        /// Number of bootstrap repetitions per candidate size
        #[arg(short = 'b', long, default_value_t = 1000)]
        bootstrap: usize,

        /// Type I error rate
        #[arg(long, default_value_t = 0.05)]
        alpha: f64,

        /// Target power
        #[arg(long, default_value_t = 0.8)]
        beta: f64,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the full sweep as JSON instead of a live table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sample {
            questionnaire,
            n,
            seed,
            json,
        } => commands::sample::run(&questionnaire, n, seed, json),
        Commands::Kappa {
            questionnaire,
            n,
            reliability,
            weight,
            seed,
        } => commands::kappa::run(&questionnaire, n, reliability, weight, seed),
        Commands::Ci {
            questionnaire,
            n,
            weight,
            bootstrap,
            alpha,
            seed,
            json,
        } => commands::ci::run(&questionnaire, n, weight, bootstrap, alpha, seed, json),
        Commands::SampleSize {
            questionnaire,
            max_n,
            start_n,
            n_step,
            reliability,
            weight,
            bootstrap,
            alpha,
            beta,
            seed,
            json,
        } => commands::sample_size::run(
            &questionnaire,
            max_n,
            start_n,
            n_step,
            reliability,
            weight,
            bootstrap,
            alpha,
            beta,
            seed,
            json,
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
