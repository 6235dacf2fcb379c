use clap::Parser;
use detector::{ForestParams, DEFAULT_MODEL_PATH};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Where to write the model artifact
    #[arg(
        long,
        help = "Where to write the model artifact (defaults to $MODEL_PATH, then model.json beside the scoring crate)"
    )]
    output: Option<String>,

    /// Seed for the synthetic corpus; random when omitted
    #[arg(long, help = "Seed for the synthetic corpus; random when omitted")]
    data_seed: Option<u64>,

    /// Seed for tree construction
    #[arg(long, default_value_t = 42, help = "Seed for tree construction")]
    seed: u64,

    /// Number of isolation trees
    #[arg(long, default_value_t = 100, help = "Number of isolation trees")]
    trees: usize,

    /// Expected share of outliers in the corpus
    #[arg(
        long,
        default_value_t = 0.1,
        help = "Expected share of outliers in the corpus"
    )]
    contamination: f64,
}

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub output: PathBuf,
    pub data_seed: Option<u64>,
    pub forest: ForestParams,
}

impl TrainConfig {
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        let cli = Cli::parse();

        let output = cli
            .output
            .or_else(|| std::env::var("MODEL_PATH").ok())
            .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());

        Self {
            output: PathBuf::from(output),
            data_seed: cli.data_seed,
            forest: ForestParams {
                n_estimators: cli.trees,
                contamination: cli.contamination,
                random_state: cli.seed,
                ..ForestParams::default()
            },
        }
    }
}
