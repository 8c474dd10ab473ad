// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and all their configurable flags:
//
//   train   fit a model on the intents corpus and save it
//   ask     answer one message
//   chat    answer messages read line by line from stdin
//   status  report whether a saved model loads
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::domain::prediction::DEFAULT_THRESHOLD;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the intent classifier from scratch and save it
    Train(TrainArgs),

    /// Answer a single message (trains first if no model exists)
    Ask(AskArgs),

    /// Interactive chat on stdin (trains first if no model exists)
    Chat(ChatArgs),

    /// Check whether a saved model can be loaded
    Status(StatusArgs),
}

/// Where the corpus and model live. Shared by every command
/// that may need to train.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Intents JSON file (tag / patterns / responses records)
    #[arg(long, default_value = "training_data.json")]
    pub corpus: String,

    /// Model file to write or read
    #[arg(long, default_value = "finance_model.bin")]
    pub model: String,
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub paths: ModelArgs,

    /// Width of the single hidden layer
    #[arg(long, default_value_t = 16)]
    pub hidden_size: usize,

    /// Step size for each single-example update
    #[arg(long, default_value_t = 0.01)]
    pub lr: f64,

    /// Number of full passes over the corpus
    #[arg(long, default_value_t = 2000)]
    pub epochs: usize,

    /// Seed for the initial weights
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Log loss and accuracy every N epochs (0 disables)
    #[arg(long, default_value_t = 200)]
    pub report_every: usize,

    /// Directory for a metrics.csv of the reported values
    #[arg(long)]
    pub metrics_dir: Option<String>,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_path:   a.paths.corpus,
            model_path:    a.paths.model,
            hidden_size:   a.hidden_size,
            learning_rate: a.lr,
            epochs:        a.epochs,
            seed:          a.seed,
            report_every:  a.report_every,
            metrics_dir:   a.metrics_dir,
        }
    }
}

/// Bootstrap training for `ask` / `chat` uses default hyperparameters.
impl From<ModelArgs> for TrainConfig {
    fn from(a: ModelArgs) -> Self {
        TrainConfig {
            corpus_path: a.corpus,
            model_path:  a.model,
            ..TrainConfig::default()
        }
    }
}

/// All arguments for the `ask` command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The message to classify and answer
    #[arg(long)]
    pub message: String,

    #[command(flatten)]
    pub paths: ModelArgs,

    /// Confidence a prediction must exceed to count as known
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f32,
}

/// All arguments for the `chat` command
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub paths: ModelArgs,

    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f32,
}

/// All arguments for the `status` command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Model file to check
    #[arg(long, default_value = "finance_model.bin")]
    pub model: String,
}
