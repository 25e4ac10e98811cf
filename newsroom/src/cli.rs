use clap::{Args, Parser, Subcommand, ValueEnum};
use newsroom_core::config::DEFAULT_EMBEDDING_DIMENSION;

/// Newsroom: ask a question about a few news articles and get an answer grounded in the most
/// relevant one.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Groq API key.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Increase verbosity (use multiple times for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Length of the embedding vectors.
    #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIMENSION, global = true)]
    pub dimension: usize,

    /// How articles and questions are embedded.
    #[arg(long, value_enum, default_value_t = EmbedderKind::Hashing, global = true)]
    pub embedder: EmbedderKind,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Bag-of-words feature hashing. Fast, offline, no model download.
    Hashing,
    /// all-MiniLM-L6-v2 sentence embeddings (requires the `fastembed` feature).
    Fastembed,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch articles and answer a question using the most relevant one.
    Research(ResearchArgs),
    /// List the chat models available to the API key.
    Models,
}

#[derive(Args, Debug)]
pub struct ResearchArgs {
    /// Article URL (repeat for several articles). Prompted for when omitted.
    #[arg(long = "url", short = 'u', value_name = "URL")]
    pub urls: Vec<String>,

    /// The research question. Prompted for when omitted.
    #[arg(long, short)]
    pub query: Option<String>,

    /// Chat model used to write the answer.
    #[arg(long, short)]
    pub model: Option<String>,

    /// Sampling temperature.
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum length of the answer in tokens.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
