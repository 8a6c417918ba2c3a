use crate::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use sentiment_classifiers::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "sentiment-web")]
#[command(author, version, about = "Local sentiment analysis with a single-page UI")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web UI
    Serve {
        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Listen address
        #[arg(short, long)]
        address: Option<String>,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Analyze one text without starting the web UI
    Analyze {
        /// Text to classify
        text: String,

        #[command(flatten)]
        model: ModelArgs,
    },
}

/// Model selection shared by every command
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "sentiment.yaml")]
    pub config: String,

    /// Classifier backend: candle or lexicon
    #[arg(short, long, value_parser = parse_backend)]
    pub backend: Option<BackendKind>,

    /// Model id on the Hugging Face hub, or a local model directory
    #[arg(short, long)]
    pub model: Option<String>,

    /// Inference device: cpu, cuda or metal
    #[arg(long)]
    pub device: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ModelArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend,
            model: self.model.clone(),
            device: self.device.clone(),
            ..Default::default()
        }
    }
}

fn parse_backend(s: &str) -> Result<BackendKind, String> {
    s.parse()
}
