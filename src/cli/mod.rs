pub mod config;
pub mod generate;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

#[derive(Parser)]
#[command(name = "ragctx")]
#[command(about = "Context-aware text generation backed by an in-session vector store")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate text for one or more prompts, in order
    Generate {
        /// Prompts to run; later prompts can draw on earlier outputs
        #[arg(required = true)]
        prompts: Vec<String>,
        /// System instruction sent with every prompt
        #[arg(short, long)]
        system: Option<String>,
        /// Number of context chunks to retrieve (overrides config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Do not feed outputs back into the store
        #[arg(long)]
        no_memory: bool,
    },
    /// Manage configuration values in ~/.ragctx/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a config value
    Get {
        /// Config key (e.g. google-ai-api-key, top-k)
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Remove a config value, restoring its default
    Unset {
        /// Config key
        key: String,
    },
    /// List all configured values
    List,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let rt = Runtime::new()?;

        rt.block_on(async {
            match self.command {
                Commands::Generate {
                    prompts,
                    system,
                    top_k,
                    no_memory,
                } => generate::handle_generate_command(prompts, system, top_k, no_memory).await,
                Commands::Config { command } => match command {
                    ConfigCommands::Get { key } => config::handle_get_command(key),
                    ConfigCommands::Set { key, value } => config::handle_set_command(key, value),
                    ConfigCommands::Unset { key } => config::handle_unset_command(key),
                    ConfigCommands::List => config::handle_list_command(),
                },
            }
        })
    }
}
