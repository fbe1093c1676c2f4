//! FoodLens CLI
//!
//! A command-line tool for getting food recommendations, inspecting the
//! fitted attendance model, and writing predictor configuration.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{evaluate, init_config, recommend, tree};
use std::path::PathBuf;
use tracing::debug;

/// FoodLens attendance predictor CLI
#[derive(Parser)]
#[command(name = "foodlens")]
#[command(author, version, about = "CLI for the FoodLens attendance predictor", long_about = None)]
pub struct Cli {
    /// Historical events CSV (can also be set via FOODLENS_DATA env var)
    #[arg(long, global = true, env = "FOODLENS_DATA")]
    pub data: Option<PathBuf>,

    /// Predictor configuration JSON (can also be set via FOODLENS_CONFIG env var)
    #[arg(long, global = true, env = "FOODLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend a food quantity for a planned event
    Recommend(recommend::RecommendArgs),

    /// Fit the model and score it on its own training data
    Evaluate,

    /// Print the fitted decision tree
    Tree {
        /// Write the tree as a JSON document to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Write a predictor configuration file
    InitConfig {
        /// Extra portions added on top of predicted attendance
        #[arg(long)]
        food_buffer: Option<u32>,

        /// Order margin over rsvps used when evaluating the model
        #[arg(long)]
        extra_percent: Option<f64>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    let settings = config::Settings::load()?;
    let paths = settings.resolve(cli.data, cli.config, cli.format);
    debug!(
        data = %paths.data.display(),
        config = %paths.config.display(),
        format = ?paths.format,
        "Resolved inputs"
    );

    match cli.command {
        Commands::Recommend(args) => recommend::run(&paths, args)?,
        Commands::Evaluate => evaluate::run(&paths)?,
        Commands::Tree { output } => tree::run(&paths, output)?,
        Commands::InitConfig {
            food_buffer,
            extra_percent,
            force,
        } => init_config::run(&paths, food_buffer, extra_percent, force)?,
    }

    Ok(())
}
