use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "scriptflow")]
#[command(about = "Turn plain-language requirements into a verified Python CLI script")]
#[command(long_about = "Scriptflow runs your requirements through an evaluate, generate, verify \
                       and revise workflow backed by a language model, and returns a single-file \
                       Python command-line application. Run without arguments for an interactive session.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session (default)
    Interactive,
    /// Generate a script for one set of requirements and exit
    Generate {
        /// Requirements text
        #[arg(required = true, help = "Describe the application, e.g. \"convert temperatures\"")]
        requirements: Vec<String>,
    },
    /// Serve the workflow over HTTP
    Serve {
        /// Address to bind
        #[arg(long, help = "Override server.bind_address, e.g. 0.0.0.0:8080")]
        bind: Option<String>,
    },
    /// Print the workflow's state transition table
    Table,
    /// Write a default configuration file
    Init {
        /// Destination file
        #[arg(long, default_value = "scriptflow.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
