//! Root CLI structure for idtech-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "idtech-rs")]
#[command(about = "Command-line tools for id Tech 4 model formats", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// MD5 model and animation operations
    Md5 {
        #[command(subcommand)]
        command: crate::commands::md5::Md5Commands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
