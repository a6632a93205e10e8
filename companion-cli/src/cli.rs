//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "companion")]
#[command(about = "Companion chat CLI: chat, inspect history and context, manage settings", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive chat with a character (`/quit` to leave).
    Chat { character: String },
    /// Print the stored conversation with a character.
    History { character: String },
    /// Print the prompt the next turn would send, with its token usage. Nothing is stored.
    Context { character: String, text: String },
    /// List the characters.
    Characters,
    /// Store the model API key.
    SetKey { key: String },
    /// Store the model name.
    SetModel { model: String },
    /// Delete the conversation with a character.
    Clear { character: String },
}
