use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Relief: ask a migraine assistant questions from the terminal.
#[derive(Parser, Debug)]
#[command(name = "relief", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (e.g. "relief=debug").
    #[arg(long)]
    pub log_level: Option<String>,

    /// Backend base URL, overriding config and environment.
    #[arg(long)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session.
    Login {
        email: String,
        /// Read from RELIEF_PASSWORD, or prompted, when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account.
    Register {
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the remembered session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Ask a single question and print the answer with its sources.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive conversation.
    Chat,
    /// List past questions, newest first.
    History,
    /// Print the effective configuration as JSON.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}
