use clap::{Parser, Subcommand};

/// A journaling client with sentiment tagging
#[derive(Parser, Debug)]
#[clap(name = "moodlog", about = "A journaling client with sentiment tagging")]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in
    SignUp {
        /// Email address to register
        email: String,
    },

    /// Sign in with an existing account
    SignIn {
        /// Email address of the account
        email: String,
    },

    /// Sign out and clear the cached session
    SignOut,

    /// Save a journal entry (reads stdin when TEXT is omitted)
    Write {
        /// The entry text
        text: Option<String>,
    },

    /// List saved entries, most recent first
    List,
}
