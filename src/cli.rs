//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// JWT session client that keeps tokens in HTTP-only cookies.
///
/// Tokens returned by login are written to the same-origin cookie endpoint and
/// read back before every protected call; expired access tokens are refreshed
/// transparently.
#[derive(Parser, Debug)]
#[command(name = "cookie-auth")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/cookie-auth/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the remote auth API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Origin serving the /api/cookies endpoint
    #[arg(long, global = true, conflicts_with = "in_memory")]
    pub gateway_url: Option<String>,

    /// Keep cookies in process memory instead of calling a cookie endpoint
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// Per-request timeout in seconds (1-3600)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in and store the issued tokens as cookies
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,
        /// Account password
        #[arg(short, long)]
        password: String,
        /// Fetch the current user right after logging in
        #[arg(long)]
        fetch_me: bool,
    },
    /// Show the signed-in user
    Me,
    /// Show a user from the public listing
    User {
        /// User id
        id: u32,
    },
    /// Show a random demo user whose credentials can be used to log in
    DummyUser,
}
