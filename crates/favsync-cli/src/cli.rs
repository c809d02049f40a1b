use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "favsync")]
#[command(about = "Keep favorite papers in sync with a GitHub repository")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// CLI profile name for repository configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add papers to the local favorites
    Add {
        /// Paper IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove papers from the local favorites
    #[command(alias = "rm")]
    Remove {
        /// Paper IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List local favorites
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Push local favorites to the remote document
    Sync {
        /// JSON file mapping paper IDs to {title, abs_url, date}
        #[arg(long, value_name = "PATH")]
        metadata: Option<PathBuf>,
    },
    /// Show sync configuration and the last outcome
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the remote document and the merged view of both sides
    Remote {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add remote-only favorites to the local list
    Pull,
    /// Configure CLI repository profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the GitHub access token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Owner of the repository holding favorites
        #[arg(long, value_name = "OWNER")]
        repo_owner: Option<String>,
        /// Name of the repository holding favorites
        #[arg(long, value_name = "NAME")]
        repo_name: Option<String>,
        /// Branch receiving favorites commits (default: data)
        #[arg(long, value_name = "BRANCH")]
        data_branch: Option<String>,
        /// GitHub REST API base URL (default: <https://api.github.com>)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Validate a GitHub access token and store it locally
    Login {
        /// Personal access token (falls back to FAVSYNC_GITHUB_TOKEN)
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Show which login is connected
    Status,
    /// Forget the stored token and login
    Logout,
}
