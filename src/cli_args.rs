use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::language::Language;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "prgpt",
    version,
    about = "LLM-assisted GitHub pull request title and description generator"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file holding profiles and the UI language (default ~/.config/prgpt/storage.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Language for prgpt's own messages: zh-CN, zh-TW, en, ja, ko
    #[arg(long, global = true, value_name = "LANG")]
    pub ui_lang: Option<Language>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a pull request title and description from commit messages
    Generate(GenerateArgs),

    /// Manage API credential profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Show or set the display language
    Language {
        /// New display language; omit to show the current one
        lang: Option<Language>,
    },

    /// Check whether a URL is a GitHub pull request comparison page
    CheckUrl { url: String },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// GitHub compare page, e.g. https://github.com/owner/repo/compare/main...feature
    #[arg(long)]
    pub url: Option<String>,

    /// Base branch to compare against (overrides the URL's base)
    #[arg(long)]
    pub base: Option<String>,

    /// Feature branch; defaults to the URL's head or the current branch
    #[arg(long)]
    pub head: Option<String>,

    /// Commit message to summarize instead of reading git history (repeatable)
    #[arg(long = "commit", value_name = "MESSAGE")]
    pub commits: Vec<String>,

    /// PR author; defaults to git config github.user or user.name
    #[arg(long)]
    pub username: Option<String>,

    /// Language of the generated PR text: zh-CN, zh-TW, en, ja, ko
    #[arg(long, value_name = "LANG")]
    pub lang: Option<Language>,

    /// Also write the result to .git/PR_EDITMSG (usable with `gh pr create -F`)
    #[arg(long)]
    pub apply: bool,

    /// Disable model calls; return a dummy result instead
    #[arg(long)]
    pub no_model: bool,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// List all profiles; the active one is marked
    List,

    /// Show the active profile
    Show,

    /// Create a profile (OpenAI defaults, no key) and optionally fill in fields
    Add {
        /// Display name for the profile
        name: Option<String>,

        #[command(flatten)]
        fields: ProfileFields,
    },

    /// Change fields of an existing profile
    Update {
        /// Profile id or name
        profile: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: ProfileFields,
    },

    /// Delete a profile (the last remaining one cannot be deleted)
    Delete {
        /// Profile id or name
        profile: String,
    },

    /// Make a profile the active one
    Use {
        /// Profile id or name
        profile: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProfileFields {
    /// OpenAI-compatible API base URL, e.g. https://api.openai.com/v1
    #[arg(long)]
    pub base_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name, e.g. gpt-4o-mini
    #[arg(long)]
    pub model: Option<String>,
}
