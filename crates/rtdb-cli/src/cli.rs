use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rtdb",
    about = "Read and write a remote JSON tree over REST",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with host, credential and transport settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Host name, e.g. demo.example.com (overrides config and RTDB_HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Credential sent as `auth` (overrides config and RTDB_AUTH)
    #[arg(long, global = true)]
    pub auth: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read the value at a path
    Get(GetArgs),
    /// Replace the value at a path
    Set(WriteArgs),
    /// Merge children into the value at a path
    Update(WriteArgs),
    /// Append a value under a generated key
    Push(WriteArgs),
    /// Delete the value at a path
    Delete(PathArgs),
    /// Write the server timestamp under PATH/KEY
    Timestamp(TimestampArgs),
    /// Read or replace security rules
    Rules(RulesArgs),
}

#[derive(Args)]
pub struct PathArgs {
    /// Slash-separated path; `/` is the root
    #[arg(default_value = "/")]
    pub path: String,
}

#[derive(Args)]
pub struct GetArgs {
    #[arg(default_value = "/")]
    pub path: String,
    /// Extra query string, e.g. 'orderBy="age"&startAt=21'
    #[arg(short, long)]
    pub query: Option<String>,
    #[arg(long)]
    pub shallow: bool,
    #[arg(long)]
    pub order_by: Option<String>,
    #[arg(long)]
    pub limit_first: Option<u32>,
    #[arg(long)]
    pub limit_last: Option<u32>,
}

#[derive(Args)]
pub struct WriteArgs {
    pub path: String,
    /// JSON value to write
    pub value: String,
    /// Send VALUE as a plain string instead of JSON
    #[arg(long)]
    pub text: bool,
}

#[derive(Args)]
pub struct TimestampArgs {
    pub path: String,
    pub key: String,
}

#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,

    /// Secret used instead of the credential
    #[arg(long, global = true)]
    pub secret: Option<String>,
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// Print the current rules
    Get,
    /// Replace the rules with the given JSON document
    Set { json: String },
}
