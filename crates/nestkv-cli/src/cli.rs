use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nestkv",
    about = "nestkv: namespaced, typed key-value storage files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Storage file (overrides the config file)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ValueType {
    #[default]
    Text,
    Json,
    Number,
    Bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a value in a namespace
    Set(SetArgs),
    /// Read a value from a namespace
    Get(GetArgs),
    /// Remove a value from a namespace
    Rm(KeyArgs),
    /// List the entries of a namespace
    Ls(ScopeArgs),
    /// Count the entries of a namespace
    Count(ScopeArgs),
    /// Remove every entry of a namespace
    Clear(ScopeArgs),
    /// Remove every key from the storage file
    Wipe,
}

/// Namespaces are `/` paths such as `app/settings`. `@instance` selects the
/// reserved instance namespace, `@instance:<id>` one of its per-id variants.
#[derive(Args)]
pub struct KeyArgs {
    pub namespace: String,
    pub key: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[arg(long = "type", value_enum, default_value_t = ValueType::Text)]
    pub value_type: ValueType,
}

#[derive(Args)]
pub struct GetArgs {
    pub namespace: String,
    pub key: String,
    /// Fall back to dot parents of the key ("a.b.c" -> "a.b" -> "a")
    #[arg(long)]
    pub dot_parent: bool,
    /// Only accept these values while walking dot parents (implies --dot-parent)
    #[arg(long = "permit")]
    pub permit: Vec<String>,
    /// How to parse the --permit values
    #[arg(long = "type", value_enum, default_value_t = ValueType::Text)]
    pub permit_type: ValueType,
}

#[derive(Args)]
pub struct ScopeArgs {
    pub namespace: String,
    /// Restrict to the namespace itself, excluding subspaces
    #[arg(long)]
    pub no_subspaces: bool,
}
