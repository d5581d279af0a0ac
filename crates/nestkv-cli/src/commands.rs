use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use nestkv_namespace::NamespaceError;
use nestkv_sdk::{GetOptions, Namespace, Storage, StorageConfig, Value};

use crate::cli::*;

const DEFAULT_STORAGE_FILE: &str = "nestkv.json";
const INSTANCE_SELECTOR: &str = "@instance";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let storage = open_storage(&cli)?;
    match cli.command {
        Command::Set(args) => cmd_set(&storage, args),
        Command::Get(args) => cmd_get(&storage, args),
        Command::Rm(args) => cmd_rm(&storage, args),
        Command::Ls(args) => cmd_ls(&storage, args),
        Command::Count(args) => cmd_count(&storage, args),
        Command::Clear(args) => cmd_clear(&storage, args),
        Command::Wipe => cmd_wipe(&storage),
    }
}

fn open_storage(cli: &Cli) -> anyhow::Result<Storage> {
    let mut config = match &cli.config {
        Some(path) => StorageConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StorageConfig::default(),
    };
    if let Some(file) = &cli.file {
        config.storage_file = Some(file.clone());
    }
    if config.storage_file.is_none() {
        config.storage_file = Some(PathBuf::from(DEFAULT_STORAGE_FILE));
    }
    Ok(Storage::from_config(config)?)
}

/// Resolve a namespace argument: a `/` path, or `@instance[:id]`.
pub fn resolve_namespace(storage: &Storage, selector: &str) -> anyhow::Result<Namespace> {
    if let Some(rest) = selector.strip_prefix(INSTANCE_SELECTOR) {
        let id = match rest {
            "" => None,
            _ => Some(
                rest.strip_prefix(':')
                    .with_context(|| format!("expected {INSTANCE_SELECTOR}[:id], got {selector:?}"))?,
            ),
        };
        return Ok(storage.jenkins_instance_namespace(id)?);
    }
    Ok(storage.local_namespace(selector)?)
}

pub fn parse_value(raw: &str, value_type: ValueType) -> anyhow::Result<Value> {
    let value = match value_type {
        ValueType::Text => Value::from(raw),
        ValueType::Json => {
            let json: serde_json::Value =
                serde_json::from_str(raw).with_context(|| format!("invalid JSON: {raw}"))?;
            Value::from(json)
        }
        ValueType::Number => Value::Number(
            raw.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid number: {raw}"))?,
        ),
        ValueType::Bool => Value::Boolean(
            raw.trim()
                .parse::<bool>()
                .with_context(|| format!("invalid boolean: {raw}"))?,
        ),
    };
    Ok(value)
}

fn get_options(args: &GetArgs) -> anyhow::Result<GetOptions> {
    if !args.permit.is_empty() {
        let permitted = args
            .permit
            .iter()
            .map(|raw| parse_value(raw, args.permit_type))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(GetOptions::permitted(permitted))
    } else if args.dot_parent {
        Ok(GetOptions::dot_parent())
    } else {
        Ok(GetOptions::default())
    }
}

fn cmd_set(storage: &Storage, args: SetArgs) -> anyhow::Result<()> {
    let ns = resolve_namespace(storage, &args.namespace)?;
    let value = parse_value(&args.value, args.value_type)?;
    let kind = value.kind();
    ns.set(&args.key, value)?;
    println!("{} {} ({})", "✓".green(), ns.qualify(&args.key).bold(), kind.to_string().cyan());
    Ok(())
}

fn cmd_get(storage: &Storage, args: GetArgs) -> anyhow::Result<()> {
    let ns = resolve_namespace(storage, &args.namespace)?;
    match ns.get_with(&args.key, &get_options(&args)?)? {
        Some(value) => println!("{value}"),
        None => eprintln!("{} {}", "no value:".yellow(), ns.qualify(&args.key)),
    }
    Ok(())
}

fn cmd_rm(storage: &Storage, args: KeyArgs) -> anyhow::Result<()> {
    let ns = resolve_namespace(storage, &args.namespace)?;
    ns.remove(&args.key)?;
    println!("Removed {}", ns.qualify(&args.key).bold());
    Ok(())
}

fn cmd_ls(storage: &Storage, args: ScopeArgs) -> anyhow::Result<()> {
    let ns = resolve_namespace(storage, &args.namespace)?;
    let visited = ns.iterate(!args.no_subspaces, |entry| {
        let value = entry.decode()?;
        println!(
            "{}{}{} = {} ({})",
            entry.namespace.blue(),
            ":".dimmed(),
            entry.key.bold(),
            value,
            value.kind().to_string().dimmed()
        );
        Ok::<(), NamespaceError>(())
    })?;
    if visited == 0 {
        println!("No entries in {}.", ns.name().bold());
    }
    Ok(())
}

fn cmd_count(storage: &Storage, args: ScopeArgs) -> anyhow::Result<()> {
    let ns = resolve_namespace(storage, &args.namespace)?;
    println!("{}", ns.count(!args.no_subspaces)?);
    Ok(())
}

fn cmd_clear(storage: &Storage, args: ScopeArgs) -> anyhow::Result<()> {
    let ns = resolve_namespace(storage, &args.namespace)?;
    let removed = ns.clear(!args.no_subspaces)?;
    println!("{} Cleared {} ({} entries removed)", "✓".green(), ns.name().bold(), removed);
    Ok(())
}

fn cmd_wipe(storage: &Storage) -> anyhow::Result<()> {
    storage.clear_all()?;
    println!("{} Storage wiped.", "✓".green());
    Ok(())
}
