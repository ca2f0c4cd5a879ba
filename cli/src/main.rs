// msgmap — inspect and edit the invoice → chat message map
//
// Operator tool for the JSON files the bot keeps: which chat message
// belongs to which invoice (or action).

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use msgmap_core::{Identifier, LoadOutcome, MessageRecord, MessageStore, StoreKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "msgmap")]
#[command(about = "Invoice → chat message map", long_about = None)]
#[command(version)]
struct Cli {
    /// Backing JSON file (overrides config and --kind)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Which mapping to use: invoice or action
    #[arg(short, long, global = true)]
    kind: Option<StoreKind>,

    /// Log store activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all entries
    List,
    /// Show the entry for an id
    Get { id: String },
    /// Record the message for an id (replaces any existing entry)
    Set {
        id: String,
        message_id: String,
        chat_id: String,
    },
    /// Forget the entry for an id
    Remove { id: String },
    /// Print the deep link to the message for an id
    Link { id: String },
    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
    Get { key: String },
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Config { action } => cmd_config(action),
        Commands::List => cmd_list(&open_store(cli.store, cli.kind)?),
        Commands::Get { id } => cmd_get(&open_store(cli.store, cli.kind)?, &id),
        Commands::Set {
            id,
            message_id,
            chat_id,
        } => cmd_set(&open_store(cli.store, cli.kind)?, &id, &message_id, &chat_id),
        Commands::Remove { id } => cmd_remove(&open_store(cli.store, cli.kind)?, &id),
        Commands::Link { id } => cmd_link(&open_store(cli.store, cli.kind)?, &id),
    }
}

/// `--store` wins; otherwise the configured data dir plus the file for the kind.
fn open_store(path: Option<PathBuf>, kind: Option<StoreKind>) -> Result<MessageStore> {
    let store = match path {
        Some(path) => MessageStore::open(path).with_kind(kind.unwrap_or_default()),
        None => {
            let config = config::Config::load()?;
            let kind = kind.unwrap_or(config.default_kind);
            MessageStore::in_dir(config.resolve_data_dir()?, kind)
        }
    };

    tracing::debug!("Using {} store at {}", store.kind(), store.path().display());
    Ok(store)
}

fn cmd_list(store: &MessageStore) -> Result<()> {
    let map = match store.load() {
        LoadOutcome::Loaded(map) => map,
        LoadOutcome::Missing => {
            println!(
                "{} ({} does not exist yet)",
                "No entries.".dimmed(),
                store.path().display()
            );
            return Ok(());
        }
        LoadOutcome::Corrupt { reason } | LoadOutcome::Unreadable { reason } => {
            eprintln!(
                "{} {} is unreadable: {}",
                "⚠".yellow(),
                store.path().display(),
                reason
            );
            println!("{}", "No entries.".dimmed());
            return Ok(());
        }
    };

    if map.is_empty() {
        println!("{}", "No entries.".dimmed());
        return Ok(());
    }

    println!(
        "{} ({} {} entries)",
        "Message Map".bold(),
        map.len(),
        store.kind()
    );
    println!();

    for (id, record) in &map {
        println!("  {} {}", "•".bright_green(), id.bright_cyan());
        print_record(record, "    ");
    }

    Ok(())
}

fn cmd_get(store: &MessageStore, id: &str) -> Result<()> {
    match store.get(id) {
        Some(record) => {
            println!("{}", id.bright_cyan().bold());
            print_record(&record, "  ");
        }
        None => println!("{} {}", "Not found:".dimmed(), id),
    }
    Ok(())
}

fn cmd_set(store: &MessageStore, id: &str, message_id: &str, chat_id: &str) -> Result<()> {
    let record = store.upsert(id, Identifier::parse(message_id), Identifier::parse(chat_id))?;

    println!("{} Saved {}", "✓".green(), id.bright_cyan());
    print_record(&record, "  ");
    Ok(())
}

fn cmd_remove(store: &MessageStore, id: &str) -> Result<()> {
    if store.remove(id)? {
        println!("{} Removed {}", "✓".green(), id.bright_cyan());
    } else {
        println!("{} {}", "Nothing to remove for".dimmed(), id);
    }
    Ok(())
}

fn cmd_link(store: &MessageStore, id: &str) -> Result<()> {
    let Some(record) = store.get(id) else {
        anyhow::bail!("No entry for {}", id);
    };

    match record.message_link() {
        Some(link) => println!("{}", link),
        None => anyhow::bail!(
            "Chat {} has no public message links (only -100… supergroup ids do)",
            record.chat_id
        ),
    }
    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = config::Config::load()?;

    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} Set {} = {}", "✓".green(), key.bright_cyan(), value);
        }

        ConfigAction::Get { key } => {
            if let Some(value) = config.get(&key) {
                println!("{} = {}", key.bright_cyan(), value);
            } else if key == "data_dir" {
                println!("{} = {}", key.bright_cyan(), "(auto)".dimmed());
            } else {
                anyhow::bail!("Unknown config key: {}", key);
            }
        }

        ConfigAction::List => {
            println!("{}", "Configuration".bold());
            println!();

            for (key, value) in config.list() {
                println!("  {:<20} {}", key.bright_cyan(), value);
            }

            println!();
            println!(
                "  {:<20} {}",
                "store".bright_cyan(),
                config
                    .resolve_data_dir()?
                    .join(config.default_kind.file_name())
                    .display()
            );
        }
    }

    Ok(())
}

fn print_record(record: &MessageRecord, indent: &str) {
    println!("{}Message: {}", indent, record.message_id);
    println!("{}Chat:    {}", indent, record.chat_id);
    println!("{}Saved:   {}", indent, format_timestamp(record).dimmed());
    if let Some(link) = record.message_link() {
        println!("{}Link:    {}", indent, link.bright_blue());
    }
}

fn format_timestamp(record: &MessageRecord) -> String {
    match record.parsed_timestamp() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => record.timestamp.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_with_kind() {
        let cli = Cli::try_parse_from([
            "msgmap",
            "--kind",
            "action",
            "set",
            "act-7",
            "17",
            "-1004900809502",
        ])
        .unwrap();

        assert_eq!(cli.kind, Some(StoreKind::Action));
        match cli.command {
            Commands::Set {
                id,
                message_id,
                chat_id,
            } => {
                assert_eq!(id, "act-7");
                assert_eq!(Identifier::parse(&message_id), Identifier::Number(17));
                assert_eq!(
                    Identifier::parse(&chat_id),
                    Identifier::Number(-1004900809502)
                );
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_explicit_store_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("custom.json");

        let store = open_store(Some(path.clone()), Some(StoreKind::Action))?;
        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.kind(), StoreKind::Action);

        cmd_set(&store, "inv-1", "555", "42")?;
        assert_eq!(
            store.get("inv-1").unwrap().message_id,
            Identifier::Number(555)
        );
        cmd_remove(&store, "inv-1")?;
        assert!(store.get("inv-1").is_none());
        Ok(())
    }

    #[test]
    fn test_format_timestamp_falls_back_to_raw() {
        let record = MessageRecord {
            message_id: Identifier::Number(1),
            chat_id: Identifier::Number(2),
            timestamp: "sometime".to_string(),
        };
        assert_eq!(format_timestamp(&record), "sometime");

        let record = MessageRecord {
            timestamp: "2024-03-01T09:15:00.000Z".to_string(),
            ..record
        };
        assert_eq!(format_timestamp(&record), "2024-03-01 09:15:00 UTC");
    }
}
