//! Manage the shortcut table stored in a keyboard preferences file
//!
//! Usage:
//!   cargo run -p shortcut_tool -- --store prefs.json list
//!   cargo run -p shortcut_tool -- --store prefs.json add omw "on my way"
//!   cargo run -p shortcut_tool -- --store prefs.json export --output shortcuts.json
//!   cargo run -p shortcut_tool -- --store prefs.json import shortcuts.json

use clap::{Parser, Subcommand};
use softkey_core::{FileStore, ShortcutTable};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "shortcut_tool")]
#[command(about = "List, edit, export and import text-expansion shortcuts")]
struct Args {
    /// Path to the JSON preferences file
    #[arg(short, long)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every shortcut, sorted by trigger
    List,
    /// Add or overwrite a shortcut
    Add { trigger: String, expansion: String },
    /// Rename and/or change an existing shortcut
    Update {
        old_trigger: String,
        new_trigger: String,
        expansion: String,
    },
    /// Remove a shortcut
    Remove { trigger: String },
    /// Export all shortcuts as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge shortcuts from a JSON export
    Import { input: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let table = ShortcutTable::new(Arc::new(FileStore::new(&args.store)));

    match args.command {
        Command::List => {
            let shortcuts = table.list();
            if shortcuts.is_empty() {
                println!("(no shortcuts)");
            }
            for s in shortcuts {
                println!("{:<12} {}", s.trigger, s.expansion);
            }
        }
        Command::Add { trigger, expansion } => {
            if !table.add(&trigger, &expansion) {
                anyhow::bail!("rejected: trigger must be one word and expansion non-empty");
            }
            println!("added {}", trigger.trim().to_lowercase());
        }
        Command::Update {
            old_trigger,
            new_trigger,
            expansion,
        } => {
            if !table.has(&old_trigger) {
                anyhow::bail!("no shortcut for '{}'", old_trigger);
            }
            if !table.update(&old_trigger, &new_trigger, &expansion) {
                anyhow::bail!("rejected: trigger must be one word and expansion non-empty");
            }
            println!("updated {}", new_trigger.trim().to_lowercase());
        }
        Command::Remove { trigger } => {
            if !table.remove(&trigger) {
                anyhow::bail!("no shortcut for '{}'", trigger);
            }
            println!("removed {}", trigger.trim().to_lowercase());
        }
        Command::Export { output } => {
            let json = table.export_json()?;
            if let Some(path) = output {
                std::fs::write(path, json)?;
            } else {
                println!("{}", json);
            }
        }
        Command::Import { input } => {
            let json = std::fs::read_to_string(&input)?;
            let added = table.import_json(&json)?;
            println!("imported {} shortcut(s), {} total", added, table.len());
        }
    }

    Ok(())
}
