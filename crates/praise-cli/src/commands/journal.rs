use chrono::{DateTime, Utc};
use clap::Subcommand;
use praise_core::JournalKind;
use uuid::Uuid;

use crate::context::{print_events, Context};

#[derive(Subcommand)]
pub enum JournalAction {
    /// Add an entry
    Add {
        /// gratitude or reflection
        kind: JournalKind,
        /// Entry text
        text: String,
    },
    /// List entries, newest first
    List {
        /// gratitude or reflection
        kind: JournalKind,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry by id
    Delete {
        /// gratitude or reflection
        kind: JournalKind,
        /// Entry id (shown by `journal list`)
        id: Uuid,
    },
}

pub fn run(now: DateTime<Utc>, action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open(now)?;

    match action {
        JournalAction::Add { kind, text } => {
            let events = ctx.state.add_journal(kind, &text, now)?;
            ctx.save()?;
            print_events(&events);
        }
        JournalAction::List { kind, json } => {
            let entries = ctx.state.journal(kind);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No {kind} entries yet.");
            } else {
                for entry in entries {
                    println!("{}  {}  {}", entry.id, entry.created_at.format("%Y-%m-%d %H:%M"), entry.text);
                }
            }
        }
        JournalAction::Delete { kind, id } => {
            let events = ctx.state.delete_journal(kind, id)?;
            ctx.save()?;
            print_events(&events);
        }
    }
    Ok(())
}
