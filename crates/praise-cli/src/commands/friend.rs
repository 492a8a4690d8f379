use chrono::{DateTime, Utc};
use clap::Subcommand;

use crate::context::{print_events, Context};

#[derive(Subcommand)]
pub enum FriendAction {
    /// Follow another local account
    Add { username: String },
    /// Stop following an account
    Remove { username: String },
    /// List friends with their last known streaks
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-read every friend's streak
    Refresh,
}

pub fn run(now: DateTime<Utc>, action: FriendAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open(now)?;

    match action {
        FriendAction::Add { username } => {
            let events = ctx.state.add_friend(&username, now)?;
            ctx.save()?;
            print_events(&events);
        }
        FriendAction::Remove { username } => {
            let events = ctx.state.remove_friend(&username)?;
            ctx.save()?;
            print_events(&events);
        }
        FriendAction::List { json } => {
            let friends = ctx.state.friends()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&friends)?);
            } else if friends.is_empty() {
                println!("No friends yet. Add one with `praise friend add <username>`.");
            } else {
                for f in friends {
                    println!(
                        "{:<16} streak {:>3}  best {:>3}  (as of {})",
                        f.username,
                        f.streak_count,
                        f.best_streak,
                        f.captured_at.format("%Y-%m-%d")
                    );
                }
            }
        }
        FriendAction::Refresh => {
            let events = ctx.state.refresh_friends(now)?;
            ctx.save()?;
            print_events(&events);
        }
    }
    Ok(())
}
