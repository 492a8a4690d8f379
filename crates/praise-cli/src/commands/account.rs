use chrono::{DateTime, Utc};
use clap::Subcommand;

use crate::context::{print_events, Context};

#[derive(Subcommand)]
pub enum AccountAction {
    /// Create an account and log into it
    Signup {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        /// Move the current guest streak and journals into the new account
        #[arg(long)]
        adopt_guest: bool,
    },
    /// Log into an existing account
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and return to the guest profile
    Logout,
    /// Show who is logged in
    Whoami,
    /// List the accounts on this device
    List,
}

pub fn run(now: DateTime<Utc>, action: AccountAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open(now)?;

    let events = match action {
        AccountAction::Signup {
            username,
            password,
            email,
            adopt_guest,
        } => ctx.state.signup(&username, &password, &email, adopt_guest, now)?,
        AccountAction::Login { username, password } => ctx.state.login(&username, &password, now)?,
        AccountAction::Logout => ctx.state.logout(now)?,
        AccountAction::Whoami => {
            match ctx.state.current_user() {
                Some(user) => println!("{user}"),
                None => println!("guest"),
            }
            return Ok(());
        }
        AccountAction::List => {
            if ctx.state.accounts.is_empty() {
                println!("No accounts yet. Create one with `praise account signup`.");
            }
            let current = ctx.state.current_user();
            for name in ctx.state.accounts.usernames() {
                let marker = if Some(name) == current { "*" } else { " " };
                println!("{marker} {name}");
            }
            return Ok(());
        }
    };

    ctx.save()?;
    print_events(&events);
    Ok(())
}
