use chrono::{DateTime, Utc};
use clap::Subcommand;
use praise_core::TimeZoneSetting;

use crate::context::{print_events, Context};

#[derive(Subcommand)]
pub enum TzAction {
    /// Print the timezone and what day it is there
    Show,
    /// Use an IANA zone (e.g. "Asia/Shanghai") or "local"
    Set { timezone: TimeZoneSetting },
}

pub fn run(now: DateTime<Utc>, action: TzAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open(now)?;

    match action {
        TzAction::Show => {
            println!("{} ({})", ctx.state.preferences.timezone, ctx.state.today(now));
        }
        TzAction::Set { timezone } => {
            let events = ctx.state.set_timezone(timezone, now);
            ctx.save()?;
            print_events(&events);
            println!("Timezone: {timezone}");
        }
    }
    Ok(())
}
