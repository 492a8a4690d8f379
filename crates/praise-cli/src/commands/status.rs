use chrono::{DateTime, Utc};

use crate::context::Context;

pub fn run(now: DateTime<Utc>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(now)?;
    // evaluation may have broken a stale streak
    ctx.save()?;

    let report = ctx.state.status(now);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(user) = &report.user {
        println!("User: {user}");
    }
    println!("{} {}", report.streak_text, report.fire.symbol());
    println!("{}", report.best_text);
    println!("{}", report.status_text);
    println!("Today: {} ({})", report.today, report.timezone);
    Ok(())
}
