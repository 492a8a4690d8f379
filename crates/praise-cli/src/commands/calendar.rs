use chrono::{DateTime, Utc};
use clap::Args;
use praise_core::{MonthView, YearMonth};

use crate::context::Context;

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM). Defaults to the current month
    #[arg(long)]
    month: Option<YearMonth>,
    /// Show the month after
    #[arg(long, conflicts_with = "prev")]
    next: bool,
    /// Show the month before
    #[arg(long)]
    prev: bool,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(now: DateTime<Utc>, args: CalendarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(now)?;
    let today = ctx.state.today(now);

    let mut month = args.month.unwrap_or_else(|| YearMonth::of(today));
    if args.next {
        month = month.next();
    }
    if args.prev {
        month = month.prev();
    }

    let view = MonthView::build(month, &ctx.state.active_profile().streak.history, today);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view.render());
        println!("{} day(s) checked in", view.checked_in_days);
    }
    Ok(())
}
