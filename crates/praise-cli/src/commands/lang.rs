use chrono::{DateTime, Utc};
use clap::Subcommand;
use praise_core::Language;

use crate::context::{print_events, Context};

#[derive(Subcommand)]
pub enum LangAction {
    /// Print the current language
    Show,
    /// Switch between English and Chinese
    Toggle,
    /// Set the language explicitly (en or zh)
    Set { language: Language },
}

pub fn run(now: DateTime<Utc>, action: LangAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open(now)?;

    let events = match action {
        LangAction::Show => {
            println!("{}", ctx.state.preferences.language);
            return Ok(());
        }
        LangAction::Toggle => ctx.state.toggle_language(),
        LangAction::Set { language } => ctx.state.set_language(language),
    };
    ctx.save()?;
    print_events(&events);
    Ok(())
}
