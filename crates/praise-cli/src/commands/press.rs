//! The main button.

use chrono::{DateTime, Utc};
use praise_core::{Event, FeedbackError, FeedbackSink, Milestone};

use crate::context::{print_events, Context};

/// Prints praise to the terminal in place of audio and vibration.
struct ConsoleSink;

impl FeedbackSink for ConsoleSink {
    fn play_phrase(&mut self, phrase: &str) -> Result<(), FeedbackError> {
        println!("♪ {phrase}");
        Ok(())
    }

    fn vibrate(&mut self, millis: u32) -> Result<(), FeedbackError> {
        tracing::debug!(millis, "vibrate");
        Ok(())
    }

    fn celebrate(&mut self, milestone: Milestone, message: &str) -> Result<(), FeedbackError> {
        let symbol = if milestone.is_gold() { "✨" } else { "🎉" };
        let burst = symbol.repeat((milestone.confetti() / 5) as usize);
        println!("{burst} {message} {burst}");
        Ok(())
    }
}

pub fn run(now: DateTime<Utc>) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open(now)?;
    let phrases = ctx.config.praise.phrases.clone();
    let haptics = ctx.config.praise.haptics;

    let (events, praise) = ctx.state.press(now, &phrases, haptics, &mut rand::thread_rng());
    ctx.save()?;

    print_events(&events);
    praise.deliver(&mut ConsoleSink);

    let language = ctx.state.preferences.language;
    for event in &events {
        match event {
            Event::CheckedIn { streak, new_best, .. } => {
                let fire = praise_core::FireTier::for_streak(*streak).symbol();
                println!("{} {fire}", language.streak_line(*streak));
                if *new_best && *streak > 1 {
                    println!("{}", language.best_line(*streak));
                }
            }
            Event::AlreadyCheckedIn { .. } => println!("{}", language.checked_in()),
            _ => {}
        }
    }
    Ok(())
}
