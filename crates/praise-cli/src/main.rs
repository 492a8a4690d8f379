use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "praise", version, about = "Praise machine CLI")]
struct Cli {
    /// Pretend the current time is this RFC 3339 instant
    #[arg(long, global = true, value_parser = parse_instant)]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Press the button: check in for today and get praised
    Press,
    /// Show today's streak status
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a month of check-ins
    Calendar(commands::calendar::CalendarArgs),
    /// Gratitude and reflection journals
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Friends list (requires login)
    Friend {
        #[command(subcommand)]
        action: commands::friend::FriendAction,
    },
    /// Local accounts
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// Display language
    Lang {
        #[command(subcommand)]
        action: commands::lang::LangAction,
    },
    /// Timezone used to decide what "today" is
    Tz {
        #[command(subcommand)]
        action: commands::tz::TzAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid datetime format '{s}': {e}"))
}

fn init_logging() {
    let level = praise_core::Config::load_or_default().log.level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let now = cli.at.unwrap_or_else(Utc::now);
    let result = match cli.command {
        Commands::Press => commands::press::run(now),
        Commands::Status { json } => commands::status::run(now, json),
        Commands::Calendar(args) => commands::calendar::run(now, args),
        Commands::Journal { action } => commands::journal::run(now, action),
        Commands::Friend { action } => commands::friend::run(now, action),
        Commands::Account { action } => commands::account::run(now, action),
        Commands::Lang { action } => commands::lang::run(now, action),
        Commands::Tz { action } => commands::tz::run(now, action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
