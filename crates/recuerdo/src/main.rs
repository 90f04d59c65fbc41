use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod config;
mod date;
mod db;
mod error;
mod grid;
mod html;
mod reminders;
mod server;
mod store;
mod types;

use app::AppState;
use config::{Backend, Overrides, Settings};
use date::{parse_iso_date, parse_weekday, today, to_iso_date, YearMonth};
use grid::DAYS_PER_WEEK;
use types::default_category;

#[derive(Parser, Debug)]
#[command(name = "recuerdo")]
#[command(about = "Mark calendar days with mystery reminders and review them later")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the reminder store [env: RECUERDO_DATA_DIR]
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage backend: json or sqlite [env: RECUERDO_BACKEND]
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// First day of the week in the grid [env: RECUERDO_WEEK_START]
    #[arg(long, global = true, value_parser = parse_weekday)]
    week_start: Option<Weekday>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Port to listen on [env: RECUERDO_PORT]
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Pin a reminder to a day
    Add {
        /// Day in YYYY-MM-DD format
        #[arg(value_parser = parse_iso_date)]
        date: NaiveDate,

        /// Icon to show on that day (defaults to the first category)
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Remove the reminder from a day
    Remove {
        /// Day in YYYY-MM-DD format
        #[arg(value_parser = parse_iso_date)]
        date: NaiveDate,
    },

    /// List every reminder in date order
    List,

    /// Print a month grid with reminder icons
    Month {
        /// Month in YYYY-MM format (defaults to the current month)
        month: Option<YearMonth>,
    },
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level))
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("tower_http=warn".parse().unwrap());

    fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    let port = match &args.command {
        Some(Commands::Serve { port }) => *port,
        _ => None,
    };
    let settings = Settings::from_env()
        .context("Failed to read configuration from environment")?
        .with_overrides(Overrides {
            data_dir: args.data_dir,
            backend: args.backend,
            week_start: args.week_start,
            port,
        });

    match args.command {
        // Default to serve if no command specified
        None | Some(Commands::Serve { .. }) => {
            server::serve(settings).await?;
        }
        Some(Commands::Add { date, icon }) => {
            let icon = icon.unwrap_or_else(|| default_category().icon.to_string());
            add_reminder(&settings, date, &icon)?;
        }
        Some(Commands::Remove { date }) => {
            remove_reminder(&settings, date)?;
        }
        Some(Commands::List) => {
            let store = settings.open_store().context("Failed to open reminder store")?;
            let reminders = store.load();
            if reminders.is_empty() {
                println!("No reminders yet.");
            }
            for reminder in &reminders {
                println!(
                    "{}  {}  {}",
                    reminder.key(),
                    reminder.icon,
                    html::long_date(reminder.date)
                );
            }
        }
        Some(Commands::Month { month }) => {
            let store = settings.open_store().context("Failed to open reminder store")?;
            let month = month.unwrap_or_else(YearMonth::current);
            let state = AppState::new(store.load(), month, settings.week_start);
            print!("{}", month_text(&state, today()));
        }
    }

    Ok(())
}

fn add_reminder(settings: &Settings, date: NaiveDate, icon: &str) -> Result<()> {
    let store = settings.open_store().context("Failed to open reminder store")?;
    let before = store.load();
    let after = before.insert(date, icon);

    if store
        .persist_change(&before, &after)
        .context("Failed to save reminders")?
    {
        info!(date = %to_iso_date(date), icon = %icon, "Reminder added");
    } else {
        warn!(date = %to_iso_date(date), "Day already has a reminder, nothing changed");
    }
    Ok(())
}

fn remove_reminder(settings: &Settings, date: NaiveDate) -> Result<()> {
    let store = settings.open_store().context("Failed to open reminder store")?;
    let before = store.load();
    let after = before.remove(date);

    if store
        .persist_change(&before, &after)
        .context("Failed to save reminders")?
    {
        info!(date = %to_iso_date(date), "Reminder removed");
    } else {
        warn!(date = %to_iso_date(date), "No reminder on that day");
    }
    Ok(())
}

/// Plain-text month grid. Reminder days show their icon, padding days a dot,
/// today is bracketed. Ends with the number of reminders in the month.
fn month_text(state: &AppState, today: NaiveDate) -> String {
    let view = state.month_view();
    let title = html::month_title(view.month);
    let mut out = format!("{title:^width$}\n", width = DAYS_PER_WEEK * 5);

    for name in html::weekday_headers(view.week_start) {
        out.push_str(&format!("{name:>4} "));
    }
    out.push('\n');

    for week in view.weeks() {
        for cell in week {
            let label = match state.reminder_on(cell.date) {
                Some(reminder) if cell.is_current_month => format!("  {}", reminder.icon),
                _ if !cell.is_current_month => "   ·".to_string(),
                _ if cell.date == today => format!("[{:>2}]", cell.date.day()),
                _ => format!("{:>4}", cell.date.day()),
            };
            out.push_str(&label);
            out.push(' ');
        }
        out.push('\n');
    }

    let pinned = view
        .current_month_cells()
        .filter(|cell| state.has_reminder(cell.date))
        .count();
    out.push_str(&format!("{pinned} reminder(s) this month\n"));

    out
}
