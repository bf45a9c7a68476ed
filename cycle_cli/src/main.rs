use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cycle_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cyclelator")]
#[command(about = "Menstrual cycle calendar and prediction system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tracked profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage recorded cycle start dates
    Cycle {
        #[command(subcommand)]
        command: CycleCommands,
    },

    /// Render the cycle calendar for a date range
    Calendar {
        /// Profile nickname (omit when using --guest)
        nickname: Option<String>,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the range, inclusive (defaults to the configured span)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Render for an unpersisted guest instead of a profile
        #[arg(long, conflicts_with = "nickname")]
        guest: bool,

        /// Anchor start date for guest mode
        #[arg(long, requires = "guest")]
        cycle_start: Option<NaiveDate>,

        /// Emit the JSON wire format instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the upcoming-cycle prediction for a profile
    Predict {
        /// Profile nickname
        nickname: String,
    },

    /// Export a profile's cycle history to CSV
    Export {
        /// Profile nickname
        nickname: String,

        /// Output CSV path
        #[arg(long)]
        out: PathBuf,
    },

    /// Import cycle start dates for a profile from CSV
    Import {
        /// Profile nickname
        nickname: String,

        /// Input CSV path (needs a start_date column)
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create a profile
    Add {
        nickname: String,

        /// Avatar color (hex); picked from the palette when omitted
        #[arg(long)]
        color: Option<String>,

        /// Seed historical start dates (comma-separated YYYY-MM-DD)
        #[arg(long, value_delimiter = ',')]
        history: Vec<NaiveDate>,
    },

    /// List profiles in display order
    List,

    /// Edit nickname, color, or the manual cycle length override
    Edit {
        nickname: String,

        /// New nickname
        #[arg(long)]
        rename: Option<String>,

        /// New avatar color (hex)
        #[arg(long)]
        color: Option<String>,

        /// Manual cycle length in days (0 clears the override)
        #[arg(long)]
        manual_length: Option<u32>,
    },

    /// Remove a profile and all of its cycle records
    Remove { nickname: String },
}

#[derive(Subcommand)]
enum CycleCommands {
    /// Record a period start date
    Add { nickname: String, date: NaiveDate },

    /// List recorded start dates, most recent first
    List { nickname: String },

    /// Move a recorded start date
    Edit {
        nickname: String,
        date: NaiveDate,
        new_date: NaiveDate,
    },

    /// Delete a recorded start date
    Remove { nickname: String, date: NaiveDate },
}

fn main() -> Result<()> {
    // Initialize logging
    cycle_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = Store::in_dir(&data_dir);

    match cli.command {
        Commands::Profile { command } => cmd_profile(&store, &config, command),
        Commands::Cycle { command } => cmd_cycle(&store, command),
        Commands::Calendar {
            nickname,
            start,
            end,
            guest,
            cycle_start,
            json,
        } => cmd_calendar(&store, &config, nickname, start, end, guest, cycle_start, json),
        Commands::Predict { nickname } => cmd_predict(&store, &nickname),
        Commands::Export { nickname, out } => cmd_export(&store, &nickname, &out),
        Commands::Import { nickname, path } => cmd_import(&store, &nickname, &path),
    }
}

fn require_profile<'a>(db: &'a Database, nickname: &str) -> Result<&'a Profile> {
    db.profile_by_nickname(nickname)
        .ok_or_else(|| Error::Store(format!("no profile named '{}'", nickname)))
}

fn cmd_profile(store: &Store, config: &Config, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Add {
            nickname,
            color,
            history,
        } => {
            let db = store.load()?;
            let color =
                color.unwrap_or_else(|| pick_color(&config.palette.available, &db.profiles));

            store.update(|db| {
                db.add_profile(&nickname, &color, &history)?;
                Ok(())
            })?;

            println!("✓ Created profile '{}' ({})", nickname, color);
            if !history.is_empty() {
                println!("  Seeded {} historical cycle(s)", history.len());
            }
        }

        ProfileCommands::List => {
            let db = store.load()?;
            let profiles = db.profiles_ordered();

            if profiles.is_empty() {
                println!("No profiles yet. Create one with 'cyclelator profile add'.");
                return Ok(());
            }

            for profile in profiles {
                let cycles = db.cycles_for(profile.id);
                let length = match profile.manual_cycle_length {
                    Some(manual) => format!("{} days (manual)", manual),
                    None => format!(
                        "{} days (estimated)",
                        estimate_cycle_length(profile, &db.cycles)
                    ),
                };
                println!(
                    "  {}  {}  {} cycle(s)  {}",
                    profile.nickname,
                    profile.avatar_color,
                    cycles.len(),
                    length
                );
            }
        }

        ProfileCommands::Edit {
            nickname,
            rename,
            color,
            manual_length,
        } => {
            store.update(|db| {
                let id = require_profile(db, &nickname)?.id;
                if let Some(ref new_name) = rename {
                    db.rename_profile(id, new_name)?;
                }
                if let Some(ref new_color) = color {
                    db.set_avatar_color(id, new_color)?;
                }
                if let Some(length) = manual_length {
                    db.set_manual_length(id, Some(length))?;
                }
                Ok(())
            })?;

            println!("✓ Updated profile '{}'", rename.as_deref().unwrap_or(&nickname));
        }

        ProfileCommands::Remove { nickname } => {
            store.update(|db| {
                let id = require_profile(db, &nickname)?.id;
                db.remove_profile(id)
            })?;

            println!("✓ Removed profile '{}' and its history", nickname);
        }
    }

    Ok(())
}

fn cmd_cycle(store: &Store, command: CycleCommands) -> Result<()> {
    match command {
        CycleCommands::Add { nickname, date } => {
            store.update(|db| {
                let id = require_profile(db, &nickname)?.id;
                db.add_cycle(id, date)?;
                Ok(())
            })?;

            println!("✓ Recorded cycle start {} for '{}'", date, nickname);
        }

        CycleCommands::List { nickname } => {
            let db = store.load()?;
            let profile = require_profile(&db, &nickname)?;
            let cycles = db.cycles_for(profile.id);

            if cycles.is_empty() {
                println!("No cycles recorded for '{}'.", nickname);
                return Ok(());
            }

            for record in cycles {
                match record.computed_length {
                    Some(length) => println!("  {}  {} days", record.start_date, length),
                    None => println!("  {}  (current)", record.start_date),
                }
            }
        }

        CycleCommands::Edit {
            nickname,
            date,
            new_date,
        } => {
            store.update(|db| {
                let id = require_profile(db, &nickname)?.id;
                db.update_cycle(id, date, new_date)
            })?;

            println!("✓ Moved cycle start {} to {}", date, new_date);
        }

        CycleCommands::Remove { nickname, date } => {
            store.update(|db| {
                let id = require_profile(db, &nickname)?.id;
                db.remove_cycle(id, date)
            })?;

            println!("✓ Deleted cycle start {}", date);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_calendar(
    store: &Store,
    config: &Config,
    nickname: Option<String>,
    start: NaiveDate,
    end: Option<NaiveDate>,
    guest: bool,
    cycle_start: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let end = end.unwrap_or_else(|| {
        dates::add_days(start, config.calendar.default_span_days as i64 - 1)
    });

    let (title, days) = if guest {
        ("Guest".to_string(), guest_calendar(start, end, cycle_start)?)
    } else {
        let nickname = nickname
            .ok_or_else(|| Error::Other("a profile nickname or --guest is required".into()))?;
        let db = store.load()?;
        let profile = require_profile(&db, &nickname)?;
        let cycles: Vec<CycleRecord> =
            db.cycles_for(profile.id).into_iter().cloned().collect();
        (nickname, build_calendar(profile, &cycles, start, end)?)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
    } else {
        display_calendar(&title, &days);
    }

    Ok(())
}

fn cmd_predict(store: &Store, nickname: &str) -> Result<()> {
    let db = store.load()?;
    let profile = require_profile(&db, nickname)?;
    let cycles: Vec<CycleRecord> = db.cycles_for(profile.id).into_iter().cloned().collect();

    match cycle_prediction(profile, &cycles) {
        Some(prediction) => display_prediction(nickname, profile, &prediction),
        None => println!(
            "No recorded cycles for '{}' - nothing to anchor a prediction to.",
            nickname
        ),
    }

    Ok(())
}

fn cmd_export(store: &Store, nickname: &str, out: &std::path::Path) -> Result<()> {
    let db = store.load()?;
    let profile = require_profile(&db, nickname)?;
    let cycles = db.cycles_for(profile.id);

    let count = export_cycles(&cycles, out)?;

    println!("✓ Exported {} cycle record(s) to {}", count, out.display());
    Ok(())
}

fn cmd_import(store: &Store, nickname: &str, path: &std::path::Path) -> Result<()> {
    let dates = import_start_dates(path)?;

    if dates.is_empty() {
        println!("No usable start dates found in {}", path.display());
        return Ok(());
    }

    store.update(|db| {
        let id = require_profile(db, nickname)?.id;
        for &date in &dates {
            db.add_cycle(id, date)?;
        }
        Ok(())
    })?;

    println!("✓ Imported {} cycle start(s) for '{}'", dates.len(), nickname);
    Ok(())
}

fn display_calendar(title: &str, days: &[CalendarDayStatus]) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  CYCLE CALENDAR: {}", title);
    println!("╰─────────────────────────────────────────╯");
    println!();

    for day in days {
        let marker = if day.is_period_start {
            "● period start"
        } else if day.is_period_day {
            "● period"
        } else if day.is_ovulation {
            "◉ ovulation"
        } else if day.is_dangerous {
            "▲ dangerous"
        } else {
            ""
        };

        let projected = if day.is_projected && !marker.is_empty() {
            " (projected)"
        } else {
            ""
        };

        println!("  {}  {}{}", day.date, marker, projected);
    }

    println!();
    println!("  ● period start   ▲ dangerous window   ◉ ovulation");
    println!();
}

fn display_prediction(nickname: &str, profile: &Profile, prediction: &CyclePrediction) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  PREDICTION: {}", nickname);
    println!("╰─────────────────────────────────────────╯");
    println!();

    let source = if profile.manual_cycle_length.is_some() {
        "manual"
    } else {
        "estimated"
    };
    println!("  Cycle length: {} days ({})", prediction.cycle_length, source);
    println!("  Next period:  {}", prediction.next_period_start);
    println!("  Ovulation:    {}", prediction.ovulation_date);
    println!(
        "  Dangerous:    {} to {}",
        prediction.dangerous_start, prediction.dangerous_end
    );
    println!();
}
