use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use nestling_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "nestling")]
#[command(about = "Pregnancy progress and contraction timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show pregnancy progress, week and trimester (default)
    Status {
        /// Due date (YYYY-MM-DD); falls back to the configured due date
        #[arg(long)]
        due_date: Option<String>,

        /// Compute as of this date instead of now (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<NaiveDate>,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Time contractions
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },
}

#[derive(Subcommand)]
enum TimerAction {
    /// Start timing a contraction
    Start,

    /// Stop the running contraction
    Stop,

    /// Show a live clock, starting a contraction if none is running; Enter stops it
    Watch,

    /// List recorded contractions, newest first
    List,

    /// Show averages and the alert signal
    Stats {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a recorded contraction
    Delete {
        /// Contraction id as shown by `timer list`
        id: String,
    },

    /// Delete all recorded contractions
    Clear,

    /// Export the history to CSV
    Export {
        /// Output file
        path: PathBuf,
    },
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        nestling_core::logging::init_with_level("debug");
    } else {
        nestling_core::logging::init();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable config: {}. Using defaults.", e);
        Config::default()
    });
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Status {
            due_date,
            today,
            json,
        }) => cmd_status(due_date, today, json, &config),
        Some(Commands::Timer { action }) => {
            let session_path = Config::timer_session_path(&data_dir);
            cmd_timer(action, &session_path, &config)
        }
        None => cmd_status(None, None, false, &config),
    }
}

fn cmd_status(
    due_date_arg: Option<String>,
    today: Option<NaiveDate>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let due_date = match due_date_arg {
        Some(raw) => {
            let parsed = parse_due_date(&raw);
            if parsed.is_none() {
                eprintln!("Could not understand due date {:?}; showing defaults.", raw);
            }
            parsed
        }
        None => config.pregnancy.due_date,
    };

    let now = today
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or_else(Utc::now);

    let status = PregnancyStatus::compute(due_date, now);
    let stage = stage_for_week(status.current_week);

    if json {
        let value = serde_json::json!({
            "due_date": due_date,
            "progress_percent": status.progress_percent,
            "current_week": status.current_week,
            "trimester": status.trimester,
            "weeks_until_due": status.weeks_until_due,
            "development_stage": stage.name,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if due_date.is_none() {
        println!("No due date set - showing defaults.");
        println!("  Set one with --due-date or in {}", Config::default_config_path().display());
        println!();
    }

    println!("Week {}: {}", status.current_week, status.trimester.label());
    println!("  Progress: {}%", status.progress_percent);
    println!("  {}", progress_bar(status.progress_percent));
    println!();
    println!("  Baby's development ({})", stage.name);
    println!("  {}", stage.summary);

    if status.weeks_until_due > 0 {
        println!();
        let unit = if status.weeks_until_due == 1 { "week" } else { "weeks" };
        println!("  {} {} until due date", status.weeks_until_due, unit);
    }

    Ok(())
}

fn progress_bar(percent: u8) -> String {
    const WIDTH: usize = 30;
    let filled = (percent as usize * WIDTH) / 100;
    format!(
        "Week 1 [{}{}] Week 40",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled)
    )
}

fn cmd_timer(action: TimerAction, session_path: &Path, config: &Config) -> Result<()> {
    let thresholds = config.alerts;

    match action {
        TimerAction::Start => {
            let (_, contraction) = ContractionTimer::update(session_path, thresholds, |timer| {
                timer.start(Utc::now()).cloned()
            })?;
            println!(
                "Contraction started at {}",
                local_time(contraction.start_time)
            );
            println!("  Run `nestling timer stop` when it ends.");
        }

        TimerAction::Stop => {
            let (timer, contraction) =
                ContractionTimer::update(session_path, thresholds, |timer| {
                    timer.stop(Utc::now())
                })?;
            print_stopped(&contraction, &timer);
        }

        TimerAction::Watch => cmd_watch(session_path, thresholds)?,

        TimerAction::List => {
            let timer = load_timer(session_path, thresholds)?;
            print_history(&timer);
        }

        TimerAction::Stats { json } => {
            let timer = load_timer(session_path, thresholds)?;
            if json {
                let value = serde_json::json!({
                    "running": timer.state() == TimerState::Running,
                    "stats": timer.stats(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_stats(&timer);
            }
        }

        TimerAction::Delete { id } => {
            let deleted = match uuid::Uuid::parse_str(id.trim()) {
                Ok(uuid) => {
                    let (timer, deleted) =
                        ContractionTimer::update(session_path, thresholds, |timer| {
                            Ok(timer.delete(&uuid))
                        })?;
                    if deleted {
                        println!("✓ Deleted contraction {}", uuid);
                        print_stats(&timer);
                    }
                    deleted
                }
                Err(_) => false,
            };

            if !deleted {
                println!("Contraction {} not found - nothing deleted.", id);
            }
        }

        TimerAction::Clear => {
            let (timer, removed) = ContractionTimer::update(session_path, thresholds, |timer| {
                let removed = timer.history().len();
                timer.clear();
                Ok(removed)
            })?;
            println!("✓ Cleared {} contractions", removed);
            if timer.state() == TimerState::Running {
                println!("  A contraction is still running.");
            }
        }

        TimerAction::Export { path } => {
            let timer = load_timer(session_path, thresholds)?;
            let count = export_history(&timer, &path)?;
            println!("✓ Exported {} contractions", count);
            println!("  CSV: {}", path.display());
        }
    }

    Ok(())
}

fn load_timer(session_path: &Path, thresholds: AlertThresholds) -> Result<ContractionTimer> {
    let mut timer = ContractionTimer::load(session_path)?;
    timer.set_thresholds(thresholds);
    Ok(timer)
}

fn cmd_watch(session_path: &Path, thresholds: AlertThresholds) -> Result<()> {
    let (_, running) = ContractionTimer::update(session_path, thresholds, |timer| {
        if timer.current().is_none() {
            timer.start(Utc::now())?;
        }
        // Present whenever start succeeded or a contraction was already open
        timer.current().cloned().ok_or(Error::NoContractionRunning)
    })?;

    println!(
        "Timing contraction started at {}",
        local_time(running.start_time)
    );
    println!("Press Enter when it ends.");

    // Display only: elapsed time is re-derived from the stored start each tick
    let start_time = running.start_time;
    let mut ticker = Ticker::spawn(Duration::from_secs(1), move || {
        let elapsed = (Utc::now() - start_time).num_seconds().max(0) as u64;
        print!("\r  {}  ", format_clock(elapsed));
        let _ = io::stdout().flush();
    })?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input);
    ticker.cancel();
    println!();
    read?;

    let (timer, contraction) =
        ContractionTimer::update(session_path, thresholds, |timer| timer.stop(Utc::now()))?;
    print_stopped(&contraction, &timer);

    Ok(())
}

fn print_stopped(contraction: &Contraction, timer: &ContractionTimer) {
    println!(
        "✓ Contraction lasted {}",
        format_clock(contraction.duration_seconds.unwrap_or(0))
    );
    print_stats(timer);
}

fn print_stats(timer: &ContractionTimer) {
    let stats = timer.stats();

    println!();
    println!("  Total contractions: {}", stats.count);
    println!(
        "  Average duration:   {}",
        format_clock(stats.average_duration_seconds.round() as u64)
    );
    println!(
        "  Average interval:   {}",
        describe_interval(stats.average_interval_seconds)
    );

    if stats.should_alert {
        print_alert(timer.thresholds());
    }
}

fn print_alert(thresholds: &AlertThresholds) {
    println!();
    println!("⚠ Contractions are close together");
    println!(
        "  Your contractions are less than {} apart and lasting more than {} seconds.",
        describe_interval(thresholds.max_interval_seconds),
        thresholds.min_duration_seconds
    );
    println!("  Consider contacting your healthcare provider.");
}

fn print_history(timer: &ContractionTimer) {
    if let Some(current) = timer.current() {
        println!(
            "Running since {} ({})",
            local_time(current.start_time),
            format_clock(timer.elapsed_seconds(Utc::now()).unwrap_or(0))
        );
        println!();
    }

    if timer.history().is_empty() {
        println!("No contractions recorded.");
        return;
    }

    println!("Contraction history (newest first):");
    for (contraction, gap) in timer.intervals() {
        let interval = gap
            .map(|g| format!("  Interval: {}", describe_interval(g as f64)))
            .unwrap_or_default();
        println!(
            "  {}  {}  Duration: {}{}",
            contraction.id,
            local_time(contraction.start_time),
            format_clock(contraction.duration_seconds.unwrap_or(0)),
            interval
        );
    }

    print_stats(timer);
}

fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%H:%M:%S").to_string()
}
