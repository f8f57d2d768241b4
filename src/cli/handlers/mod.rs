use std::io::{BufRead, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::alarm;
use crate::io::config_io;
use crate::io::recovery;
use crate::io::schedule_io;
use crate::io::store::{self, FileStore, StoreError};
use crate::model::timer::{CountdownTimer, TickOutcome, Ticker, TimerMode};
use crate::model::weekday::Weekday;
use crate::ops::schedule_ops::{self, RESET_PROMPT};
use crate::ops::tracker::Tracker;

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> HandlerResult {
    let json = cli.json;
    let data_dir = store::resolve_data_dir(cli.data_dir.as_deref());

    match cli.command {
        None => crate::tui::run(&data_dir),
        Some(cmd) => match cmd {
            Commands::List(args) => cmd_list(&data_dir, args, json),
            Commands::Stats => cmd_stats(&data_dir, json),
            Commands::Add(args) => cmd_add(&data_dir, args, json),
            Commands::Toggle(args) => cmd_toggle(&data_dir, args, json),
            Commands::Delete(args) => cmd_delete(&data_dir, args),
            Commands::Reset(args) => cmd_reset(&data_dir, args),
            Commands::Timer(args) => cmd_timer(&data_dir, args),
            Commands::Recovery(args) => cmd_recovery(&data_dir, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the tracker over the file store. An unreadable stored value goes to
/// the recovery log before the template replaces it.
fn open_tracker(data_dir: &Path) -> Result<Tracker, Box<dyn std::error::Error>> {
    let (tracker, _) = Tracker::open_with(Box::new(FileStore::new(data_dir)), |origin| {
        schedule_io::log_load_fallback(data_dir, origin)
    })?;
    Ok(tracker)
}

/// Log a failed write and turn it into a handler error
fn save_failed(data_dir: &Path, tracker: &Tracker, err: StoreError) -> Box<dyn std::error::Error> {
    schedule_io::log_save_failure(data_dir, &err, tracker.schedule());
    Box::new(err)
}

/// Resolve DAY and TASK arguments to a task id
fn resolve_task(tracker: &Tracker, day: &str, task: &str) -> Result<(Weekday, String), String> {
    let day = parse_day_arg(day)?;
    schedule_ops::resolve_task_ref(tracker.schedule(), day, task)
        .map(|t| (day, t.id.clone()))
        .ok_or_else(|| format!("no habit '{}' on {}", task, day))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(data_dir: &Path, args: ListArgs, json: bool) -> HandlerResult {
    let tracker = open_tracker(data_dir)?;
    let days: Vec<Weekday> = match args.day.as_deref() {
        Some(d) => vec![parse_day_arg(d)?],
        None => Weekday::ALL.to_vec(),
    };

    if json {
        let results: Vec<DayListJson> = days
            .iter()
            .map(|&day| day_to_json(day, tracker.schedule().tasks(day)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (i, &day) in days.iter().enumerate() {
            if i > 0 {
                println!();
            }
            for line in format_day_listing(day, tracker.schedule(), tracker.stats()) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn cmd_stats(data_dir: &Path, json: bool) -> HandlerResult {
    let tracker = open_tracker(data_dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats_to_json(tracker.stats()))?);
    } else {
        for line in format_stats(tracker.stats()) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(data_dir: &Path, args: AddArgs, json: bool) -> HandlerResult {
    let day = parse_day_arg(&args.day)?;
    let mut tracker = open_tracker(data_dir)?;
    let id = match tracker.add(day, &args.label, &args.time) {
        Ok(Some(id)) => id,
        Ok(None) => return Err("habit label cannot be empty".into()),
        Err(e) => return Err(save_failed(data_dir, &tracker, e)),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&AddedJson { day, id })?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_toggle(data_dir: &Path, args: TaskRefArgs, json: bool) -> HandlerResult {
    let mut tracker = open_tracker(data_dir)?;
    let (day, id) = resolve_task(&tracker, &args.day, &args.task)?;
    if let Err(e) = tracker.toggle(day, &id) {
        return Err(save_failed(data_dir, &tracker, e));
    }
    let completed = tracker
        .schedule()
        .find(day, &id)
        .is_some_and(|t| t.completed);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ToggledJson { day, id, completed })?
        );
    } else {
        let task = tracker.schedule().find(day, &id);
        let label = task.map(|t| t.label.as_str()).unwrap_or_default();
        let mark = if completed { "x" } else { " " };
        println!("[{}] {}  ({}%)", mark, label, tracker.stats().day_percentage(day));
    }
    Ok(())
}

fn cmd_delete(data_dir: &Path, args: TaskRefArgs) -> HandlerResult {
    let mut tracker = open_tracker(data_dir)?;
    let (day, id) = resolve_task(&tracker, &args.day, &args.task)?;
    let label = tracker
        .schedule()
        .find(day, &id)
        .map(|t| t.label.clone())
        .unwrap_or_default();
    if let Err(e) = tracker.delete(day, &id) {
        return Err(save_failed(data_dir, &tracker, e));
    }
    println!("Deleted '{}' from {}", label, day);
    Ok(())
}

fn cmd_reset(data_dir: &Path, args: ResetArgs) -> HandlerResult {
    if !args.yes && !confirm(RESET_PROMPT)? {
        println!("Reset cancelled.");
        return Ok(());
    }
    let mut tracker = open_tracker(data_dir)?;
    if let Err(e) = tracker.reset_all() {
        return Err(save_failed(data_dir, &tracker, e));
    }
    println!("All checkboxes cleared.");
    Ok(())
}

/// Ask a `[y/N]` question on stdin. Anything but y/yes declines.
fn confirm(prompt: &str) -> Result<bool, std::io::Error> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{} [y/N] ", prompt)?;
    stdout.flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

fn cmd_timer(data_dir: &Path, args: TimerArgs) -> HandlerResult {
    let mode = match args.mode.as_deref() {
        Some(m) => parse_mode_arg(m)?,
        None => TimerMode::Focus,
    };
    let config = config_io::read_config(data_dir)?;
    let alarm = alarm::alarm_for(config.alarm.kind);

    let mut timer = CountdownTimer::new(mode);
    let mut ticker = Ticker::default();
    timer.start();
    ticker.arm(Instant::now());

    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "\r  {}  {} ", timer.mode(), timer.display())?;
        stdout.flush()?;

        let wait = ticker
            .time_until_next(Instant::now())
            .unwrap_or(Duration::ZERO);
        std::thread::sleep(wait);

        for _ in 0..ticker.due_ticks(Instant::now()) {
            if timer.tick() == TickOutcome::Expired {
                ticker.disarm();
                writeln!(stdout, "\r  {}  {}  done", timer.mode(), timer.display())?;
                alarm.ring();
                // Leave the detached chime time to play before the process exits
                std::thread::sleep(Duration::from_millis(1200));
                return Ok(());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(data_dir: &Path, args: RecoveryCmd, json: bool) -> HandlerResult {
    match args.action {
        Some(RecoveryAction::Prune(prune)) => {
            let removed = recovery::prune_recovery(data_dir, prune.all)?;
            println!(
                "Pruned {} {}",
                removed,
                if removed == 1 { "entry" } else { "entries" }
            );
        }
        Some(RecoveryAction::Path) => {
            let dir = std::fs::canonicalize(data_dir).unwrap_or_else(|_| data_dir.to_path_buf());
            println!("{}", recovery::recovery_log_path(&dir).display());
        }
        None => {
            let entries = recovery::read_recovery_entries(data_dir, Some(args.limit.unwrap_or(10)));
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("Recovery log is empty.");
            } else {
                for entry in &entries {
                    print!("{}", entry.to_markdown());
                }
            }
        }
    }
    Ok(())
}
