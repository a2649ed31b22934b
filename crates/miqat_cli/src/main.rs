mod args;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use miqat_config::{PreferencesStore, preferences_path_from_env};
use miqat_core::{PrayerBoard, PrayerRequest, compute_schedule};
use miqat_countdown::{NextPrayerTicker, OffsetClock, TICK_INTERVAL};

use args::{Cli, Commands, InputArgs};

fn load_request(store: &PreferencesStore, inputs: &InputArgs) -> PrayerRequest {
    let req = store.request(&inputs.to_inputs());
    info!(
        "{} at ({:.4}, {:.4}) using {} / {:?}",
        req.date,
        req.coordinates.latitude(),
        req.coordinates.longitude(),
        req.method,
        req.madhab
    );
    req
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_next(
    store: &PreferencesStore,
    inputs: &InputArgs,
    ticks: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut req = load_request(store, inputs);
    let follow_today = inputs.date.is_none();

    let mut board = PrayerBoard::new();
    let entries = board
        .recompute(&req)
        .with_context(|| format!("computing prayer times for {}", req.date))?
        .to_vec();
    // "Now" and the rollover date follow the schedule's offset, not the host zone.
    let clock = OffsetClock::new(req.utc_offset);
    let ticker = NextPrayerTicker::with_clock(entries, clock, TICK_INTERVAL);
    let mut sub = ticker.subscribe();

    let mut emitted = 0u64;
    let mut state = sub.current();
    loop {
        if json {
            println!("{}", serde_json::to_string(&state)?);
        } else {
            println!("{}", render::next_line(&state));
        }
        emitted += 1;
        if ticks.is_some_and(|n| emitted >= n) {
            break;
        }

        tokio::select! {
            changed = sub.changed() => match changed {
                Some(next) => state = next,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }

        let today = clock.today();
        if follow_today && today != req.date {
            req = req.for_date(today);
            match board.recompute(&req) {
                Ok(entries) => ticker.roll_over(entries.to_vec()),
                Err(e) => warn!("still showing {}: {e}", req.date),
            }
        }
    }
    sub.cancel();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let store = PreferencesStore::open_or_default(preferences_path_from_env(cli.config))?;
    if let Some(path) = store.path() {
        info!("preferences from {}", path.display());
    }

    match cli.command {
        Commands::Times { inputs, json } => {
            let req = load_request(&store, &inputs);
            let mut board = PrayerBoard::new();
            let entries = board
                .recompute(&req)
                .with_context(|| format!("computing prayer times for {}", req.date))?;
            if json {
                print_json(entries)?;
            } else {
                print!("{}", render::times_table(entries));
            }
        }

        Commands::Schedule { inputs, json } => {
            let req = load_request(&store, &inputs);
            let schedule = compute_schedule(&req)
                .with_context(|| format!("computing the solar day for {}", req.date))?;
            let entries = schedule.entries(&req.custom_times);
            if json {
                print_json(&serde_json::json!({
                    "schedule": schedule,
                    "entries": entries,
                }))?;
            } else {
                print!("{}", render::schedule_text(&schedule, &entries));
            }
        }

        Commands::Next {
            inputs,
            ticks,
            json,
        } => run_next(&store, &inputs, ticks, json).await?,

        Commands::Methods => print!("{}", render::methods_table()),
    }

    Ok(())
}
