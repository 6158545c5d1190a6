//! Lapdelta CLI
//!
//! A small front-end over the session layer: pick a season, a race, and two
//! drivers, print the lap-time comparison, and optionally pull one lap's
//! telemetry. Each flag left out stops the flow one level earlier and lists
//! the choices at that level instead.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use lapdelta_core::{LapComparison, LapTelemetry};
use lapdelta_session::Session;
use lapdelta_sources::{ApiBase, BundledSource, RemoteSource};

#[derive(Parser)]
#[command(
    name = "lapdelta",
    about = "Compare Formula 1 lap times and inspect per-lap telemetry"
)]
struct Args {
    /// API origin, e.g. http://localhost:5000
    #[arg(long, env = "LAPDELTA_API", default_value = "http://localhost:5000")]
    api: String,

    /// Season year (omit to list available seasons)
    #[arg(long)]
    year: Option<u16>,

    /// Race name, e.g. "Bahrain Grand Prix" (omit to list the season's races)
    #[arg(long)]
    race: Option<String>,

    /// Two driver codes to compare, e.g. HAM,VER
    #[arg(long, value_delimiter = ',')]
    drivers: Vec<String>,

    /// Also fetch telemetry for DRIVER:LAP, e.g. LEC:5 (remote mode only)
    #[arg(long)]
    telemetry: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let base = ApiBase::parse(&args.api)?;
    let remote = RemoteSource::new(base);
    let bundled = BundledSource::new()?;

    let mut session = Session::connect(remote, bundled).await;
    println!("Data source: {}", session.mode());

    let Some(year) = args.year else {
        let seasons = session.seasons().await?;
        println!("Available seasons:");
        for season in seasons {
            println!("  {season}");
        }
        return Ok(());
    };

    let races = session.select_year(year).await?;
    let Some(race_name) = args.race else {
        println!("Races in {year}:");
        for race in races {
            println!("  {:>2}. {} ({})", race.round, race.name, race.location);
        }
        return Ok(());
    };

    let drivers = session.select_race(&race_name).await?;
    if args.drivers.is_empty() && args.telemetry.is_none() {
        println!("Drivers at {race_name} {year}:");
        for driver in drivers {
            println!("  {}  {} ({})", driver.code, driver.name, driver.team);
        }
        return Ok(());
    }

    match args.drivers.as_slice() {
        [] => {}
        [first, second] => {
            session.select_drivers(first, second)?;
            if let Some(comparison) = session.compare().await? {
                print_comparison(&comparison);
            }
        }
        _ => bail!("--drivers takes exactly two codes, e.g. --drivers HAM,VER"),
    }

    if let Some(target) = args.telemetry.as_deref() {
        let (driver, lap) = parse_telemetry_arg(target)?;
        match session.telemetry(driver, lap).await {
            Ok(Some(telemetry)) => print_telemetry(&telemetry),
            Ok(None) => {}
            // The telemetry panel degrades without taking the run down.
            Err(err) => println!("Failed to load telemetry for {driver} lap {lap}: {err}"),
        }
    }

    Ok(())
}

fn parse_telemetry_arg(target: &str) -> Result<(&str, u32)> {
    let (driver, lap) = target
        .split_once(':')
        .ok_or_else(|| anyhow!("expected DRIVER:LAP, e.g. LEC:5"))?;
    if driver.is_empty() {
        bail!("expected DRIVER:LAP, e.g. LEC:5");
    }
    let lap = lap
        .parse()
        .with_context(|| format!("invalid lap number {lap:?}"))?;
    Ok((driver, lap))
}

fn print_comparison(comparison: &LapComparison) {
    println!();
    println!(
        "Lap Time Analysis - {} {} ({})",
        comparison.race, comparison.year, comparison.provenance
    );

    for entry in comparison.entries.values() {
        let fastest = entry
            .laps
            .iter()
            .min_by(|a, b| a.time.total_cmp(&b.time));
        if let Some(best) = fastest {
            println!(
                "  {}  {} - {} laps, fastest {} (lap {})",
                entry.driver.code,
                entry.driver.name,
                entry.laps.len(),
                format_lap_time(best.time),
                best.lap
            );
        }
    }

    let codes = comparison.pair.codes();
    println!();
    println!("  lap  {:<10} {:<10} delta", codes[0], codes[1]);
    let mut by_lap: std::collections::BTreeMap<u32, [Option<f64>; 2]> = Default::default();
    for (slot, code) in codes.iter().enumerate() {
        if let Some(entry) = comparison.entries.get(*code) {
            for lap in &entry.laps {
                by_lap.entry(lap.lap).or_default()[slot] = Some(lap.time);
            }
        }
    }
    for (lap, times) in &by_lap {
        let [first, second] = *times;
        let delta = match (first, second) {
            (Some(a), Some(b)) => format!("{:+.3}", a - b),
            _ => "-".to_string(),
        };
        println!(
            "  {:>3}  {:<10} {:<10} {delta}",
            lap,
            first.map(format_lap_time).unwrap_or_else(|| "-".to_string()),
            second.map(format_lap_time).unwrap_or_else(|| "-".to_string()),
        );
    }
}

fn print_telemetry(telemetry: &LapTelemetry) {
    let top_speed = telemetry
        .points
        .iter()
        .map(|point| point.speed)
        .fold(f64::NEG_INFINITY, f64::max);
    let (from, to) = telemetry.span;
    println!();
    println!(
        "Telemetry - {} lap {} ({})",
        telemetry.driver, telemetry.lap, telemetry.provenance
    );
    println!(
        "  {} points over {:.0}-{:.0} m, top speed {top_speed:.0} km/h",
        telemetry.points.len(),
        from,
        to
    );
}

/// Render seconds as m:ss.mmm, the way lap times read on a timing screen.
fn format_lap_time(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u32;
    let rest = seconds - f64::from(minutes) * 60.0;
    format!("{minutes}:{rest:06.3}")
}
