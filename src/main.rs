use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::Parser;
use tokio::sync::Notify;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reservation_sim::simulation::{ObserverSnapshot, Scenario, SimulationWorld};

#[derive(Clone, Copy)]
struct SpeedPreset {
    key: char,
    label: &'static str,
    intent: &'static str,
    tick_ms: u64,
}

impl SpeedPreset {
    fn duration(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

const SPEED_PRESETS: [SpeedPreset; 4] = [
    SpeedPreset {
        key: '1',
        label: "Chronicle",
        intent: "느긋하게 관측",
        tick_ms: 1_600,
    },
    SpeedPreset {
        key: '2',
        label: "Standard",
        intent: "균형 진행",
        tick_ms: 1_000,
    },
    SpeedPreset {
        key: '3',
        label: "Hyperdrive",
        intent: "빠른 전개",
        tick_ms: 250,
    },
    SpeedPreset {
        key: '4',
        label: "Batch",
        intent: "즉시 계산",
        tick_ms: 1,
    },
];

/// Runs a reservation policy session on a timer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Scenario JSON with `config`, `settings` and optional `classLabels`.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Stop after this many ticks; runs until Ctrl-C otherwise.
    #[arg(long)]
    ticks: Option<u64>,

    /// Speed preset key (1-4); overrides the scenario's tick interval.
    #[arg(long)]
    preset: Option<char>,

    /// Print the final observer snapshot as JSON.
    #[arg(long)]
    json: bool,
}

fn find_preset(key: char) -> anyhow::Result<SpeedPreset> {
    SPEED_PRESETS
        .iter()
        .find(|preset| preset.key == key)
        .copied()
        .ok_or_else(|| anyhow!("unknown speed preset {key:?}, expected 1-4"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::default(),
    };

    let tick_duration = match args.preset {
        Some(key) => {
            let preset = find_preset(key)?;
            info!(
                preset = preset.label,
                intent = preset.intent,
                tick_ms = preset.tick_ms,
                "speed preset selected"
            );
            preset.duration()
        }
        None => scenario.config.tick_duration(),
    };

    let observer = Arc::new(RwLock::new(ObserverSnapshot::default()));
    let shutdown_notify = Arc::new(Notify::new());

    let mut simulation = SimulationWorld::from_scenario(&scenario, observer.clone())
        .context("starting simulation session")?;
    let tick_limit = args.ticks;

    let notify_for_simulation = shutdown_notify.clone();
    let simulation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_duration);
        loop {
            if tick_limit.is_some_and(|limit| simulation.current_tick() >= limit) {
                break;
            }
            tokio::select! {
                _ = interval.tick() => simulation.tick(),
                _ = notify_for_simulation.notified() => break,
            }
        }
    });

    let ctrlc_notify = shutdown_notify.clone();
    let ctrl_c_task = tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        ctrlc_notify.notify_one();
    });

    simulation_task.await?;
    ctrl_c_task.abort();

    let final_snapshot = observer
        .read()
        .map_err(|_| anyhow!("observer lock is poisoned"))?
        .clone();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&final_snapshot)?);
    } else {
        let summary = &final_snapshot.summary;
        info!(
            tick = final_snapshot.tick,
            year = final_snapshot.year,
            gdp_per_capita = summary.gdp_per_capita,
            poverty_rate = summary.poverty_rate,
            crime = summary.crime_level.label(),
            trust = summary.trust_in_government,
            "session finished"
        );
    }

    Ok(())
}
