use std::sync::{Arc, RwLock};

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;
use tracing::{info, warn};

pub mod aggregate;
pub mod class;
pub mod config;
pub mod events;
pub mod metrics;
pub mod observer;
pub mod parameters;
pub mod policy;
pub mod resolver;
pub mod resources;
pub mod step;
pub mod systems;
pub mod transitions;

pub use aggregate::*;
pub use class::*;
pub use config::*;
pub use events::*;
pub use metrics::*;
pub use observer::*;
pub use parameters::*;
pub use policy::*;
pub use resolver::*;
pub use resources::*;
pub use step::*;
pub use systems::*;
pub use transitions::*;

/// Caller-owned session: current snapshot, active policy and tick counter, advanced one step at a
/// time by a chained schedule.
pub struct SimulationWorld {
    world: World,
    schedule: Schedule,
    observer: Arc<RwLock<ObserverSnapshot>>,
}

impl SimulationWorld {
    pub fn new(
        config: SimulationConfig,
        settings: ReservationSettings,
        baseline: Snapshot,
    ) -> Result<Self, SettingsError> {
        Self::with_observer(
            config,
            settings,
            baseline,
            Arc::new(RwLock::new(ObserverSnapshot::default())),
        )
    }

    pub fn with_observer(
        config: SimulationConfig,
        settings: ReservationSettings,
        baseline: Snapshot,
        observer: Arc<RwLock<ObserverSnapshot>>,
    ) -> Result<Self, SettingsError> {
        settings.validate_for(&baseline)?;

        let mut history = MetricsHistory::new(config.history_limit);
        history.push(summarize(&baseline, 0));

        let mut world = World::default();
        world.insert_resource(config);
        world.insert_resource(WorldTime::default());
        world.insert_resource(ActiveThresholds(PolicyThresholds::from_baseline(&baseline)));
        world.insert_resource(ActiveSettings(settings));
        world.insert_resource(PreviousSnapshot(baseline.clone()));
        world.insert_resource(CurrentSnapshot(baseline));
        world.insert_resource(history);
        world.insert_resource(PolicyEventLog::default());

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                time_step_system,
                history_system,
                policy_event_system,
                logging_system,
            )
                .chain(),
        );

        let simulation = Self {
            world,
            schedule,
            observer,
        };
        simulation.refresh_observer_snapshot();
        Ok(simulation)
    }

    /// Builds a session from a scenario file's contents.
    pub fn from_scenario(
        scenario: &Scenario,
        observer: Arc<RwLock<ObserverSnapshot>>,
    ) -> Result<Self, ConfigError> {
        let (baseline, settings) = scenario.prepare()?;
        Ok(Self::with_observer(
            scenario.config.clone(),
            settings,
            baseline,
            observer,
        )?)
    }

    pub fn tick(&mut self) {
        {
            let mut time = self.world.resource_mut::<WorldTime>();
            time.tick += 1;
        }

        self.schedule.run(&mut self.world);
        self.refresh_observer_snapshot();
    }

    pub fn run_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Replaces the active policy from the next tick on. Invalid settings leave the old policy in
    /// place.
    pub fn set_settings(&mut self, settings: ReservationSettings) -> Result<(), SettingsError> {
        if let Err(err) = settings.validate_for(self.snapshot()) {
            warn!("rejected reservation settings: {err}");
            return Err(err);
        }

        let tick = self.current_tick();
        self.world.resource_mut::<ActiveSettings>().0 = settings;
        self.world
            .resource_mut::<PolicyEventLog>()
            .push(PolicyEvent::new(tick, PolicyEventKind::SettingsApplied));
        info!(tick, "reservation settings applied");

        self.refresh_observer_snapshot();
        Ok(())
    }

    pub fn settings(&self) -> &ReservationSettings {
        &self.world.resource::<ActiveSettings>().0
    }

    pub fn thresholds(&self) -> PolicyThresholds {
        self.world.resource::<ActiveThresholds>().0
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.world.resource::<CurrentSnapshot>().0
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<WorldTime>().tick
    }

    pub fn year(&self) -> i64 {
        self.world
            .resource::<SimulationConfig>()
            .year_for_tick(self.current_tick())
    }

    pub fn summary(&self) -> SocietySummary {
        let tick = self.current_tick();
        self.world
            .resource::<MetricsHistory>()
            .latest()
            .filter(|summary| summary.tick == tick)
            .copied()
            .unwrap_or_else(|| summarize(self.snapshot(), tick))
    }

    pub fn history(&self) -> Vec<SocietySummary> {
        self.world.resource::<MetricsHistory>().snapshot()
    }

    pub fn events(&self) -> Vec<PolicyEvent> {
        self.world.resource::<PolicyEventLog>().snapshot()
    }

    pub fn observer(&self) -> Arc<RwLock<ObserverSnapshot>> {
        Arc::clone(&self.observer)
    }

    fn refresh_observer_snapshot(&self) {
        let tick = self.current_tick();
        let year = self.year();
        let summary = self.summary();
        let history = self.history();
        let events = self.events();

        if let Ok(mut snapshot) = self.observer.write() {
            snapshot.update(
                tick,
                year,
                self.snapshot(),
                summary,
                history,
                events,
            );
        }
    }
}
