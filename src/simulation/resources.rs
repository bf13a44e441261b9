//! Shared resources held by the session world.

use std::collections::VecDeque;
use std::time::Duration;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::simulation::{PolicyThresholds, ReservationSettings, Snapshot, SocietySummary};

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    pub tick_ms: u64,
    pub years_per_tick: u32, // 한 틱 = 5년
    pub start_year: i32,
    pub history_limit: usize,
    /// Emit the pulse line every this many ticks; 0 disables it.
    pub log_every: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1_000,
            years_per_tick: 5,
            start_year: 2022,
            history_limit: 256,
            log_every: 1,
        }
    }
}

impl SimulationConfig {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn year_for_tick(&self, tick: u64) -> i64 {
        i64::from(self.start_year) + tick as i64 * i64::from(self.years_per_tick)
    }
}

#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct WorldTime {
    pub tick: u64,
}

#[derive(Debug, Clone, Default, Resource)]
pub struct ActiveSettings(pub ReservationSettings);

#[derive(Debug, Clone, Default, Resource)]
pub struct ActiveThresholds(pub PolicyThresholds);

#[derive(Debug, Clone, Default, Resource)]
pub struct CurrentSnapshot(pub Snapshot);

/// State before the most recent step; equals the current snapshot until the first tick.
#[derive(Debug, Clone, Default, Resource)]
pub struct PreviousSnapshot(pub Snapshot);

#[derive(Debug, Clone, Resource)]
pub struct MetricsHistory {
    entries: VecDeque<SocietySummary>,
    limit: usize,
}

impl MetricsHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(1_024)),
            limit,
        }
    }

    pub fn push(&mut self, summary: SocietySummary) {
        if self.limit == 0 {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(summary);
    }

    pub fn latest(&self) -> Option<&SocietySummary> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> Vec<SocietySummary> {
        self.entries.iter().copied().collect()
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(SimulationConfig::default().history_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_year_advances_five_years_per_tick() {
        let config = SimulationConfig::default();
        assert_eq!(config.year_for_tick(0), 2022);
        assert_eq!(config.year_for_tick(4), 2042);
    }

    #[test]
    fn history_is_bounded() {
        let mut history = MetricsHistory::new(3);
        for tick in 0..5 {
            history.push(SocietySummary {
                tick,
                ..SocietySummary::default()
            });
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().map(|s| s.tick), Some(4));
        let ticks: Vec<u64> = history.snapshot().iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![2, 3, 4]);
    }

    #[test]
    fn config_parses_partial_camel_case() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "tickMs": 250, "yearsPerTick": 1 }"#).unwrap();
        assert_eq!(config.tick_duration(), Duration::from_millis(250));
        assert_eq!(config.start_year, 2022);
        assert_eq!(config.history_limit, 256);
    }
}
