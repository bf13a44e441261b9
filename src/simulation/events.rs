//! Policy milestone events and the bounded log the observer reads from.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::simulation::{ClassId, CrimeLevel, PolicyThresholds, Snapshot, SocietySummary};

const EVENT_LOG_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyEventKind {
    /// Class crossed into the creamy layer and stops receiving reservation.
    CreamyLayerExit { class: ClassId, gdp: f64 },
    /// Class rose above the enhanced-support band.
    EnhancedSupportExit { class: ClassId, gdp: f64 },
    CrimeShift { from: CrimeLevel, to: CrimeLevel },
    SettingsApplied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEvent {
    pub tick: u64,
    pub kind: PolicyEventKind,
}

impl PolicyEvent {
    pub fn new(tick: u64, kind: PolicyEventKind) -> Self {
        Self { tick, kind }
    }

    pub fn category(&self) -> &'static str {
        match &self.kind {
            PolicyEventKind::CreamyLayerExit { .. } => "CreamyLayer",
            PolicyEventKind::EnhancedSupportExit { .. } => "Support",
            PolicyEventKind::CrimeShift { .. } => "Crime",
            PolicyEventKind::SettingsApplied => "Policy",
        }
    }

    pub fn sentiment(&self) -> Sentiment {
        match &self.kind {
            PolicyEventKind::CreamyLayerExit { .. } => Sentiment::Positive,
            PolicyEventKind::EnhancedSupportExit { .. } => Sentiment::Positive,
            PolicyEventKind::CrimeShift { from, to } if to < from => Sentiment::Positive,
            PolicyEventKind::CrimeShift { .. } => Sentiment::Negative,
            PolicyEventKind::SettingsApplied => Sentiment::Neutral,
        }
    }

    pub fn headline(&self) -> String {
        match &self.kind {
            PolicyEventKind::CreamyLayerExit { class, gdp } => format!(
                "{class} reaches the creamy layer at GDP per capita {gdp:.0}; reservation ends"
            ),
            PolicyEventKind::EnhancedSupportExit { class, gdp } => format!(
                "{class} leaves the enhanced-support band at GDP per capita {gdp:.0}"
            ),
            PolicyEventKind::CrimeShift { from, to } => {
                format!("Crime level shifts from {} to {}", from.label(), to.label())
            }
            PolicyEventKind::SettingsApplied => "New reservation settings take effect".to_string(),
        }
    }
}

/// Compares two consecutive states and reports the milestones crossed in between.
///
/// Classes absent from `previous` are skipped; crime shifts compare the two summaries.
pub fn detect_events(
    previous: &Snapshot,
    current: &Snapshot,
    previous_summary: &SocietySummary,
    current_summary: &SocietySummary,
    thresholds: &PolicyThresholds,
    tick: u64,
) -> Vec<PolicyEvent> {
    let mut events = Vec::new();

    for (class, now) in current.iter() {
        let Some(before) = previous.get(class) else {
            continue;
        };

        if !thresholds.is_creamy_layer(before.gdp_per_capita)
            && thresholds.is_creamy_layer(now.gdp_per_capita)
        {
            events.push(PolicyEvent::new(
                tick,
                PolicyEventKind::CreamyLayerExit {
                    class: class.clone(),
                    gdp: now.gdp_per_capita,
                },
            ));
        }

        if thresholds.needs_enhanced_support(before.gdp_per_capita)
            && !thresholds.needs_enhanced_support(now.gdp_per_capita)
        {
            events.push(PolicyEvent::new(
                tick,
                PolicyEventKind::EnhancedSupportExit {
                    class: class.clone(),
                    gdp: now.gdp_per_capita,
                },
            ));
        }
    }

    if previous_summary.crime_level != current_summary.crime_level {
        events.push(PolicyEvent::new(
            tick,
            PolicyEventKind::CrimeShift {
                from: previous_summary.crime_level,
                to: current_summary.crime_level,
            },
        ));
    }

    events
}

#[derive(Debug, Resource)]
pub struct PolicyEventLog {
    events: VecDeque<PolicyEvent>,
    capacity: usize,
}

impl PolicyEventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: PolicyEvent) {
        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = PolicyEvent>) {
        for event in events {
            self.push(event);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events recorded for `tick`, oldest first.
    pub fn for_tick(&self, tick: u64) -> impl Iterator<Item = &PolicyEvent> {
        self.events.iter().filter(move |event| event.tick == tick)
    }

    pub fn snapshot(&self) -> Vec<PolicyEvent> {
        self.events.iter().cloned().collect()
    }
}

impl Default for PolicyEventLog {
    fn default() -> Self {
        Self::new(EVENT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{initial_conditions, summarize};

    #[test]
    fn log_drops_oldest_beyond_capacity() {
        let mut log = PolicyEventLog::new(2);
        for tick in 1..=3 {
            log.push(PolicyEvent::new(tick, PolicyEventKind::SettingsApplied));
        }
        let ticks: Vec<u64> = log.snapshot().iter().map(|event| event.tick).collect();
        assert_eq!(ticks, vec![2, 3]);
    }

    #[test]
    fn detects_creamy_layer_and_support_exits() {
        let previous = initial_conditions();
        let class4 = ClassId::from("class4");
        let class5 = ClassId::from("class5");

        let mut richer = *previous.get(&class4).unwrap();
        richer.gdp_per_capita = 39_000.0;
        let mut supported = *previous.get(&class5).unwrap();
        supported.gdp_per_capita = 13_000.0;
        let current = previous
            .clone()
            .with_class(class4.clone(), richer)
            .with_class(class5.clone(), supported);

        let summary = summarize(&previous, 0);
        let events = detect_events(
            &previous,
            &current,
            &summary,
            &summary,
            &PolicyThresholds::default(),
            4,
        );

        assert_eq!(
            events,
            vec![
                PolicyEvent::new(
                    4,
                    PolicyEventKind::CreamyLayerExit {
                        class: class4,
                        gdp: 39_000.0
                    }
                ),
                PolicyEvent::new(
                    4,
                    PolicyEventKind::EnhancedSupportExit {
                        class: class5,
                        gdp: 13_000.0
                    }
                ),
            ]
        );
    }

    #[test]
    fn crime_shift_is_reported_with_direction() {
        let snapshot = initial_conditions();
        let before = summarize(&snapshot, 0);
        let after = SocietySummary {
            crime_level: CrimeLevel::Low,
            ..before
        };

        let events = detect_events(
            &snapshot,
            &snapshot,
            &before,
            &after,
            &PolicyThresholds::default(),
            9,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sentiment(), Sentiment::Positive);
        assert!(events[0].headline().contains("Medium"));
    }
}
