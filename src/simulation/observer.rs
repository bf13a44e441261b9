//! Read-only view of the session published after every tick.

use serde::Serialize;

use crate::simulation::{ClassId, ClassMetrics, PolicyEvent, Snapshot, SocietySummary};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    pub class: ClassId,
    pub tier: usize,
    pub metrics: ClassMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverSnapshot {
    pub tick: u64,
    pub year: i64,
    pub classes: Vec<ClassView>,
    pub summary: SocietySummary,
    pub history: Vec<SocietySummary>,
    pub events: Vec<PolicyEvent>,
}

impl ObserverSnapshot {
    pub fn update(
        &mut self,
        tick: u64,
        year: i64,
        snapshot: &Snapshot,
        summary: SocietySummary,
        history: Vec<SocietySummary>,
        events: Vec<PolicyEvent>,
    ) {
        self.tick = tick;
        self.year = year;
        self.classes = snapshot
            .iter()
            .enumerate()
            .map(|(tier, (class, metrics))| ClassView {
                class: class.clone(),
                tier,
                metrics: *metrics,
            })
            .collect();
        self.summary = summary;
        self.history = history;
        self.events = events;
    }

    /// Rebuilds the engine snapshot from the published class list.
    pub fn to_snapshot(&self) -> Snapshot {
        self.classes
            .iter()
            .map(|view| (view.class.clone(), view.metrics))
            .collect()
    }
}

impl Default for ObserverSnapshot {
    fn default() -> Self {
        Self {
            tick: 0,
            year: 0,
            classes: Vec::new(),
            summary: SocietySummary::default(),
            history: Vec::new(),
            events: Vec::new(),
        }
    }
}
