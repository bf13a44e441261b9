//! Detects policy milestones crossed during the last step.

use bevy_ecs::prelude::*;

use crate::simulation::{
    ActiveThresholds, CurrentSnapshot, MetricsHistory, PolicyEventLog, PreviousSnapshot,
    WorldTime, detect_events, summarize,
};

pub fn policy_event_system(
    time: Res<WorldTime>,
    thresholds: Res<ActiveThresholds>,
    previous: Res<PreviousSnapshot>,
    current: Res<CurrentSnapshot>,
    history: Res<MetricsHistory>,
    mut event_log: ResMut<PolicyEventLog>,
) {
    let tick = time.tick;
    let before = summarize(&previous.0, tick.saturating_sub(1));
    let after = history
        .latest()
        .filter(|summary| summary.tick == tick)
        .copied()
        .unwrap_or_else(|| summarize(&current.0, tick));

    event_log.extend(detect_events(
        &previous.0,
        &current.0,
        &before,
        &after,
        &thresholds.0,
        tick,
    ));
}
