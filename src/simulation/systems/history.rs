//! Records the society-wide summary of each tick.

use bevy_ecs::prelude::*;

use crate::simulation::{CurrentSnapshot, MetricsHistory, WorldTime, summarize};

pub fn history_system(
    time: Res<WorldTime>,
    current: Res<CurrentSnapshot>,
    mut history: ResMut<MetricsHistory>,
) {
    history.push(summarize(&current.0, time.tick));
}
