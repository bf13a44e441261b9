//! Advances the active snapshot by one tick under the active policy.

use bevy_ecs::prelude::*;

use crate::simulation::{
    ActiveSettings, ActiveThresholds, CurrentSnapshot, PreviousSnapshot, WorldTime, advance,
};

pub fn time_step_system(
    time: Res<WorldTime>,
    settings: Res<ActiveSettings>,
    thresholds: Res<ActiveThresholds>,
    mut current: ResMut<CurrentSnapshot>,
    mut previous: ResMut<PreviousSnapshot>,
) {
    let next = advance(&current.0, &settings.0, time.tick, &thresholds.0);
    previous.0 = std::mem::replace(&mut current.0, next);
}
