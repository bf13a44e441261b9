//! Time-step orchestration: one pure fold step from a snapshot to the next.

use crate::simulation::{
    ClassMetrics, Education, EducationDrivers, JobDrivers, PolicyEffect, PolicyThresholds,
    ReservationSettings, Snapshot, economic_growth, next_education_access, next_fertility,
    next_gdp_per_capita, next_job_access, next_population, next_poverty_rate,
    next_social_indicators, next_wealth, resolve_policy_effect, socioeconomic_effect,
};

const DEATH_RATE: f64 = 0.01;
const MIGRATION: f64 = 0.001;
const SAVINGS_SCALE: f64 = 0.2;
const CONSUMPTION_SHARE: f64 = 0.7;
const ENHANCED_CONSUMPTION_RELIEF: f64 = 0.1;
const ENHANCED_EDUCATION_BOOST: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EducationLevel {
    Primary,
    Secondary,
    Tertiary,
}

impl EducationLevel {
    fn base_investment(self) -> f64 {
        match self {
            EducationLevel::Primary => 0.07,
            EducationLevel::Secondary => 0.06,
            EducationLevel::Tertiary => 0.05,
        }
    }

    fn reservation_scale(self) -> f64 {
        match self {
            EducationLevel::Primary => 0.12,
            EducationLevel::Secondary => 0.11,
            EducationLevel::Tertiary => 0.10,
        }
    }

    fn dropout_rate(self) -> f64 {
        match self {
            EducationLevel::Primary => 0.01,
            EducationLevel::Secondary => 0.02,
            EducationLevel::Tertiary => 0.03,
        }
    }

    fn current(self, education: &Education) -> f64 {
        match self {
            EducationLevel::Primary => education.primary,
            EducationLevel::Secondary => education.secondary,
            EducationLevel::Tertiary => education.tertiary,
        }
    }
}

/// Advances `snapshot` by one tick using the reference poverty line.
pub fn calculate_next_time_step(
    snapshot: &Snapshot,
    settings: &ReservationSettings,
    tick: u64,
) -> Snapshot {
    advance(snapshot, settings, tick, &PolicyThresholds::default())
}

/// Advances `snapshot` by one tick. The result has exactly the input's classes, in the same order,
/// with populations renormalized to sum to one.
pub fn advance(
    snapshot: &Snapshot,
    settings: &ReservationSettings,
    tick: u64,
    thresholds: &PolicyThresholds,
) -> Snapshot {
    let top_tier = snapshot.top_tier();

    let next: Vec<_> = snapshot
        .iter()
        .map(|(class, metrics)| {
            let effect = resolve_policy_effect(
                metrics,
                settings,
                class,
                top_tier == Some(class),
                thresholds,
            );
            (class.clone(), step_class(metrics, &effect, tick))
        })
        .collect();

    let total: f64 = next.iter().map(|(_, metrics)| metrics.population).sum();
    debug_assert!(
        next.is_empty() || total > 0.0,
        "population collapsed to {total} before renormalization"
    );

    next.into_iter()
        .map(|(class, mut metrics)| {
            if total > 0.0 {
                metrics.population /= total;
            }
            (class, metrics)
        })
        .collect()
}

fn step_class(metrics: &ClassMetrics, effect: &PolicyEffect, tick: u64) -> ClassMetrics {
    let total = effect.total;
    let reservation_multiplier = effect.reservation_multiplier();
    let enhanced = effect.enhanced_support_multiplier;
    let socio = socioeconomic_effect(metrics);
    let growth = economic_growth(metrics, tick);

    let education_boost = if effect.needs_enhanced_support() {
        ENHANCED_EDUCATION_BOOST
    } else {
        0.0
    };
    let education_access = |level: EducationLevel| {
        let drivers = EducationDrivers {
            investment: (level.base_investment() + education_boost) * reservation_multiplier,
            reservation_impact: total * level.reservation_scale(),
            dropout_rate: level.dropout_rate(),
        };
        next_education_access(level.current(&metrics.education), &drivers, Some(metrics), tick)
    };

    let consumption_share = if effect.needs_enhanced_support() {
        CONSUMPTION_SHARE - ENHANCED_CONSUMPTION_RELIEF
    } else {
        CONSUMPTION_SHARE
    };

    ClassMetrics {
        population: next_population(
            metrics.population,
            metrics.fertility,
            DEATH_RATE,
            MIGRATION,
            total * 0.01,
        ),
        fertility: next_fertility(metrics.fertility, socio, total * 0.001),
        education: Education {
            primary: education_access(EducationLevel::Primary),
            secondary: education_access(EducationLevel::Secondary),
            tertiary: education_access(EducationLevel::Tertiary),
        },
        job_access: next_job_access(
            metrics.job_access,
            &JobDrivers {
                economic_growth: growth * reservation_multiplier * 1.2,
                reservation_impact: total * 0.10,
                unemployment: 0.05 * (1.0 - socio),
            },
            Some(metrics),
            tick,
        ),
        wealth: next_wealth(
            metrics.wealth,
            metrics.gdp_per_capita,
            SAVINGS_SCALE * socio * reservation_multiplier * (1.0 + enhanced),
            metrics.gdp_per_capita * consumption_share,
        ),
        gdp_per_capita: next_gdp_per_capita(
            metrics.gdp_per_capita,
            growth,
            reservation_multiplier,
            enhanced,
        ),
        poverty_rate: next_poverty_rate(
            metrics.poverty_rate,
            total,
            growth,
            metrics.education.tertiary,
            metrics.job_access,
        ),
        social_indicators: next_social_indicators(
            &metrics.social_indicators,
            socio,
            total * 0.03,
        ),
    }
}
