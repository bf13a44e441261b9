//! Per-metric transition rules. Each function only sees the class it updates.

use crate::simulation::{ClassMetrics, SocialIndicators, generational_reservation_boost};

const MIN_FERTILITY: f64 = 1.8;
const MAX_FERTILITY: f64 = 2.8;
const MAX_LIFE_EXPECTANCY: f64 = 85.0;
const MIN_INFANT_MORTALITY: f64 = 2.0;
const MIN_MATERNAL_MORTALITY: f64 = 3.0;
const MIN_POVERTY_RATE: f64 = 1.0;
const BASE_GROWTH: f64 = 0.03;

// Smallest visible movement of an access percentage per tick.
const MIN_GAIN: f64 = 0.01;
const MIN_LOSS: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EducationDrivers {
    pub investment: f64,
    pub reservation_impact: f64,
    pub dropout_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JobDrivers {
    pub economic_growth: f64,
    pub reservation_impact: f64,
    pub unemployment: f64,
}

/// Weighted blend of tertiary education (40%), job access (30%) and non-poverty (30%), in `0..=1`.
pub fn socioeconomic_effect(metrics: &ClassMetrics) -> f64 {
    (metrics.education.tertiary / 100.0) * 0.4
        + (metrics.job_access / 100.0) * 0.3
        + (1.0 - metrics.poverty_rate / 100.0) * 0.3
}

/// Growth rate that accelerates with education and job access and ramps in over ten ticks.
pub fn economic_growth(metrics: &ClassMetrics, tick: u64) -> f64 {
    let education_factor = metrics.education.tertiary / 100.0;
    let job_factor = metrics.job_access / 100.0;
    let time_effect = (tick as f64 / 10.0).min(1.0);
    BASE_GROWTH * (1.0 + education_factor) * (1.0 + job_factor) * (1.0 + time_effect)
}

pub fn next_population(
    population: f64,
    birth_rate: f64,
    death_rate: f64,
    migration: f64,
    reservation_effect: f64,
) -> f64 {
    let scaled_birth = birth_rate * 0.01;
    let scaled_death = death_rate * 0.01;
    let scaled_migration = migration * 0.001;
    let scaled_reservation = reservation_effect * 0.001;

    population + population * scaled_birth - population * scaled_death + scaled_migration
        - population * scaled_reservation
}

pub fn next_fertility(rate: f64, socioeconomic_effect: f64, reservation_impact: f64) -> f64 {
    let next = rate * (1.0 + reservation_impact * 0.12 - socioeconomic_effect * 0.12);
    next.clamp(MIN_FERTILITY, MAX_FERTILITY)
}

/// Applies improvement against attrition with a guaranteed minimum movement in either direction.
fn settle_access(current: f64, improvement: f64, attrition: f64) -> f64 {
    let next = if improvement > attrition {
        current + (improvement - attrition).max(MIN_GAIN)
    } else {
        current - (attrition - improvement).max(MIN_LOSS)
    };
    next.clamp(0.0, 100.0)
}

fn remaining_gap(current: f64, exponent: f64) -> f64 {
    ((100.0 - current) / 100.0).clamp(0.0, 1.0).powf(exponent)
}

pub fn next_education_access(
    current: f64,
    drivers: &EducationDrivers,
    context: Option<&ClassMetrics>,
    tick: u64,
) -> f64 {
    let reservation_boost =
        generational_reservation_boost(context, drivers.reservation_impact, tick);

    let base_improvement = (drivers.investment * 0.25).max(0.1);
    let improvement = (base_improvement + reservation_boost * 1.5) * remaining_gap(current, 1.05);
    let dropout = drivers.dropout_rate * (1.0 - reservation_boost * 0.6).max(0.4);

    settle_access(current, improvement, dropout)
}

/// Same shape as education, gated by the class's own tertiary level (multiplier floor 1.4).
pub fn next_job_access(
    current: f64,
    drivers: &JobDrivers,
    context: Option<&ClassMetrics>,
    tick: u64,
) -> f64 {
    let reservation_boost =
        generational_reservation_boost(context, drivers.reservation_impact, tick);

    let education_bonus = context.map_or(0.0, |metrics| metrics.education.tertiary / 100.0);
    let education_multiplier = (1.0 + education_bonus * 1.1).max(1.4);

    let base_improvement = (drivers.economic_growth * 0.3).max(0.1);
    let improvement = (base_improvement + reservation_boost * 1.5)
        * remaining_gap(current, 1.1)
        * education_multiplier;
    let unemployment = drivers.unemployment * (1.0 - reservation_boost * 0.5).max(0.4);

    settle_access(current, improvement, unemployment)
}

pub fn next_wealth(wealth: f64, income: f64, savings_rate: f64, consumption: f64) -> f64 {
    wealth + income * savings_rate - consumption
}

pub fn next_gdp_per_capita(
    gdp: f64,
    economic_growth: f64,
    reservation_multiplier: f64,
    enhanced_support_multiplier: f64,
) -> f64 {
    gdp * (1.0 + economic_growth * reservation_multiplier * (1.0 + enhanced_support_multiplier))
}

pub fn next_poverty_rate(
    rate: f64,
    reservation_effect: f64,
    economic_growth: f64,
    tertiary_education: f64,
    job_access: f64,
) -> f64 {
    let reduction = reservation_effect * 0.03
        + economic_growth * 0.06
        + (tertiary_education / 100.0) * 0.04
        + (job_access / 100.0) * 0.05;
    (rate * (1.0 - reduction)).max(MIN_POVERTY_RATE)
}

/// Life expectancy closes on the societal maximum; mortality decays toward its floors.
pub fn next_social_indicators(
    current: &SocialIndicators,
    socioeconomic_effect: f64,
    reservation_impact: f64,
) -> SocialIndicators {
    let impact = socioeconomic_effect * reservation_impact;

    let life_gap = MAX_LIFE_EXPECTANCY - current.life_expectancy;
    let life_improvement = impact * 0.2 * (life_gap / 20.0);
    let life_expectancy =
        (current.life_expectancy * (1.0 + life_improvement)).min(MAX_LIFE_EXPECTANCY);

    let infant_reduction = impact * 0.3 * (current.infant_mortality / 50.0);
    let maternal_reduction = impact * 0.3 * (current.maternal_mortality / 70.0);

    SocialIndicators {
        life_expectancy,
        infant_mortality: (current.infant_mortality * (1.0 - infant_reduction))
            .max(MIN_INFANT_MORTALITY),
        maternal_mortality: (current.maternal_mortality * (1.0 - maternal_reduction))
            .max(MIN_MATERNAL_MORTALITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{ClassId, initial_conditions};

    fn baseline(label: &str) -> ClassMetrics {
        *initial_conditions().get(&ClassId::from(label)).unwrap()
    }

    #[test]
    fn population_grows_with_births_and_shrinks_with_deaths() {
        let population = baseline("class1").population;
        assert!(next_population(population, 0.02, 0.01, 0.001, 0.0) > population);
        assert!(next_population(population, 0.01, 0.03, 0.0, 0.0) < population);
    }

    #[test]
    fn fertility_responds_to_effects_within_bounds() {
        assert!(next_fertility(2.5, 0.1, 0.0) < 2.5);
        assert!(next_fertility(2.5, 0.0, 0.1) > 2.5);
        assert_eq!(next_fertility(3.8, 0.0, 0.0), 2.8);
        assert_eq!(next_fertility(1.6, 0.5, 0.0), 1.8);
    }

    #[test]
    fn education_improves_with_investment() {
        let drivers = EducationDrivers {
            investment: 0.1,
            reservation_impact: 0.5,
            dropout_rate: 0.0,
        };
        assert!(next_education_access(50.0, &drivers, None, 1) > 50.0);
    }

    #[test]
    fn education_declines_with_heavy_dropout() {
        let drivers = EducationDrivers {
            investment: 0.0,
            reservation_impact: 0.0,
            dropout_rate: 0.1,
        };
        let next = next_education_access(50.0, &drivers, None, 1);
        assert!(next < 50.0);
        assert!(next <= 50.0 - MIN_LOSS);
    }

    #[test]
    fn education_moves_at_least_the_minimum_step() {
        let drivers = EducationDrivers {
            investment: 0.0,
            reservation_impact: 0.0,
            dropout_rate: 0.0,
        };
        // Improvement is tiny near saturation but still registers.
        let next = next_education_access(99.999, &drivers, None, 1);
        assert_eq!(next, 100.0);
    }

    #[test]
    fn job_access_improves_with_growth_and_declines_with_unemployment() {
        let growing = JobDrivers {
            economic_growth: 0.05,
            reservation_impact: 1.0,
            unemployment: 0.0,
        };
        assert!(next_job_access(50.0, &growing, None, 1) > 50.0);

        let shrinking = JobDrivers {
            economic_growth: 0.0,
            reservation_impact: 0.0,
            unemployment: 5.0,
        };
        assert!(next_job_access(50.0, &shrinking, None, 1) < 50.0);
    }

    #[test]
    fn job_access_is_gated_by_tertiary_education() {
        let drivers = JobDrivers {
            economic_growth: 0.2,
            reservation_impact: 0.0,
            unemployment: 0.0,
        };
        let mut educated = baseline("class3");
        educated.education.tertiary = 90.0;
        let mut unschooled = educated;
        unschooled.education.tertiary = 0.0;

        let with_degree = next_job_access(50.0, &drivers, Some(&educated), 1);
        let without = next_job_access(50.0, &drivers, Some(&unschooled), 1);
        assert!(with_degree > without);
    }

    #[test]
    fn wealth_accumulates_savings_minus_consumption() {
        assert!(next_wealth(1000.0, 100.0, 0.3, 20.0) > 1000.0);
        assert!(next_wealth(1000.0, 100.0, 0.1, 150.0) < 1000.0);
    }

    #[test]
    fn gdp_grows_with_positive_growth() {
        assert!((next_gdp_per_capita(100.0, 0.1, 1.0, 0.0) - 110.0).abs() < 1e-9);
        assert!((next_gdp_per_capita(100.0, 0.1, 1.5, 1.0) - 130.0).abs() < 1e-9);
    }

    #[test]
    fn poverty_never_drops_below_floor() {
        assert_eq!(next_poverty_rate(10.0, 50.0, 0.0, 0.0, 0.0), 1.0);
        let reduced = next_poverty_rate(60.0, 0.0, 0.05, 15.0, 25.0);
        assert!(reduced < 60.0 && reduced > 1.0);
    }

    #[test]
    fn social_indicators_improve_with_positive_effects() {
        let current = baseline("class3").social_indicators;
        let next = next_social_indicators(&current, 0.1, 0.1);
        assert!(next.life_expectancy > current.life_expectancy);
        assert!(next.infant_mortality < current.infant_mortality);
        assert!(next.maternal_mortality < current.maternal_mortality);
    }

    #[test]
    fn social_indicators_respect_limits() {
        let current = baseline("class5").social_indicators;
        let next = next_social_indicators(&current, 1.0, 50.0);
        assert_eq!(next.life_expectancy, 85.0);
        assert_eq!(next.infant_mortality, 2.0);
        assert_eq!(next.maternal_mortality, 3.0);
    }

    #[test]
    fn growth_ramps_over_ten_ticks() {
        let metrics = baseline("class3");
        let start = economic_growth(&metrics, 0);
        let ramped = economic_growth(&metrics, 10);
        assert!((ramped - 2.0 * start).abs() < 1e-12);
        assert_eq!(economic_growth(&metrics, 10), economic_growth(&metrics, 40));
    }

    #[test]
    fn socioeconomic_effect_blends_three_terms() {
        let metrics = baseline("class4");
        // 0.15 × 0.4 + 0.25 × 0.3 + 0.4 × 0.3
        assert!((socioeconomic_effect(&metrics) - 0.255).abs() < 1e-12);
    }
}
