//! Population-weighted society-wide summary. Read-side only; never fed back into the engine.

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::simulation::{ClassMetrics, Snapshot};

const TRUST_BASE: f64 = 0.15;
const TRUST_CEILING: f64 = 0.95;
const TRUST_DRIFT_PER_TICK: f64 = 0.0025;
const TRUST_DRIFT_CAP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrimeLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl CrimeLevel {
    /// Buckets society-wide poverty and tertiary education (both percentages).
    pub fn classify(poverty_rate: f64, tertiary_education: f64) -> Self {
        match (poverty_rate, tertiary_education) {
            (p, e) if p < 10.0 && e >= 60.0 => CrimeLevel::VeryLow,
            (p, e) if p < 25.0 && e >= 40.0 => CrimeLevel::Low,
            (p, e) if p < 45.0 && e >= 20.0 => CrimeLevel::Medium,
            (p, _) if p < 65.0 => CrimeLevel::High,
            _ => CrimeLevel::VeryHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CrimeLevel::VeryLow => "Very low",
            CrimeLevel::Low => "Low",
            CrimeLevel::Medium => "Medium",
            CrimeLevel::High => "High",
            CrimeLevel::VeryHigh => "Very high",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            CrimeLevel::VeryLow => Color::BrightGreen,
            CrimeLevel::Low => Color::Green,
            CrimeLevel::Medium => Color::Yellow,
            CrimeLevel::High => Color::Red,
            CrimeLevel::VeryHigh => Color::BrightRed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocietySummary {
    pub tick: u64,
    pub population_total: f64,
    pub fertility: f64,
    pub tertiary_education: f64,
    pub job_access: f64,
    pub wealth: f64,
    pub poverty_rate: f64,
    pub gdp_per_capita: f64,
    pub life_expectancy: f64,
    pub infant_mortality: f64,
    pub maternal_mortality: f64,
    pub crime_level: CrimeLevel,
    /// Fraction in `0..=0.95`.
    pub trust_in_government: f64,
}

impl Default for SocietySummary {
    fn default() -> Self {
        Self {
            tick: 0,
            population_total: 0.0,
            fertility: 0.0,
            tertiary_education: 0.0,
            job_access: 0.0,
            wealth: 0.0,
            poverty_rate: 0.0,
            gdp_per_capita: 0.0,
            life_expectancy: 0.0,
            infant_mortality: 0.0,
            maternal_mortality: 0.0,
            crime_level: CrimeLevel::Medium,
            trust_in_government: 0.0,
        }
    }
}

impl SocietySummary {
    pub fn trust_in_government_pct(&self) -> f64 {
        self.trust_in_government * 100.0
    }
}

/// Trust proxy: better-educated, less-poor societies start higher, and trust drifts up slowly
/// with tick count.
pub fn trust_in_government(poverty_rate: f64, tertiary_education: f64, tick: u64) -> f64 {
    let drift = (tick as f64 * TRUST_DRIFT_PER_TICK).min(TRUST_DRIFT_CAP);
    let base = TRUST_BASE
        + 0.35 * (tertiary_education / 100.0)
        + 0.25 * (1.0 - poverty_rate / 100.0);
    (base + drift).clamp(0.0, TRUST_CEILING)
}

pub fn summarize(snapshot: &Snapshot, tick: u64) -> SocietySummary {
    let population_total = snapshot.total_population();
    if population_total <= 0.0 {
        return SocietySummary {
            tick,
            population_total,
            ..SocietySummary::default()
        };
    }

    let weighted = |value: fn(&ClassMetrics) -> f64| {
        snapshot
            .iter()
            .map(|(_, metrics)| metrics.population * value(metrics))
            .sum::<f64>()
            / population_total
    };

    let poverty_rate = weighted(|m| m.poverty_rate);
    let tertiary_education = weighted(|m| m.education.tertiary);

    SocietySummary {
        tick,
        population_total,
        fertility: weighted(|m| m.fertility),
        tertiary_education,
        job_access: weighted(|m| m.job_access),
        wealth: weighted(|m| m.wealth),
        poverty_rate,
        gdp_per_capita: weighted(|m| m.gdp_per_capita),
        life_expectancy: weighted(|m| m.social_indicators.life_expectancy),
        infant_mortality: weighted(|m| m.social_indicators.infant_mortality),
        maternal_mortality: weighted(|m| m.social_indicators.maternal_mortality),
        crime_level: CrimeLevel::classify(poverty_rate, tertiary_education),
        trust_in_government: trust_in_government(poverty_rate, tertiary_education, tick),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::initial_conditions;

    #[test]
    fn baseline_summary_is_population_weighted() {
        let summary = summarize(&initial_conditions(), 0);

        // 0.05×1 + 0.15×10 + 0.30×30 + 0.35×60 + 0.15×85
        assert!((summary.poverty_rate - 44.3).abs() < 1e-9);
        // 0.05×150k + 0.15×80k + 0.30×40k + 0.35×20k + 0.15×5k
        assert!((summary.gdp_per_capita - 39_250.0).abs() < 1e-6);
        assert!((summary.tertiary_education - 32.05).abs() < 1e-9);
        assert_eq!(summary.crime_level, CrimeLevel::Medium);
    }

    #[test]
    fn crime_thresholds() {
        assert_eq!(CrimeLevel::classify(5.0, 70.0), CrimeLevel::VeryLow);
        assert_eq!(CrimeLevel::classify(5.0, 30.0), CrimeLevel::Medium);
        assert_eq!(CrimeLevel::classify(20.0, 45.0), CrimeLevel::Low);
        assert_eq!(CrimeLevel::classify(40.0, 10.0), CrimeLevel::High);
        assert_eq!(CrimeLevel::classify(80.0, 90.0), CrimeLevel::VeryHigh);
    }

    #[test]
    fn trust_drifts_up_and_stays_bounded() {
        let start = trust_in_government(44.3, 32.05, 0);
        let later = trust_in_government(44.3, 32.05, 40);
        assert!(later > start);
        assert_eq!(trust_in_government(1.0, 100.0, 10_000), 0.95);
        assert!(trust_in_government(100.0, 0.0, 0) >= 0.0);
    }

    #[test]
    fn empty_snapshot_summarizes_to_defaults() {
        let summary = summarize(&Snapshot::default(), 7);
        assert_eq!(summary.tick, 7);
        assert_eq!(summary.population_total, 0.0);
        assert_eq!(summary.gdp_per_capita, 0.0);
    }
}
