//! Policy effect resolution: reservation, EWS, creamy-layer exclusion and enhanced support.

use serde::{Deserialize, Serialize};

use crate::simulation::{ClassId, ClassMetrics, ReservationSettings, Snapshot};

/// GDP per capita of the lowest reference tier.
pub const POVERTY_LINE_GDP: f64 = 5_000.0;

const CREAMY_LAYER_FACTOR: f64 = 8.0;
const CREAMY_LAYER_BUFFER: f64 = 0.95;
const ENHANCED_SUPPORT_FACTOR: f64 = 2.5;
const ENHANCED_SUPPORT_SCALE: f64 = 2.8;
const ENHANCED_SUPPORT_EXPONENT: f64 = 1.1;

// Second, steeper cutoff used by the generational helper. Kept separate from the
// poverty-line-derived threshold above; both gates apply.
const GENERATIONAL_CREAMY_LAYER_GDP: f64 = 25_000.0;
const GENERATIONAL_CUTOFF_RATIO: f64 = 0.6;
const GENERATIONAL_DECAY_EXPONENT: f64 = 3.5;
const GENERATIONAL_RAMP_TICKS: f64 = 15.0;
const GENERATIONAL_BOOST_CAP: f64 = 2.5;
const GAP_EXPONENT: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyThresholds {
    pub poverty_line_gdp: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            poverty_line_gdp: POVERTY_LINE_GDP,
        }
    }
}

impl PolicyThresholds {
    /// Derives the poverty line from the lowest tier of a baseline snapshot.
    pub fn from_baseline(baseline: &Snapshot) -> Self {
        baseline
            .lowest_tier()
            .map(|(_, metrics)| metrics.gdp_per_capita)
            .filter(|gdp| gdp.is_finite() && *gdp > 0.0)
            .map(|poverty_line_gdp| Self { poverty_line_gdp })
            .unwrap_or_default()
    }

    pub fn creamy_layer_threshold(&self) -> f64 {
        self.poverty_line_gdp * CREAMY_LAYER_FACTOR
    }

    pub fn enhanced_support_threshold(&self) -> f64 {
        self.poverty_line_gdp * ENHANCED_SUPPORT_FACTOR
    }

    /// Whether a class at `gdp` has graduated out of reservation benefits.
    pub fn is_creamy_layer(&self, gdp: f64) -> bool {
        gdp >= self.creamy_layer_threshold() * CREAMY_LAYER_BUFFER
    }

    pub fn needs_enhanced_support(&self, gdp: f64) -> bool {
        gdp <= self.enhanced_support_threshold()
    }
}

/// Net policy effect for one class for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolicyEffect {
    /// Configured reservation after creamy-layer exclusion.
    pub reservation: f64,
    pub ews: f64,
    pub enhanced_support_multiplier: f64,
    /// `(reservation + ews) × (1 + enhanced_support_multiplier)`.
    pub total: f64,
}

impl PolicyEffect {
    pub fn effective_impact(&self) -> f64 {
        self.total
    }

    pub fn needs_enhanced_support(&self) -> bool {
        self.enhanced_support_multiplier > 0.0
    }

    /// Scales investment and growth terms; exactly 1 when no policy applies.
    pub fn reservation_multiplier(&self) -> f64 {
        if self.total > 0.0 {
            1.0 + (self.total / 100.0) * (1.0 + self.enhanced_support_multiplier)
        } else {
            1.0
        }
    }
}

pub fn enhanced_support_multiplier(gdp: f64, thresholds: &PolicyThresholds) -> f64 {
    if !thresholds.needs_enhanced_support(gdp) {
        return 0.0;
    }
    let threshold = thresholds.enhanced_support_threshold();
    let support_gap = ((threshold - gdp) / threshold).clamp(0.0, 1.0);
    ENHANCED_SUPPORT_SCALE * support_gap.powf(ENHANCED_SUPPORT_EXPONENT)
}

/// EWS top-up. Zero for classes that already receive reservation.
pub fn ews_effect(
    metrics: &ClassMetrics,
    settings: &ReservationSettings,
    top_tier: bool,
    existing_reservation: f64,
    thresholds: &PolicyThresholds,
) -> f64 {
    if existing_reservation > 0.0 {
        return 0.0;
    }

    let creamy_layer = thresholds.creamy_layer_threshold();
    let eligible = settings.ews_settings.all_classes_eligible
        || top_tier
        || metrics.gdp_per_capita < creamy_layer;
    if !eligible {
        return 0.0;
    }

    let economic_need = 1.0 - metrics.gdp_per_capita / creamy_layer;
    (settings.ews_percentage() * economic_need).max(0.0)
}

pub fn resolve_policy_effect(
    metrics: &ClassMetrics,
    settings: &ReservationSettings,
    class: &ClassId,
    top_tier: bool,
    thresholds: &PolicyThresholds,
) -> PolicyEffect {
    let mut reservation = settings.reservation_for(class);
    if thresholds.is_creamy_layer(metrics.gdp_per_capita) {
        reservation = 0.0;
    }

    let ews = ews_effect(metrics, settings, top_tier, reservation, thresholds);
    let enhanced_support_multiplier =
        enhanced_support_multiplier(metrics.gdp_per_capita, thresholds);

    PolicyEffect {
        reservation,
        ews,
        enhanced_support_multiplier,
        total: (reservation + ews) * (1.0 + enhanced_support_multiplier),
    }
}

fn gap_multiplier(level: f64) -> f64 {
    ((100.0 - level) / 100.0)
        .clamp(0.0, 1.0)
        .powf(GAP_EXPONENT)
}

/// Amplifies a raw percentage-point reservation input for the education and job updates.
///
/// Larger education and job gaps scale the effect up, the generational boost ramps over
/// fifteen ticks, tertiary education lifts employment (floor 1.4×), and a steep creamy-layer
/// decay cuts the effect off entirely from 60% of 25 000 GDP per capita. Without class
/// context only the flat percentage term remains.
pub fn generational_reservation_boost(
    metrics: Option<&ClassMetrics>,
    reservation_percentage: f64,
    tick: u64,
) -> f64 {
    let Some(metrics) = metrics else {
        return reservation_percentage * 0.025;
    };

    let base_impact = reservation_percentage * 0.03;
    let tertiary = metrics.education.tertiary;
    let education_multiplier = gap_multiplier(tertiary);
    let job_multiplier = gap_multiplier(metrics.job_access);
    let progressive_impact =
        (base_impact * 1.3).max(base_impact * (education_multiplier + job_multiplier));

    let generational_boost = (tick as f64 / GENERATIONAL_RAMP_TICKS).min(GENERATIONAL_BOOST_CAP);
    let employment_multiplier = (1.0 + tertiary / 100.0).max(1.4);

    let gdp_ratio = metrics.gdp_per_capita.max(0.0) / GENERATIONAL_CREAMY_LAYER_GDP;
    let creamy_layer_reduction = if gdp_ratio >= GENERATIONAL_CUTOFF_RATIO {
        0.0
    } else {
        (1.0 - gdp_ratio.powf(GENERATIONAL_DECAY_EXPONENT)).max(0.0)
    };

    progressive_impact * (1.0 + generational_boost) * employment_multiplier * creamy_layer_reduction
}
