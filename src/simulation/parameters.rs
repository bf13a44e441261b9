//! Baseline parameter table for the five reference tiers.

use std::collections::HashSet;

use crate::simulation::{ClassId, ClassMetrics, ConfigError, Education, Snapshot, SocialIndicators};

#[derive(Debug, Clone)]
pub struct ClassBaseline {
    pub label: &'static str,
    pub metrics: ClassMetrics,
}

/// Static baseline data per class, highest tier first.
#[derive(Debug, Clone)]
pub struct ParameterTable {
    pub tiers: Vec<ClassBaseline>,
}

impl ParameterTable {
    pub fn initial_conditions(&self) -> Snapshot {
        Snapshot::from_tiers(
            self.tiers
                .iter()
                .map(|tier| (ClassId::from(tier.label), tier.metrics)),
        )
    }

    /// Rekeys the baseline with externally generated labels, keeping tier order.
    pub fn with_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<Snapshot, ConfigError> {
        if labels.len() != self.tiers.len() {
            return Err(ConfigError::LabelCount {
                expected: self.tiers.len(),
                found: labels.len(),
            });
        }

        let mut seen = HashSet::new();
        for label in labels {
            if !seen.insert(label.as_ref()) {
                return Err(ConfigError::DuplicateLabel(label.as_ref().to_string()));
            }
        }

        Ok(Snapshot::from_tiers(
            labels
                .iter()
                .zip(&self.tiers)
                .map(|(label, tier)| (ClassId::new(label.as_ref()), tier.metrics)),
        ))
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        let tiers = vec![
            ClassBaseline {
                label: "class1",
                metrics: ClassMetrics {
                    population: 0.05,
                    fertility: 1.6,
                    education: Education {
                        primary: 100.0,
                        secondary: 98.0,
                        tertiary: 95.0,
                    },
                    job_access: 90.0,
                    wealth: 0.35,
                    gdp_per_capita: 150_000.0,
                    poverty_rate: 1.0,
                    social_indicators: SocialIndicators {
                        life_expectancy: 82.0,
                        infant_mortality: 2.0,
                        maternal_mortality: 5.0,
                    },
                },
            },
            ClassBaseline {
                label: "class2",
                metrics: ClassMetrics {
                    population: 0.15,
                    fertility: 1.8,
                    education: Education {
                        primary: 95.0,
                        secondary: 85.0,
                        tertiary: 65.0,
                    },
                    job_access: 75.0,
                    wealth: 0.25,
                    gdp_per_capita: 80_000.0,
                    poverty_rate: 10.0,
                    social_indicators: SocialIndicators {
                        life_expectancy: 78.0,
                        infant_mortality: 5.0,
                        maternal_mortality: 10.0,
                    },
                },
            },
            ClassBaseline {
                label: "class3",
                metrics: ClassMetrics {
                    population: 0.30,
                    fertility: 2.5,
                    education: Education {
                        primary: 85.0,
                        secondary: 70.0,
                        tertiary: 40.0,
                    },
                    job_access: 50.0,
                    wealth: 0.20,
                    gdp_per_capita: 40_000.0,
                    poverty_rate: 30.0,
                    social_indicators: SocialIndicators {
                        life_expectancy: 72.0,
                        infant_mortality: 15.0,
                        maternal_mortality: 25.0,
                    },
                },
            },
            ClassBaseline {
                label: "class4",
                metrics: ClassMetrics {
                    population: 0.35,
                    fertility: 3.2,
                    education: Education {
                        primary: 70.0,
                        secondary: 45.0,
                        tertiary: 15.0,
                    },
                    job_access: 25.0,
                    wealth: 0.15,
                    gdp_per_capita: 20_000.0,
                    poverty_rate: 60.0,
                    social_indicators: SocialIndicators {
                        life_expectancy: 65.0,
                        infant_mortality: 30.0,
                        maternal_mortality: 45.0,
                    },
                },
            },
            ClassBaseline {
                label: "class5",
                metrics: ClassMetrics {
                    population: 0.15,
                    fertility: 3.8,
                    education: Education {
                        primary: 50.0,
                        secondary: 20.0,
                        tertiary: 2.0,
                    },
                    job_access: 5.0,
                    wealth: 0.05,
                    gdp_per_capita: 5_000.0,
                    poverty_rate: 85.0,
                    social_indicators: SocialIndicators {
                        life_expectancy: 58.0,
                        infant_mortality: 50.0,
                        maternal_mortality: 70.0,
                    },
                },
            },
        ];

        Self { tiers }
    }
}

/// Baseline snapshot used to seed a new session.
pub fn initial_conditions() -> Snapshot {
    ParameterTable::default().initial_conditions()
}
