//! Per-class state variables and the society-wide snapshot.

use serde::{Deserialize, Serialize};

use crate::simulation::ClassId;

/// Access percentages per education level, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub primary: f64,
    pub secondary: f64,
    pub tertiary: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialIndicators {
    pub life_expectancy: f64,
    pub infant_mortality: f64,
    pub maternal_mortality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMetrics {
    pub population: f64, // 인구 비율, sums to 1.0 across classes
    pub fertility: f64,
    pub education: Education,
    pub job_access: f64,
    pub wealth: f64, // 누적 자산, not renormalized
    pub gdp_per_capita: f64,
    pub poverty_rate: f64,
    pub social_indicators: SocialIndicators,
}

/// Full state of the society at one tick.
///
/// Classes are kept in tier order, highest socioeconomic tier first. Keys are unique; lookups go
/// through [`ClassId`] only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<(ClassId, ClassMetrics)>);

impl Snapshot {
    /// Builds a snapshot from classes listed highest tier first. A repeated key replaces the earlier
    /// entry in place.
    pub fn from_tiers<I, K>(tiers: I) -> Self
    where
        I: IntoIterator<Item = (K, ClassMetrics)>,
        K: Into<ClassId>,
    {
        tiers
            .into_iter()
            .fold(Self::default(), |snapshot, (id, metrics)| {
                snapshot.with_class(id, metrics)
            })
    }

    /// Returns a copy with `id` set to `metrics`, appended as the new lowest tier if absent.
    pub fn with_class(mut self, id: impl Into<ClassId>, metrics: ClassMetrics) -> Self {
        let id = id.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = metrics,
            None => self.0.push((id, metrics)),
        }
        self
    }

    pub fn get(&self, id: &ClassId) -> Option<&ClassMetrics> {
        self.0
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, metrics)| metrics)
    }

    pub fn contains(&self, id: &ClassId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassId, &ClassMetrics)> {
        self.0.iter().map(|(id, metrics)| (id, metrics))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ClassId> {
        self.0.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn top_tier(&self) -> Option<&ClassId> {
        self.0.first().map(|(id, _)| id)
    }

    pub fn lowest_tier(&self) -> Option<(&ClassId, &ClassMetrics)> {
        self.0.last().map(|(id, metrics)| (id, metrics))
    }

    /// Zero-based tier position of a class.
    pub fn tier_of(&self, id: &ClassId) -> Option<usize> {
        self.0.iter().position(|(existing, _)| existing == id)
    }

    pub fn total_population(&self) -> f64 {
        self.0.iter().map(|(_, metrics)| metrics.population).sum()
    }
}

impl FromIterator<(ClassId, ClassMetrics)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (ClassId, ClassMetrics)>>(iter: T) -> Self {
        Self::from_tiers(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::initial_conditions;

    #[test]
    fn with_class_replaces_in_place() {
        let baseline = initial_conditions();
        let class2 = ClassId::from("class2");
        let mut richer = *baseline.get(&class2).unwrap();
        richer.gdp_per_capita = 60_000.0;

        let modified = baseline.clone().with_class(class2.clone(), richer);

        assert_eq!(modified.len(), baseline.len());
        assert_eq!(modified.tier_of(&class2), Some(1));
        assert_eq!(modified.get(&class2).unwrap().gdp_per_capita, 60_000.0);
    }

    #[test]
    fn tier_helpers_follow_insertion_order() {
        let baseline = initial_conditions();
        assert_eq!(baseline.top_tier().map(ClassId::as_str), Some("class1"));
        assert_eq!(
            baseline.lowest_tier().map(|(id, _)| id.as_str()),
            Some("class5")
        );
    }

    #[test]
    fn serializes_in_camel_case() {
        let baseline = initial_conditions();
        let json = serde_json::to_string(&baseline).unwrap();
        assert!(json.contains("\"gdpPerCapita\":150000"));
        assert!(json.contains("\"lifeExpectancy\""));

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, baseline);
    }
}
