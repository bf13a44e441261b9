//! Reservation policy configuration and the configuration-layer checks applied before a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulation::{ClassId, Snapshot};

const FULL_QUOTA: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EwsSettings {
    pub percentage: f64,
    pub all_classes_eligible: bool,
}

/// Policy levers for one run. Persists across ticks until replaced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReservationSettings {
    pub class_reservations: BTreeMap<ClassId, f64>,
    pub total_reservation_cap: Option<f64>,
    pub ews_settings: EwsSettings,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("reservation for {class} must be within 0..=100, got {value}")]
    ReservationOutOfRange { class: ClassId, value: f64 },
    #[error("reservation cap must be within 0..=100, got {0}")]
    CapOutOfRange(f64),
    #[error("total reservations {total}% exceed the cap of {cap}%")]
    ReservationsExceedCap { total: f64, cap: f64 },
    #[error("EWS percentage {percentage}% exceeds the remaining general quota of {remaining}%")]
    EwsExceedsQuota { percentage: f64, remaining: f64 },
    #[error("EWS percentage must be non-negative, got {0}")]
    NegativeEws(f64),
    #[error("reservation targets unknown class {0}")]
    UnknownClass(ClassId),
}

/// Clamps a configured percentage into `0..=100`; anything non-finite counts as zero.
pub fn sanitize_percentage(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, FULL_QUOTA)
    } else {
        0.0
    }
}

impl ReservationSettings {
    pub fn with_reservation(mut self, class: impl Into<ClassId>, percentage: f64) -> Self {
        self.class_reservations.insert(class.into(), percentage);
        self
    }

    pub fn with_cap(mut self, cap: f64) -> Self {
        self.total_reservation_cap = Some(cap);
        self
    }

    pub fn with_ews(mut self, percentage: f64, all_classes_eligible: bool) -> Self {
        self.ews_settings = EwsSettings {
            percentage,
            all_classes_eligible,
        };
        self
    }

    /// Configured reservation for `class`, sanitized. Missing entries are zero.
    pub fn reservation_for(&self, class: &ClassId) -> f64 {
        self.class_reservations
            .get(class)
            .copied()
            .map(sanitize_percentage)
            .unwrap_or(0.0)
    }

    pub fn ews_percentage(&self) -> f64 {
        sanitize_percentage(self.ews_settings.percentage)
    }

    pub fn total_reserved(&self) -> f64 {
        self.class_reservations.values().sum()
    }

    pub fn effective_cap(&self) -> f64 {
        self.total_reservation_cap.unwrap_or(FULL_QUOTA)
    }

    /// Share left for the general pool, which bounds the EWS percentage.
    pub fn remaining_general_quota(&self) -> f64 {
        let used = match self.total_reservation_cap {
            Some(cap) => cap,
            None => self.total_reserved(),
        };
        (FULL_QUOTA - used).max(0.0)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (class, &value) in &self.class_reservations {
            if !value.is_finite() || !(0.0..=FULL_QUOTA).contains(&value) {
                return Err(SettingsError::ReservationOutOfRange {
                    class: class.clone(),
                    value,
                });
            }
        }

        if let Some(cap) = self.total_reservation_cap {
            if !cap.is_finite() || !(0.0..=FULL_QUOTA).contains(&cap) {
                return Err(SettingsError::CapOutOfRange(cap));
            }
        }

        let total = self.total_reserved();
        let cap = self.effective_cap();
        if total > cap {
            return Err(SettingsError::ReservationsExceedCap { total, cap });
        }

        let percentage = self.ews_settings.percentage;
        if !percentage.is_finite() || percentage < 0.0 {
            return Err(SettingsError::NegativeEws(percentage));
        }
        let remaining = self.remaining_general_quota();
        if percentage > remaining {
            return Err(SettingsError::EwsExceedsQuota {
                percentage,
                remaining,
            });
        }

        Ok(())
    }

    /// Validates and additionally checks that every reserved class exists in `snapshot`.
    pub fn validate_for(&self, snapshot: &Snapshot) -> Result<(), SettingsError> {
        self.validate()?;
        if let Some(unknown) = self
            .class_reservations
            .keys()
            .find(|class| !snapshot.contains(class))
        {
            return Err(SettingsError::UnknownClass(unknown.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::initial_conditions;

    fn targeted() -> ReservationSettings {
        ReservationSettings::default()
            .with_reservation("class4", 40.0)
            .with_reservation("class5", 35.0)
            .with_cap(75.0)
            .with_ews(15.0, false)
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = ReservationSettings::default();
        assert_eq!(settings.effective_cap(), 100.0);
        assert_eq!(settings.remaining_general_quota(), 100.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn quota_uses_cap_when_set() {
        let settings = targeted();
        assert_eq!(settings.total_reserved(), 75.0);
        assert_eq!(settings.remaining_general_quota(), 25.0);
        assert!(settings.validate_for(&initial_conditions()).is_ok());
    }

    #[test]
    fn quota_uses_reservation_sum_without_cap() {
        let settings = ReservationSettings::default()
            .with_reservation("class3", 30.0)
            .with_reservation("class4", 20.0);
        assert_eq!(settings.remaining_general_quota(), 50.0);
    }

    #[test]
    fn rejects_sum_above_cap() {
        let settings = targeted().with_cap(50.0);
        assert_eq!(
            settings.validate(),
            Err(SettingsError::ReservationsExceedCap {
                total: 75.0,
                cap: 50.0
            })
        );
    }

    #[test]
    fn rejects_ews_above_remaining_quota() {
        let settings = targeted().with_ews(30.0, true);
        assert_eq!(
            settings.validate(),
            Err(SettingsError::EwsExceedsQuota {
                percentage: 30.0,
                remaining: 25.0
            })
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        let negative = ReservationSettings::default().with_reservation("class2", -5.0);
        assert!(matches!(
            negative.validate(),
            Err(SettingsError::ReservationOutOfRange { .. })
        ));

        let cap = ReservationSettings::default().with_cap(140.0);
        assert_eq!(cap.validate(), Err(SettingsError::CapOutOfRange(140.0)));

        let ews = ReservationSettings::default().with_ews(-1.0, false);
        assert_eq!(ews.validate(), Err(SettingsError::NegativeEws(-1.0)));
    }

    #[test]
    fn rejects_unknown_class() {
        let settings = ReservationSettings::default().with_reservation("class9", 10.0);
        assert_eq!(
            settings.validate_for(&initial_conditions()),
            Err(SettingsError::UnknownClass(ClassId::from("class9")))
        );
    }

    #[test]
    fn reservation_lookup_is_sanitized() {
        let settings = ReservationSettings::default()
            .with_reservation("class2", f64::NAN)
            .with_reservation("class3", -10.0)
            .with_reservation("class4", 250.0);
        assert_eq!(settings.reservation_for(&"class1".into()), 0.0);
        assert_eq!(settings.reservation_for(&"class2".into()), 0.0);
        assert_eq!(settings.reservation_for(&"class3".into()), 0.0);
        assert_eq!(settings.reservation_for(&"class4".into()), 100.0);
    }

    #[test]
    fn parses_camel_case_json_with_null_cap() {
        let json = r#"{
            "classReservations": { "class4": 40, "class5": 35 },
            "totalReservationCap": null,
            "ewsSettings": { "percentage": 10, "allClassesEligible": true }
        }"#;
        let settings: ReservationSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.total_reservation_cap, None);
        assert_eq!(settings.reservation_for(&"class4".into()), 40.0);
        assert!(settings.ews_settings.all_classes_eligible);
    }
}
