//! Closed enums for the mood and health taxonomies.
//!
//! These are the single source of truth for the allow-lists: handlers parse
//! incoming strings through these types instead of re-listing the labels.

use serde::{Deserialize, Serialize};

/// The five-label mood taxonomy used for standalone entries and, by
/// reference, transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionKind {
    Stressed,
    Worried,
    Neutral,
    Content,
    Happy,
}

impl EmotionKind {
    pub const ALL: [EmotionKind; 5] = [
        EmotionKind::Stressed,
        EmotionKind::Worried,
        EmotionKind::Neutral,
        EmotionKind::Content,
        EmotionKind::Happy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmotionKind::Stressed => "stressed",
            EmotionKind::Worried => "worried",
            EmotionKind::Neutral => "neutral",
            EmotionKind::Content => "content",
            EmotionKind::Happy => "happy",
        }
    }

    pub fn parse(s: &str) -> Option<EmotionKind> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// Wearable-derived measurement types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthMetric {
    HeartRate,
    SleepQuality,
    Recovery,
    Strain,
    Readiness,
    Steps,
    Calories,
    Workout,
}

impl HealthMetric {
    pub const ALL: [HealthMetric; 8] = [
        HealthMetric::HeartRate,
        HealthMetric::SleepQuality,
        HealthMetric::Recovery,
        HealthMetric::Strain,
        HealthMetric::Readiness,
        HealthMetric::Steps,
        HealthMetric::Calories,
        HealthMetric::Workout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HealthMetric::HeartRate => "heartRate",
            HealthMetric::SleepQuality => "sleepQuality",
            HealthMetric::Recovery => "recovery",
            HealthMetric::Strain => "strain",
            HealthMetric::Readiness => "readiness",
            HealthMetric::Steps => "steps",
            HealthMetric::Calories => "calories",
            HealthMetric::Workout => "workout",
        }
    }

    pub fn parse(s: &str) -> Option<HealthMetric> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}
