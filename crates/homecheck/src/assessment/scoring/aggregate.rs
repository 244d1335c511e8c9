use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const BASELINE_SCORE: i32 = 100;
const MIN_SCORE: i32 = 0;
const MAX_SCORE: i32 = 100;
const PHYSICAL_WEIGHT: f64 = 0.6;
const MENTAL_WEIGHT: f64 = 0.4;

/// Care-urgency classification of the insight score.
///
/// Variants are declared from most to least urgent so that the derived ordering
/// ranks `Independent` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Intervene,
    Assist,
    Monitor,
    Independent,
}

impl Tier {
    /// Tiers from best wellbeing to highest urgency.
    pub const ALL: [Tier; 4] = [
        Tier::Independent,
        Tier::Monitor,
        Tier::Assist,
        Tier::Intervene,
    ];

    /// Step function over the insight score; each band includes its lower bound.
    pub fn classify(insight_score: f64) -> Self {
        if insight_score >= 90.0 {
            Tier::Independent
        } else if insight_score >= 70.0 {
            Tier::Monitor
        } else if insight_score >= 50.0 {
            Tier::Assist
        } else {
            Tier::Intervene
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Independent => "Independent",
            Tier::Monitor => "Monitor",
            Tier::Assist => "Assist",
            Tier::Intervene => "Intervene",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier '{0}'")]
pub struct UnknownTier(pub String);

impl FromStr for Tier {
    type Err = UnknownTier;

    /// Labels match exactly; `"independent"` is not a tier.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.label() == value)
            .ok_or_else(|| UnknownTier(value.to_string()))
    }
}

/// Scores produced for one assessment. Deltas are the raw pre-clamp sums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub physical_score: u8,
    pub mental_score: u8,
    pub insight_score: f64,
    pub tier: Tier,
    pub physical_delta: i32,
    pub mental_delta: i32,
}

pub fn aggregate(physical_delta: i32, mental_delta: i32) -> ScoreResult {
    let physical_score = clamp_score(physical_delta);
    let mental_score = clamp_score(mental_delta);
    let insight_score = insight_score(physical_score, mental_score);

    ScoreResult {
        physical_score,
        mental_score,
        insight_score,
        tier: Tier::classify(insight_score),
        physical_delta,
        mental_delta,
    }
}

fn clamp_score(delta: i32) -> u8 {
    BASELINE_SCORE
        .saturating_add(delta)
        .clamp(MIN_SCORE, MAX_SCORE) as u8
}

/// Weighted 60/40 blend of the physical and mental scores, rounded to one decimal.
pub fn insight_score(physical_score: u8, mental_score: u8) -> f64 {
    let blended =
        PHYSICAL_WEIGHT * f64::from(physical_score) + MENTAL_WEIGHT * f64::from(mental_score);
    round_to_tenth(blended)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
