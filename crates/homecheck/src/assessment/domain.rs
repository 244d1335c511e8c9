use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::scoring::{PreviousTier, ScoreResult};

/// Selected answer per question name for a single assessment.
pub type ResponseSet = BTreeMap<String, String>;

/// Identifier assigned to an assessment when it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl AssessmentId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Patient identity fields carried alongside the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kept exactly as submitted; callers send numbers and strings alike.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_tier: Option<PreviousTier>,
}

impl PatientDetails {
    /// Age as display text, without JSON quoting.
    pub fn age_label(&self) -> Option<String> {
        self.age.as_ref().map(|age| match age {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

/// Validated questionnaire submission handed to the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub timestamp: String,
    pub patient: PatientDetails,
    pub responses: ResponseSet,
}

/// Persisted snapshot of a processed assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub assessment_id: AssessmentId,
    pub timestamp: String,
    pub processed_at: DateTime<Utc>,
    pub patient: PatientDetails,
    pub responses: ResponseSet,
    pub scores: ScoreResult,
    pub care_plan: String,
    /// The payload exactly as received, including fields the guard does not read.
    pub input: Value,
}
