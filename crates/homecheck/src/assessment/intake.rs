use serde_json::{Map, Value};
use tracing::debug;

use super::domain::{AssessmentSubmission, PatientDetails, ResponseSet};
use super::questionnaire::{find_question, QuestionDefinition};
use super::scoring::PreviousTier;

const REQUIRED_FIELDS: [&str; 3] = ["timestamp", "patient", "responses"];

/// Rejection raised before the scoring engine runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("no assessment data provided")]
    Empty,
    #[error("invalid assessment data: {}", .violations.join("; "))]
    Invalid { violations: Vec<String> },
}

/// Guard turning raw JSON payloads into typed submissions.
///
/// Every violation is collected so callers can report them all at once.
#[derive(Debug, Clone, Copy)]
pub struct IntakeGuard {
    questions: &'static [QuestionDefinition],
}

impl IntakeGuard {
    pub fn new(questions: &'static [QuestionDefinition]) -> Self {
        Self { questions }
    }

    pub fn submission_from_payload(
        &self,
        payload: &Value,
    ) -> Result<AssessmentSubmission, ValidationFailure> {
        let fields = match payload {
            Value::Object(fields) if !fields.is_empty() => fields,
            Value::Null | Value::Object(_) => return Err(ValidationFailure::Empty),
            _ => {
                return Err(ValidationFailure::Invalid {
                    violations: vec!["Assessment payload must be a JSON object".to_string()],
                })
            }
        };

        let mut violations: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !fields.contains_key(**field))
            .map(|field| format!("Missing required field: {field}"))
            .collect();

        let timestamp = fields.get("timestamp").map(scalar_text).unwrap_or_default();

        let patient = match fields.get("patient") {
            Some(Value::Object(patient)) => patient_details(patient, &mut violations),
            Some(_) => {
                violations.push("Patient field must be a dictionary".to_string());
                None
            }
            None => None,
        };

        let responses = match fields.get("responses") {
            Some(Value::Object(responses)) => {
                let (valid, errors) = self.validate_responses(responses);
                violations.extend(errors);
                Some(valid)
            }
            Some(_) => {
                violations.push("Responses field must be a dictionary".to_string());
                None
            }
            None => None,
        };

        match (patient, responses) {
            (Some(patient), Some(responses)) if violations.is_empty() => Ok(AssessmentSubmission {
                timestamp,
                patient,
                responses,
            }),
            _ => Err(ValidationFailure::Invalid { violations }),
        }
    }

    /// Checks every questionnaire question has a permitted answer.
    ///
    /// Keys that are not questionnaire questions are dropped from the result.
    pub fn validate_responses(&self, responses: &Map<String, Value>) -> (ResponseSet, Vec<String>) {
        let mut valid = ResponseSet::new();
        let mut errors = Vec::new();

        for question in self.questions {
            match responses.get(question.name) {
                None => errors.push(format!("Missing response for {}", question.name)),
                Some(Value::String(answer)) if question.accepts(answer) => {
                    valid.insert(question.name.to_string(), answer.clone());
                }
                Some(other) => errors.push(format!(
                    "Invalid response '{}' for {}",
                    scalar_text(other),
                    question.name
                )),
            }
        }

        let ignored: Vec<&str> = responses
            .keys()
            .map(String::as_str)
            .filter(|name| find_question(self.questions, name).is_none())
            .collect();
        if !ignored.is_empty() {
            debug!(?ignored, "responses outside the questionnaire ignored");
        }

        (valid, errors)
    }
}

fn patient_details(
    patient: &Map<String, Value>,
    violations: &mut Vec<String>,
) -> Option<PatientDetails> {
    let email = match patient.get("email") {
        Some(Value::String(email)) => Some(email.trim().to_string()),
        Some(_) => {
            violations.push("Patient email must be a string".to_string());
            None
        }
        None => {
            violations.push("Missing patient email".to_string());
            None
        }
    };

    let previous_tier = match patient.get("previous_tier") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let label = scalar_text(value);
            (!label.is_empty()).then(|| PreviousTier::from_label(&label))
        }
    };

    Some(PatientDetails {
        email: email?,
        name: optional_text(patient.get("name")),
        age: patient.get("age").filter(|age| !age.is_null()).cloned(),
        gender: optional_text(patient.get("gender")),
        previous_tier,
    })
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
