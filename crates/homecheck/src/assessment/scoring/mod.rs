mod aggregate;
mod care_plan;
mod impact;

pub use aggregate::{aggregate, insight_score, ScoreResult, Tier, UnknownTier};
pub use care_plan::{advise, advise_after, default_care_plan, PreviousTier};
pub use impact::{Impact, ImpactTable};

#[cfg(test)]
pub(crate) use care_plan::TRANSITION_RULES;

use std::fmt;

use tracing::debug;

use super::domain::ResponseSet;
use super::questionnaire::{QuestionDefinition, QUESTIONNAIRE};

/// Stateless engine mapping questionnaire answers to scores, tiers, and care plans.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    questions: &'static [QuestionDefinition],
    impacts: ImpactTable,
}

impl ScoringEngine {
    /// Builds an engine after checking that `impacts` covers every permitted answer.
    pub fn new(
        questions: &'static [QuestionDefinition],
        impacts: ImpactTable,
    ) -> Result<Self, CoverageError> {
        let mut gaps = Vec::new();
        for question in questions {
            for &option in question.options {
                if impacts.get(question.name, option).is_none() {
                    gaps.push(CoverageGap {
                        question: question.name,
                        option,
                    });
                }
            }
        }

        if !gaps.is_empty() {
            return Err(CoverageError { gaps });
        }

        Ok(Self { questions, impacts })
    }

    pub fn standard() -> Result<Self, CoverageError> {
        Self::new(QUESTIONNAIRE, ImpactTable::standard())
    }

    pub fn questions(&self) -> &'static [QuestionDefinition] {
        self.questions
    }

    pub fn score(&self, responses: &ResponseSet) -> ScoreResult {
        let delta = self.impacts.resolve(responses);
        let result = aggregate(delta.physical, delta.mental);
        debug!(
            physical_delta = delta.physical,
            mental_delta = delta.mental,
            insight_score = result.insight_score,
            tier = %result.tier,
            "scored responses"
        );
        result
    }

    pub fn advise(&self, tier: Tier, previous_tier: Option<&PreviousTier>) -> &'static str {
        advise_after(tier, previous_tier)
    }
}

/// A permitted answer with no entry in the impact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageGap {
    pub question: &'static str,
    pub option: &'static str,
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = '{}'", self.question, self.option)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("impact table is missing {} answer(s): {}", .gaps.len(), join_gaps(.gaps))]
pub struct CoverageError {
    pub gaps: Vec<CoverageGap>,
}

fn join_gaps(gaps: &[CoverageGap]) -> String {
    gaps.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
