use serde::Serialize;

/// One question of the home-check questionnaire and the answers it accepts.
///
/// Option order is presentation order only; it carries no ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

impl QuestionDefinition {
    pub fn accepts(&self, answer: &str) -> bool {
        self.options.contains(&answer)
    }
}

/// The fixed nine-question remote home-check questionnaire.
pub const QUESTIONNAIRE: &[QuestionDefinition] = &[
    QuestionDefinition {
        name: "fall_risk",
        label: "Fall Risk Assessment",
        options: &["Low", "Moderate", "High"],
    },
    QuestionDefinition {
        name: "medication_adherence",
        label: "Medication Adherence",
        options: &[
            "Excellent (95-100%)",
            "Good (80-94%)",
            "Fair (65-79%)",
            "Poor (Below 65%)",
        ],
    },
    QuestionDefinition {
        name: "cognitive_function",
        label: "Cognitive Function Score",
        options: &[
            "Normal (26-30)",
            "Mild Impairment (21-25)",
            "Moderate Impairment (10-20)",
            "Severe Impairment (0-9)",
        ],
    },
    QuestionDefinition {
        name: "uti_risk",
        label: "UTI Risk Factors",
        options: &["Low Risk", "Moderate Risk", "High Risk"],
    },
    QuestionDefinition {
        name: "balance_test",
        label: "Balance Test Result",
        options: &[
            "Excellent (45-56 seconds)",
            "Good (35-44 seconds)",
            "Fair (25-34 seconds)",
            "Poor (Below 25 seconds)",
        ],
    },
    QuestionDefinition {
        name: "driving_safety",
        label: "Driving Safety Status",
        options: &[
            "Safe Driver",
            "Minor Concerns",
            "Major Concerns",
            "Unsafe to Drive",
        ],
    },
    QuestionDefinition {
        name: "nighttime_movement",
        label: "Nighttime Movement Patterns",
        options: &[
            "Normal Patterns",
            "Slightly Increased",
            "Significantly Increased",
            "Concerning Patterns",
        ],
    },
    QuestionDefinition {
        name: "social_engagement",
        label: "Social Engagement Level",
        options: &[
            "Highly Engaged",
            "Moderately Engaged",
            "Minimally Engaged",
            "Socially Isolated",
        ],
    },
    QuestionDefinition {
        name: "toilet_flush_count",
        label: "Daily Toilet Flush Count",
        options: &[
            "Normal (6-8 times)",
            "Slightly Elevated (9-12 times)",
            "Elevated (13-16 times)",
            "Very High (17+ times)",
        ],
    },
];

pub fn find_question(
    questions: &'static [QuestionDefinition],
    name: &str,
) -> Option<&'static QuestionDefinition> {
    questions.iter().find(|question| question.name == name)
}
