use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assessment::domain::ResponseSet;

/// Signed adjustment to the physical and mental baselines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Impact {
    pub physical: i32,
    pub mental: i32,
}

impl Impact {
    pub const NONE: Impact = Impact::new(0, 0);

    pub const fn new(physical: i32, mental: i32) -> Self {
        Self { physical, mental }
    }

    fn saturating_add(self, other: Impact) -> Impact {
        Impact {
            physical: self.physical.saturating_add(other.physical),
            mental: self.mental.saturating_add(other.mental),
        }
    }
}

type OptionImpacts = &'static [(&'static str, Impact)];

const STANDARD_IMPACTS: &[(&str, OptionImpacts)] = &[
    (
        "fall_risk",
        &[
            ("Low", Impact::NONE),
            ("Moderate", Impact::new(-3, 0)),
            ("High", Impact::new(-8, 0)),
        ],
    ),
    (
        "medication_adherence",
        &[
            ("Excellent (95-100%)", Impact::NONE),
            ("Good (80-94%)", Impact::NONE),
            ("Fair (65-79%)", Impact::new(-1, -1)),
            ("Poor (Below 65%)", Impact::new(-2, -2)),
        ],
    ),
    (
        "cognitive_function",
        &[
            ("Normal (26-30)", Impact::NONE),
            ("Mild Impairment (21-25)", Impact::new(0, -1)),
            ("Moderate Impairment (10-20)", Impact::new(0, -3)),
            ("Severe Impairment (0-9)", Impact::new(0, -5)),
        ],
    ),
    (
        "uti_risk",
        &[
            ("Low Risk", Impact::NONE),
            ("Moderate Risk", Impact::new(-2, 0)),
            ("High Risk", Impact::new(-4, 0)),
        ],
    ),
    (
        "balance_test",
        &[
            ("Excellent (45-56 seconds)", Impact::NONE),
            ("Good (35-44 seconds)", Impact::NONE),
            ("Fair (25-34 seconds)", Impact::new(-1, 0)),
            ("Poor (Below 25 seconds)", Impact::new(-2, 0)),
        ],
    ),
    (
        "driving_safety",
        &[
            ("Safe Driver", Impact::NONE),
            ("Minor Concerns", Impact::new(-1, 0)),
            ("Major Concerns", Impact::new(-2, 0)),
            ("Unsafe to Drive", Impact::new(-3, 0)),
        ],
    ),
    (
        "nighttime_movement",
        &[
            ("Normal Patterns", Impact::NONE),
            ("Slightly Increased", Impact::NONE),
            ("Significantly Increased", Impact::new(-1, -1)),
            ("Concerning Patterns", Impact::new(-2, -2)),
        ],
    ),
    (
        "social_engagement",
        &[
            ("Highly Engaged", Impact::NONE),
            ("Moderately Engaged", Impact::NONE),
            ("Minimally Engaged", Impact::new(0, -2)),
            ("Socially Isolated", Impact::new(0, -4)),
        ],
    ),
    (
        "toilet_flush_count",
        &[
            ("Normal (6-8 times)", Impact::NONE),
            ("Slightly Elevated (9-12 times)", Impact::NONE),
            ("Elevated (13-16 times)", Impact::new(-1, 0)),
            ("Very High (17+ times)", Impact::new(-2, 0)),
        ],
    ),
];

/// Lookup from question name and selected option to its score impact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImpactTable {
    entries: BTreeMap<String, BTreeMap<String, Impact>>,
}

impl ImpactTable {
    /// Table matching the standard questionnaire.
    pub fn standard() -> Self {
        let mut table = Self::default();
        for (question, options) in STANDARD_IMPACTS {
            for (option, impact) in options.iter() {
                table.insert(question, option, *impact);
            }
        }
        table
    }

    pub fn insert(&mut self, question: &str, option: &str, impact: Impact) {
        self.entries
            .entry(question.to_string())
            .or_default()
            .insert(option.to_string(), impact);
    }

    pub fn get(&self, question: &str, option: &str) -> Option<Impact> {
        self.entries
            .get(question)
            .and_then(|options| options.get(option))
            .copied()
    }

    /// Sums the impacts of every answer the table knows about.
    ///
    /// Unknown questions and unknown options contribute nothing.
    pub fn resolve(&self, responses: &ResponseSet) -> Impact {
        responses
            .iter()
            .filter_map(|(question, option)| self.get(question, option))
            .fold(Impact::NONE, Impact::saturating_add)
    }
}
