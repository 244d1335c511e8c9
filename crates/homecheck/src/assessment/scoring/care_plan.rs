use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregate::Tier;

/// Tier reported for the patient's previous assessment.
///
/// Labels that are not tier names are kept verbatim; they still count as a tier
/// change, so only rules that ignore the previous tier can match them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviousTier {
    Known(Tier),
    Unrecognized(String),
}

impl PreviousTier {
    pub fn from_label(label: &str) -> Self {
        label
            .parse()
            .map(PreviousTier::Known)
            .unwrap_or_else(|_| PreviousTier::Unrecognized(label.to_string()))
    }

    pub fn tier(&self) -> Option<Tier> {
        match self {
            PreviousTier::Known(tier) => Some(*tier),
            PreviousTier::Unrecognized(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PreviousTier::Known(tier) => tier.label(),
            PreviousTier::Unrecognized(label) => label,
        }
    }
}

impl From<Tier> for PreviousTier {
    fn from(tier: Tier) -> Self {
        PreviousTier::Known(tier)
    }
}

impl fmt::Display for PreviousTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Override applied when the tier changed since the previous assessment.
pub(crate) struct TransitionRule {
    pub(crate) name: &'static str,
    applies: fn(previous: &PreviousTier, current: Tier) -> bool,
    recommendation: &'static str,
}

/// Evaluated top to bottom; the first matching rule wins.
pub(crate) static TRANSITION_RULES: [TransitionRule; 3] = [
    TransitionRule {
        name: "escalated_to_intervene",
        applies: escalated_to_intervene,
        recommendation: "Convene multidisciplinary care conference (PCP, PT/OT, social worker); consider long-term-care placement",
    },
    TransitionRule {
        name: "declined_to_assist",
        applies: declined_to_assist,
        recommendation: "Initiate physical-therapy evaluation; schedule telehealth PCP visit within 72h",
    },
    TransitionRule {
        name: "declined_to_monitor",
        applies: declined_to_monitor,
        recommendation: "Schedule balance & home-safety assessment; brief caregiver check-in",
    },
];

fn escalated_to_intervene(_previous: &PreviousTier, current: Tier) -> bool {
    current == Tier::Intervene
}

fn declined_to_assist(previous: &PreviousTier, current: Tier) -> bool {
    current == Tier::Assist && matches!(previous.tier(), Some(Tier::Independent | Tier::Monitor))
}

fn declined_to_monitor(previous: &PreviousTier, current: Tier) -> bool {
    current == Tier::Monitor && previous.tier() == Some(Tier::Independent)
}

/// Steady-state recommendation for a tier.
pub fn default_care_plan(tier: Tier) -> &'static str {
    match tier {
        Tier::Independent => {
            "Resume standard monitoring; schedule motivational check-in and goal-setting session"
        }
        Tier::Monitor => {
            "Conduct comprehensive medication reconciliation; recommend a daytime activity or exercise program"
        }
        Tier::Assist => {
            "Arrange part-time home-care aide (e.g., 12h/week); review medication-adherence log"
        }
        Tier::Intervene => {
            "Recommend car-key removal; seek a senior-living community or arrange for a full-time in-home provider; enrol in fall-prevention PT"
        }
    }
}

pub(crate) fn matching_rule(
    previous: &PreviousTier,
    current: Tier,
) -> Option<&'static TransitionRule> {
    if previous.tier() == Some(current) {
        return None;
    }
    TRANSITION_RULES
        .iter()
        .find(|rule| (rule.applies)(previous, current))
}

/// Care-plan recommendation for `tier`, taking the previous tier into account.
pub fn advise(tier: Tier, previous_tier: Option<Tier>) -> &'static str {
    advise_after(tier, previous_tier.map(PreviousTier::Known).as_ref())
}

/// Same as [`advise`], for a previous tier as reported by the caller.
pub fn advise_after(tier: Tier, previous_tier: Option<&PreviousTier>) -> &'static str {
    let Some(previous) = previous_tier else {
        return default_care_plan(tier);
    };

    match matching_rule(previous, tier) {
        Some(rule) => {
            debug!(rule = rule.name, %previous, current = %tier, "tier transition override");
            rule.recommendation
        }
        None => default_care_plan(tier),
    }
}
