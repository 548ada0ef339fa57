// Prompt templates for the three resume analyses.
// Each action maps to exactly one fixed template; there is no free-form prompt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const OVERVIEW_PROMPT: &str = "\
Analyze the uploaded resume and extract key information, including the candidate's skills, \
professional experience, education background, certifications, and notable achievements. \
Summarize this information in an organized and structured manner for a quick overview.";

pub const SKILL_GAP_PROMPT: &str = "\
Review the resume to identify the candidate's current skills and qualifications. \
Based on this analysis, suggest areas where the candidate can improve, such as learning new skills, \
completing relevant certifications, gaining experience in a specific domain, or refining existing \
capabilities. Tailor the recommendations to align with common industry standards and the \
candidate's target role or career goals.";

pub const MATCH_PERCENTAGE_PROMPT: &str = "\
You are a skilled ATS (Applicant Tracking System) scanner with a deep understanding of data science \
and ATS functionality.
Your task is to evaluate the resume against the provided job description. Provide the percentage of \
match if the resume matches the job description. First, output the percentage match, followed by \
missing keywords, and finally, your overall thoughts.";

/// The analysis a user asked for. Declaration order is precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Overview,
    SkillGap,
    MatchPercentage,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Overview, Action::SkillGap, Action::MatchPercentage];

    pub fn prompt(self) -> &'static str {
        match self {
            Action::Overview => OVERVIEW_PROMPT,
            Action::SkillGap => SKILL_GAP_PROMPT,
            Action::MatchPercentage => MATCH_PERCENTAGE_PROMPT,
        }
    }

    /// Button caption on the page.
    pub fn label(self) -> &'static str {
        match self {
            Action::Overview => "Tell me about the resume",
            Action::SkillGap => "How can I improve my skills?",
            Action::MatchPercentage => "Percentage match",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Overview => "overview",
            Action::SkillGap => "skill_gap",
            Action::MatchPercentage => "match_percentage",
        }
    }

    /// Picks the single action to run when several were triggered at once:
    /// Overview > SkillGap > MatchPercentage.
    pub fn resolve(requested: &[Action]) -> Option<Action> {
        requested.iter().copied().min()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown action '{}' (expected overview, skill_gap or match_percentage)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s.trim())
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
