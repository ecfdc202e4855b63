//! Plan steps produced by the planning call

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which tool a plan step drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Search the private knowledge base
    InternalSearch,
    /// Search the public web
    WebSearch,
    /// No tool; consumes a step slot without collecting sources
    Other,
}

/// One numbered instruction from the planner.
///
/// The kind is fixed at parse time by the same policy the planner prompt
/// implies: a step mentioning "internal" anywhere targets the knowledge
/// base, one mentioning "web" targets web search, everything else is inert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    /// 1-based position in the plan
    pub index: usize,
    /// The original step line, e.g. "1. Search internal documents for ..."
    pub text: String,
    /// Classified tool target
    pub kind: StepKind,
}

static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.").expect("numbered-line pattern"));

impl PlanStep {
    /// Classify a step line by keyword
    fn classify(text: &str) -> StepKind {
        let lower = text.to_lowercase();
        if lower.contains("internal") {
            StepKind::InternalSearch
        } else if lower.contains("web") {
            StepKind::WebSearch
        } else {
            StepKind::Other
        }
    }

    /// Parse a planner response into ordered steps.
    ///
    /// Lines are trimmed and only those starting with `N.` survive; the
    /// planner is told to answer with a bare numbered list but models pad
    /// responses with commentary often enough that filtering is required.
    pub fn parse_plan(response: &str) -> Vec<PlanStep> {
        response
            .lines()
            .map(str::trim)
            .filter(|line| NUMBERED_LINE.is_match(line))
            .enumerate()
            .map(|(i, line)| PlanStep {
                index: i + 1,
                text: line.to_string(),
                kind: Self::classify(line),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plan_keeps_only_numbered_lines() {
        let response = "Here is the plan:\n\n1. Search internal documents for specs.\n2. Search the web for competitors.\nDone!";
        let plan = PlanStep::parse_plan(response);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].index, 1);
        assert_eq!(plan[0].kind, StepKind::InternalSearch);
        assert_eq!(plan[1].kind, StepKind::WebSearch);
    }

    #[test]
    fn classification_matches_substring_anywhere() {
        let plan = PlanStep::parse_plan("1. Check the INTERNAL knowledge base.");
        assert_eq!(plan[0].kind, StepKind::InternalSearch);

        let plan = PlanStep::parse_plan("1. Synthesize a comparative analysis.");
        assert_eq!(plan[0].kind, StepKind::Other);
    }

    #[test]
    fn internal_wins_when_both_keywords_appear() {
        // Mirrors the execution order of the original classifier: the
        // internal branch is checked first.
        let plan = PlanStep::parse_plan("1. Search internal docs, then the web.");
        assert_eq!(plan[0].kind, StepKind::InternalSearch);
    }

    #[test]
    fn indented_numbered_lines_are_trimmed_and_kept() {
        let plan = PlanStep::parse_plan("  1. Search the web for news.  ");
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].text, "1. Search the web for news.");
    }
}
