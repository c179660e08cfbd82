//! Research plan model and extraction from model replies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One planned unit of research.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSection {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub search_queries: Vec<String>,
}

/// A structured outline proposed before deep research executes.
///
/// Ephemeral: carried inside the awaiting-approval phase and summarized in
/// a conversation message, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPlan {
    pub sections: Vec<PlanSection>,
    #[serde(default)]
    pub approved: bool,
}

/// First `{` to last `}`: models wrap the JSON in prose, so the widest
/// brace span is taken and everything around it discarded.
static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("brace-span regex is valid"));

impl ResearchPlan {
    /// Extracts and parses a plan from a free-form model reply.
    ///
    /// Returns `None` when no brace span is present, the span is not valid
    /// JSON, or the JSON has no sections. Callers substitute the fallback
    /// plan in that case; extraction failure is never an error.
    pub fn extract(reply: &str) -> Option<Self> {
        let block = JSON_BLOCK.find(reply)?.as_str();
        let plan: ResearchPlan = match serde_json::from_str(block) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "plan JSON did not parse");
                return None;
            }
        };
        if plan.sections.is_empty() {
            return None;
        }
        Some(plan)
    }

    /// The canonical fallback plan, used whenever the backend call or the
    /// extraction fails. Generic three-section company outline.
    pub fn fallback(project_name: &str) -> Self {
        let sections = vec![
            PlanSection {
                title: "Market landscape".to_string(),
                description: format!(
                    "Market size, growth, and competitive positioning for {}",
                    project_name
                ),
                search_queries: vec![
                    format!("{} market size", project_name),
                    format!("{} competitors", project_name),
                ],
            },
            PlanSection {
                title: "Team and traction".to_string(),
                description: format!(
                    "Founding team background and commercial traction of {}",
                    project_name
                ),
                search_queries: vec![
                    format!("{} founders", project_name),
                    format!("{} revenue customers", project_name),
                ],
            },
            PlanSection {
                title: "Risks and open questions".to_string(),
                description: format!(
                    "Key execution, market, and financing risks for {}",
                    project_name
                ),
                search_queries: vec![format!("{} risks challenges", project_name)],
            },
        ];
        Self {
            sections,
            approved: false,
        }
    }

    /// Human-readable summary appended to the session for approval.
    pub fn summary(&self) -> String {
        let mut out = String::from("Proposed research plan:\n");
        for (i, section) in self.sections.iter().enumerate() {
            out.push_str(&format!("{}. {} - {}\n", i + 1, section.title, section.description));
        }
        out.push_str("Approve to start research, or reject to refine the question.");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_prose_wrapped_json() {
        let reply = r#"Sure! Here is the plan you asked for:
{"sections": [
  {"title": "A", "description": "first", "searchQueries": ["q1", "q2"]},
  {"title": "B", "description": "second", "searchQueries": []}
]}
Let me know if you want changes."#;

        let plan = ResearchPlan::extract(reply).unwrap();
        assert_eq!(plan.sections.len(), 2);
        assert_eq!(plan.sections[0].search_queries, vec!["q1", "q2"]);
        assert!(!plan.approved);
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert!(ResearchPlan::extract("no json here at all").is_none());
        assert!(ResearchPlan::extract("{broken json]").is_none());
        assert!(ResearchPlan::extract(r#"{"sections": []}"#).is_none());
    }

    #[test]
    fn test_extract_preserves_section_count() {
        let plan = ResearchPlan {
            sections: (0..5)
                .map(|i| PlanSection {
                    title: format!("S{}", i),
                    description: String::new(),
                    search_queries: Vec::new(),
                })
                .collect(),
            approved: false,
        };
        let embedded = format!("preamble {} postamble", serde_json::to_string(&plan).unwrap());
        let extracted = ResearchPlan::extract(&embedded).unwrap();
        assert_eq!(extracted.sections.len(), plan.sections.len());
    }

    #[test]
    fn test_fallback_has_three_sections() {
        let plan = ResearchPlan::fallback("Acme");
        assert_eq!(plan.sections.len(), 3);
        assert!(plan.sections.iter().all(|s| !s.search_queries.is_empty()));
    }
}
