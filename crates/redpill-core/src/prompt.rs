//! Prompt templates for the research flow.

use crate::error::Result;
use crate::research::PlanSection;
use minijinja::{context, Environment};
use once_cell::sync::Lazy;

const PLAN_PROMPT: &str = r#"You are a venture research analyst working on {{ project_name }}.
Produce a research plan for the question below as a single JSON object and
nothing else, with this exact shape:
{"sections": [{"title": "...", "description": "...", "searchQueries": ["..."]}]}

Question: {{ query }}"#;

const SECTION_PROMPT: &str = r#"Write the "{{ title }}" section of a research memo on {{ project_name }}.
Scope: {{ description }}
{% if queries %}Ground the analysis in these angles:
{% for q in queries %}- {{ q }}
{% endfor %}{% endif %}Write dense, citable prose. No preamble."#;

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("plan", PLAN_PROMPT)
        .expect("plan template is valid");
    env.add_template("section", SECTION_PROMPT)
        .expect("section template is valid");
    env
});

/// Renders the plan-generation prompt.
pub fn plan_prompt(project_name: &str, query: &str) -> Result<String> {
    let tmpl = ENV.get_template("plan")?;
    Ok(tmpl.render(context! { project_name, query })?)
}

/// Renders the per-section analysis prompt.
pub fn section_prompt(project_name: &str, section: &PlanSection) -> Result<String> {
    let tmpl = ENV.get_template("section")?;
    Ok(tmpl.render(context! {
        project_name,
        title => &section.title,
        description => &section.description,
        queries => &section.search_queries,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_prompt_mentions_inputs() {
        let rendered = plan_prompt("Acme Robotics", "warehouse automation TAM").unwrap();
        assert!(rendered.contains("Acme Robotics"));
        assert!(rendered.contains("warehouse automation TAM"));
        assert!(rendered.contains("searchQueries"));
    }

    #[test]
    fn test_section_prompt_lists_queries() {
        let section = PlanSection {
            title: "Market landscape".to_string(),
            description: "Sizing and competitors".to_string(),
            search_queries: vec!["warehouse robotics market size".to_string()],
        };
        let rendered = section_prompt("Acme Robotics", &section).unwrap();
        assert!(rendered.contains("Market landscape"));
        assert!(rendered.contains("warehouse robotics market size"));
    }
}
