//! Prompt Catalog - fixed named prompt templates, compiled into the binary.
//!
//! Templates are embedded at build time via `include_str!` rather than read
//! from a runtime path, so the binary is self-contained. Substitution is a
//! single linear pass over `{snake_case_name}` placeholders — no nesting, no
//! conditionals.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

const INTENT_CLASSIFICATION: &str = include_str!("intent_classification.txt");
const REQUIREMENTS_EXTRACTION: &str = include_str!("requirements_extraction.txt");
const CODE_GENERATION: &str = include_str!("code_generation.txt");
const LIBRARY_EXTRACTION: &str = include_str!("library_extraction.txt");
const CODE_FIX: &str = include_str!("code_fix.txt");
const CONVERSATIONAL_ANSWER: &str = include_str!("conversational_answer.txt");

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{([a-z][a-z0-9_]*)\}").unwrap();
}

fn template_for(name: &str) -> Result<&'static str> {
    match name {
        "intent_classification" => Ok(INTENT_CLASSIFICATION),
        "requirements_extraction" => Ok(REQUIREMENTS_EXTRACTION),
        "code_generation" => Ok(CODE_GENERATION),
        "library_extraction" => Ok(LIBRARY_EXTRACTION),
        "code_fix" => Ok(CODE_FIX),
        "conversational_answer" => Ok(CONVERSATIONAL_ANSWER),
        other => Err(Error::Planning(format!("unknown prompt template: {other}"))),
    }
}

/// Loads the fixed prompt templates and renders them with variable
/// substitution. Immutable once built, safe to share via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PromptCatalog;

impl PromptCatalog {
    /// Create the catalog. There's nothing to load at runtime — templates
    /// are compiled in — but this mirrors the constructor shape of the
    /// other process-wide singletons (embedding model, vector store).
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render `name` against `vars`, failing if the template is unknown or
    /// references a variable `vars` doesn't supply.
    pub fn render(&self, name: &str, vars: &HashMap<String, String>) -> Result<String> {
        let template = template_for(name)?;
        let mut rendered = template.to_string();
        for (key, value) in vars {
            rendered = rendered.replace(&format!("{{{key}}}"), value);
        }

        if let Some(captures) = PLACEHOLDER_RE.captures(&rendered) {
            let missing = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            return Err(Error::Planning(format!(
                "prompt template '{name}' references undefined variable '{missing}'"
            )));
        }

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_render_known_template() {
        let catalog = PromptCatalog::new();
        let rendered = catalog
            .render(
                "intent_classification",
                &vars(&[("user_message", "turn on the lights"), ("conversation_history", "")]),
            )
            .unwrap();
        assert!(rendered.contains("turn on the lights"));
        assert!(!rendered.contains("{user_message}"));
    }

    #[test]
    fn test_unknown_template_errors() {
        let catalog = PromptCatalog::new();
        let err = catalog.render("not_a_template", &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::Planning(_)));
    }

    #[test]
    fn test_missing_variable_errors() {
        let catalog = PromptCatalog::new();
        let err = catalog
            .render("intent_classification", &vars(&[("user_message", "hi")]))
            .unwrap_err();
        assert!(matches!(err, Error::Planning(_)));
    }

    #[test]
    fn test_literal_json_braces_survive_substitution() {
        let catalog = PromptCatalog::new();
        let rendered = catalog
            .render(
                "intent_classification",
                &vars(&[("user_message", "hi"), ("conversation_history", "")]),
            )
            .unwrap();
        assert!(rendered.contains("\"type\""));
    }
}
