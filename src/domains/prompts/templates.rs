//! Prompt templates module.
//!
//! This module contains the PromptTemplate struct and the small
//! `{{variable}}` / `{{#if}}` rendering engine used by every prompt.

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

/// Hook run on the caller's arguments before rendering.
///
/// Used to validate enumerated values and to derive flags consumed by
/// `{{#if}}` blocks.
pub type PrepareFn = fn(&mut HashMap<String, String>) -> Result<(), PromptError>;

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgument>,

    /// The template string with placeholders.
    pub template: String,

    /// Optional argument preparation step.
    pub prepare: Option<PrepareFn>,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        arguments: Vec<PromptArgument>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            arguments,
            template: template.into(),
            prepare: None,
        }
    }

    pub fn with_prepare(mut self, prepare: PrepareFn) -> Self {
        self.prepare = Some(prepare);
        self
    }

    /// Check required arguments, run the prepare hook, then render.
    pub fn instantiate(&self, mut arguments: HashMap<String, String>) -> Result<String, PromptError> {
        for arg in &self.arguments {
            let present = arguments
                .get(&arg.name)
                .is_some_and(|v| !v.trim().is_empty());
            if arg.required.unwrap_or(false) && !present {
                return Err(PromptError::missing_argument(&arg.name));
            }
        }

        if let Some(prepare) = self.prepare {
            prepare(&mut arguments)?;
        }

        self.render(&arguments)
    }

    /// Render the template with the given arguments.
    ///
    /// - `{{variable}}` is replaced with the value of `variable`
    /// - `{{#if variable}}content{{/if}}` includes content only if variable is set
    /// - `{{#if variable}}content{{else}}alternative{{/if}}` with else support
    ///
    /// Conditionals do not nest. Substituted values are inserted verbatim and
    /// never rescanned, so a value that looks like a placeholder stays as is.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        let expanded = process_conditionals(&self.template, arguments)?;
        Ok(substitute_placeholders(&expanded, arguments))
    }
}

fn process_conditionals(
    template: &str,
    arguments: &HashMap<String, String>,
) -> Result<String, PromptError> {
    const IF_TAG: &str = "{{#if ";
    const ELSE_TAG: &str = "{{else}}";
    const ENDIF_TAG: &str = "{{/if}}";

    let mut result = template.to_string();

    while let Some(if_start) = result.find(IF_TAG) {
        let var_end = result[if_start..]
            .find("}}")
            .map(|pos| if_start + pos)
            .ok_or_else(|| PromptError::template("Unclosed {{#if}} tag"))?;
        let var_name = result[if_start + IF_TAG.len()..var_end].trim();

        let endif_pos = result[var_end..]
            .find(ENDIF_TAG)
            .map(|pos| var_end + pos)
            .ok_or_else(|| PromptError::template("Missing {{/if}} tag"))?;

        let block = &result[var_end + 2..endif_pos];
        let (when_set, when_unset) = match block.find(ELSE_TAG) {
            Some(else_pos) => (&block[..else_pos], &block[else_pos + ELSE_TAG.len()..]),
            None => (block, ""),
        };

        let is_set = arguments.get(var_name).is_some_and(|v| !v.is_empty());
        let replacement = if is_set { when_set } else { when_unset };

        result = format!(
            "{}{}{}",
            &result[..if_start],
            replacement,
            &result[endif_pos + ENDIF_TAG.len()..]
        );
    }

    Ok(result)
}

/// Replace every `{{name}}` in one left-to-right pass. Unknown names render
/// empty; block tags (`#`, `/`) are kept.
fn substitute_placeholders(template: &str, arguments: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open..].find("}}").map(|pos| open + pos) else {
            break;
        };
        result.push_str(&rest[..open]);

        let name = rest[open + 2..close].trim();
        if name.starts_with('#') || name.starts_with('/') {
            result.push_str(&rest[open..close + 2]);
        } else if let Some(value) = arguments.get(name) {
            result.push_str(value);
        }

        rest = &rest[close + 2..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required(name: &str) -> PromptArgument {
        PromptArgument {
            name: name.to_string(),
            title: None,
            description: None,
            required: Some(true),
        }
    }

    #[test]
    fn test_simple_substitution() {
        let template = PromptTemplate::new("test", None, vec![], "Par: {{par}}.");
        let result = template.render(&args(&[("par", "USD/MXN")])).unwrap();
        assert_eq!(result, "Par: USD/MXN.");
    }

    #[test]
    fn test_conditional_with_value() {
        let template =
            PromptTemplate::new("test", None, vec![], "Plan{{#if par}} para {{par}}{{/if}}.");
        let result = template.render(&args(&[("par", "EUR/USD")])).unwrap();
        assert_eq!(result, "Plan para EUR/USD.");
    }

    #[test]
    fn test_conditional_without_value() {
        let template =
            PromptTemplate::new("test", None, vec![], "Plan{{#if par}} para {{par}}{{/if}}.");
        let result = template.render(&HashMap::new()).unwrap();
        assert_eq!(result, "Plan.");
    }

    #[test]
    fn test_conditional_with_else() {
        let template = PromptTemplate::new(
            "test",
            None,
            vec![],
            "Cobertura: {{#if cubrir}}sí{{else}}no{{/if}}.",
        );
        let result = template.render(&HashMap::new()).unwrap();
        assert_eq!(result, "Cobertura: no.");
    }

    #[test]
    fn test_missing_optional_placeholder_renders_empty() {
        let template = PromptTemplate::new("test", None, vec![], "Par: {{par}}{{nota}}.");
        let result = template.render(&args(&[("par", "USD/MXN")])).unwrap();
        assert_eq!(result, "Par: USD/MXN.");
    }

    #[test]
    fn test_values_are_inserted_verbatim() {
        let template = PromptTemplate::new(
            "test",
            None,
            vec![],
            "Par: {{par}}. Horizonte: {{horizonte}}.",
        );
        let arguments = args(&[("par", "{{horizonte}}"), ("horizonte", "1 mes")]);

        for _ in 0..32 {
            let result = template.render(&arguments).unwrap();
            assert_eq!(result, "Par: {{horizonte}}. Horizonte: 1 mes.");
        }
    }

    #[test]
    fn test_unclosed_conditional_is_error() {
        let template = PromptTemplate::new("test", None, vec![], "{{#if x}}sin cierre");
        let result = template.render(&HashMap::new());
        assert!(matches!(result, Err(PromptError::TemplateError(_))));
    }

    #[test]
    fn test_instantiate_rejects_blank_required() {
        let template = PromptTemplate::new("test", None, vec![required("par")], "{{par}}");
        let result = template.instantiate(args(&[("par", "  ")]));
        assert!(matches!(result, Err(PromptError::MissingArgument(name)) if name == "par"));
    }

    #[test]
    fn test_instantiate_runs_prepare() {
        fn shout(arguments: &mut HashMap<String, String>) -> Result<(), PromptError> {
            if let Some(par) = arguments.get_mut("par") {
                *par = par.to_uppercase();
            }
            Ok(())
        }

        let template = PromptTemplate::new("test", None, vec![required("par")], "{{par}}")
            .with_prepare(shout);
        let result = template.instantiate(args(&[("par", "usd/mxn")])).unwrap();
        assert_eq!(result, "USD/MXN");
    }
}
