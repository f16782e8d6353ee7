//! FX action plan prompt definition.

use super::PromptDefinition;
use crate::domains::prompts::error::PromptError;
use rmcp::model::PromptArgument;
use std::collections::HashMap;

/// Asks the model for 3-5 concrete actions on a currency pair.
pub struct FxPlanPrompt;

impl FxPlanPrompt {
    /// Flag derived from `cobertura`, read by the template.
    const HEDGE_FLAG: &'static str = "incluye_cobertura";
}

impl PromptDefinition for FxPlanPrompt {
    const NAME: &'static str = "plan_fx_acciones";
    const DESCRIPTION: &'static str = "Plantilla para generar un plan de acciones FX";

    fn template() -> &'static str {
        "Eres experta en trading FX y hedging.\n\
         Par: {{par}}. Horizonte: {{horizonte}}.\n\
         Cobertura: {{#if incluye_cobertura}}sí{{else}}no{{/if}}.\n\
         Devuelve bullets con 3-5 acciones concretas."
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            PromptArgument {
                name: "par".to_string(),
                title: None,
                description: Some("Par de divisa, ej. USD/MXN".to_string()),
                required: Some(true),
            },
            PromptArgument {
                name: "horizonte".to_string(),
                title: None,
                description: Some("Horizonte temporal".to_string()),
                required: Some(true),
            },
            PromptArgument {
                name: "cobertura".to_string(),
                title: None,
                description: Some("¿Incluir cobertura? (si/no)".to_string()),
                required: Some(true),
            },
        ]
    }

    /// `cobertura` must be `si` or `no` (case-insensitive, `sí` accepted).
    fn prepare(arguments: &mut HashMap<String, String>) -> Result<(), PromptError> {
        let cobertura = arguments
            .get("cobertura")
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default();

        let hedge = match cobertura.as_str() {
            "si" | "sí" => true,
            "no" => false,
            other => {
                return Err(PromptError::invalid_argument(
                    "cobertura",
                    format!("expected 'si' or 'no', got '{}'", other),
                ));
            }
        };

        arguments.remove(Self::HEDGE_FLAG);
        if hedge {
            arguments.insert(Self::HEDGE_FLAG.to_string(), "true".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cobertura: &str) -> HashMap<String, String> {
        HashMap::from([
            ("par".to_string(), "USD/MXN".to_string()),
            ("horizonte".to_string(), "3 meses".to_string()),
            ("cobertura".to_string(), cobertura.to_string()),
        ])
    }

    #[test]
    fn test_metadata() {
        assert_eq!(FxPlanPrompt::NAME, "plan_fx_acciones");
        let arguments = FxPlanPrompt::arguments();
        assert_eq!(arguments.len(), 3);
        assert!(arguments.iter().all(|a| a.required == Some(true)));
    }

    #[test]
    fn test_prepare_sets_flag_for_si() {
        let mut arguments = args("SI");
        FxPlanPrompt::prepare(&mut arguments).unwrap();
        assert_eq!(arguments.get("incluye_cobertura").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_prepare_clears_flag_for_no() {
        let mut arguments = args("no");
        arguments.insert("incluye_cobertura".to_string(), "true".to_string());
        FxPlanPrompt::prepare(&mut arguments).unwrap();
        assert!(!arguments.contains_key("incluye_cobertura"));
    }

    #[test]
    fn test_prepare_rejects_other_values() {
        let mut arguments = args("tal vez");
        let result = FxPlanPrompt::prepare(&mut arguments);
        assert!(matches!(result, Err(PromptError::InvalidArgument(arg, _)) if arg == "cobertura"));
    }
}
