//! Validation report consumed by the pull-request feedback tooling.

use serde::{Deserialize, Serialize};

use crate::config::TriggerConfig;
use crate::validate::ValidationResult;

/// One trigger's validation outcome. `errors` is present only on failure,
/// `config` only on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerReport {
    pub trigger: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<TriggerConfig>,
}

impl TriggerReport {
    pub fn from_result(trigger: String, result: ValidationResult) -> Self {
        match result {
            ValidationResult::Success { config } => TriggerReport {
                trigger,
                success: true,
                errors: None,
                config: Some(config),
            },
            ValidationResult::Failure { errors } => TriggerReport {
                trigger,
                success: false,
                errors: Some(errors),
                config: None,
            },
        }
    }
}

/// The full report for one pull-request validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub number: u64,
    pub results: Vec<TriggerReport>,
}

impl ValidationReport {
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
