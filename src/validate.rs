//! Structural and schema validation for a single trigger package.
//!
//! Checks run in a fixed order. The structural prerequisites (name character
//! class, event file presence, README, `config.json`, icon, JSON parseability)
//! are fail-fast: each failure short-circuits with a single diagnostic, since
//! later checks are meaningless without the prerequisite file. Schema
//! validation of the parsed `config.json` is the opposite: every field error
//! is collected and returned together, so a submitter can fix all of them in
//! one pass.
//!
//! Diagnostics are user-facing strings surfaced verbatim in pull-request
//! feedback; downstream reporting keys on their exact wording.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config::{backtick_list, Language, Platform, TriggerConfig, EVENT_NAMES};

/// Outcome of validating one trigger package. Exactly one of the variants
/// applies; a failure carries every diagnostic produced by the run.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Success { config: TriggerConfig },
    Failure { errors: Vec<String> },
}

impl ValidationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success { .. })
    }

    fn fail(error: String) -> Self {
        ValidationResult::Failure {
            errors: vec![error],
        }
    }
}

fn trigger_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[0-9A-Za-z-]+$").expect("pattern is valid"))
}

/// Validates the trigger named `name` under the triggers root directory.
///
/// The name check runs before any filesystem access, so a malformed name
/// never touches the disk.
pub fn validate_trigger(root: &Path, name: &str) -> ValidationResult {
    if !trigger_name_pattern().is_match(name) {
        return ValidationResult::fail(format!(
            "The trigger name `{name}` is invalid. Trigger names can only contain letters, numbers, and hyphens."
        ));
    }

    let dir = root.join(name);
    debug!(trigger = name, dir = %dir.display(), "Validating trigger package");

    let any_event_file = EVENT_NAMES.iter().any(|event| dir.join(event).exists());
    if !any_event_file {
        return ValidationResult::fail(format!(
            "We couldn't find any trigger files in `{}`. Try adding an executable file with one of the following names: {}.",
            dir.display(),
            backtick_list(&EVENT_NAMES),
        ));
    }

    let readme_path = dir.join("README.md");
    if !readme_path.exists() {
        return ValidationResult::fail(format!(
            "Your trigger doesn't seem to have a README. We'll use this in the triggers directory to tell users more about your app. Please add one at `{}`.",
            readme_path.display(),
        ));
    }

    let config_path = dir.join("config.json");
    if !config_path.exists() {
        return ValidationResult::fail(format!(
            "We couldn't find a triggers configuration file at `{}`. Please add one to let us know how we should show your app in the triggers directory.",
            config_path.display(),
        ));
    }

    let icon_path = dir.join("assets").join("icon.png");
    if !icon_path.exists() {
        return ValidationResult::fail(format!(
            "We couldn't find an icon for your trigger at `{}`. Please add one to let us know how we should show your app in the triggers directory.",
            icon_path.display(),
        ));
    }

    let parsed: Value = match std::fs::read_to_string(&config_path)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
    {
        Some(value) => value,
        None => {
            return ValidationResult::fail(format!(
                "The triggers configuration file at `{}` doesn't appear to be valid JSON.",
                config_path.display(),
            ));
        }
    };

    match validate_schema(&parsed) {
        Ok(config) => ValidationResult::Success { config },
        Err(errors) => ValidationResult::Failure { errors },
    }
}

/// Schema check over a parsed `config.json` object. Unlike the structural
/// checks, every field error is aggregated; diagnostics appear in field
/// declaration order (name, description, platforms, language).
fn validate_schema(value: &Value) -> Result<TriggerConfig, Vec<String>> {
    let mut errors = Vec::new();

    let name = match value.get("name") {
        None => {
            errors.push("`name` must be provided in your `config.json` file.".to_string());
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push("The `name` in your `config.json` file must be a string.".to_string());
            None
        }
    };

    let description = match value.get("description") {
        None => {
            errors.push("`description` must be provided in your `config.json` file.".to_string());
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors
                .push("The `description` in your `config.json` file must be a string.".to_string());
            None
        }
    };

    let platforms = match value.get("platforms") {
        Some(Value::Array(entries)) => {
            if entries.is_empty() {
                errors.push(
                    "`platforms` in your `config.json` file must contain at least one platform."
                        .to_string(),
                );
                None
            } else {
                let mut parsed = Vec::with_capacity(entries.len());
                let mut element_errors = false;
                for entry in entries {
                    let rendered = match entry {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    match entry.as_str().and_then(Platform::parse) {
                        Some(platform) => parsed.push(platform),
                        None => {
                            element_errors = true;
                            errors.push(format!(
                                "The platform `{rendered}` in your `config.json` file is not valid. Valid platforms are: {}.",
                                backtick_list(&Platform::ALL),
                            ));
                        }
                    }
                }
                (!element_errors).then_some(parsed)
            }
        }
        _ => {
            errors.push("`platforms` must be provided in your `config.json` file.".to_string());
            None
        }
    };

    let language = match value.get("language") {
        Some(Value::String(s)) => match Language::parse(s) {
            Some(language) => Some(language),
            None => {
                errors.push(format!(
                    "The language `{s}` in your `config.json` file is not valid. Valid languages are: {}.",
                    backtick_list(&Language::ALL),
                ));
                None
            }
        },
        _ => {
            errors.push("`language` must be provided in your `config.json` file.".to_string());
            None
        }
    };

    match (name, description, platforms, language) {
        (Some(name), Some(description), Some(platforms), Some(language)) if errors.is_empty() => {
            Ok(TriggerConfig {
                name,
                description,
                platforms,
                language,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_accepts_a_fully_valid_object() {
        let value = json!({
            "name": "Join Alert",
            "description": "Plays a sound when someone joins.",
            "platforms": ["macos", "linux"],
            "language": "python",
        });
        let config = validate_schema(&value).expect("valid config");
        assert_eq!(config.name, "Join Alert");
        assert_eq!(config.platforms, vec![Platform::Macos, Platform::Linux]);
        assert_eq!(config.language, Language::Python);
    }

    #[test]
    fn schema_aggregates_one_error_per_missing_field() {
        let value = json!({
            "platforms": ["macos"],
            "language": "bash",
        });
        let errors = validate_schema(&value).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            "`name` must be provided in your `config.json` file."
        );
        assert_eq!(
            errors[1],
            "`description` must be provided in your `config.json` file."
        );
    }

    #[test]
    fn schema_distinguishes_absent_from_wrong_type() {
        let value = json!({
            "name": 7,
            "description": "fine",
            "platforms": ["linux"],
            "language": "ruby",
        });
        let errors = validate_schema(&value).unwrap_err();
        assert_eq!(
            errors,
            vec!["The `name` in your `config.json` file must be a string.".to_string()]
        );
    }

    #[test]
    fn empty_platforms_yields_only_the_nonempty_message() {
        let value = json!({
            "name": "x",
            "description": "y",
            "platforms": [],
            "language": "bash",
        });
        let errors = validate_schema(&value).unwrap_err();
        let platform_errors: Vec<_> = errors
            .iter()
            .filter(|e| e.contains("platform"))
            .collect();
        assert_eq!(platform_errors.len(), 1);
        assert!(platform_errors[0].contains("must contain at least one platform"));
    }

    #[test]
    fn unknown_platform_names_the_value_and_the_valid_set() {
        let value = json!({
            "name": "x",
            "description": "y",
            "platforms": ["macos", "amiga"],
            "language": "bash",
        });
        let errors = validate_schema(&value).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("`amiga`"));
        assert!(errors[0].contains("`macos`, `linux`, `windows`"));
    }

    #[test]
    fn non_array_platforms_reads_as_not_provided() {
        let value = json!({
            "name": "x",
            "description": "y",
            "platforms": "macos",
            "language": "bash",
        });
        let errors = validate_schema(&value).unwrap_err();
        assert_eq!(
            errors,
            vec!["`platforms` must be provided in your `config.json` file.".to_string()]
        );
    }
}
