///
/// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
///
/// Licensed under the Apache License, Version 2.0 (the "License").
/// You may not use this file except in compliance with the License.
/// A copy of the License is located at
///
///  http://aws.amazon.com/apache2.0
///
/// or in the "license" file accompanying this file. This file is distributed
/// on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either
/// express or implied. See the License for the specific language governing
/// permissions and limitations under the License.
///
use crate::classifier::is_method_tchar;
use crate::firewall::Firewall;
use crate::path_rules::PathBlocklist;
use crate::policy::{FirewallPolicy, DEFAULT_ALLOWED_METHODS};
use crate::validator::StringValidator;
use serde::Deserialize;
use thiserror::Error;

/// Character-validation strategy selectable per field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierChoice {
    /// Per-code-point table/category lookup (the shipped default).
    AssignedNonControl,
    /// The equivalent whole-string regex; slower, kept for comparison.
    Regex,
    /// Accepts everything but still iterates; benchmark baseline only.
    AcceptAllIterating,
    /// Skips the check entirely. Explicit opt-out.
    Disabled,
}

impl ClassifierChoice {
    fn validator(self) -> StringValidator {
        match self {
            Self::AssignedNonControl => StringValidator::assigned_non_control(),
            Self::Regex => StringValidator::assigned_non_control_regex(),
            Self::AcceptAllIterating => StringValidator::accept_all_iterating(),
            Self::Disabled => StringValidator::Disabled,
        }
    }
}

///
/// The startup configuration surface, as handed over by an external config
/// loader. Misconfiguration is detected here, once, at construction time;
/// per-request evaluation never fails for internal reasons.
///
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirewallConfig {
    pub allowed_methods: Vec<String>,
    pub header_names: ClassifierChoice,
    pub header_values: ClassifierChoice,
    pub parameter_names: ClassifierChoice,
    /// When set, parameter values are character-validated too. Unset by
    /// default: values are free-form user data for later output layers.
    pub parameter_values: Option<ClassifierChoice>,
    pub path_rules: PathBlocklist,
    pub verbose_diagnostics: bool,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            allowed_methods: DEFAULT_ALLOWED_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            header_names: ClassifierChoice::AssignedNonControl,
            header_values: ClassifierChoice::AssignedNonControl,
            parameter_names: ClassifierChoice::AssignedNonControl,
            parameter_values: None,
            path_rules: PathBlocklist::default(),
            verbose_diagnostics: false,
        }
    }
}

/// Configuration errors. These abort startup; they are never produced
/// during request processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("allowed_methods must not be empty")]
    EmptyMethodSet,
    #[error("method {0:?} contains non-token characters")]
    MalformedMethod(String),
    #[error("path_rules disables every rule; at least one must stay enabled")]
    ConflictingPathRules,
}

impl FirewallConfig {
    /// Validates the configuration and builds the firewall, failing fast
    /// on misconfiguration.
    pub fn build(self) -> Result<Firewall, ConfigError> {
        if self.allowed_methods.is_empty() {
            return Err(ConfigError::EmptyMethodSet);
        }
        for method in &self.allowed_methods {
            let well_formed =
                !method.is_empty() && method.bytes().all(is_method_tchar);
            if !well_formed {
                return Err(ConfigError::MalformedMethod(method.clone()));
            }
        }
        // a path blocklist with every rule off claims path checking while
        // performing none; individual toggles remain free
        if !self.path_rules.has_active_rules() {
            return Err(ConfigError::ConflictingPathRules);
        }

        let mut policy = FirewallPolicy::new()
            .with_allowed_methods(self.allowed_methods)
            .with_path_rules(self.path_rules)
            .with_header_name_validator(self.header_names.validator())
            .with_header_value_validator(self.header_values.validator())
            .with_parameter_name_validator(self.parameter_names.validator());
        if let Some(choice) = self.parameter_values {
            policy = policy.with_parameter_value_validator(choice.validator());
        }

        Ok(Firewall::new(policy).with_verbose_diagnostics(self.verbose_diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rejection::RejectionKind;
    use crate::request::Request;

    #[test]
    fn test_default_config_builds_the_default_policy() {
        let firewall = FirewallConfig::default().build().unwrap();
        assert!(firewall
            .filter(Request::new("GET", "/uri").header("header", "v"))
            .is_ok());
        assert!(firewall.filter(Request::new("TRACE", "/uri")).is_err());
    }

    #[test]
    fn test_empty_method_set_fails_fast() {
        let config = FirewallConfig {
            allowed_methods: vec![],
            ..FirewallConfig::default()
        };
        assert_eq!(config.build().unwrap_err(), ConfigError::EmptyMethodSet);
    }

    #[test]
    fn test_malformed_method_fails_fast() {
        for bad in ["", "GET POST", "GET\r\n", "naïve"] {
            let config = FirewallConfig {
                allowed_methods: vec![bad.to_string()],
                ..FirewallConfig::default()
            };
            assert_eq!(
                config.build().unwrap_err(),
                ConfigError::MalformedMethod(bad.to_string()),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_fully_disabled_path_rules_fail_fast() {
        let config: FirewallConfig = toml::from_str(
            r#"
            [path_rules]
            require_absolute = false
            reject_empty_segments = false
            reject_traversal = false
            reject_backslash = false
            reject_semicolon = false
            reject_control_characters = false
            reject_encoded_pitfalls = false
            "#,
        )
        .unwrap();
        assert_eq!(
            config.build().unwrap_err(),
            ConfigError::ConflictingPathRules
        );

        // one surviving rule is enough to make the set coherent
        let config: FirewallConfig = toml::from_str(
            r#"
            [path_rules]
            require_absolute = false
            reject_empty_segments = false
            reject_backslash = false
            reject_semicolon = false
            reject_control_characters = false
            reject_encoded_pitfalls = false
            "#,
        )
        .unwrap();
        let firewall = config.build().unwrap();
        assert!(firewall.filter(Request::new("GET", "/a/../b")).is_err());
        assert!(firewall.filter(Request::new("GET", "/a;b//c")).is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config: FirewallConfig = toml::from_str(
            r#"
            allowed_methods = ["GET", "POST"]
            header_values = "regex"
            parameter_values = "assigned-non-control"
            verbose_diagnostics = true

            [path_rules]
            reject_semicolon = false
            "#,
        )
        .unwrap();

        assert_eq!(config.header_values, ClassifierChoice::Regex);
        assert_eq!(config.header_names, ClassifierChoice::AssignedNonControl);
        assert!(!config.path_rules.reject_semicolon);
        assert!(config.path_rules.reject_traversal);

        let firewall = config.build().unwrap();
        // semicolons pass now, parameter values are validated now
        assert!(firewall
            .filter(Request::new("GET", "/a;jsessionid=1"))
            .is_ok());
        assert_eq!(
            firewall
                .filter(Request::new("GET", "/uri").parameter("p", "v\u{0}"))
                .unwrap_err()
                .kind(),
            RejectionKind::ForbiddenParameter
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let parsed: Result<FirewallConfig, _> = toml::from_str("unknown_knob = true");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_disabling_checks_requires_explicit_choice() {
        let config: FirewallConfig =
            toml::from_str(r#"header_values = "disabled""#).unwrap();
        let firewall = config.build().unwrap();
        assert!(firewall
            .filter(Request::new("GET", "/uri").header("header", "v\u{0}"))
            .is_ok());
    }
}
