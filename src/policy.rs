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
use crate::path_rules::PathBlocklist;
use crate::rejection::{HeaderPart, Rejection};
use crate::request::{FirewallRequest, ValidatedRequest};
use crate::validator::StringValidator;
use std::collections::HashSet;

/// Methods allowed unless the caller configures its own set.
pub const DEFAULT_ALLOWED_METHODS: &[&str] =
    &["DELETE", "GET", "HEAD", "OPTIONS", "PATCH", "POST", "PUT"];

///
/// The complete rule set of the firewall: an allowed-methods set, the path
/// blocklist, and one string validator per field kind. Immutable after
/// construction, so a single policy is shared read-only across arbitrarily
/// many concurrent evaluations without locking.
///
/// Parameter *values* are not character-validated unless a value validator
/// is set explicitly: values are free-form user data handled by later
/// encoding-aware output layers. This is a deliberate scope boundary, not
/// an oversight.
///
#[derive(Debug, Clone)]
pub struct FirewallPolicy {
    allowed_methods: HashSet<String>,
    path_rules: PathBlocklist,
    header_name_validator: StringValidator,
    header_value_validator: StringValidator,
    parameter_name_validator: StringValidator,
    parameter_value_validator: Option<StringValidator>,
}

impl Default for FirewallPolicy {
    fn default() -> Self {
        Self {
            allowed_methods: DEFAULT_ALLOWED_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            path_rules: PathBlocklist::default(),
            header_name_validator: StringValidator::assigned_non_control(),
            header_value_validator: StringValidator::assigned_non_control(),
            parameter_name_validator: StringValidator::assigned_non_control(),
            parameter_value_validator: None,
        }
    }
}

impl FirewallPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the allowed-methods set. Matching is exact and
    /// case-sensitive, as HTTP method names are.
    pub fn with_allowed_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_path_rules(mut self, rules: PathBlocklist) -> Self {
        self.path_rules = rules;
        self
    }

    pub fn with_header_name_validator(mut self, validator: StringValidator) -> Self {
        self.header_name_validator = validator;
        self
    }

    pub fn with_header_value_validator(mut self, validator: StringValidator) -> Self {
        self.header_value_validator = validator;
        self
    }

    pub fn with_parameter_name_validator(mut self, validator: StringValidator) -> Self {
        self.parameter_name_validator = validator;
        self
    }

    /// Opts in to character-validating parameter values as well. Off by
    /// default; see the type-level docs for why.
    pub fn with_parameter_value_validator(mut self, validator: StringValidator) -> Self {
        self.parameter_value_validator = Some(validator);
        self
    }

    ///
    /// Runs every active check against the request, fail-fast, in a fixed
    /// order: method, path, headers (name before value, transport order),
    /// parameter names. On success the request is handed back unchanged,
    /// wrapped as [`ValidatedRequest`].
    ///
    /// Evaluation performs no I/O, never blocks, and its cost is linear in
    /// the total size of the inspected fields with a small constant factor.
    ///
    pub fn evaluate<R: FirewallRequest>(
        &self,
        request: R,
    ) -> Result<ValidatedRequest<R>, Rejection> {
        if !self.allowed_methods.contains(request.method()) {
            return Err(Rejection::method_not_allowed(request.method()));
        }

        if let Err(rule) = self.path_rules.check(request.path()) {
            return Err(Rejection::forbidden_path(rule, request.path()));
        }

        for (name, value) in request.headers() {
            if !self.header_name_validator.validate(name) {
                return Err(Rejection::forbidden_header(HeaderPart::Name, name, name));
            }
            if !self.header_value_validator.validate(value) {
                return Err(Rejection::forbidden_header(HeaderPart::Value, name, value));
            }
        }

        for (name, value) in request.parameters() {
            if !self.parameter_name_validator.validate(name) {
                return Err(Rejection::forbidden_parameter(name, name));
            }
            if let Some(validator) = &self.parameter_value_validator {
                if !validator.validate(value) {
                    return Err(Rejection::forbidden_parameter(name, value));
                }
            }
        }

        Ok(ValidatedRequest::new(request))
    }
}
