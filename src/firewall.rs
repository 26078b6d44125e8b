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
use crate::policy::FirewallPolicy;
use crate::rejection::FirewallRejection;
use crate::request::{FirewallRequest, ValidatedRequest};
use std::sync::Arc;
use tracing::warn;

///
/// The public entry point. Wraps an immutable [`FirewallPolicy`] and turns
/// its verdicts into [`FirewallRejection`] errors plus structured
/// diagnostics. Cloning a firewall shares the policy, so one instance can
/// be handed to every request-handling task.
///
/// Rejection events never carry the raw offending value: they log the rule
/// kind and the field identifier, and attach the escaped, length-capped
/// excerpt only when verbose diagnostics are enabled.
///
#[derive(Debug, Clone, Default)]
pub struct Firewall {
    policy: Arc<FirewallPolicy>,
    verbose_diagnostics: bool,
}

impl Firewall {
    pub fn new(policy: FirewallPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
            verbose_diagnostics: false,
        }
    }

    /// Opts in to attaching value excerpts to rejection diagnostics.
    pub fn with_verbose_diagnostics(mut self, verbose: bool) -> Self {
        self.verbose_diagnostics = verbose;
        self
    }

    pub fn policy(&self) -> &FirewallPolicy {
        &self.policy
    }

    ///
    /// Filters a raw request through the policy. On success the returned
    /// [`ValidatedRequest`] is guaranteed to have passed every active
    /// check; on failure the typed rejection identifies the rule and the
    /// field. A rejected request is deterministically rejected again on
    /// resubmission, so there is nothing to retry.
    ///
    pub fn filter<R: FirewallRequest>(
        &self,
        request: R,
    ) -> Result<ValidatedRequest<R>, FirewallRejection> {
        match self.policy.evaluate(request) {
            Ok(validated) => Ok(validated),
            Err(rejection) => {
                if self.verbose_diagnostics {
                    warn!(
                        kind = ?rejection.kind(),
                        field_kind = rejection.kind().field_kind(),
                        field = %rejection.field(),
                        excerpt = %rejection.excerpt(),
                        "request rejected"
                    );
                    Err(FirewallRejection::from(rejection))
                } else {
                    warn!(
                        kind = ?rejection.kind(),
                        field_kind = rejection.kind().field_kind(),
                        field = %rejection.field(),
                        "request rejected"
                    );
                    Err(FirewallRejection::from(rejection.redacted()))
                }
            }
        }
    }
}
