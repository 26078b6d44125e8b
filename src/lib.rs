//
// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License").
// You may not use this file except in compliance with the License.
// A copy of the License is located at
//
//  http://aws.amazon.com/apache2.0
//
// or in the "license" file accompanying this file. This file is distributed
// on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either
// express or implied. See the License for the specific language governing
// permissions and limitations under the License.
//

//! A request-validation firewall that sits in front of an HTTP-serving
//! application and decides, before any application logic runs, whether an
//! inbound request is well-formed enough to be safe to process.
//!
//! It inspects the method, the target path, header names/values and
//! parameter names, rejecting requests that carry the characters or
//! patterns behind request smuggling, path traversal, header injection and
//! parser-confusion attacks. It does not parse HTTP wire syntax: the
//! transport layer hands it an already-decoded request, and the firewall
//! purely applies allow/block policies over that decoded form.
//!
//! Two properties are load-bearing:
//!
//! * the rules and their composition are exact, because a bypassable
//!   check defeats the whole protection, and
//! * evaluation is linear in input size with a small constant factor,
//!   because a client fully controls header and parameter sizes. A naive
//!   per-character check (say, one built on a general Unicode-property
//!   regular expression in a backtracking engine) turns the validation
//!   pass itself into a denial-of-service vector. `benches/benchmarks.rs`
//!   compares the candidate classification strategies under multi-megabyte
//!   adversarial inputs.
//!
//! ```
//! use strict_http_firewall::{Firewall, Request};
//!
//! let firewall = Firewall::default();
//!
//! let accepted = firewall.filter(
//!     Request::new("GET", "/uri").header("header", "v").parameter("p", "v"),
//! );
//! assert!(accepted.is_ok());
//!
//! let rejected = firewall.filter(Request::new("GET", "/a/../b"));
//! assert!(rejected.is_err());
//! ```

use lazy_static::lazy_static;

pub mod classifier;
pub mod config;
pub mod firewall;
pub mod path_rules;
pub mod policy;
pub mod rejection;
pub mod request;
pub mod validator;

pub use crate::classifier::{AcceptAll, AssignedNonControl, CharacterClassifier};
pub use crate::config::{ClassifierChoice, ConfigError, FirewallConfig};
pub use crate::firewall::Firewall;
pub use crate::path_rules::{PathBlocklist, PathRule};
pub use crate::policy::{FirewallPolicy, DEFAULT_ALLOWED_METHODS};
pub use crate::rejection::{FirewallRejection, HeaderPart, Rejection, RejectionKind};
pub use crate::request::{FirewallRequest, Request, ValidatedRequest};
pub use crate::validator::StringValidator;

lazy_static! {
    static ref SHARED_FIREWALL: Firewall = Firewall::default();
}

/// A process-wide firewall with the default policy. Policies are immutable
/// and evaluation is read-only, so the shared instance serves any number of
/// concurrent requests without locking.
pub fn shared_firewall() -> &'static Firewall {
    &SHARED_FIREWALL
}
