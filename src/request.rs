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
/// The firewall never parses raw bytes; the transport layer hands it an
/// already-decoded request. This module defines that boundary: a read-only
/// view trait, an owned implementation of it, and the marker wrapper that
/// proves a request passed every active check.
///

///
/// Read-only view of a decoded inbound request. Every string field is
/// untrusted and may contain arbitrary code points, including controls.
///
/// Header names are case-insensitive and duplicates are allowed; the
/// iterator preserves the transport order. Parameters are flattened to
/// name/value pairs, so a multi-valued parameter yields one pair per value.
///
pub trait FirewallRequest {
    fn method(&self) -> &str;

    /// The request target path, as decoded by the transport layer.
    fn path(&self) -> &str;

    fn headers(&self) -> impl Iterator<Item = (&str, &str)>;

    fn parameters(&self) -> impl Iterator<Item = (&str, &str)>;
}

impl<R: FirewallRequest> FirewallRequest for &R {
    fn method(&self) -> &str {
        (**self).method()
    }

    fn path(&self) -> &str {
        (**self).path()
    }

    fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        (**self).headers()
    }

    fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        (**self).parameters()
    }
}

/// An owned request, for callers that do not already have a request type
/// to adapt (and for the tests and benchmarks in this crate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    parameters: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }
}

impl FirewallRequest for Request {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

///
/// A request that passed every active firewall check. The only way to
/// obtain one is through policy evaluation, so downstream code can require
/// `ValidatedRequest` in its signatures instead of re-checking. The
/// underlying request is wrapped unchanged: no mutation, no re-encoding.
///
#[derive(Debug, Clone)]
pub struct ValidatedRequest<R> {
    inner: R,
}

impl<R: FirewallRequest> ValidatedRequest<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn method(&self) -> &str {
        self.inner.method()
    }

    pub fn path(&self) -> &str {
        self.inner.path()
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.headers()
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.parameters()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
