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
use crate::path_rules::PathRule;
use std::fmt::{self, Display, Formatter, Write};
use thiserror::Error;

/// The maximum length of a diagnostic excerpt, before escaping.
pub const EXCERPT_MAX_SIZE: usize = 128;

/// Which half of a header failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderPart {
    Name,
    Value,
}

/// The rule class that rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// The method is outside the allowed set.
    MethodNotAllowed,
    /// The target path violated the given structural rule.
    ForbiddenPath(PathRule),
    /// A header name or value contained a forbidden code point.
    ForbiddenHeader(HeaderPart),
    /// A parameter name (or, if configured, value) contained a forbidden
    /// code point.
    ForbiddenParameter,
}

impl RejectionKind {
    /// The kind of field the rule applies to, for diagnostics.
    pub fn field_kind(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method",
            Self::ForbiddenPath(_) => "path",
            Self::ForbiddenHeader(HeaderPart::Name) => "header name",
            Self::ForbiddenHeader(HeaderPart::Value) => "header value",
            Self::ForbiddenParameter => "parameter",
        }
    }
}

///
/// Why a request was rejected. Values derived from the request (the field
/// identifier and the excerpt) are stored escaped and length-capped, so a
/// `Rejection` is always safe to log; the verbatim offending value is never
/// retained. The excerpt is only surfaced when verbose diagnostics are on.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    kind: RejectionKind,
    field: String,
    excerpt: String,
}

impl Rejection {
    pub(crate) fn method_not_allowed(method: &str) -> Self {
        Self {
            kind: RejectionKind::MethodNotAllowed,
            field: "method".to_string(),
            excerpt: quoted_excerpt(method),
        }
    }

    pub(crate) fn forbidden_path(rule: PathRule, path: &str) -> Self {
        Self {
            kind: RejectionKind::ForbiddenPath(rule),
            field: "path".to_string(),
            excerpt: quoted_excerpt(path),
        }
    }

    pub(crate) fn forbidden_header(part: HeaderPart, name: &str, offending: &str) -> Self {
        Self {
            kind: RejectionKind::ForbiddenHeader(part),
            field: quoted_excerpt(name),
            excerpt: quoted_excerpt(offending),
        }
    }

    pub(crate) fn forbidden_parameter(name: &str, offending: &str) -> Self {
        Self {
            kind: RejectionKind::ForbiddenParameter,
            field: quoted_excerpt(name),
            excerpt: quoted_excerpt(offending),
        }
    }

    pub fn kind(&self) -> RejectionKind {
        self.kind
    }

    /// Identifies the offending field: the literal field kind for method
    /// and path, or the (escaped, capped) header/parameter name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// A length-capped, control-character-escaped excerpt of the offending
    /// value. The firewall façade strips it unless verbose diagnostics are
    /// enabled, so rejections raised through [`crate::Firewall::filter`]
    /// carry it only behind that explicit flag.
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    /// Drops the excerpt, leaving the rule kind and field identifier.
    pub(crate) fn redacted(mut self) -> Self {
        self.excerpt = String::new();
        self
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            RejectionKind::MethodNotAllowed => write!(f, "method not in the allowed set"),
            RejectionKind::ForbiddenPath(rule) => {
                write!(f, "path blocked by rule {:?}", rule)
            }
            RejectionKind::ForbiddenHeader(part) => {
                write!(f, "forbidden character in {:?} of header {}", part, self.field)
            }
            RejectionKind::ForbiddenParameter => {
                write!(f, "forbidden character in parameter {}", self.field)
            }
        }
    }
}

///
/// A rejected request, as raised by the firewall façade. Always a
/// client-input error, never process-fatal. Its `Display` carries the rule
/// kind and the field identifier only.
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request rejected by firewall: {rejection}")]
pub struct FirewallRejection {
    rejection: Rejection,
}

impl FirewallRejection {
    pub fn kind(&self) -> RejectionKind {
        self.rejection.kind()
    }

    pub fn rejection(&self) -> &Rejection {
        &self.rejection
    }
}

impl From<Rejection> for FirewallRejection {
    fn from(rejection: Rejection) -> Self {
        Self { rejection }
    }
}

///
/// Renders an untrusted value as a quoted, control-character-escaped,
/// length-capped string. Escaping first means the same attack class the
/// firewall blocks cannot ride into logs through its own diagnostics.
///
pub fn quoted_excerpt(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(EXCERPT_MAX_SIZE) + 2);
    out.push('"');
    for c in raw.chars() {
        if out.len() >= EXCERPT_MAX_SIZE {
            out.push_str("...");
            break;
        }
        match c {
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if (c as u32) < 0x20 || c as u32 == 0x7f => {
                write!(out, "\\{:#04x}", c as u32).expect("Writing to strings is infallible");
            }
            _ if c.is_control() => {
                write!(out, "\\u{{{:04x}}}", c as u32).expect("Writing to strings is infallible");
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
