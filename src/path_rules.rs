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
use serde::Deserialize;
use smallvec::SmallVec;
use strum_macros::EnumIter;

/// Typical request targets fit here; longer paths spill over to the heap.
const PATH_STACK_STORAGE_SIZE: usize = 256;

///
/// The structural rule that rejected a request target. These are sequence
/// patterns a character-level check cannot catch.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PathRule {
    /// The target is not syntactically an absolute path (`/...`).
    NotAbsolute,
    /// An empty segment (`//`) that downstream routers treat inconsistently.
    EmptySegment,
    /// A literal `..` path segment.
    Traversal,
    /// A backslash, which some downstream systems treat as a path separator.
    Backslash,
    /// A semicolon; path parameters historically enabled filter bypasses.
    Semicolon,
    /// A raw control byte in the target.
    ControlCharacter,
    /// A `%` not followed by two hex digits.
    MalformedEncoding,
    /// A percent-encoded control character.
    EncodedControl,
    /// A percent-encoded `..` segment or path separator, including forms
    /// only revealed by a second decoding pass.
    EncodedTraversal,
}

///
/// Structural checks over the request target path. Each rule can be toggled
/// independently; all are on by default.
///
/// Rules run in a fixed order so diagnostics are deterministic, stopping at
/// the first failure: segment syntax (`NotAbsolute`, `EmptySegment`), then
/// `Traversal`, `Backslash`, `Semicolon`, `ControlCharacter`, and finally
/// the percent-encoding rules (`MalformedEncoding`, `EncodedControl`,
/// `EncodedTraversal`).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathBlocklist {
    pub require_absolute: bool,
    pub reject_empty_segments: bool,
    pub reject_traversal: bool,
    pub reject_backslash: bool,
    pub reject_semicolon: bool,
    pub reject_control_characters: bool,
    pub reject_encoded_pitfalls: bool,
}

impl Default for PathBlocklist {
    fn default() -> Self {
        Self {
            require_absolute: true,
            reject_empty_segments: true,
            reject_traversal: true,
            reject_backslash: true,
            reject_semicolon: true,
            reject_control_characters: true,
            reject_encoded_pitfalls: true,
        }
    }
}

impl PathBlocklist {
    /// Whether at least one rule is still enabled. A blocklist with every
    /// rule turned off claims path checking while performing none, so the
    /// configuration layer rejects it as a conflicting rule set.
    pub fn has_active_rules(&self) -> bool {
        self.require_absolute
            || self.reject_empty_segments
            || self.reject_traversal
            || self.reject_backslash
            || self.reject_semicolon
            || self.reject_control_characters
            || self.reject_encoded_pitfalls
    }

    /// Runs every enabled rule against the target path, failing fast with
    /// the first violated rule.
    pub fn check(&self, path: &str) -> Result<(), PathRule> {
        let bytes = path.as_bytes();

        if self.require_absolute && !path.starts_with('/') {
            return Err(PathRule::NotAbsolute);
        }
        if self.reject_empty_segments && path.contains("//") {
            return Err(PathRule::EmptySegment);
        }
        if self.reject_traversal && has_traversal_segment(bytes) {
            return Err(PathRule::Traversal);
        }
        if self.reject_backslash && bytes.contains(&b'\\') {
            return Err(PathRule::Backslash);
        }
        if self.reject_semicolon && bytes.contains(&b';') {
            return Err(PathRule::Semicolon);
        }
        if self.reject_control_characters && bytes.iter().any(|b| b.is_ascii_control()) {
            return Err(PathRule::ControlCharacter);
        }
        if self.reject_encoded_pitfalls && bytes.contains(&b'%') {
            self.check_encoded(bytes)?;
        }
        Ok(())
    }

    /// Decode-then-recheck. The first pass must be fully well-formed; the
    /// decoded form is then scanned for the banned patterns again. If the
    /// decoded form still contains percent triplets, a second (lenient)
    /// pass guards against double-encoding bypasses like `%252e%252e`.
    fn check_encoded(&self, bytes: &[u8]) -> Result<(), PathRule> {
        let mut decoded: SmallVec<[u8; PATH_STACK_STORAGE_SIZE]> = SmallVec::new();
        decode_and_scan(bytes, true, &mut decoded)?;

        if decoded.contains(&b'%') {
            let mut twice_decoded: SmallVec<[u8; PATH_STACK_STORAGE_SIZE]> = SmallVec::new();
            decode_and_scan(&decoded, false, &mut twice_decoded)?;
        }
        Ok(())
    }
}

///
/// Percent-decodes `input` into `out` while scanning every produced byte.
/// A decoded control byte or path separator fails immediately; a `..`
/// segment in the decoded form fails after the pass. In strict mode a `%`
/// without two hex digits is malformed; in lenient mode (the second,
/// double-encoding pass) it is kept verbatim, since `%25zz` legitimately
/// decodes to a literal `%zz`.
///
fn decode_and_scan(
    input: &[u8],
    strict: bool,
    out: &mut SmallVec<[u8; PATH_STACK_STORAGE_SIZE]>,
) -> Result<(), PathRule> {
    out.clear();
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        if b != b'%' {
            out.push(b);
            i += 1;
            continue;
        }
        let hi = input.get(i + 1).copied().and_then(hex_value);
        let lo = input.get(i + 2).copied().and_then(hex_value);
        match (hi, lo) {
            (Some(hi), Some(lo)) => {
                let decoded = hi << 4 | lo;
                if decoded.is_ascii_control() {
                    return Err(PathRule::EncodedControl);
                }
                if decoded == b'/' || decoded == b'\\' {
                    return Err(PathRule::EncodedTraversal);
                }
                out.push(decoded);
                i += 3;
            }
            _ if strict => return Err(PathRule::MalformedEncoding),
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
    if has_traversal_segment(out) {
        return Err(PathRule::EncodedTraversal);
    }
    Ok(())
}

#[inline]
fn has_traversal_segment(path: &[u8]) -> bool {
    path.split(|b| *b == b'/').any(|segment| segment == b"..")
}

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
