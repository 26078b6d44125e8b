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
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

// Include generated char tables. See `build.rs`
include!(concat!(env!("OUT_DIR"), "/char_tables.rs"));

///
/// A pure, per-code-point acceptance predicate for untrusted string fields
/// (header names, header values, parameter names).
///
/// Implementations must be stateless, must not allocate and must run in
/// O(1) amortized time per code point. A client fully controls the size of
/// the validated fields (megabytes in aggregate), so anything super-linear
/// here is an algorithmic-complexity denial-of-service vector.
///
pub trait CharacterClassifier: Send + Sync {
    /// Returns `true` if the code point is acceptable in an untrusted field.
    fn accepts(&self, c: char) -> bool;
}

///
/// The shipped default: rejects code points whose Unicode general category
/// is `Control` (Cc) or `Unassigned` (Cn), accepts everything else.
///
/// Code points below U+0100 go through a compile-time lookup table
/// (see `build.rs`); the rest go through the general-category range tables
/// of `unicode-properties`. Both are allocation-free with a bounded
/// constant factor, which is why this strategy is the default over the
/// semantically equivalent whole-string regex (see the benchmarks).
///
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignedNonControl;

impl CharacterClassifier for AssignedNonControl {
    #[inline(always)]
    fn accepts(&self, c: char) -> bool {
        let cp = c as u32;
        if cp < 0x100 {
            SAFE_LATIN1[cp as usize]
        } else {
            !matches!(
                c.general_category(),
                GeneralCategory::Control | GeneralCategory::Unassigned
            )
        }
    }
}

///
/// Accepts every code point. Security-equivalent to disabling the check:
/// it exists only as the iterating lower bound in the benchmarks and must
/// never be the shipped default.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CharacterClassifier for AcceptAll {
    #[inline(always)]
    fn accepts(&self, _c: char) -> bool {
        true
    }
}

/// Whether a byte is an RFC 7230 `tchar`. Used to reject malformed
/// method names at configuration time.
#[inline(always)]
pub(crate) fn is_method_tchar(b: u8) -> bool {
    TCHAR_TABLE[b as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rejects_c0_controls_and_del() {
        let classifier = AssignedNonControl;
        for cp in 0x00..=0x1f_u32 {
            let c = char::from_u32(cp).unwrap();
            assert!(!classifier.accepts(c), "U+{:04X} must be rejected", cp);
        }
        assert!(!classifier.accepts('\u{7f}'));
    }

    #[test]
    fn test_default_rejects_c1_controls() {
        for cp in 0x80..=0x9f_u32 {
            let c = char::from_u32(cp).unwrap();
            assert!(!AssignedNonControl.accepts(c), "U+{:04X} must be rejected", cp);
        }
    }

    #[test]
    fn test_default_accepts_printable_ascii() {
        for cp in 0x20..0x7f_u32 {
            let c = char::from_u32(cp).unwrap();
            assert!(AssignedNonControl.accepts(c), "U+{:04X} must be accepted", cp);
        }
    }

    #[test]
    fn test_default_rejects_unassigned() {
        // U+0378 and U+0380 have no assignment in any published Unicode version
        assert!(!AssignedNonControl.accepts('\u{0378}'));
        assert!(!AssignedNonControl.accepts('\u{0380}'));
    }

    #[test]
    fn test_default_accepts_assigned_non_ascii() {
        let samples = ['é', 'Ж', '中', '🙂', '\u{e000}' /* private use */];
        for c in samples {
            assert!(AssignedNonControl.accepts(c), "{:?} must be accepted", c);
        }
    }

    #[test]
    fn test_latin1_table_agrees_with_category_lookup() {
        // the generated table is a fast path, not a different policy
        for cp in 0x00..0x100_u32 {
            let c = char::from_u32(cp).unwrap();
            let by_category = !matches!(
                c.general_category(),
                GeneralCategory::Control | GeneralCategory::Unassigned
            );
            assert_eq!(
                SAFE_LATIN1[cp as usize], by_category,
                "table disagrees with the category tables at U+{:04X}",
                cp
            );
        }
    }

    #[test]
    fn test_accept_all_accepts_everything() {
        for c in ['\0', '\u{1f}', 'a', '\u{0378}', '🙂'] {
            assert!(AcceptAll.accepts(c));
        }
    }

    #[test]
    fn test_method_tchar() {
        let delims = b"-_.!#$%&'*+^`|~";
        for c in 0..=255_u8 {
            assert_eq!(
                is_method_tchar(c),
                c.is_ascii_alphanumeric() || delims.contains(&c),
                "Didn't work out for {}",
                (c as char)
            );
        }
    }
}
