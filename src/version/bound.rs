//! Segment-bounded version sentinel
//!
//! A [`BoundedVersion`] of `[1.2.3-2, Incremental]` reads as `1.2.3.+∞` and compares greater
//! than every version matching `1.2.3.*`; with no unchanged segment it is `+∞` in every
//! segment and compares greater than every concrete version. This also holds for snapshots and
//! other qualified versions, which Maven orders below their release.

use std::cmp::Ordering;
use std::fmt;

use crate::version::artifact_version::ArtifactVersion;
use crate::version::segment::Segment;
use crate::version::types::Version;

/// Value used for every padded segment
pub const UNBOUNDED_SEGMENT: i32 = i32::MAX;

/// Immutable upper/lower bound holding every segment up to and including `unchanged_segment`
/// in place and padding all more minor segments with [`UNBOUNDED_SEGMENT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundedVersion {
    unchanged_segment: Option<Segment>,
    comparable: ArtifactVersion,
}

impl BoundedVersion {
    pub fn new(version: &str, unchanged_segment: Option<Segment>) -> Self {
        Self {
            unchanged_segment,
            comparable: Self::create_comparable(version, unchanged_segment),
        }
    }

    pub fn from_version(version: &ArtifactVersion, unchanged_segment: Option<Segment>) -> Self {
        Self::new(version.as_str(), unchanged_segment)
    }

    /// Builds the padded, purely numeric form, e.g. `1.2.3` at `Minor` ->
    /// `1.2.2147483647.2147483647.2147483647`.
    pub fn create_comparable(version: &str, unchanged_segment: Option<Segment>) -> ArtifactVersion {
        let tokens = tokens(version);
        let held = unchanged_segment.map(|s| s.index() as isize).unwrap_or(-1);
        let last = tokens.len().max(Segment::Subincremental.index());

        let mut padded: Vec<String> = (0..=last)
            .map(|segment| {
                if segment as isize <= held {
                    tokens
                        .get(segment)
                        .map(|token| integer_item_or_zero(token))
                        .unwrap_or("0")
                        .to_string()
                } else {
                    UNBOUNDED_SEGMENT.to_string()
                }
            })
            .collect();
        // trailing sentinel keeps the bound above versions with more numeric components
        padded.push(UNBOUNDED_SEGMENT.to_string());

        ArtifactVersion::new(&padded.join("."))
    }

    /// The most minor segment held in place; `None` means nothing is held
    pub fn unchanged_segment(&self) -> Option<Segment> {
        self.unchanged_segment
    }

    /// The padded form this bound compares as
    pub fn comparable(&self) -> &ArtifactVersion {
        &self.comparable
    }

    /// Compares the padded form against `other` as plain dotted integers
    pub fn compare_to(&self, other: &Version) -> Ordering {
        self.comparable
            .comparable()
            .cmp(other.comparable_form().comparable())
    }
}

impl fmt::Display for BoundedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.comparable, f)
    }
}

/// Splits on `.` and `-` as well as on every digit/letter transition (`1a` -> `1`, `a`)
fn tokens(version: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut begin = 0;
    let mut begin_is_digit: Option<bool> = None;

    for (i, c) in version.char_indices() {
        if c == '.' || c == '-' {
            if i > begin {
                result.push(&version[begin..i]);
            }
            begin = i + c.len_utf8();
            begin_is_digit = None;
            continue;
        }
        let is_digit = c.is_ascii_digit();
        match begin_is_digit {
            Some(previous) if previous != is_digit => {
                result.push(&version[begin..i]);
                begin = i;
                begin_is_digit = Some(is_digit);
            }
            None => begin_is_digit = Some(is_digit),
            _ => {}
        }
    }
    if version.len() > begin {
        result.push(&version[begin..]);
    }
    result
}

fn integer_item_or_zero(token: &str) -> &str {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        token
    } else {
        "0"
    }
}
