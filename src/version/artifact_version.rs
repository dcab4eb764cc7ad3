//! Concrete artifact version with Maven-style numeric fields

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::version::comparable::ComparableVersion;

/// Marker suffix of a moving snapshot version
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Timestamped snapshot: `<base>-yyyyMMdd.HHmmss-<build>`
static TIMESTAMPED_SNAPSHOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)-(\d{8}\.\d{6})-(\d+)$").expect("timestamped snapshot pattern is valid")
});

/// Snapshot suffix to strip before counting segments; unlike snapshot detection the marker is
/// matched case-sensitively
static SNAPSHOT_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-(?:\d{8}\.\d{6}-\d+|SNAPSHOT)$").expect("snapshot suffix pattern is valid")
});

/// Returns true for `-SNAPSHOT` style and timestamped snapshot versions
pub fn is_snapshot(version: &str) -> bool {
    let len = version.len();
    let ends_with_snapshot = len >= SNAPSHOT_SUFFIX.len()
        && version.is_char_boundary(len - SNAPSHOT_SUFFIX.len())
        && version[len - SNAPSHOT_SUFFIX.len()..].eq_ignore_ascii_case(SNAPSHOT_SUFFIX);
    ends_with_snapshot || TIMESTAMPED_SNAPSHOT.is_match(version)
}

/// Removes a trailing `-SNAPSHOT` or `-yyyyMMdd.HHmmss-N` suffix
pub fn strip_snapshot(version: &str) -> &str {
    match SNAPSHOT_TAIL.find(version) {
        Some(m) => &version[..m.start()],
        None => version,
    }
}

#[derive(Debug)]
struct Parsed {
    value: String,
    major: Option<u32>,
    minor: Option<u32>,
    incremental: Option<u32>,
    build_number: Option<u32>,
    qualifier: Option<String>,
    comparable: ComparableVersion,
}

/// An immutable, cheaply clonable version value.
///
/// Equality and hashing use the string form only; ordering is supplied by a
/// [`VersionComparator`](crate::version::comparator::VersionComparator).
#[derive(Debug, Clone)]
pub struct ArtifactVersion(Arc<Parsed>);

impl ArtifactVersion {
    pub fn new(version: &str) -> Self {
        Self(Arc::new(parse(version)))
    }

    pub fn as_str(&self) -> &str {
        &self.0.value
    }

    pub fn major(&self) -> u32 {
        self.0.major.unwrap_or(0)
    }

    pub fn minor(&self) -> u32 {
        self.0.minor.unwrap_or(0)
    }

    pub fn incremental(&self) -> u32 {
        self.0.incremental.unwrap_or(0)
    }

    pub fn build_number(&self) -> u32 {
        self.0.build_number.unwrap_or(0)
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.0.qualifier.as_deref()
    }

    pub fn is_snapshot(&self) -> bool {
        is_snapshot(self.as_str())
    }

    pub(crate) fn comparable(&self) -> &ComparableVersion {
        &self.0.comparable
    }
}

impl From<&str> for ArtifactVersion {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

impl PartialEq for ArtifactVersion {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ArtifactVersion {}

impl Hash for ArtifactVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse(version: &str) -> Parsed {
    let mut parsed = Parsed {
        value: version.to_string(),
        major: None,
        minor: None,
        incremental: None,
        build_number: None,
        qualifier: None,
        comparable: ComparableVersion::parse(version),
    };

    let (numbers, suffix) = match version.split_once('-') {
        Some((numbers, suffix)) => (numbers, Some(suffix)),
        None => (version, None),
    };

    if let Some(suffix) = suffix {
        if suffix.len() == 1 || !suffix.starts_with('0') {
            parsed.build_number = parse_int(suffix);
            if parsed.build_number.is_none() {
                parsed.qualifier = Some(suffix.to_string());
            }
        } else {
            parsed.qualifier = Some(suffix.to_string());
        }
    }

    if !numbers.contains('.') && !numbers.starts_with('0') {
        parsed.major = parse_int(numbers);
        if parsed.major.is_none() {
            // not a number at all: the whole string is the qualifier
            parsed.qualifier = Some(version.to_string());
            parsed.build_number = None;
        }
        return parsed;
    }

    let mut tokens = numbers.split('.').filter(|t| !t.is_empty());
    let mut fallback = false;
    match tokens.next() {
        Some(token) => {
            parsed.major = next_int(token);
            fallback |= parsed.major.is_none();
        }
        None => fallback = true,
    }
    if let Some(token) = tokens.next() {
        parsed.minor = next_int(token);
        fallback |= parsed.minor.is_none();
    }
    if let Some(token) = tokens.next() {
        parsed.incremental = next_int(token);
        fallback |= parsed.incremental.is_none();
    }
    if let Some(token) = tokens.next() {
        fallback |= token.bytes().all(|b| b.is_ascii_digit());
        parsed.qualifier = Some(token.to_string());
    }
    if numbers.contains("..") || numbers.starts_with('.') || numbers.ends_with('.') {
        fallback = true;
    }

    if fallback {
        parsed.qualifier = Some(version.to_string());
        parsed.major = None;
        parsed.minor = None;
        parsed.incremental = None;
        parsed.build_number = None;
    }
    parsed
}

fn next_int(token: &str) -> Option<u32> {
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    parse_int(token)
}

/// Digits only, and no larger than a signed 32-bit integer
fn parse_int(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token
        .parse::<u64>()
        .ok()
        .filter(|value| *value <= i32::MAX as u64)
        .map(|value| value as u32)
}
