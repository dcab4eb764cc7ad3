//! Version segment granularity

use std::fmt;

use serde::Deserialize;

/// Granularity of a version update, ordered from the most major to the most minor segment.
///
/// `Major < Minor < Incremental < Subincremental` in the derived ordering, which matches the
/// segment index inside a version string (`1.2.3-4` -> 0, 1, 2, 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Major,
    Minor,
    Incremental,
    Subincremental,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::Major,
        Segment::Minor,
        Segment::Incremental,
        Segment::Subincremental,
    ];

    /// Zero-based position of the segment inside a version string
    pub fn index(self) -> usize {
        match self {
            Segment::Major => 0,
            Segment::Minor => 1,
            Segment::Incremental => 2,
            Segment::Subincremental => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Segment> {
        Self::ALL.get(index).copied()
    }

    /// The next more major segment, `None` for [`Segment::Major`]
    pub fn major_to(self) -> Option<Segment> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// The next more minor segment, `None` for [`Segment::Subincremental`]
    pub fn minor_to(self) -> Option<Segment> {
        Self::from_index(self.index() + 1)
    }

    /// Returns true if this segment is strictly more major than `other`
    pub fn is_major_to(self, other: Segment) -> bool {
        self < other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Major => "major",
            Segment::Minor => "minor",
            Segment::Incremental => "incremental",
            Segment::Subincremental => "subincremental",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(Segment::Major),
            "minor" => Ok(Segment::Minor),
            "incremental" => Ok(Segment::Incremental),
            "subincremental" => Ok(Segment::Subincremental),
            _ => Err(format!("unknown segment '{s}'")),
        }
    }
}
