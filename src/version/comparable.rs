//! Maven-rules version ordering
//!
//! A version string is split into a tree of items:
//! - `.` separates items of the same list
//! - `-` separates items and opens a nested list
//! - a transition between digits and letters acts as a `-` (`1a` -> `1-a`)
//!
//! Numeric items compare numerically (any length), string items compare by qualifier rank:
//! `alpha < beta < milestone < rc < snapshot < "" (release) < sp < unknown`, unknown
//! qualifiers comparing lexically among themselves. Trailing "null" items (`0`, `""`, empty
//! lists) are dropped, so `1`, `1.0` and `1.0.0-ga` are equal.

use std::cmp::Ordering;

const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];

/// Rank key of the release qualifier (`""`)
const RELEASE_VERSION_INDEX: &str = "5";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Decimal digits without leading zeros (`"0"` for zero)
    Int(String),
    Str(String),
    List(Vec<Item>),
}

impl Item {
    fn parse(is_digit: bool, token: &str) -> Item {
        if is_digit {
            Item::int(token)
        } else {
            Item::string(token, false)
        }
    }

    fn int(digits: &str) -> Item {
        let stripped = digits.trim_start_matches('0');
        if stripped.is_empty() {
            Item::Int("0".to_string())
        } else {
            Item::Int(stripped.to_string())
        }
    }

    fn string(value: &str, followed_by_digit: bool) -> Item {
        let value = match value {
            "a" if followed_by_digit => "alpha",
            "b" if followed_by_digit => "beta",
            "m" if followed_by_digit => "milestone",
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Str(value.to_string())
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(digits) => digits == "0",
            Item::Str(value) => comparable_qualifier(value) == RELEASE_VERSION_INDEX,
            Item::List(items) => items.is_empty(),
        }
    }

    fn compare_to(&self, other: Option<&Item>) -> Ordering {
        match (self, other) {
            (Item::Int(digits), None) => {
                if digits == "0" {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            (Item::Int(a), Some(Item::Int(b))) => compare_digits(a, b),
            (Item::Int(_), Some(_)) => Ordering::Greater,

            (Item::Str(value), None) => {
                comparable_qualifier(value).as_str().cmp(RELEASE_VERSION_INDEX)
            }
            (Item::Str(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::Str(a), Some(Item::Str(b))) => {
                comparable_qualifier(a).cmp(&comparable_qualifier(b))
            }
            (Item::Str(_), Some(Item::List(_))) => Ordering::Less,

            (Item::List(items), None) => items
                .iter()
                .map(|item| item.compare_to(None))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal),
            (Item::List(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::List(_), Some(Item::Str(_))) => Ordering::Greater,
            (Item::List(left), Some(Item::List(right))) => compare_lists(left, right),
        }
    }
}

fn compare_lists(left: &[Item], right: &[Item]) -> Ordering {
    let len = left.len().max(right.len());
    for i in 0..len {
        let result = match (left.get(i), right.get(i)) {
            (None, None) => Ordering::Equal,
            (None, Some(r)) => r.compare_to(None).reverse(),
            (Some(l), r) => l.compare_to(r),
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Rank key of a qualifier; known qualifiers map to their index, unknown ones sort after all
/// known qualifiers and then lexically.
fn comparable_qualifier(qualifier: &str) -> String {
    match QUALIFIERS.iter().position(|q| *q == qualifier) {
        Some(index) => index.to_string(),
        None => format!("{}-{}", QUALIFIERS.len(), qualifier),
    }
}

/// Drops trailing null items; a non-null nested list is skipped over so that null items in
/// front of it are dropped as well (`1.0-alpha` == `1-alpha`).
fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

/// Parsed, comparable form of a version string under Maven rules
#[derive(Debug, Clone)]
pub struct ComparableVersion {
    items: Vec<Item>,
}

impl ComparableVersion {
    pub fn parse(version: &str) -> Self {
        let version = version.to_lowercase();

        // `current` is the innermost open list; each entry of `parents` ends with it
        let mut parents: Vec<Vec<Item>> = Vec::new();
        let mut current: Vec<Item> = Vec::new();
        let mut is_digit = false;
        let mut start = 0;

        for (i, c) in version.char_indices() {
            match c {
                '.' => {
                    current.push(token_item(&version, start, i, is_digit));
                    start = i + 1;
                }
                '-' => {
                    current.push(token_item(&version, start, i, is_digit));
                    start = i + 1;
                    parents.push(std::mem::take(&mut current));
                }
                c if c.is_ascii_digit() => {
                    if !is_digit && i > start {
                        current.push(Item::string(&version[start..i], true));
                        start = i;
                        parents.push(std::mem::take(&mut current));
                    }
                    is_digit = true;
                }
                _ => {
                    if is_digit && i > start {
                        current.push(Item::int(&version[start..i]));
                        start = i;
                        parents.push(std::mem::take(&mut current));
                    }
                    is_digit = false;
                }
            }
        }
        if version.len() > start {
            current.push(Item::parse(is_digit, &version[start..]));
        }

        normalize(&mut current);
        let mut items = current;
        while let Some(mut parent) = parents.pop() {
            parent.push(Item::List(items));
            normalize(&mut parent);
            items = parent;
        }

        Self { items }
    }
}

fn token_item(version: &str, start: usize, end: usize, is_digit: bool) -> Item {
    if end == start {
        Item::Int("0".to_string())
    } else {
        Item::parse(is_digit, &version[start..end])
    }
}

impl PartialEq for ComparableVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ComparableVersion {}

impl PartialOrd for ComparableVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComparableVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}
