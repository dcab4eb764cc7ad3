//! Mercury comparison method
//!
//! Like the Maven rules, but flat: `.`, `-` and digit/letter transitions all separate items of
//! a single list, so `1-1` equals `1.1`. Items are case-insensitive.

use std::cmp::Ordering;

const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];

const RELEASE_RANK: usize = 5;

#[derive(Debug, PartialEq, Eq)]
enum Item {
    Number(String),
    Qualifier(String),
}

impl Item {
    fn is_null(&self) -> bool {
        match self {
            Item::Number(digits) => digits == "0",
            Item::Qualifier(q) => rank(q) == (RELEASE_RANK, ""),
        }
    }

    fn compare_to(&self, other: Option<&Item>) -> Ordering {
        match (self, other) {
            (Item::Number(digits), None) => {
                if digits == "0" {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            (Item::Qualifier(q), None) => rank(q).cmp(&(RELEASE_RANK, "")),
            (Item::Number(a), Some(Item::Number(b))) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Item::Number(_), Some(Item::Qualifier(_))) => Ordering::Greater,
            (Item::Qualifier(_), Some(Item::Number(_))) => Ordering::Less,
            (Item::Qualifier(a), Some(Item::Qualifier(b))) => rank(a).cmp(&rank(b)),
        }
    }
}

/// Known qualifiers by position, unknown ones after `sp` and lexically among themselves
fn rank(qualifier: &str) -> (usize, &str) {
    let canonical = match qualifier {
        "a" => "alpha",
        "b" => "beta",
        "m" => "milestone",
        "cr" => "rc",
        "ga" | "final" | "release" => "",
        other => other,
    };
    match QUALIFIERS.iter().position(|q| *q == canonical) {
        Some(index) => (index, ""),
        None => (QUALIFIERS.len(), qualifier),
    }
}

fn items(version: &str) -> Vec<Item> {
    let lower = version.to_lowercase();
    let mut result = Vec::new();
    let mut token = String::new();
    let mut token_is_digit = false;

    let flush = |token: &mut String, is_digit: bool, result: &mut Vec<Item>| {
        if token.is_empty() {
            return;
        }
        if is_digit {
            let stripped = token.trim_start_matches('0');
            let digits = if stripped.is_empty() { "0" } else { stripped };
            result.push(Item::Number(digits.to_string()));
        } else {
            result.push(Item::Qualifier(token.clone()));
        }
        token.clear();
    };

    for c in lower.chars() {
        if c == '.' || c == '-' {
            flush(&mut token, token_is_digit, &mut result);
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if !token.is_empty() && is_digit != token_is_digit {
            flush(&mut token, token_is_digit, &mut result);
        }
        token_is_digit = is_digit;
        token.push(c);
    }
    flush(&mut token, token_is_digit, &mut result);

    while result.last().is_some_and(Item::is_null) {
        result.pop();
    }
    result
}

pub fn compare(a: &str, b: &str) -> Ordering {
    let left = items(a);
    let right = items(b);

    for i in 0..left.len().max(right.len()) {
        let result = match (left.get(i), right.get(i)) {
            (Some(l), r) => l.compare_to(r),
            (None, Some(r)) => r.compare_to(None).reverse(),
            (None, None) => Ordering::Equal,
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

/// One segment per `.`- or `-`-separated token
pub fn segment_count(version: &str) -> usize {
    version
        .split(['.', '-'])
        .filter(|token| !token.is_empty())
        .count()
}
