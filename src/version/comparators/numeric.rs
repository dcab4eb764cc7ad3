//! Numeric comparison method
//!
//! Versions are split on `.`; each component is a number optionally followed by `-qualifier`.
//! Numbers compare numerically at any length, a numeric component beats a non-numeric one,
//! and a component without qualifier beats the same number with one. Missing components
//! count as `0`, so `1.0 == 1` and `1.0.1 > 1`.

use std::cmp::Ordering;

pub fn compare(a: &str, b: &str) -> Ordering {
    let left: Vec<&str> = components(a).collect();
    let right: Vec<&str> = components(b).collect();

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or("0");
        let r = right.get(i).copied().unwrap_or("0");
        let result = compare_component(l, r);
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

/// One segment per dot-separated component
pub fn segment_count(version: &str) -> usize {
    components(version).count()
}

fn components(version: &str) -> impl Iterator<Item = &str> {
    version.split('.').filter(|c| !c.is_empty())
}

fn compare_component(a: &str, b: &str) -> Ordering {
    let (number_a, qualifier_a) = split_qualifier(a);
    let (number_b, qualifier_b) = split_qualifier(b);

    let numbers = match (digits(number_a), digits(number_b)) {
        (Some(x), Some(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => number_a.cmp(number_b),
    };

    numbers.then_with(|| match (qualifier_a, qualifier_b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(y),
    })
}

fn split_qualifier(component: &str) -> (&str, Option<&str>) {
    match component.split_once('-') {
        Some((number, qualifier)) => (number, Some(qualifier)),
        None => (component, None),
    }
}

/// Digits without leading zeros, `None` if not a number
fn digits(number: &str) -> Option<&str> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let stripped = number.trim_start_matches('0');
    Some(if stripped.is_empty() { "0" } else { stripped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.3.9", "1.3.34", Ordering::Less)]
    #[case("1.3.4.3.2.9", "1.3.4.3.2.34", Ordering::Less)]
    #[case("1.0", "1", Ordering::Equal)]
    #[case("1.0.1", "1", Ordering::Greater)]
    #[case("1.0-beta", "1.0", Ordering::Less)]
    #[case("1.0-alpha", "1.0-beta", Ordering::Less)]
    #[case("1.x", "1.0", Ordering::Less)]
    #[case("1.99999999999999999999", "1.100000000000000000000", Ordering::Less)]
    #[case("1.007", "1.7", Ordering::Equal)]
    fn compares_dotted_numbers(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare(a, b), expected);
        assert_eq!(compare(b, a), expected.reverse());
    }

    #[rstest]
    #[case("1", 1)]
    #[case("1.2.3", 3)]
    #[case("1.2.3.4.5", 5)]
    #[case("1.2-beta", 2)]
    fn counts_dot_separated_components(#[case] version: &str, #[case] expected: usize) {
        assert_eq!(segment_count(version), expected);
    }
}
