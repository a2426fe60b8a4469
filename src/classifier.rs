// Beautiful ID detection - priority-ordered pattern rules over identifier digits
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literals that make an identifier special, checked in this order
pub const SPECIAL_NUMBERS: [&str; 3] = ["228", "1488", "322"];

/// Minimum length of a run of identical digits
const MIN_RUN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeautyKind {
    Repeated,
    Ascending,
    Descending,
    Palindrome,
    SpecialNumber,
}

impl BeautyKind {
    pub const ALL: [BeautyKind; 5] = [
        BeautyKind::Repeated,
        BeautyKind::Ascending,
        BeautyKind::Descending,
        BeautyKind::Palindrome,
        BeautyKind::SpecialNumber,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BeautyKind::Repeated => "repeated",
            BeautyKind::Ascending => "ascending",
            BeautyKind::Descending => "descending",
            BeautyKind::Palindrome => "palindrome",
            BeautyKind::SpecialNumber => "special_number",
        }
    }
}

impl fmt::Display for BeautyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which rule matched and the span responsible for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: BeautyKind,
    pub part: String,
}

impl Classification {
    fn new(kind: BeautyKind, part: impl Into<String>) -> Self {
        Self {
            kind,
            part: part.into(),
        }
    }
}

/// Classify an identifier. The first matching rule wins:
/// repeated run, ascending, descending, palindrome, special number.
///
/// The empty string is never beautiful.
pub fn classify(id: &str) -> Option<Classification> {
    if id.is_empty() {
        return None;
    }

    let digits: Vec<char> = id.chars().collect();

    if let Some(run) = first_repeated_run(&digits) {
        return Some(Classification::new(BeautyKind::Repeated, run));
    }

    // sorted and all-distinct is the same as strictly monotonic
    if digits.windows(2).all(|w| w[0] < w[1]) {
        return Some(Classification::new(BeautyKind::Ascending, id));
    }

    if digits.windows(2).all(|w| w[0] > w[1]) {
        return Some(Classification::new(BeautyKind::Descending, id));
    }

    if digits.iter().eq(digits.iter().rev()) {
        return Some(Classification::new(BeautyKind::Palindrome, id));
    }

    SPECIAL_NUMBERS
        .iter()
        .find(|number| id.contains(*number))
        .map(|number| Classification::new(BeautyKind::SpecialNumber, *number))
}

/// Leftmost run of at least `MIN_RUN` identical characters, extended to its full length
fn first_repeated_run(digits: &[char]) -> Option<String> {
    let start = digits
        .windows(MIN_RUN)
        .position(|w| w.iter().all(|c| *c == w[0]))?;

    let digit = digits[start];
    let len = digits[start..].iter().take_while(|c| **c == digit).count();

    Some(digits[start..start + len].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kind_of(id: &str) -> Option<BeautyKind> {
        classify(id).map(|c| c.kind)
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(
            classify("77778"),
            Some(Classification::new(BeautyKind::Repeated, "7777"))
        );
        assert_eq!(
            classify("12345"),
            Some(Classification::new(BeautyKind::Ascending, "12345"))
        );
        assert_eq!(
            classify("15251"),
            Some(Classification::new(BeautyKind::Palindrome, "15251"))
        );
        // reads 12251 backwards
        assert_eq!(classify("15221"), None);
        assert_eq!(
            classify("500322"),
            Some(Classification::new(BeautyKind::SpecialNumber, "322"))
        );
        assert_eq!(classify("60591"), None);
    }

    #[test]
    fn test_priority_order() {
        // also a palindrome
        assert_eq!(kind_of("1111"), Some(BeautyKind::Repeated));
        // descending until the repeated 2
        assert_eq!(kind_of("98765228"), Some(BeautyKind::SpecialNumber));
        assert_eq!(kind_of("2288822"), Some(BeautyKind::Palindrome));
        assert_eq!(kind_of("9876543210"), Some(BeautyKind::Descending));
        assert_eq!(kind_of("0123456789"), Some(BeautyKind::Ascending));
    }

    #[test]
    fn test_repeated_reports_full_first_run() {
        assert_eq!(classify("1222223333").unwrap().part, "22222");
        assert_eq!(classify("5555099999").unwrap().part, "5555");
        assert_eq!(classify("123000"), None);
        assert_eq!(classify("1230000").unwrap().part, "0000");
    }

    #[test]
    fn test_non_distinct_sequences_are_not_monotonic() {
        assert_eq!(kind_of("1123"), None);
        assert_eq!(kind_of("3321"), None);
        assert_eq!(kind_of("111"), Some(BeautyKind::Palindrome));
    }

    #[test]
    fn test_special_numbers_checked_in_order() {
        // 1488 appears before 228 in the string but 228 is checked first
        assert_eq!(classify("91488228").unwrap().part, "228");
        assert_eq!(classify("9114885").unwrap().part, "1488");
        assert_eq!(classify("5322").unwrap().part, "322");
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(classify(""), None);
        assert_eq!(kind_of("7"), Some(BeautyKind::Ascending));
    }

    proptest! {
        #[test]
        fn prop_runs_are_reported_as_maximal_first_run(
            prefix in "[0-9]{0,4}",
            digit in 0u8..10,
            extra in 0usize..4,
            suffix in "[0-9]{0,4}",
        ) {
            let d = char::from(b'0' + digit);
            let id = format!("{}{}{}", prefix, d.to_string().repeat(4 + extra), suffix);
            let digits: Vec<char> = id.chars().collect();

            let start = digits.windows(4).position(|w| w.iter().all(|c| *c == w[0])).unwrap();
            let run_len = digits[start..].iter().take_while(|c| **c == digits[start]).count();
            let expected: String = digits[start..start + run_len].iter().collect();

            let result = classify(&id).unwrap();
            prop_assert_eq!(result.kind, BeautyKind::Repeated);
            prop_assert_eq!(result.part, expected);
        }

        #[test]
        fn prop_strictly_increasing_is_ascending(
            digits in proptest::sample::subsequence((0u8..10).collect::<Vec<_>>(), 2..=10)
        ) {
            let id: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
            prop_assert_eq!(classify(&id), Some(Classification::new(BeautyKind::Ascending, id.clone())));
        }

        #[test]
        fn prop_strictly_decreasing_is_descending(
            digits in proptest::sample::subsequence((0u8..10).collect::<Vec<_>>(), 2..=10)
        ) {
            let id: String = digits.iter().rev().map(|d| char::from(b'0' + d)).collect();
            prop_assert_eq!(classify(&id), Some(Classification::new(BeautyKind::Descending, id.clone())));
        }

        #[test]
        fn prop_palindromes_without_earlier_rules(half in "[0-9]{1,5}", middle in proptest::option::of("[0-9]")) {
            let mirrored: String = half.chars().rev().collect();
            let id = format!("{}{}{}", half, middle.unwrap_or_default(), mirrored);
            let result = classify(&id).unwrap();
            prop_assert!(matches!(result.kind, BeautyKind::Repeated | BeautyKind::Palindrome));
            if result.kind == BeautyKind::Palindrome {
                prop_assert_eq!(result.part, id);
            }
        }

        #[test]
        fn prop_special_numbers_report_first_literal_in_order(
            prefix in "[0-9]{0,5}",
            literal in proptest::sample::select(SPECIAL_NUMBERS.to_vec()),
            suffix in "[0-9]{0,5}",
        ) {
            let id = format!("{}{}{}", prefix, literal, suffix);
            let digits: Vec<char> = id.chars().collect();
            let has_run = digits.windows(4).any(|w| w.iter().all(|c| *c == w[0]));
            let ascending = digits.windows(2).all(|w| w[0] < w[1]);
            let descending = digits.windows(2).all(|w| w[0] > w[1]);
            let palindrome = digits.iter().eq(digits.iter().rev());
            prop_assume!(!(has_run || ascending || descending || palindrome));

            let expected = SPECIAL_NUMBERS.iter().find(|n| id.contains(*n)).unwrap();
            prop_assert_eq!(
                classify(&id),
                Some(Classification::new(BeautyKind::SpecialNumber, *expected))
            );
        }

        #[test]
        fn prop_classification_is_deterministic(id in "[0-9]{0,12}") {
            prop_assert_eq!(classify(&id), classify(&id));
        }

        #[test]
        fn prop_part_is_a_substring(id in "[0-9]{1,12}") {
            if let Some(result) = classify(&id) {
                prop_assert!(id.contains(&result.part));
            }
        }
    }
}
