//! Output normalization and status -> verdict mapping.
//!
//! Comparison is always on normalized text, never raw bytes, so platform
//! line endings and trailing whitespace can never produce a false
//! Wrong Answer.
//!
//! Normalization rules:
//! - `\r\n` becomes `\n`
//! - trailing whitespace is stripped per line
//! - the whole text is trimmed at both ends
//! Internal whitespace, case and empty interior lines are preserved.

use crate::result::{ExecutionResult, ExecutionStatus};
use gavel_common::types::Verdict;

pub fn normalize_output(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    let stripped = unified
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    stripped.trim().to_string()
}

pub fn outputs_match(actual: &str, expected: &str) -> bool {
    normalize_output(actual) == normalize_output(expected)
}

/// Map a terminal execution result onto the judge's verdict vocabulary.
/// `None` for internal errors: those are surfaced as server failures and
/// never become a submission verdict.
pub fn verdict_for(result: &ExecutionResult, expected_output: &str) -> Option<Verdict> {
    match result.status {
        ExecutionStatus::Success => {
            let actual = result.output.as_deref().unwrap_or_default();
            if outputs_match(actual, expected_output) {
                Some(Verdict::Accepted)
            } else {
                Some(Verdict::WrongAnswer)
            }
        }
        ExecutionStatus::CompilationError => Some(Verdict::CompilationError),
        ExecutionStatus::RuntimeError => Some(Verdict::RuntimeError),
        ExecutionStatus::TimeoutError => Some(Verdict::TimeLimitExceeded),
        ExecutionStatus::InvalidLanguage => Some(Verdict::InvalidLanguage),
        ExecutionStatus::InternalError => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ExecutionResult;

    #[test]
    fn test_normalize_is_idempotent_on_clean_text() {
        let clean = "1\n2\n3";
        assert_eq!(normalize_output(clean), clean);
        assert_eq!(normalize_output(&normalize_output(clean)), clean);
    }

    #[test]
    fn test_normalize_unifies_line_endings() {
        assert_eq!(normalize_output("1\r\n2\r\n"), "1\n2");
    }

    #[test]
    fn test_normalize_strips_trailing_whitespace_per_line() {
        assert_eq!(normalize_output("a  \nb\t\nc"), "a\nb\nc");
    }

    #[test]
    fn test_normalize_preserves_interior_blank_lines() {
        assert_eq!(normalize_output("a\n\nb\n"), "a\n\nb");
    }

    #[test]
    fn test_crlf_output_matches_lf_expected() {
        // The Windows-compiled-binary case: "5\r\n" vs "5\n" must accept.
        assert!(outputs_match("5\r\n", "5\n"));
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        assert!(!outputs_match("Hello", "hello"));
    }

    #[test]
    fn test_interior_whitespace_still_matters() {
        assert!(!outputs_match("1  2", "1 2"));
    }

    #[test]
    fn test_matching_success_is_accepted() {
        let result = ExecutionResult::success("42\n".to_string(), 10);
        assert_eq!(verdict_for(&result, "42"), Some(Verdict::Accepted));
    }

    #[test]
    fn test_mismatching_success_is_wrong_answer() {
        let result = ExecutionResult::success("43\n".to_string(), 10);
        assert_eq!(verdict_for(&result, "42"), Some(Verdict::WrongAnswer));
    }

    #[test]
    fn test_failure_statuses_map_directly() {
        let cases = [
            (ExecutionStatus::CompilationError, Verdict::CompilationError),
            (ExecutionStatus::RuntimeError, Verdict::RuntimeError),
            (ExecutionStatus::TimeoutError, Verdict::TimeLimitExceeded),
            (ExecutionStatus::InvalidLanguage, Verdict::InvalidLanguage),
        ];
        for (status, verdict) in cases {
            let result = ExecutionResult::failure(status, "details");
            assert_eq!(verdict_for(&result, ""), Some(verdict));
        }
    }

    #[test]
    fn test_internal_error_is_not_a_verdict() {
        let result = ExecutionResult::failure(ExecutionStatus::InternalError, "disk on fire");
        assert_eq!(verdict_for(&result, ""), None);
    }
}
