use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Terminal classification of one execution request.
///
/// This is a closed taxonomy with exhaustive matching at every consumer:
/// an unrecognized status can never reach the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    CompilationError,
    RuntimeError,
    TimeoutError,
    InvalidLanguage,
    InternalError,
}

/// Outcome of one execution request.
///
/// Exactly one of `output` / `details` is populated: `output` on Success,
/// `details` everywhere else. `elapsed_ms` is present only on Success and
/// measures the wait window of the run phase, not spawn overhead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl ExecutionResult {
    pub fn success(output: String, elapsed_ms: u64) -> Self {
        Self {
            status: ExecutionStatus::Success,
            output: Some(output),
            details: None,
            elapsed_ms: Some(elapsed_ms),
        }
    }

    pub fn failure(status: ExecutionStatus, details: impl Into<String>) -> Self {
        Self {
            status,
            output: None,
            details: Some(details.into()),
            elapsed_ms: None,
        }
    }
}

/// Where the child process's standard input comes from.
#[derive(Debug, Clone)]
pub enum StdinSource {
    /// In-memory buffer written verbatim to the child's stdin pipe.
    Bytes(Vec<u8>),
    /// Named file opened and streamed as the child's stdin.
    File(PathBuf),
}

impl StdinSource {
    pub fn is_empty_bytes(&self) -> bool {
        matches!(self, StdinSource::Bytes(bytes) if bytes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_populates_output_only() {
        let result = ExecutionResult::success("42\n".to_string(), 17);
        assert_eq!(result.status, ExecutionStatus::Success);
        assert_eq!(result.output.as_deref(), Some("42\n"));
        assert!(result.details.is_none());
        assert_eq!(result.elapsed_ms, Some(17));
    }

    #[test]
    fn test_failure_populates_details_only() {
        let result = ExecutionResult::failure(ExecutionStatus::RuntimeError, "boom");
        assert!(result.output.is_none());
        assert_eq!(result.details.as_deref(), Some("boom"));
        assert!(result.elapsed_ms.is_none());
    }

    #[test]
    fn test_status_wire_tags() {
        let json = serde_json::to_string(&ExecutionStatus::CompilationError).unwrap();
        assert_eq!(json, "\"compilation_error\"");
        let back: ExecutionStatus = serde_json::from_str("\"timeout_error\"").unwrap();
        assert_eq!(back, ExecutionStatus::TimeoutError);
    }

    #[test]
    fn test_empty_bytes_detection() {
        assert!(StdinSource::Bytes(Vec::new()).is_empty_bytes());
        assert!(!StdinSource::Bytes(b"1 2".to_vec()).is_empty_bytes());
        assert!(!StdinSource::File(PathBuf::from("input.txt")).is_empty_bytes());
    }
}
