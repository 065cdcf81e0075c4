use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Languages the judge accepts. The enum is closed on purpose: an
/// unsupported language tag must be rejected at the API boundary and can
/// never reach the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Py,
}

impl Language {
    /// Parse the wire tag ("c", "cpp", "py"). Anything else is an
    /// Invalid Language verdict, not an error.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "c" => Some(Language::C),
            "cpp" => Some(Language::Cpp),
            "py" => Some(Language::Py),
            _ => None,
        }
    }

    /// Source file extension; identical to the wire tag.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Py => "py",
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, Language::C | Language::Cpp)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Final judgement attached to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    #[serde(rename = "Wrong Answer")]
    WrongAnswer,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
    #[serde(rename = "Compilation Error")]
    CompilationError,
    #[serde(rename = "Time Limit Exceeded")]
    TimeLimitExceeded,
    #[serde(rename = "Invalid Language")]
    InvalidLanguage,
    /// Memory limits are not enforced by the engine; the variant stays in
    /// the schema so stored submissions that carry it still deserialize.
    #[serde(rename = "Memory Limit Exceeded")]
    MemoryLimitExceeded,
}

impl Verdict {
    /// Whether a submission record is written for this verdict.
    /// Invalid Language is rejected before execution and never persisted.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Verdict::InvalidLanguage)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Accepted => "Accepted",
            Verdict::WrongAnswer => "Wrong Answer",
            Verdict::RuntimeError => "Runtime Error",
            Verdict::CompilationError => "Compilation Error",
            Verdict::TimeLimitExceeded => "Time Limit Exceeded",
            Verdict::InvalidLanguage => "Invalid Language",
            Verdict::MemoryLimitExceeded => "Memory Limit Exceeded",
        };
        f.write_str(label)
    }
}

/// One judged submission. Append-only: records are created once with a
/// terminal verdict and never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub user_id: u64,
    pub problem_id: u64,
    pub problem_name: String,
    pub language: Language,
    pub code: String,
    pub verdict: Verdict,
    pub time_taken_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Draft code a user parked on a problem. At most one record per
/// (user, problem, language); writes upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSaveRecord {
    pub user_id: u64,
    pub problem_id: u64,
    pub language: Language,
    pub code: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Paths to the judge's input/expected-output pair for a problem.
/// Read-only from the engine's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseFiles {
    pub input_path: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: u64,
    pub name: String,
    pub statement: String,
    pub constraints: String,
    pub difficulty: Difficulty,
    pub test_case: TestCaseFiles,
}
