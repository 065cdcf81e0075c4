//! AI-assisted code review via the Gemini text-completion API.
//!
//! The model is an opaque collaborator: one prompt string in, one text out.
//! Prompt templates are fixed per review type; `provideHints` deliberately
//! omits the user's code so the model cannot echo a full solution back, and
//! `getBoilerplateCode` omits it because no code exists yet.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewType {
    CodeReview,
    AddComment,
    OptimizedCode,
    BugFix,
    ProvideHints,
    GetBoilerplateCode,
}

impl ReviewType {
    fn base_prompt(&self) -> &'static str {
        match self {
            ReviewType::CodeReview => {
                "As an AI Code Reviewer, please provide a comprehensive code review for the \
                 following code. Focus on best practices, potential improvements, readability, \
                 efficiency, and any notable issues. Present your findings as clear suggestions \
                 with brief explanations:\n\n"
            }
            ReviewType::AddComment => {
                "As an AI assistant, please analyze the following code and add appropriate \
                 comments to improve its readability and clarity. Focus on explaining complex \
                 sections, functions, or overall logic. Provide the code with comments added:\n\n"
            }
            ReviewType::OptimizedCode => {
                "As an AI assistant, please analyze the following code and provide an optimized \
                 version. Explain the specific areas that were optimized and the benefits of the \
                 changes (e.g., performance, memory, readability). Provide the optimized code \
                 snippet:\n\n"
            }
            ReviewType::BugFix => {
                "As an AI assistant, please analyze the following code to identify potential \
                 bugs. If bugs are found, provide the corrected code along with an explanation \
                 of the bug and how the fix resolves it:\n\n"
            }
            ReviewType::ProvideHints => {
                "As an AI assistant focused on guiding learning, please provide *just one* \
                 helpful hint related to the following problem it addresses and the constraints \
                 provided in the problem. This hint should guide the user towards a solution or \
                 improvement without giving it away entirely. Provide only the hint:\n\n"
            }
            ReviewType::GetBoilerplateCode => {
                "As an AI assistant, please provide a minimal starter template for the \
                 following problem in the requested language: a main entry point, input reading \
                 scaffolding matching the problem's input format, and a placeholder for the \
                 solution. Provide only the code:\n\n"
            }
        }
    }
}

/// Assemble the final prompt for a review request.
pub fn build_prompt(
    review_type: ReviewType,
    code: &str,
    problem_name: &str,
    problem_statement: &str,
    problem_constraints: &str,
    language: &str,
) -> String {
    let base = review_type.base_prompt();
    let problem = format!("{}{}{}", problem_name, problem_statement, problem_constraints);

    match review_type {
        ReviewType::ProvideHints => format!("{}{}", base, problem),
        ReviewType::GetBoilerplateCode => {
            format!("{}{}\n\nLanguage: {}", base, problem, language)
        }
        _ => format!("{}{}{}", problem, base, code),
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini API client handle. Built once at startup; holds no mutable state.
#[derive(Clone)]
pub struct ReviewClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ReviewClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    /// Send one prompt, return the model's text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "requesting review");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("failed to reach the Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Gemini API returned {}: {}", status, detail);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("failed to decode Gemini response")?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .find_map(|part| part.text)
            })
            .context("Gemini response contained no text")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_type_wire_tags() {
        let parsed: ReviewType = serde_json::from_str("\"codeReview\"").unwrap();
        assert_eq!(parsed, ReviewType::CodeReview);
        let parsed: ReviewType = serde_json::from_str("\"getBoilerplateCode\"").unwrap();
        assert_eq!(parsed, ReviewType::GetBoilerplateCode);
        assert!(serde_json::from_str::<ReviewType>("\"shipIt\"").is_err());
    }

    #[test]
    fn test_hints_prompt_omits_code() {
        let prompt = build_prompt(
            ReviewType::ProvideHints,
            "SECRET_SOLUTION",
            "Two Sum",
            "Find two indices...",
            "n <= 10^5",
            "cpp",
        );
        assert!(!prompt.contains("SECRET_SOLUTION"));
        assert!(prompt.contains("Two Sum"));
        assert!(prompt.contains("n <= 10^5"));
    }

    #[test]
    fn test_boilerplate_prompt_omits_code_but_names_language() {
        let prompt = build_prompt(
            ReviewType::GetBoilerplateCode,
            "SECRET_SOLUTION",
            "Two Sum",
            "Find two indices...",
            "n <= 10^5",
            "py",
        );
        assert!(!prompt.contains("SECRET_SOLUTION"));
        assert!(prompt.contains("Language: py"));
    }

    #[test]
    fn test_review_prompt_ends_with_code() {
        let prompt = build_prompt(
            ReviewType::CodeReview,
            "int main() {}",
            "Two Sum",
            "statement",
            "constraints",
            "c",
        );
        assert!(prompt.ends_with("int main() {}"));
        assert!(prompt.starts_with("Two Sum"));
    }

    #[test]
    fn test_client_url_shape() {
        let client = ReviewClient::with_base_url(
            "key".to_string(),
            "gemini-2.0-flash".to_string(),
            "http://localhost:9999".to_string(),
        );
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.model, "gemini-2.0-flash");
    }
}
