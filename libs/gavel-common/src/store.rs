use crate::types::{CodeSaveRecord, Language, Problem, SubmissionRecord};
use redis::{AsyncCommands, RedisResult};

/// Redis key schema - defines only semantics, not runtime logic.
/// Keeping every key builder here means the API handlers and any future
/// tooling never drift on key layout.

pub const SUBMISSIONS_PREFIX: &str = "gavel:submissions";
pub const CODE_SAVE_PREFIX: &str = "gavel:code";
pub const PROBLEM_PREFIX: &str = "gavel:problem";
pub const PROBLEM_NAME_PREFIX: &str = "gavel:problem:name";
pub const PROBLEM_SEQ_KEY: &str = "gavel:problem:seq";

/// Per-user submission history list. LPUSH keeps it newest-first.
pub fn submissions_key(user_id: u64) -> String {
    format!("{}:{}", SUBMISSIONS_PREFIX, user_id)
}

/// Saved-code slot; one key per (user, problem, language) triple, so a
/// plain SET is an upsert.
pub fn code_save_key(user_id: u64, problem_id: u64, language: Language) -> String {
    format!("{}:{}:{}:{}", CODE_SAVE_PREFIX, user_id, problem_id, language)
}

pub fn problem_key(problem_id: u64) -> String {
    format!("{}:{}", PROBLEM_PREFIX, problem_id)
}

/// Name -> id index used by the per-problem submission listing.
pub fn problem_name_key(name: &str) -> String {
    format!("{}:{}", PROBLEM_NAME_PREFIX, name)
}

fn serde_error(e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((
        redis::ErrorKind::TypeError,
        "serialization error",
        e.to_string(),
    ))
}

/// Append a judged submission to the user's history.
pub async fn record_submission(
    conn: &mut redis::aio::ConnectionManager,
    record: &SubmissionRecord,
) -> RedisResult<()> {
    let key = submissions_key(record.user_id);
    let payload = serde_json::to_string(record).map_err(serde_error)?;
    let _: () = conn.lpush(&key, payload).await?;
    Ok(())
}

/// All submissions for a user, newest first.
pub async fn list_submissions(
    conn: &mut redis::aio::ConnectionManager,
    user_id: u64,
) -> RedisResult<Vec<SubmissionRecord>> {
    let key = submissions_key(user_id);
    let payloads: Vec<String> = conn.lrange(&key, 0, -1).await?;

    let mut records = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let record: SubmissionRecord = serde_json::from_str(&payload).map_err(serde_error)?;
        records.push(record);
    }
    Ok(records)
}

/// Upsert the draft code for a (user, problem, language) slot.
pub async fn save_code(
    conn: &mut redis::aio::ConnectionManager,
    record: &CodeSaveRecord,
) -> RedisResult<()> {
    let key = code_save_key(record.user_id, record.problem_id, record.language);
    let payload = serde_json::to_string(record).map_err(serde_error)?;
    let _: () = conn.set(&key, payload).await?;
    Ok(())
}

pub async fn get_saved_code(
    conn: &mut redis::aio::ConnectionManager,
    user_id: u64,
    problem_id: u64,
    language: Language,
) -> RedisResult<Option<CodeSaveRecord>> {
    let key = code_save_key(user_id, problem_id, language);
    let payload: Option<String> = conn.get(&key).await?;

    match payload {
        Some(data) => {
            let record: CodeSaveRecord = serde_json::from_str(&data).map_err(serde_error)?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

/// Allocate the next problem id.
pub async fn next_problem_id(conn: &mut redis::aio::ConnectionManager) -> RedisResult<u64> {
    let id: u64 = conn.incr(PROBLEM_SEQ_KEY, 1u64).await?;
    Ok(id)
}

/// Store a problem and its name index entry.
pub async fn put_problem(
    conn: &mut redis::aio::ConnectionManager,
    problem: &Problem,
) -> RedisResult<()> {
    let payload = serde_json::to_string(problem).map_err(serde_error)?;
    let _: () = conn.set(problem_key(problem.id), payload).await?;
    let _: () = conn
        .set(problem_name_key(&problem.name), problem.id)
        .await?;
    Ok(())
}

pub async fn get_problem(
    conn: &mut redis::aio::ConnectionManager,
    problem_id: u64,
) -> RedisResult<Option<Problem>> {
    let payload: Option<String> = conn.get(problem_key(problem_id)).await?;

    match payload {
        Some(data) => {
            let problem: Problem = serde_json::from_str(&data).map_err(serde_error)?;
            Ok(Some(problem))
        }
        None => Ok(None),
    }
}

pub async fn find_problem_id(
    conn: &mut redis::aio::ConnectionManager,
    name: &str,
) -> RedisResult<Option<u64>> {
    conn.get(problem_name_key(name)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submissions_key_format() {
        assert_eq!(submissions_key(42), "gavel:submissions:42");
    }

    #[test]
    fn test_code_save_key_includes_all_dimensions() {
        let key = code_save_key(7, 13, Language::Cpp);
        assert_eq!(key, "gavel:code:7:13:cpp");
    }

    #[test]
    fn test_code_save_keys_differ_per_language() {
        assert_ne!(
            code_save_key(1, 2, Language::C),
            code_save_key(1, 2, Language::Py)
        );
    }

    #[test]
    fn test_problem_keys_deterministic() {
        assert_eq!(problem_key(9), problem_key(9));
        assert_eq!(problem_key(9), "gavel:problem:9");
        assert_eq!(problem_name_key("two-sum"), "gavel:problem:name:two-sum");
    }
}
