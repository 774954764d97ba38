//! Deciding whether a model reply is executable.
//!
//! The sentinel check is an exact match against the trimmed reply rather
//! than substring containment, so a legitimate statement that mentions the
//! sentinel inside a string literal is still executed.

use crate::error::ForbiddenStatementError;
use crate::prompt::UNANSWERABLE;

/// The guard's verdict on a raw model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesizedSql {
    /// The model declined; the reply goes back to the caller untouched and
    /// nothing is executed.
    Unanswerable,
    /// A single SQL statement, passed on unmodified apart from the outer
    /// trim.
    Statement(String),
}

/// Classify a raw reply as the sentinel or as a statement.
pub fn classify_reply(reply: &str) -> SynthesizedSql {
    let trimmed = reply.trim();
    if trimmed == UNANSWERABLE {
        SynthesizedSql::Unanswerable
    } else {
        SynthesizedSql::Statement(trimmed.to_string())
    }
}

// DML keywords that make a statement modify data even when it leads with
// an otherwise read-only keyword: Postgres runs the `DELETE` inside
// `WITH gone AS (DELETE ... RETURNING ...) SELECT ...`.
const DML_KEYWORDS: [&str; 4] = ["INSERT", "UPDATE", "DELETE", "MERGE"];

// EXPLAIN options that may precede the inner statement.
const EXPLAIN_OPTIONS: [&str; 2] = ["ANALYZE", "VERBOSE"];

/// Refuse any statement that can modify data or schema. The first
/// significant keyword decides the statement kind (leading whitespace and
/// SQL comments are skipped); `EXPLAIN` gates its inner statement through
/// the same check, since `EXPLAIN ANALYZE` executes it, and a `WITH`
/// statement is refused if any DML keyword appears in it, since CTEs may
/// carry data-modifying statements.
pub fn ensure_read_only(sql: &str) -> Result<(), ForbiddenStatementError> {
    let body = skip_leading_trivia(sql);
    let keyword = leading_keyword(body);

    match keyword.to_ascii_uppercase().as_str() {
        "SELECT" | "VALUES" | "TABLE" | "SHOW" => Ok(()),
        "WITH" => match find_dml_keyword(body) {
            None => Ok(()),
            Some(keyword) => Err(ForbiddenStatementError { keyword }),
        },
        "EXPLAIN" => ensure_read_only(skip_explain_options(&body[keyword.len()..])),
        _ => Err(ForbiddenStatementError { keyword }),
    }
}

fn leading_keyword(body: &str) -> String {
    body.chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect()
}

/// Skip `ANALYZE`/`VERBOSE` flags and a parenthesized option list so the
/// statement being explained is exposed for its own read-only check.
fn skip_explain_options(after_explain: &str) -> &str {
    let mut rest = skip_leading_trivia(after_explain);
    loop {
        if let Some(after) = rest.strip_prefix('(') {
            rest = match after.find(')') {
                Some(pos) => &after[pos + 1..],
                None => "",
            };
        } else {
            let word = leading_keyword(rest);
            if EXPLAIN_OPTIONS
                .iter()
                .any(|option| word.eq_ignore_ascii_case(option))
            {
                rest = &rest[word.len()..];
            } else {
                return rest;
            }
        }
        rest = skip_leading_trivia(rest);
    }
}

/// Find a standalone DML keyword anywhere in the statement. Deliberately
/// conservative: a `WITH` statement that merely mentions one of these
/// words (say, in a string literal) is refused rather than risk running a
/// data-modifying CTE.
fn find_dml_keyword(sql: &str) -> Option<String> {
    let upper = sql.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    for keyword in DML_KEYWORDS {
        let mut from = 0;
        while let Some(offset) = upper[from..].find(keyword) {
            let start = from + offset;
            let end = start + keyword.len();
            let bounded_left = start == 0 || !is_word_byte(bytes[start - 1]);
            let bounded_right = end == bytes.len() || !is_word_byte(bytes[end]);
            if bounded_left && bounded_right {
                return Some(keyword.to_string());
            }
            from = end;
        }
    }
    None
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Skip whitespace, `--` line comments and `/* */` block comments.
fn skip_leading_trivia(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = match after.find('\n') {
                Some(pos) => &after[pos + 1..],
                None => "",
            };
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = match after.find("*/") {
                Some(pos) => &after[pos + 2..],
                None => "",
            };
        } else {
            return rest;
        }
        rest = rest.trim_start();
    }
}
