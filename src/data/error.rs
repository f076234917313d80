use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// One rejected decoding of the source file.
#[derive(Debug, Clone)]
pub struct EncodingAttempt {
    pub encoding: &'static str,
    pub message: String,
}

impl EncodingAttempt {
    pub fn new(encoding: &'static str, message: impl Into<String>) -> Self {
        Self {
            encoding,
            message: message.into(),
        }
    }
}

impl fmt::Display for EncodingAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.encoding, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaProblem {
    Missing,
    NotNumeric,
}

impl fmt::Display for SchemaProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaProblem::Missing => f.write_str("is missing"),
            SchemaProblem::NotNumeric => f.write_str("is not numeric"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read '{}': {}", .path.display(), describe_attempts(.attempts, .io))]
    DataUnavailable {
        path: PathBuf,
        attempts: Vec<EncodingAttempt>,
        io: Option<String>,
    },

    #[error("column '{column}' {problem}")]
    Schema {
        column: String,
        problem: SchemaProblem,
    },
}

impl PipelineError {
    pub fn schema(column: &str, problem: SchemaProblem) -> Self {
        PipelineError::Schema {
            column: column.to_string(),
            problem,
        }
    }
}

fn describe_attempts(attempts: &[EncodingAttempt], io: &Option<String>) -> String {
    if let Some(io) = io {
        return io.clone();
    }
    if attempts.is_empty() {
        return "no candidate encodings configured".to_string();
    }
    let joined: Vec<String> = attempts.iter().map(ToString::to_string).collect();
    format!("no candidate encoding produced a usable table ({})", joined.join("; "))
}
