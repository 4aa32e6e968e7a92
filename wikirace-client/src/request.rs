use crate::error::{Result, SolveError};
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

pub const FIELD_START: &str = "start";
pub const FIELD_END: &str = "end";
pub const FIELD_ALGORITHM: &str = "algo";

/// One search submission. Values are trimmed and checked on construction,
/// so an instance always carries three non-empty fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    start: String,
    end: String,
    algorithm: String,
}

impl SearchRequest {
    pub fn new(start: &str, end: &str, algorithm: &str) -> Result<Self> {
        Ok(Self {
            start: required(FIELD_START, start)?,
            end: required(FIELD_END, end)?,
            algorithm: required(FIELD_ALGORITHM, algorithm)?,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Form fields in the order they are appended to the body.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            (FIELD_START, self.start.as_str()),
            (FIELD_END, self.end.as_str()),
            (FIELD_ALGORITHM, self.algorithm.as_str()),
        ]
    }

    pub fn to_multipart(&self) -> Form {
        self.fields()
            .into_iter()
            .fold(Form::new(), |form, (key, value)| {
                form.text(key, value.to_string())
            })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SolveError::Validation(format!("'{}' must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
