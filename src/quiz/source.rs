use anyhow::Context;
use log::{info, warn};
use serde_json::Value;
use std::{fs, path::Path};
use thiserror::Error;

use super::{record::QuestionRecord, session::QuizBank};

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] Box<ureq::Error>),

    #[error("Failed to read response body: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Server returned an error: {status}")]
    ServerError { status: u16 },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("bank is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bank is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("bank must be a list of questions or an object with a 'questions' list")]
    UnexpectedShape,

    #[error("unsupported bank file extension '{0}', expected json, yaml or yml")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFormat {
    Json,
    Yaml,
}

impl BankFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "json" => Ok(BankFormat::Json),
            "yaml" | "yml" => Ok(BankFormat::Yaml),
            _ => Err(LoadError::UnsupportedFormat(extension)),
        }
    }
}

/// Loads a bank from a file path or an `http(s)://` URL.
pub fn load_bank(source: &str) -> anyhow::Result<QuizBank> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return fetch_bank(source);
    }

    let path = Path::new(source);
    let format = BankFormat::from_path(path)?;
    let content =
        fs::read_to_string(path).context(format!("failed to read bank file {}", source))?;

    parse_bank(&content, format).context(format!("failed to parse bank file {}", source))
}

pub fn fetch_bank(url: &str) -> anyhow::Result<QuizBank> {
    info!("fetching question bank from {}", url);

    let response = ureq::get(url)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => RequestError::ServerError { status: code },
            other => RequestError::HttpError(Box::new(other)),
        })
        .context("Failed to send request")?;

    let body: Value = response
        .into_json()
        .map_err(RequestError::IoError)
        .context("Failed to read response body")?;

    bank_from_value(body).context(format!("unexpected bank received from {}", url))
}

pub fn parse_bank(content: &str, format: BankFormat) -> Result<QuizBank, LoadError> {
    let value: Value = match format {
        BankFormat::Json => serde_json::from_str(content)?,
        BankFormat::Yaml => serde_yaml_ng::from_str(content)?,
    };

    bank_from_value(value)
}

fn bank_from_value(value: Value) -> Result<QuizBank, LoadError> {
    let (title, questions) = match value {
        Value::Array(questions) => (None, questions),
        Value::Object(mut map) => {
            let title = map
                .get("title")
                .and_then(|t| t.as_str())
                .map(|t| t.to_string());
            match map.remove("questions") {
                Some(Value::Array(questions)) => (title, questions),
                _ => return Err(LoadError::UnexpectedShape),
            }
        }
        _ => return Err(LoadError::UnexpectedShape),
    };

    let records = questions
        .iter()
        .enumerate()
        .filter_map(|(position, question)| {
            if question.is_object() {
                Some(QuestionRecord::from_value(question, position))
            } else {
                warn!("skipping question at position {}: not an object", position);
                None
            }
        })
        .collect();

    Ok(QuizBank::new(title, records))
}
