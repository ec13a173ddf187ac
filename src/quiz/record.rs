use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Identity of a question within a bank. Authors use either strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        QuestionId::Text(value.to_string())
    }
}

impl From<i64> for QuestionId {
    fn from(value: i64) -> Self {
        QuestionId::Number(value)
    }
}

impl From<i32> for QuestionId {
    fn from(value: i32) -> Self {
        QuestionId::Number(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// short label, "A", "B", ...
    pub key: String,
    pub text: String,
}

impl Choice {
    pub fn new(key: &str, text: &str) -> Self {
        Self {
            key: key.to_string(),
            text: text.to_string(),
        }
    }
}

/// A question as authored. Exactly one of `options`/`answer_index` or
/// `choices`/`answer` is expected, but nothing here enforces it: see
/// [`QuestionRecord::form`] and the validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Which answer encoding a record uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionForm<'a> {
    Options {
        options: &'a [String],
        answer_index: Option<i64>,
    },
    Choices {
        choices: &'a [Choice],
        answer: Option<&'a str>,
    },
    Both,
    Neither,
}

impl QuestionRecord {
    pub fn with_options(
        id: impl Into<QuestionId>,
        prompt: &str,
        options: &[&str],
        answer_index: i64,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.to_string(),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            answer_index: Some(answer_index),
            choices: None,
            answer: None,
            explanation: None,
        }
    }

    pub fn with_choices(
        id: impl Into<QuestionId>,
        prompt: &str,
        choices: &[(&str, &str)],
        answer: &str,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.to_string(),
            options: None,
            answer_index: None,
            choices: Some(choices.iter().map(|(k, t)| Choice::new(k, t)).collect()),
            answer: Some(answer.to_string()),
            explanation: None,
        }
    }

    pub fn explained(mut self, explanation: &str) -> Self {
        self.explanation = Some(explanation.to_string());
        self
    }

    pub fn form(&self) -> QuestionForm<'_> {
        match (&self.options, &self.choices) {
            (Some(_), Some(_)) => QuestionForm::Both,
            (Some(options), None) => QuestionForm::Options {
                options,
                answer_index: self.answer_index,
            },
            (None, Some(choices)) => QuestionForm::Choices {
                choices,
                answer: self.answer.as_deref(),
            },
            (None, None) => QuestionForm::Neither,
        }
    }

    /// Reads a record out of loosely typed content. Never fails: fields of the
    /// wrong shape are treated as absent and logged.
    pub fn from_value(value: &Value, position: usize) -> Self {
        let id = match value.get("id") {
            Some(Value::String(s)) => QuestionId::Text(s.clone()),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(QuestionId::Number)
                .unwrap_or_else(|| QuestionId::Text(n.to_string())),
            _ => {
                warn!("question at position {} has no id, using its position", position);
                QuestionId::Number(position as i64)
            }
        };

        let prompt = get_attribute::<String>(value, "prompt").unwrap_or_else(|| {
            warn!("question '{}' has no prompt", id);
            String::new()
        });

        let options = value.get("options").and_then(|o| o.as_array()).map(|items| {
            items
                .iter()
                .map(|item| scalar_text(item).unwrap_or_else(|| item.to_string()))
                .collect::<Vec<String>>()
        });

        let answer_index = match value.get("answerIndex") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let index = v.as_i64().or_else(|| {
                    v.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                        .map(|f| f as i64)
                });
                if index.is_none() {
                    warn!("question '{}' has a non-integer answerIndex: {}", id, v);
                }
                index
            }
        };

        let choices = value.get("choices").and_then(|c| c.as_array()).map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, choice)| {
                    let key = get_attribute::<String>(choice, "key").unwrap_or_else(|| {
                        warn!("choice {} of question '{}' has no key", index, id);
                        String::new()
                    });
                    let text = get_attribute::<String>(choice, "text").unwrap_or_else(|| {
                        warn!("choice {} of question '{}' has no text", index, id);
                        String::new()
                    });
                    Choice { key, text }
                })
                .collect::<Vec<Choice>>()
        });

        Self {
            answer: get_attribute(value, "answer"),
            explanation: get_attribute(value, "explanation"),
            id,
            prompt,
            options,
            answer_index,
            choices,
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn get_attribute<T>(value: &Value, attribute: &str) -> Option<T>
where
    T: FromStr,
{
    value
        .get(attribute)
        .and_then(scalar_text)
        .and_then(|s| T::from_str(&s).ok())
}
