use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::record::{QuestionForm, QuestionRecord};

/// Authoring mistakes the normalizer tolerates silently.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum RecordIssue {
    #[error("question has neither options nor choices")]
    MissingEncoding,

    #[error("question has both options and choices")]
    BothEncodings,

    #[error("question has no options to pick from")]
    NoOptions,

    #[error("options are given without an answerIndex")]
    MissingAnswerIndex,

    #[error("answerIndex {index} is out of range for {count} options")]
    AnswerIndexOutOfRange { index: i64, count: usize },

    #[error("choices are given without an answer key")]
    MissingAnswerKey,

    #[error("answer '{key}' matches no choice")]
    UnmatchedAnswerKey { key: String },

    #[error("choice key '{key}' is used more than once")]
    DuplicateChoiceKey { key: String },

    #[error("choices are given together with an answerIndex, which overrides the answer key")]
    StrayAnswerIndex,

    #[error("options are given together with an answer key, which is ignored")]
    StrayAnswerKey,

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("id '{id}' is shared with another question")]
    DuplicateId { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub id: String,
    pub position: usize,
    pub issues: Vec<RecordIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// only records with at least one issue
    pub records: Vec<RecordReport>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid == 0
    }
}

fn check_record(record: &QuestionRecord) -> Vec<RecordIssue> {
    let mut issues = Vec::new();

    if record.prompt.trim().is_empty() {
        issues.push(RecordIssue::EmptyPrompt);
    }

    match record.form() {
        QuestionForm::Neither => issues.push(RecordIssue::MissingEncoding),
        QuestionForm::Both => issues.push(RecordIssue::BothEncodings),
        QuestionForm::Options {
            options,
            answer_index,
        } => {
            if options.is_empty() {
                issues.push(RecordIssue::NoOptions);
            }
            match answer_index {
                None => issues.push(RecordIssue::MissingAnswerIndex),
                Some(index) if index < 0 || index as usize >= options.len() => {
                    issues.push(RecordIssue::AnswerIndexOutOfRange {
                        index,
                        count: options.len(),
                    })
                }
                Some(_) => {}
            }
            if record.answer.is_some() {
                issues.push(RecordIssue::StrayAnswerKey);
            }
        }
        QuestionForm::Choices { choices, answer } => {
            if choices.is_empty() {
                issues.push(RecordIssue::NoOptions);
            }

            let mut seen = HashSet::new();
            for choice in choices {
                if !seen.insert(choice.key.as_str()) {
                    issues.push(RecordIssue::DuplicateChoiceKey {
                        key: choice.key.clone(),
                    });
                }
            }

            match answer {
                None => issues.push(RecordIssue::MissingAnswerKey),
                Some(key) if !choices.iter().any(|c| c.key == key) => {
                    issues.push(RecordIssue::UnmatchedAnswerKey {
                        key: key.to_string(),
                    })
                }
                Some(_) => {}
            }
            if record.answer_index.is_some() {
                issues.push(RecordIssue::StrayAnswerIndex);
            }
        }
    }

    issues
}

/// Checks every record of a bank against the authoring invariants.
pub fn validate_bank(records: &[QuestionRecord]) -> ValidationReport {
    let mut id_counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        *id_counts.entry(record.id.to_string()).or_default() += 1;
    }

    let reports: Vec<RecordReport> = records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| {
            let id = record.id.to_string();
            let mut issues = check_record(record);
            if id_counts.get(&id).copied().unwrap_or_default() > 1 {
                issues.push(RecordIssue::DuplicateId { id: id.clone() });
            }

            if issues.is_empty() {
                None
            } else {
                Some(RecordReport {
                    id,
                    position,
                    issues,
                })
            }
        })
        .collect();

    ValidationReport {
        total: records.len(),
        valid: records.len() - reports.len(),
        invalid: reports.len(),
        records: reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::record::Choice;

    #[test]
    fn well_formed_bank_is_valid() {
        let records = vec![
            QuestionRecord::with_options("a", "First?", &["x", "y"], 1),
            QuestionRecord::with_choices("b", "Second?", &[("A", "x"), ("B", "y")], "A"),
        ];
        let report = validate_bank(&records);

        assert!(report.is_valid());
        assert_eq!(report.total, 2);
        assert_eq!(report.valid, 2);
        assert!(report.records.is_empty());
    }

    #[test]
    fn flags_unmatched_answer_key() {
        let records = vec![QuestionRecord::with_choices(
            "a",
            "p",
            &[("A", "x"), ("B", "y")],
            "C",
        )];
        let report = validate_bank(&records);

        assert!(!report.is_valid());
        assert_eq!(
            report.records[0].issues,
            vec![RecordIssue::UnmatchedAnswerKey { key: "C".into() }]
        );
    }

    #[test]
    fn flags_out_of_range_index() {
        let records = vec![
            QuestionRecord::with_options("a", "p", &["x", "y"], 2),
            QuestionRecord::with_options("b", "p", &["x", "y"], -1),
        ];
        let report = validate_bank(&records);

        assert_eq!(report.invalid, 2);
        assert_eq!(
            report.records[0].issues,
            vec![RecordIssue::AnswerIndexOutOfRange { index: 2, count: 2 }]
        );
        assert_eq!(report.records[1].position, 1);
    }

    #[test]
    fn flags_structural_problems() {
        let mut neither = QuestionRecord::with_options("a", " ", &[], 0);
        neither.options = None;
        neither.answer_index = None;

        let mut both = QuestionRecord::with_options("b", "p", &["x"], 0);
        both.choices = Some(vec![Choice::new("A", "x")]);

        let mut no_index = QuestionRecord::with_options("c", "p", &["x"], 0);
        no_index.answer_index = None;

        let duplicate_keys =
            QuestionRecord::with_choices("d", "p", &[("A", "x"), ("A", "y")], "A");

        let report = validate_bank(&[neither, both, no_index, duplicate_keys]);

        assert_eq!(
            report.records[0].issues,
            vec![RecordIssue::EmptyPrompt, RecordIssue::MissingEncoding]
        );
        assert_eq!(report.records[1].issues, vec![RecordIssue::BothEncodings]);
        assert_eq!(report.records[2].issues, vec![RecordIssue::MissingAnswerIndex]);
        assert_eq!(
            report.records[3].issues,
            vec![RecordIssue::DuplicateChoiceKey { key: "A".into() }]
        );
    }

    #[test]
    fn flags_answer_fields_of_the_other_form() {
        let mut choices = QuestionRecord::with_choices("a", "p", &[("A", "x"), ("B", "y")], "B");
        choices.answer_index = Some(0);

        let mut options = QuestionRecord::with_options("b", "p", &["x", "y"], 1);
        options.answer = Some("A".into());

        let report = validate_bank(&[choices, options]);

        assert_eq!(report.invalid, 2);
        assert_eq!(report.records[0].issues, vec![RecordIssue::StrayAnswerIndex]);
        assert_eq!(report.records[1].issues, vec![RecordIssue::StrayAnswerKey]);
    }

    #[test]
    fn flags_duplicate_ids() {
        let records = vec![
            QuestionRecord::with_options(1, "p", &["x"], 0),
            QuestionRecord::with_options("1", "q", &["x"], 0),
            QuestionRecord::with_options(2, "r", &["x"], 0),
        ];
        let report = validate_bank(&records);

        assert_eq!(report.invalid, 2);
        assert_eq!(report.valid, 1);
        assert!(report
            .records
            .iter()
            .all(|r| r.issues == vec![RecordIssue::DuplicateId { id: "1".into() }]));
    }

    #[test]
    fn report_serializes_issue_tags() {
        let records = vec![QuestionRecord::with_choices("a", "p", &[("A", "x")], "Z")];
        let value = serde_json::to_value(validate_bank(&records)).unwrap();

        assert_eq!(value["records"][0]["issues"][0]["issue"], "unmatched_answer_key");
        assert_eq!(value["records"][0]["issues"][0]["key"], "Z");
    }
}
