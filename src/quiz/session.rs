use log::info;
use serde::Serialize;
use std::fmt;

use super::{
    item::QuizItem,
    normalize::{normalize, NormalizedQuestion},
    record::{QuestionId, QuestionRecord},
};

/// A question ready for display: normalized once, shared read-only by every
/// evaluator built on top of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizEntry {
    pub id: QuestionId,
    pub prompt: String,
    pub explanation: Option<String>,
    pub question: NormalizedQuestion,
}

impl QuizEntry {
    pub fn from_record(record: &QuestionRecord) -> Self {
        Self {
            id: record.id.clone(),
            prompt: record.prompt.clone(),
            explanation: record.explanation.clone(),
            question: normalize(record),
        }
    }
}

/// An ordered question bank, as authored and as normalized.
#[derive(Debug, Clone)]
pub struct QuizBank {
    title: Option<String>,
    records: Vec<QuestionRecord>,
    entries: Vec<QuizEntry>,
}

impl QuizBank {
    pub fn new(title: Option<String>, records: Vec<QuestionRecord>) -> Self {
        let entries = records.iter().map(QuizEntry::from_record).collect();
        info!(
            "loaded {} questions{}",
            records.len(),
            title.as_deref().map(|t| format!(" for '{}'", t)).unwrap_or_default()
        );

        Self {
            title,
            records,
            entries,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn entries(&self) -> &[QuizEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn session(&self) -> QuizSession<'_> {
        QuizSession::new(self)
    }
}

/// Running tally over a session. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreSummary {
    pub total: usize,
    pub revealed: usize,
    pub correct: usize,
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} correct ({} of {} answered)",
            self.correct, self.revealed, self.revealed, self.total
        )
    }
}

/// One independent evaluator per question in a bank.
#[derive(Debug, Clone)]
pub struct QuizSession<'a> {
    items: Vec<QuizItem<'a>>,
}

impl<'a> QuizSession<'a> {
    pub fn new(bank: &'a QuizBank) -> Self {
        Self {
            items: bank.entries.iter().map(QuizItem::new).collect(),
        }
    }

    pub fn items(&self) -> &[QuizItem<'a>] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&QuizItem<'a>> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut QuizItem<'a>> {
        self.items.get_mut(index)
    }

    pub fn find(&self, id: &QuestionId) -> Option<&QuizItem<'a>> {
        self.items.iter().find(|item| &item.entry().id == id)
    }

    pub fn find_mut(&mut self, id: &QuestionId) -> Option<&mut QuizItem<'a>> {
        self.items.iter_mut().find(|item| &item.entry().id == id)
    }

    pub fn summary(&self) -> ScoreSummary {
        self.items.iter().fold(
            ScoreSummary {
                total: self.items.len(),
                ..ScoreSummary::default()
            },
            |mut summary, item| {
                if let Some(correct) = item.is_correct() {
                    summary.revealed += 1;
                    if correct {
                        summary.correct += 1;
                    }
                }
                summary
            },
        )
    }
}
