use log::debug;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::session::QuizEntry;

/// Interaction state of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemState {
    #[default]
    Unanswered,
    Answered { selected: usize },
    Revealed { selected: usize },
}

impl ItemState {
    pub fn selected_index(&self) -> Option<usize> {
        match *self {
            ItemState::Unanswered => None,
            ItemState::Answered { selected } | ItemState::Revealed { selected } => Some(selected),
        }
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self, ItemState::Revealed { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("the answer is already revealed")]
    AlreadyRevealed,

    #[error("no option has been selected")]
    NothingSelected,

    #[error("the answer has not been revealed")]
    NotRevealed,

    #[error("option {index} does not exist, question has {count} options")]
    OptionOutOfRange { index: usize, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Correct,
    NotQuite,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Correct => "Correct",
            Verdict::NotQuite => "Not quite",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a renderer needs to draw one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView<'a> {
    pub index: usize,
    pub text: &'a str,
    pub selected: bool,
    /// `None` until the answer is revealed.
    pub correct: Option<bool>,
}

/// The per-question evaluator. Borrows its question and owns nothing but
/// its own [`ItemState`].
#[derive(Debug, Clone)]
pub struct QuizItem<'a> {
    entry: &'a QuizEntry,
    state: ItemState,
}

impl<'a> QuizItem<'a> {
    pub fn new(entry: &'a QuizEntry) -> Self {
        Self {
            entry,
            state: ItemState::Unanswered,
        }
    }

    pub fn entry(&self) -> &'a QuizEntry {
        self.entry
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected_index()
    }

    pub fn is_revealed(&self) -> bool {
        self.state.is_revealed()
    }

    pub fn can_select(&self) -> bool {
        !self.is_revealed() && self.entry.question.option_count() > 0
    }

    pub fn can_reveal(&self) -> bool {
        matches!(self.state, ItemState::Answered { .. })
    }

    pub fn can_reset(&self) -> bool {
        self.is_revealed()
    }

    pub fn select(&mut self, index: usize) -> Result<(), TransitionError> {
        if self.is_revealed() {
            return Err(TransitionError::AlreadyRevealed);
        }
        let count = self.entry.question.option_count();
        if index >= count {
            return Err(TransitionError::OptionOutOfRange { index, count });
        }

        debug!("question '{}': selected option {}", self.entry.id, index);
        self.state = ItemState::Answered { selected: index };
        Ok(())
    }

    pub fn reveal(&mut self) -> Result<(), TransitionError> {
        match self.state {
            ItemState::Unanswered => Err(TransitionError::NothingSelected),
            ItemState::Revealed { .. } => Err(TransitionError::AlreadyRevealed),
            ItemState::Answered { selected } => {
                debug!("question '{}': revealed", self.entry.id);
                self.state = ItemState::Revealed { selected };
                Ok(())
            }
        }
    }

    /// "Try again".
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        if !self.is_revealed() {
            return Err(TransitionError::NotRevealed);
        }

        debug!("question '{}': reset", self.entry.id);
        self.state = ItemState::Unanswered;
        Ok(())
    }

    /// Correctness of the current selection, disclosed only after reveal.
    pub fn is_correct(&self) -> Option<bool> {
        match self.state {
            ItemState::Revealed { selected } => Some(self.entry.question.is_correct(selected)),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.is_correct().map(|correct| {
            if correct {
                Verdict::Correct
            } else {
                Verdict::NotQuite
            }
        })
    }

    pub fn explanation(&self) -> Option<&'a str> {
        let entry: &'a QuizEntry = self.entry;
        if self.is_revealed() {
            entry.explanation.as_deref()
        } else {
            None
        }
    }

    pub fn options(&self) -> Vec<OptionView<'a>> {
        let selected = self.selected_index();
        let revealed = self.is_revealed();
        let entry: &'a QuizEntry = self.entry;
        let question = &entry.question;

        question
            .option_texts
            .iter()
            .enumerate()
            .map(|(index, text)| OptionView {
                index,
                text: text.as_str(),
                selected: selected == Some(index),
                correct: revealed.then(|| question.is_correct(index)),
            })
            .collect()
    }
}
