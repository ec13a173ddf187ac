use serde::Serialize;

use super::record::QuestionRecord;

/// Evaluator-ready question: display texts in order plus the index of the
/// correct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedQuestion {
    pub option_texts: Vec<String>,
    pub correct_index: usize,
}

impl NormalizedQuestion {
    pub fn option_count(&self) -> usize {
        self.option_texts.len()
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

/// Folds either authoring form into a [`NormalizedQuestion`].
///
/// Total: malformed records degrade to an empty option list or to a correct
/// index of 0. An out-of-range `answerIndex` is kept as-is, so no selection
/// will ever match it.
pub fn normalize(record: &QuestionRecord) -> NormalizedQuestion {
    let option_texts = match (&record.options, &record.choices) {
        (Some(options), _) if !options.is_empty() => options.clone(),
        (_, Some(choices)) => choices.iter().map(|c| c.text.clone()).collect(),
        _ => Vec::new(),
    };

    let correct_index = match (record.answer_index, &record.choices) {
        // negative indexes can never match a selection
        (Some(index), _) => usize::try_from(index).unwrap_or(usize::MAX),
        (None, Some(choices)) => record
            .answer
            .as_deref()
            .and_then(|answer| choices.iter().position(|c| c.key == answer))
            .unwrap_or(0),
        (None, None) => 0,
    };

    NormalizedQuestion {
        option_texts,
        correct_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::record::Choice;

    #[test]
    fn options_form_is_kept_verbatim() {
        let record = QuestionRecord::with_options("q", "p", &["o0", "o1", "o2"], 1);
        let normalized = normalize(&record);

        assert_eq!(normalized.option_texts, vec!["o0", "o1", "o2"]);
        assert_eq!(normalized.correct_index, 1);
    }

    #[test]
    fn choices_form_projects_texts_and_finds_key() {
        let record = QuestionRecord::with_choices("q", "p", &[("A", "x"), ("B", "y")], "B");
        let normalized = normalize(&record);

        assert_eq!(normalized.option_texts, vec!["x", "y"]);
        assert_eq!(normalized.correct_index, 1);
    }

    #[test]
    fn unmatched_key_falls_back_to_first_option() {
        let record = QuestionRecord::with_choices("q", "p", &[("A", "x"), ("B", "y")], "Z");
        assert_eq!(normalize(&record).correct_index, 0);

        let mut record = record;
        record.answer = None;
        assert_eq!(normalize(&record).correct_index, 0);
    }

    #[test]
    fn first_matching_key_wins() {
        let record =
            QuestionRecord::with_choices("q", "p", &[("A", "x"), ("B", "y"), ("B", "z")], "B");
        assert_eq!(normalize(&record).correct_index, 1);
    }

    #[test]
    fn record_without_encoding_is_empty() {
        let mut record = QuestionRecord::with_options("q", "p", &[], 0);
        record.options = None;
        record.answer_index = None;
        let normalized = normalize(&record);

        assert!(normalized.option_texts.is_empty());
        assert_eq!(normalized.correct_index, 0);
    }

    #[test]
    fn empty_options_defer_to_choices() {
        let mut record = QuestionRecord::with_choices("q", "p", &[("A", "x"), ("B", "y")], "B");
        record.options = Some(Vec::new());
        let normalized = normalize(&record);

        assert_eq!(normalized.option_texts, vec!["x", "y"]);
        assert_eq!(normalized.correct_index, 1);
    }

    #[test]
    fn answer_index_beats_answer_key() {
        let mut record = QuestionRecord::with_options("q", "p", &["a", "b", "c"], 2);
        record.choices = Some(vec![Choice::new("A", "a")]);
        record.answer = Some("A".into());
        assert_eq!(normalize(&record).correct_index, 2);
    }

    #[test]
    fn out_of_range_index_is_not_clamped() {
        let record = QuestionRecord::with_options("q", "p", &["a", "b"], 5);
        let normalized = normalize(&record);
        assert_eq!(normalized.correct_index, 5);
        assert!(!(0..normalized.option_count()).any(|i| normalized.is_correct(i)));

        let record = QuestionRecord::with_options("q", "p", &["a", "b"], -1);
        let normalized = normalize(&record);
        assert!(!(0..normalized.option_count()).any(|i| normalized.is_correct(i)));
    }
}
