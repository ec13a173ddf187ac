mod item;
mod normalize;
mod record;
mod session;
mod source;
mod validate;

pub use item::{ItemState, OptionView, QuizItem, TransitionError, Verdict};
pub use normalize::{normalize, NormalizedQuestion};
pub use record::{Choice, QuestionForm, QuestionId, QuestionRecord};
pub use session::{QuizBank, QuizEntry, QuizSession, ScoreSummary};
pub use source::{fetch_bank, load_bank, parse_bank, BankFormat, LoadError, RequestError};
pub use validate::{validate_bank, RecordIssue, RecordReport, ValidationReport};
