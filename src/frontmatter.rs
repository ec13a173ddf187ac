use serde::Serialize;

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum Frontmatter<'a> {
    Title(&'a str),
    Slug(&'a str),
    QuestionCount(usize),
    Quiz(&'a [QuizMeta<'a>]),
}

/// A quiz question in page frontmatter, answers flagged inline.
#[derive(Serialize, Debug)]
pub struct QuizMeta<'a> {
    pub id: String,
    pub slug: String,
    pub question: &'a str,
    pub answers: Vec<AnswerMeta<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<&'a str>,
}

#[derive(Serialize, Debug)]
pub struct AnswerMeta<'a> {
    pub answer: &'a str,
    pub correct: bool,
}
