use anyhow::Context;
use github_slugger::Slugger;
use std::collections::BTreeMap;

use crate::{
    frontmatter::{AnswerMeta, Frontmatter, QuizMeta},
    quiz::{QuizBank, QuizEntry},
};

pub const DEFAULT_TITLE: &str = "Self check";

/// Slug the exported page will be written under.
pub fn page_slug(bank: &QuizBank) -> String {
    Slugger::default().slug(bank.title().unwrap_or(DEFAULT_TITLE))
}

fn quiz_meta(entry: &QuizEntry, slug: String) -> QuizMeta<'_> {
    QuizMeta {
        id: entry.id.to_string(),
        slug,
        question: entry.prompt.as_str(),
        answers: entry
            .question
            .option_texts
            .iter()
            .enumerate()
            .map(|(index, text)| AnswerMeta {
                answer: text.as_str(),
                correct: entry.question.is_correct(index),
            })
            .collect(),
        explanation: entry.explanation.as_deref(),
    }
}

fn question_body(entry: &QuizEntry, slug: &str) -> String {
    let mut body = format!("### {} {{#{}}}\n\n", entry.prompt, slug);

    for (index, text) in entry.question.option_texts.iter().enumerate() {
        body.push_str(&format!("{}. {}\n", index + 1, text));
    }

    let answer = entry
        .question
        .option_texts
        .get(entry.question.correct_index)
        .map(|text| format!("**{}**", text))
        .unwrap_or_else(|| String::from("_No answer available_"));

    body.push_str(&format!(
        "\n<details>\n<summary>Show answer</summary>\n\n{}\n\n",
        answer
    ));
    if let Some(explanation) = &entry.explanation {
        body.push_str(explanation);
        body.push_str("\n\n");
    }
    body.push_str("</details>\n\n");

    body
}

/// Renders a bank as a markdown page: YAML frontmatter carrying the quiz,
/// followed by a readable body with one heading per question.
pub fn serialize_quiz_page(bank: &QuizBank) -> anyhow::Result<String> {
    let title = bank.title().unwrap_or(DEFAULT_TITLE);
    let mut slugger = Slugger::default();
    let slug = slugger.slug(title);

    let slugs: Vec<String> = bank
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            if entry.prompt.trim().is_empty() {
                slugger.slug(&format!("question {}", index + 1))
            } else {
                slugger.slug(&entry.prompt)
            }
        })
        .collect();

    let quiz: Vec<QuizMeta> = bank
        .entries()
        .iter()
        .zip(slugs.iter())
        .map(|(entry, slug)| quiz_meta(entry, slug.clone()))
        .collect();

    let mut fm: BTreeMap<&str, Frontmatter> = BTreeMap::new();
    fm.insert("title", Frontmatter::Title(title));
    fm.insert("slug", Frontmatter::Slug(slug.as_str()));
    fm.insert("question_count", Frontmatter::QuestionCount(bank.len()));
    fm.insert("quiz", Frontmatter::Quiz(&quiz));

    let mut page_body = String::with_capacity(400 * bank.len());
    page_body.push_str(&format!("## {} {{#{}}}\n\n", title, slug));
    bank.entries()
        .iter()
        .zip(slugs.iter())
        .for_each(|(entry, slug)| page_body.push_str(&question_body(entry, slug)));

    Ok(format!(
        r#"---
{}---

{}"#,
        serde_yaml_ng::to_string(&fm).context("failed to serialize page frontmatter")?,
        page_body
    ))
}
