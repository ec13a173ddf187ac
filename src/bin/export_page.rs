use std::io::Write;
use std::{
    env,
    fs::{self, OpenOptions},
};

use anyhow::Context;
use selfcheck::{
    page::{page_slug, serialize_quiz_page},
    quiz::load_bank,
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const DEFAULT_OUTPUT_DIR: &str = "output/quiz";
const BANK_ENV: &str = "SELFCHECK_BANK";
const OUTPUT_ENV: &str = "SELFCHECK_OUTPUT_DIR";

pub struct Config {
    pub source: String,
    pub output_dir: String,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let source = args
        .next()
        .or_else(|| env::var(BANK_ENV).ok())
        .context(format!(
            "a question bank is required, pass a path or URL or set {}",
            BANK_ENV
        ))?;
    let output_dir = args
        .next()
        .or_else(|| env::var(OUTPUT_ENV).ok())
        .unwrap_or(DEFAULT_OUTPUT_DIR.to_string());

    Ok(Config { source, output_dir })
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: export_page <bank.json|bank.yaml|url> [output_dir]");
            return Err(e);
        }
    };

    let bank = load_bank(&config.source)
        .context(format!("could not load question bank from {}", config.source))?;
    let content = serialize_quiz_page(&bank).context("failed to serialize page")?;

    fs::create_dir_all(&config.output_dir).context("failed to create output directory")?;

    let path = format!("{}/{}.md", config.output_dir, page_slug(&bank));
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&path)
        .context(format!("failed to open file for {}", path))?;
    write!(file, "{}", content).context("failed to write page")?;

    println!(
        "exported {BOLD}{}{RESET} questions to {BOLD}{}{RESET}",
        bank.len(),
        path
    );

    Ok(())
}
