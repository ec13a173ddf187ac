use std::env;

use anyhow::Context;
use selfcheck::quiz::{load_bank, validate_bank};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const BANK_ENV: &str = "SELFCHECK_BANK";

pub struct Config {
    pub source: String,
    pub json: bool,
}

fn parse_config(args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let mut source = None;
    let mut json = false;

    for arg in args {
        if arg == "--json" {
            json = true;
        } else if source.is_none() {
            source = Some(arg);
        } else {
            return Err(anyhow::anyhow!("unexpected argument '{}'", arg));
        }
    }

    let source = source
        .or_else(|| env::var(BANK_ENV).ok())
        .context(format!(
            "a question bank is required, pass a path or URL or set {}",
            BANK_ENV
        ))?;

    Ok(Config { source, json })
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: check_bank <bank.json|bank.yaml|url> [--json]");
            return Err(e);
        }
    };

    let bank = load_bank(&config.source)
        .context(format!("could not load question bank from {}", config.source))?;
    let report = validate_bank(bank.records());

    if config.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        );
    } else {
        for record in &report.records {
            println!("{BOLD}{}{RESET} (position {})", record.id, record.position);
            for issue in &record.issues {
                println!("  - {}", issue);
            }
        }
        println!(
            "\n{BOLD}{}{RESET} of {BOLD}{}{RESET} questions valid",
            report.valid, report.total
        );
    }

    if !report.is_valid() {
        return Err(anyhow::anyhow!(
            "{} malformed questions in {}",
            report.invalid,
            config.source
        ));
    }

    Ok(())
}
