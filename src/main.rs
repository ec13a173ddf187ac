use anyhow::Context;
use selfcheck::quiz::{load_bank, QuizItem, QuizSession, ScoreSummary};
use std::{
    env,
    io::{self, BufRead, Write},
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const BANK_ENV: &str = "SELFCHECK_BANK";

pub struct Config {
    pub source: String,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let source = args
        .next()
        .or_else(|| env::var(BANK_ENV).ok())
        .context(format!(
            "a question bank is required, pass a path or URL or set {}",
            BANK_ENV
        ))?;

    Ok(Config { source })
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Select(usize),
    Reveal,
    TryAgain,
    Next,
    Previous,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "r" | "reveal" => Some(Command::Reveal),
        "t" | "try" => Some(Command::TryAgain),
        "n" | "next" | "" => Some(Command::Next),
        "p" | "prev" => Some(Command::Previous),
        "q" | "quit" => Some(Command::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(|n| Command::Select(n - 1)),
    }
}

fn render(item: &QuizItem, position: usize, total: usize, out: &mut impl Write) -> io::Result<()> {
    let entry = item.entry();
    writeln!(out, "\n{BOLD}[{}/{}] {}{RESET}", position + 1, total, entry.prompt)?;

    for option in item.options() {
        let marker = if option.selected { ">" } else { " " };
        let flag = match option.correct {
            Some(true) => " (answer)",
            _ => "",
        };
        writeln!(out, " {} {}. {}{}", marker, option.index + 1, option.text, flag)?;
    }

    if let Some(verdict) = item.verdict() {
        writeln!(out, "{BOLD}{}{RESET}", verdict)?;
    }
    if let Some(explanation) = item.explanation() {
        writeln!(out, "{}", explanation)?;
    }

    let mut actions = Vec::new();
    if item.can_select() {
        actions.push(format!("1-{} select", entry.question.option_count()));
    }
    if item.can_reveal() {
        actions.push(String::from("r reveal"));
    }
    if item.can_reset() {
        actions.push(String::from("t try again"));
    }
    actions.extend(["n next", "p previous", "q quit"].map(String::from));
    writeln!(out, "({})", actions.join(", "))
}

fn run(
    session: &mut QuizSession,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<ScoreSummary> {
    let total = session.items().len();
    let mut position = 0;
    let mut lines = input.lines();

    while let Some(item) = session.item_mut(position) {
        render(item, position, total, out)?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let result = match parse_command(&line) {
            Some(Command::Select(index)) => item.select(index),
            Some(Command::Reveal) => item.reveal(),
            Some(Command::TryAgain) => item.reset(),
            Some(Command::Next) => {
                position += 1;
                Ok(())
            }
            Some(Command::Previous) => {
                position = position.saturating_sub(1);
                Ok(())
            }
            Some(Command::Quit) => break,
            None => {
                writeln!(out, "unknown command '{}'", line.trim())?;
                Ok(())
            }
        };

        if let Err(e) = result {
            writeln!(out, "{}", e)?;
        }
    }

    Ok(session.summary())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: selfcheck <bank.json|bank.yaml|url>");
            return Err(e);
        }
    };

    let bank = load_bank(&config.source)
        .context(format!("could not load question bank from {}", config.source))?;
    if bank.is_empty() {
        println!("no questions in {}", config.source);
        return Ok(());
    }

    if let Some(title) = bank.title() {
        println!("{BOLD}{}{RESET}", title);
    }

    let mut session = bank.session();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let summary = run(&mut session, stdin.lock(), &mut stdout).context("terminal I/O failed")?;

    println!("\nscore: {BOLD}{}{RESET}", summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfcheck::quiz::{QuestionRecord, QuizBank};

    fn bank() -> QuizBank {
        QuizBank::new(
            None,
            vec![
                QuestionRecord::with_options(1, "First?", &["A", "B", "C", "D"], 2),
                QuestionRecord::with_choices(2, "Second?", &[("A", "x"), ("B", "y")], "B"),
            ],
        )
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("3"), Some(Command::Select(2)));
        assert_eq!(parse_command(" r "), Some(Command::Reveal));
        assert_eq!(parse_command(""), Some(Command::Next));
        assert_eq!(parse_command("0"), None);
        assert_eq!(parse_command("huh"), None);
    }

    #[test]
    fn config_prefers_argument() {
        let config = parse_config(vec!["bank.json".to_string()].into_iter()).unwrap();
        assert_eq!(config.source, "bank.json");
    }

    #[test]
    fn walks_through_a_bank() {
        let bank = bank();
        let mut session = bank.session();
        let input = "r\n1\nr\n2\nt\n3\nr\nn\n2\nr\nq\n";
        let mut out = Vec::new();

        let summary = run(&mut session, input.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("no option has been selected"));
        assert!(out.contains("Not quite"));
        assert!(out.contains("the answer is already revealed"));
        assert!(out.contains("Correct"));
        assert_eq!(summary.revealed, 2);
        assert_eq!(summary.correct, 2);
    }

    #[test]
    fn hint_shows_real_option_range() {
        let bank = bank();
        let session = bank.session();
        let mut out = Vec::new();

        render(session.item(0).unwrap(), 0, 2, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("(1-4 select, n next"));

        let mut out = Vec::new();
        render(session.item(1).unwrap(), 1, 2, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("(1-2 select"));
    }

    #[test]
    fn stops_at_end_of_input() {
        let bank = bank();
        let mut session = bank.session();
        let summary = run(&mut session, "1\n".as_bytes(), &mut Vec::new()).unwrap();

        assert_eq!(summary.revealed, 0);
        assert_eq!(session.item(0).unwrap().selected_index(), Some(0));
    }
}
