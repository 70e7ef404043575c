use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use quiz_core::model::{QuizConfig, QuizConfigDraft};
use services::{AppServices, Clock, LoopEvent, QuestionFactory, QuizSession, RoundReport};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuestions { raw: String },
    InvalidRevealMs { raw: String },
    InvalidDbUrl { raw: String },
    InvalidEnv { var: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuestions { raw } => write!(f, "invalid --questions value: {raw}"),
            ArgsError::InvalidRevealMs { raw } => write!(f, "invalid --reveal-ms value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidEnv { var, raw } => write!(f, "invalid {var} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_env_value<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ArgsError> {
    raw.map(|raw| {
        raw.trim()
            .parse()
            .map_err(|_| ArgsError::InvalidEnv { var, raw })
    })
    .transpose()
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--questions <n>] [--reveal-ms <ms>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --questions 10");
    eprintln!("  --reveal-ms 1000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS, QUIZ_REVEAL_MS, RUST_LOG");
}

struct Args {
    db_url: String,
    draft: QuizConfigDraft,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite:quiz.sqlite3".into()), normalize_sqlite_url);
        let mut draft = QuizConfigDraft {
            total_questions: parse_env_value(
                "QUIZ_QUESTIONS",
                std::env::var("QUIZ_QUESTIONS").ok(),
            )?,
            reveal_delay: parse_env_value::<u64>(
                "QUIZ_REVEAL_MS",
                std::env::var("QUIZ_REVEAL_MS").ok(),
            )?
            .map(Duration::from_millis),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidQuestions { raw: value.clone() })?;
                    draft.total_questions = Some(parsed);
                }
                "--reveal-ms" => {
                    let value = require_value(args, "--reveal-ms")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidRevealMs { raw: value.clone() })?;
                    draft.reveal_delay = Some(Duration::from_millis(parsed));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, draft })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

type Input = Lines<BufReader<Stdin>>;

/// Reads until the player types yes or no; `None` on end of input.
async fn read_yes_no(input: &mut Input) -> Result<Option<bool>, std::io::Error> {
    while let Some(line) = input.next_line().await? {
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            _ => println!("Please answer y or n."),
        }
    }
    Ok(None)
}

fn print_report(report: &RoundReport) {
    println!();
    println!("== {} ==", report.view.title);
    println!("{}", report.view.message);
    println!("[{}? y/n]", report.view.button_text);
}

async fn play(
    services: &AppServices,
    config: &QuizConfig,
    input: &mut Input,
) -> Result<(), Box<dyn std::error::Error>> {
    let quiz_loop = services.quiz_loop();
    let mut session = QuizSession::new(QuestionFactory::new(), config, Clock::default_clock());

    loop {
        let mut event = quiz_loop.start(&mut session).await?;
        let report = loop {
            match event {
                LoopEvent::Question(step) => {
                    println!();
                    println!("Question {}  [{}]", step.question_number, step.image);
                    println!("{} (y/n)", step.question);
                    let Some(given) = read_yes_no(input).await? else {
                        return Ok(());
                    };
                    if let Some(reveal) = session.answer(given) {
                        println!("{}", if reveal.is_correct { "Correct!" } else { "Wrong." });
                    }
                    tokio::time::sleep(config.reveal_delay()).await;
                    event = quiz_loop.advance(&mut session).await?;
                }
                LoopEvent::Finished(report) => break report,
            }
        };

        print_report(&report);
        if read_yes_no(input).await? != Some(true) {
            return Ok(());
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let config = parsed.draft.validate()?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url).await?;
    tracing::info!(
        db_url = %parsed.db_url,
        total_questions = config.total_questions(),
        "quiz ready"
    );

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    play(&services, &config, &mut input).await
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
