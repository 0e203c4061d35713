use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use content::{FileSource, HttpSource, QuizSource, ResourceRef, is_http_url};
use quiz_core::SessionResult;
use quiz_core::model::FeedbackMode;
use services::{Direction, OptionFeedback, QuizService, QuizSession, SessionError};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidFeedback { raw: String },
    InvalidSeed { raw: String },
    InvalidSource { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidFeedback { raw } => {
                write!(f, "invalid --feedback value: {raw} (expected end or immediate)")
            }
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidSource { raw } => write!(f, "invalid --source value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [run]     [--source <path|url>] [--section <id>] [--randomize]");
    eprintln!("                 [--feedback end|immediate] [--seed <n>]");
    eprintln!("  quiz sections  [--source <path|url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --source quiz.json");
    eprintln!("  --section all");
    eprintln!("  --feedback end");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SOURCE, QUIZ_SECTION, QUIZ_RANDOMIZE, QUIZ_FEEDBACK, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Sections,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "sections" => Some(Self::Sections),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Args {
    source: String,
    section: String,
    randomize: bool,
    feedback: FeedbackMode,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut source = std::env::var("QUIZ_SOURCE").unwrap_or_else(|_| "quiz.json".into());
        let mut section = std::env::var("QUIZ_SECTION").unwrap_or_else(|_| "all".into());
        let mut randomize = std::env::var("QUIZ_RANDOMIZE")
            .ok()
            .is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes"));
        let mut feedback = std::env::var("QUIZ_FEEDBACK")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--source" => {
                    let value = require_value(args, "--source")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidSource { raw: value });
                    }
                    source = value;
                }
                "--section" => section = require_value(args, "--section")?,
                "--randomize" => randomize = true,
                "--feedback" => {
                    let value = require_value(args, "--feedback")?;
                    feedback = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidFeedback { raw: value.clone() })?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            source,
            section,
            randomize,
            feedback,
            seed,
        })
    }

    fn quiz_service(&self) -> QuizService {
        let source: Arc<dyn QuizSource> = if is_http_url(&self.source) {
            Arc::new(HttpSource::new())
        } else {
            Arc::new(FileSource::new())
        };
        let service = QuizService::new(source, ResourceRef::new(self.source.trim()))
            .with_feedback_mode(self.feedback);
        match self.seed {
            Some(seed) => service.with_seed(seed),
            None => service,
        }
    }
}

/// Interactive terminal front end over a `QuizSession`.
struct Terminal<R, W> {
    input: R,
    output: W,
}

enum Action {
    Pick(usize),
    Next,
    Previous,
    Finish,
    Retake,
    Quit,
    Unknown,
}

fn parse_action(line: &str) -> Action {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "n" | "next" => Action::Next,
        "p" | "prev" | "previous" => Action::Previous,
        "f" | "finish" => Action::Finish,
        "r" | "retake" => Action::Retake,
        "q" | "quit" => Action::Quit,
        other => {
            if let Ok(number) = other.parse::<usize>() {
                return number.checked_sub(1).map_or(Action::Unknown, Action::Pick);
            }
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c @ 'a'..='z'), None) => Action::Pick(usize::from(c as u8 - b'a')),
                _ => Action::Unknown,
            }
        }
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn show_question(&mut self, session: &QuizSession) -> Result<(), Box<dyn std::error::Error>> {
        let view = session.question_view()?;
        writeln!(self.output)?;
        writeln!(self.output, "Question {} of {}", view.number, view.total)?;
        writeln!(self.output, "{}", view.text)?;
        for option in &view.options {
            let marker = if option.selected { '*' } else { ' ' };
            let feedback = match option.feedback {
                Some(OptionFeedback::Correct) => "  (correct)",
                Some(OptionFeedback::Incorrect) => "  (incorrect)",
                None => "",
            };
            writeln!(
                self.output,
                " {marker} {}. {}{feedback}",
                option.label, option.text
            )?;
        }
        if let Some(explanation) = &view.explanation {
            writeln!(self.output, "Explanation: {explanation}")?;
        }

        let nav = session.navigation();
        let mut hints = Vec::new();
        if nav.previous_enabled {
            hints.push("[p]revious");
        }
        if nav.next_enabled {
            hints.push("[n]ext");
        }
        if nav.finish_enabled {
            hints.push("[f]inish");
        }
        hints.push("[q]uit");
        writeln!(self.output, "{}", hints.join("  "))?;
        Ok(())
    }

    fn show_result(&mut self, result: &SessionResult) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Score: {}%", result.percentage)?;
        writeln!(self.output, "{} out of {} correct", result.correct, result.total)?;
        if result.is_perfect() {
            writeln!(self.output, "Perfect! All answers are correct!")?;
            return Ok(());
        }
        writeln!(self.output, "Incorrect answers ({}):", result.missed.len())?;
        for (n, missed) in result.missed.iter().enumerate() {
            writeln!(self.output, "{}. {}", n + 1, missed.question_text)?;
            let yours = missed.user_answer.text().unwrap_or("Not answered");
            writeln!(self.output, "   Your answer: {yours}")?;
            writeln!(self.output, "   Correct answer: {}", missed.correct_answer)?;
            if let Some(explanation) = &missed.explanation {
                writeln!(self.output, "   {explanation}")?;
            }
        }
        Ok(())
    }

    fn play(&mut self, session: &mut QuizSession) -> Result<(), Box<dyn std::error::Error>> {
        self.show_question(session)?;
        while let Some(line) = self.read_line()? {
            match parse_action(&line) {
                Action::Quit => break,
                Action::Pick(option) => match session.select_current(option) {
                    Ok(_) => {}
                    Err(SessionError::OptionOutOfRange { .. }) => {
                        writeln!(self.output, "No such option.")?;
                        continue;
                    }
                    Err(SessionError::Completed) => {
                        writeln!(self.output, "Quiz finished; [r]etake or [q]uit.")?;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                },
                Action::Next => {
                    if !session.navigation().next_enabled {
                        writeln!(self.output, "Answer the question first.")?;
                        continue;
                    }
                    session.advance(Direction::Next);
                }
                Action::Previous => {
                    session.advance(Direction::Previous);
                }
                Action::Finish => match session.finish() {
                    Ok(result) => {
                        self.show_result(&result)?;
                        writeln!(self.output, "[r]etake  [q]uit")?;
                        continue;
                    }
                    Err(SessionError::PrematureFinish) => {
                        writeln!(self.output, "Answer the last question before finishing.")?;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                },
                Action::Retake => session.reset(),
                Action::Unknown => {
                    writeln!(self.output, "Type an option letter, n, p, f, r or q.")?;
                    continue;
                }
            }
            self.show_question(session)?;
        }
        Ok(())
    }
}

fn print_sections(session: &QuizSession) {
    let index = session.sections();
    println!("all\tAll sections ({})", index.total());
    for section in index.sections() {
        println!("{}\t{} ({})", section.id, section.title, section.count);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let opened = parsed.quiz_service().open_session().await?;
    for skipped in &opened.skipped {
        eprintln!("warning: chapter {} skipped: {}", skipped.chapter, skipped.error);
    }
    let mut session = opened.session;
    log::debug!(
        "opened {} questions in {} sections from {}",
        session.content().len(),
        session.sections().sections().len(),
        parsed.source
    );

    match cmd {
        Command::Sections => {
            print_sections(&session);
            Ok(())
        }
        Command::Run => {
            let requested = parsed.section.trim();
            let selection = session.select_section(requested).clone();
            if !requested.is_empty() && selection.id() != requested {
                eprintln!("unknown section {:?}; using all sections", parsed.section);
            }
            session.start(parsed.randomize)?;

            let summary = session.section_summary();
            if let Some(title) = &summary.title {
                println!("Section: {title} ({}/{})", summary.count, summary.total);
            }

            let stdin = io::stdin();
            let mut terminal = Terminal {
                input: stdin.lock(),
                output: io::stdout(),
            };
            terminal.play(&mut session)
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
