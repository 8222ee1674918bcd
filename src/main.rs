use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use learnwise::{
    app_state::AppState,
    config::{Config, SyllabusStrategy},
    errors::{AppError, AppResult, ErrorResponse},
    models::domain::QuizQuestion,
    services::{progress_service::ProgressService, syllabus_service::SyllabusService},
};

/// Syllabus, quiz and tutoring assistant backed by a chat model.
#[derive(Parser)]
#[command(name = "learnwise", about = "Generate syllabi and quizzes, tutor, and answer from your PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a course syllabus for a topic.
    Syllabus {
        topic: String,
        /// Free-form task; defaults to "Generate a course syllabus to teach the topic: <topic>".
        #[arg(long)]
        task: Option<String>,
        /// Override SYLLABUS_STRATEGY (negotiated or single_call).
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Generate a multiple-choice quiz.
    Quiz {
        topic: String,
        #[arg(long, default_value = "medium")]
        difficulty: String,
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// Answer the quiz interactively; the score is saved to your progress.
        #[arg(long)]
        take: bool,
    },
    /// Show saved progress per topic.
    Progress {
        /// Limit the quiz history to one topic.
        topic: Option<String>,
        /// List every recorded quiz result as well.
        #[arg(long)]
        history: bool,
    },
    /// Add PDF documents to the retrieval index.
    Ingest {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Answer a question from the ingested documents.
    Ask {
        question: String,
        /// Print the chunks the answer was based on.
        #[arg(long)]
        sources: bool,
    },
    /// Generate a syllabus, then chat with an instructor who teaches from it.
    Tutor {
        topic: String,
        /// Use an existing syllabus file instead of generating one.
        #[arg(long)]
        syllabus: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let response = ErrorResponse::from(&err);
        match serde_json::to_string_pretty(&response) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", err),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = Config::from_env();

    match cli.command {
        Command::Syllabus {
            topic,
            task,
            strategy,
        } => {
            if let Some(strategy) = strategy {
                config.syllabus_strategy = parse_strategy(&strategy)?;
            }
            let state = AppState::new(config);
            let task = task.unwrap_or_else(|| SyllabusService::default_task(&topic));
            let syllabus = state.syllabus_service.generate_syllabus(&topic, &task).await?;
            println!("{}", syllabus);
        }
        Command::Quiz {
            topic,
            difficulty,
            count,
            take,
        } => {
            let state = AppState::new(config);
            let progress_service = if take {
                Some(state.connect_progress().await?)
            } else {
                None
            };
            let questions = state
                .quiz_service
                .generate_quiz(&topic, &difficulty, count)
                .await?;
            if let Some(progress_service) = progress_service {
                take_quiz(&progress_service, &topic, &questions).await?;
            } else {
                let json = serde_json::to_string_pretty(&questions)
                    .map_err(|e| AppError::InternalError(e.to_string()))?;
                println!("{}", json);
            }
        }
        Command::Progress { topic, history } => {
            let progress_service = AppState::new(config).connect_progress().await?;
            let rows = progress_service.progress().await?;
            if rows.is_empty() {
                println!("No progress recorded yet.");
            }
            for row in rows
                .iter()
                .filter(|row| topic.as_deref().map_or(true, |topic| row.topic == topic))
            {
                println!(
                    "{}: {:.0}% (updated {})",
                    row.topic,
                    row.completed_percent,
                    row.last_updated.format("%Y-%m-%d %H:%M")
                );
            }
            if history {
                for result in progress_service.history(topic.as_deref()).await? {
                    println!(
                        "  {} {}: {}/{} ({:.0}%)",
                        result.created_at.format("%Y-%m-%d %H:%M"),
                        result.topic,
                        result.correct,
                        result.total,
                        result.score
                    );
                }
            }
        }
        Command::Ingest { paths } => {
            let retrieval = AppState::new(config).connect_retrieval().await?;
            for path in paths {
                let added = retrieval.ingest(&path).await?;
                println!("{}: {} chunks added", path.display(), added);
            }
        }
        Command::Ask { question, sources } => {
            let retrieval = AppState::new(config).connect_retrieval().await?;
            if sources {
                let answer = retrieval.query_with_sources(&question).await?;
                println!("{}\n", answer.answer);
                for source in answer.sources {
                    println!(
                        "[{} #{} score {:.3}]",
                        source.chunk.source, source.chunk.position, source.score
                    );
                }
            } else {
                println!("{}", retrieval.query(&question).await?);
            }
        }
        Command::Tutor { topic, syllabus } => {
            let state = AppState::new(config);
            let syllabus = match syllabus {
                Some(path) => tokio::fs::read_to_string(&path).await.map_err(|e| {
                    AppError::ValidationError(format!("Cannot read {}: {}", path.display(), e))
                })?,
                None => {
                    let task = SyllabusService::default_task(&topic);
                    state.syllabus_service.generate_syllabus(&topic, &task).await?
                }
            };
            tutor(&state, &topic, &syllabus).await?;
        }
    }

    Ok(())
}

fn parse_strategy(value: &str) -> AppResult<SyllabusStrategy> {
    SyllabusStrategy::parse(value).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Unknown syllabus strategy '{}'; expected 'negotiated' or 'single_call'",
            value
        ))
    })
}

/// Line-oriented stdin/stdout for the interactive commands.
struct Console {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: tokio::io::stdout(),
        }
    }

    /// Prints `prompt` and reads one trimmed line; `None` at end of input.
    async fn prompt(&mut self, prompt: &str) -> AppResult<Option<String>> {
        self.stdout.write_all(prompt.as_bytes()).await.map_err(io_error)?;
        self.stdout.flush().await.map_err(io_error)?;

        let line = self.lines.next_line().await.map_err(io_error)?;
        Ok(line.map(|line| line.trim().to_string()))
    }
}

fn io_error(err: std::io::Error) -> AppError {
    AppError::InternalError(format!("Console I/O failed: {}", err))
}

fn parse_choice(input: &str) -> Option<u8> {
    match input.to_ascii_lowercase().as_str() {
        "a" | "1" => Some(0),
        "b" | "2" => Some(1),
        "c" | "3" => Some(2),
        "d" | "4" => Some(3),
        _ => None,
    }
}

async fn take_quiz(
    progress_service: &ProgressService,
    topic: &str,
    questions: &[QuizQuestion],
) -> AppResult<()> {
    let mut console = Console::new();
    let mut answers = Vec::with_capacity(questions.len());

    for (index, question) in questions.iter().enumerate() {
        println!("\n{}. {}", index + 1, question.question);
        for (letter, choice) in ["a", "b", "c", "d"].iter().zip(&question.choices) {
            println!("   {}) {}", letter, choice);
        }
        let answer = loop {
            match console.prompt("Your answer (a-d): ").await? {
                Some(input) => match parse_choice(&input) {
                    Some(choice) => break choice,
                    None => println!("Please answer with a, b, c or d."),
                },
                None => return Ok(()),
            }
        };
        answers.push(answer);
    }

    let report = progress_service.submit(topic, questions, &answers).await?;

    println!(
        "\nScore: {}/{} ({:.0}%). Progress on {}: {:.0}%",
        report.score.correct,
        report.score.total,
        report.score.score,
        report.progress.topic,
        report.progress.completed_percent
    );
    Ok(())
}

async fn tutor(state: &AppState, topic: &str, syllabus: &str) -> AppResult<()> {
    const SESSION_ID: &str = "cli";

    state.teaching_service.seed(SESSION_ID, syllabus, topic).await?;
    println!("{}\n", syllabus);
    println!("Ask your instructor anything about {}. An empty line ends the session.", topic);

    let mut console = Console::new();
    while let Some(message) = console.prompt("> ").await? {
        if message.is_empty() {
            break;
        }
        let reply = state.teaching_service.chat(SESSION_ID, &message).await?;
        println!("{}\n", reply);
    }

    state.teaching_service.end(SESSION_ID).await;
    Ok(())
}
