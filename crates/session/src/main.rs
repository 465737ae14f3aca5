//! `rehearse` -- terminal front end for an interview rehearsal session.
//!
//! Fetches a practice question, submits a recorded answer to the analysis
//! service and prints the feedback, or opens the chat screen when run with
//! `--chat`.
//!
//! # Environment variables
//!
//! | Variable                        | Required | Default                 | Description                          |
//! |---------------------------------|----------|-------------------------|--------------------------------------|
//! | `ANALYSIS_API_URL`              | no       | `http://localhost:5000` | Analysis service base URL            |
//! | `ANALYSIS_REQUEST_TIMEOUT_SECS` | no       | --                      | Per-request HTTP timeout             |
//! | `SUBMISSION_TIMEOUT_SECS`       | no       | `300`                   | Upper bound on one submission cycle  |
//! | `REHEARSAL_WORKFLOW`            | no       | `feedback`              | `feedback` or `chat`                 |

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rehearsal_analysis::{AnalysisApi, AnalysisService, ApiConfig};
use rehearsal_core::Origin;
use rehearsal_session::{
    InterviewSession, SessionConfig, StageError, SubmissionState, WorkflowVariant,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Chat command that returns to the upload screen.
const CMD_BACK: &str = "/back";
/// Chat command that ends the program.
const CMD_QUIT: &str = "/quit";

#[derive(Debug, Parser)]
#[command(name = "rehearse", version, about = "Rehearse interview answers")]
struct Cli {
    /// Analysis service base URL; overrides ANALYSIS_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and print one practice question.
    Question,
    /// Submit a recorded answer.
    Submit {
        /// Video file to upload.
        path: PathBuf,
        /// Open the chat screen after upload instead of fetching feedback.
        #[arg(long)]
        chat: bool,
        /// Skip fetching a practice question first.
        #[arg(long)]
        no_question: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rehearsal_session=info,rehearsal_analysis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut api_config = ApiConfig::from_env()?;
    if let Some(url) = cli.api_url {
        api_config.base_url = url.trim_end_matches('/').to_string();
    }
    let session_config = SessionConfig::from_env()?;
    tracing::info!(
        api_url = %api_config.base_url,
        submission_timeout_secs = session_config.submission_timeout.as_secs(),
        "Loaded configuration",
    );

    let service: Arc<dyn AnalysisService> = Arc::new(AnalysisApi::from_config(&api_config)?);

    match cli.command {
        Command::Question => {
            let session = InterviewSession::new(service, session_config);
            let question = session.fetch_question().await?;
            println!("{}", question.text);
        }
        Command::Submit {
            path,
            chat,
            no_question,
        } => {
            let config = if chat {
                session_config.with_variant(WorkflowVariant::Chat)
            } else {
                session_config
            };
            let session = InterviewSession::new(service, config);
            if !no_question {
                // A missing question does not block the submission.
                if let Ok(question) = session.fetch_question().await {
                    println!("Question: {}\n", question.text);
                }
            }
            run_submission(&session, &path).await?;
        }
    }

    Ok(())
}

/// Stage the file, submit it, and show the result. Offers a retry when the
/// cycle fails.
async fn run_submission(session: &InterviewSession, path: &std::path::Path) -> anyhow::Result<()> {
    match session.stage_path(path) {
        Ok(asset) => println!("Staged {} ({} bytes)", asset.display_name(), asset.len()),
        Err(StageError::Invalid(e)) => {
            eprintln!("{}", e.user_message());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("Submitting...");
        let submit = session.submit();
        tokio::pin!(submit);
        let state = tokio::select! {
            result = &mut submit => result?,
            _ = tokio::signal::ctrl_c() => {
                session.cancel_submission();
                submit.await?
            }
        };

        match state {
            SubmissionState::Succeeded => break,
            SubmissionState::Failed { reason, .. } => {
                eprintln!("Submission failed: {reason}");
                eprint!("Retry? [y/N] ");
                let answer = stdin.next_line().await?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("y") {
                    session.retry()?;
                    continue;
                }
                return Ok(());
            }
            other => anyhow::bail!("submission ended in unexpected state '{other}'"),
        }
    }

    match session.variant() {
        WorkflowVariant::Feedback => {
            match session.feedback() {
                Some(report) => {
                    println!("\nYour Personalized Feedback\n");
                    print!("{}", report.render_text());
                }
                None => println!("No feedback was returned."),
            }
            Ok(())
        }
        WorkflowVariant::Chat => chat_loop(session, &mut stdin).await,
    }
}

async fn chat_loop<R>(
    session: &InterviewSession,
    stdin: &mut tokio::io::Lines<R>,
) -> anyhow::Result<()>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    for message in session.transcript() {
        print_message(message.origin, &message.text);
    }
    println!("(type {CMD_BACK} to start over, {CMD_QUIT} to exit)");

    while let Some(line) = stdin.next_line().await? {
        match line.trim() {
            CMD_QUIT => break,
            CMD_BACK => {
                session.reset()?;
                println!("Back to upload. Run `rehearse submit` with a new file.");
                break;
            }
            _ => {
                if session.send_chat(&line) {
                    if let Some(message) = session.transcript().last() {
                        print_message(message.origin, &message.text);
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_message(origin: Origin, text: &str) {
    match origin {
        Origin::System => println!("[system] {text}"),
        Origin::User => println!("[you] {text}"),
    }
}
