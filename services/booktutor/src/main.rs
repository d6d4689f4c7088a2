//! Command-line front end for the book tutor.
//!
//! `ask` serves a single turn, `chat` keeps one session alive over stdin,
//! and `stats` describes the passage collection. Logs go to stderr so that
//! stdout carries only tutor output.

use anyhow::{Context, Result};
use booktutor_core::{Orchestrator, SessionState, agents::AgentContext, config::TutorConfig};
use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

mod render;

#[derive(Parser)]
#[command(name = "booktutor", version)]
#[command(about = "Multi-agent tutor for a single book: lessons, search and quizzes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question and print the answer
    Ask {
        query: String,
        /// Print the agents' activity log before the answer
        #[arg(long)]
        log: bool,
    },
    /// Start an interactive session (type `exit` or `quit` to leave)
    Chat {
        /// Print the agents' activity log before every answer
        #[arg(long)]
        log: bool,
    },
    /// Show statistics about the passage collection
    Stats,
}

async fn ask(ctx: AgentContext, query: &str, show_log: bool) -> Result<()> {
    let orchestrator = Orchestrator::new(ctx);
    let reply = orchestrator
        .process(query, &SessionState::new())
        .await
        .context("The tutor could not answer")?;
    println!("{}", render::reply(&reply, show_log));
    Ok(())
}

async fn chat(ctx: AgentContext, show_log: bool) -> Result<()> {
    println!(
        "📚 {} tutor. Ask to be taught, search the book, or take a quiz. Type `exit` to leave.",
        ctx.book.title
    );
    let orchestrator = Orchestrator::new(ctx);
    let mut session = SessionState::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
            break;
        }

        match orchestrator.process(&line, &session).await {
            Ok(reply) => {
                println!("\n{}", render::reply(&reply, show_log));
                session = reply.session;
            }
            Err(err) => {
                error!("Turn failed: {}", err);
                println!("\n⚠️  Sorry, I couldn't answer that: {}", err);
            }
        }
    }

    info!(
        sections_taught = session.teaching.section_index(),
        "Chat session ended."
    );
    println!("Goodbye!");
    Ok(())
}

async fn stats(ctx: AgentContext) -> Result<()> {
    let stats = ctx.retriever.stats().await;
    println!("{}", render::stats(&ctx.book.title, &stats));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = TutorConfig::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let ctx = AgentContext::from_config(&config).context("Failed to initialize tutoring agents")?;

    match cli.command {
        Commands::Ask { query, log } => ask(ctx, &query, log).await?,
        Commands::Chat { log } => chat(ctx, log).await?,
        Commands::Stats => stats(ctx).await?,
    }

    Ok(())
}
