// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Parses arguments
// with clap and delegates the work to Layer 2 (application).
// This is the only layer that prints to stdout.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use commands::{AskArgs, ChatArgs, Commands, StatusArgs, TrainArgs};

use crate::domain::prediction::ChatReply;
use crate::domain::traits::Responder;

#[derive(Parser, Debug)]
#[command(
    name = "finance-intent",
    version,
    about = "Classify finance questions into intents and answer with canned replies."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)  => run_train(args),
            Commands::Ask(args)    => run_ask(args),
            Commands::Chat(args)   => run_chat(args),
            Commands::Status(args) => run_status(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::{engine::IntentEngine, train_use_case::TrainUseCase};

    let use_case = TrainUseCase::new(args.into());
    let mut engine = IntentEngine::new();
    let report = use_case.execute(&mut engine)?;

    println!(
        "Trained on {} examples ({} tokens, {} intents, {} epochs).",
        report.examples, report.vocabulary_size, report.intent_count, report.epochs
    );
    if let Some(last) = report.last() {
        println!("Final loss {:.4}, accuracy {:.1}%", last.loss, last.accuracy * 100.0);
    }
    println!("Model saved to {}", use_case.config().model_path);
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<()> {
    use crate::application::ask_use_case::AskUseCase;

    let use_case = AskUseCase::new(args.paths.into(), args.threshold)?;
    print_reply(&use_case.answer(&args.message)?);
    Ok(())
}

fn run_chat(args: ChatArgs) -> Result<()> {
    use crate::application::ask_use_case::AskUseCase;

    let use_case = AskUseCase::new(args.paths.into(), args.threshold)?;
    chat_loop(&use_case, io::stdin().lock(), io::stdout().lock())
}

/// Answer each non-blank input line until EOF or "quit".
fn chat_loop<R: Responder>(responder: &R, input: impl BufRead, mut out: impl Write) -> Result<()> {
    writeln!(out, "Ask me about investing, budgeting, retirement... (\"quit\" to exit)")?;
    for line in input.lines() {
        let line = line?;
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("quit") || message.eq_ignore_ascii_case("exit") {
            break;
        }
        let reply = responder.respond(message)?;
        writeln!(out, "{}  [{} {:.0}%]", reply.response, reply.intent, reply.confidence * 100.0)?;
    }
    Ok(())
}

fn run_status(args: StatusArgs) -> Result<()> {
    use crate::application::engine::IntentEngine;

    let mut engine = IntentEngine::new();
    match engine.load(&args.model) {
        Ok(()) => {
            println!("model_loaded: true");
            if let Some(model) = engine.snapshot() {
                println!("vocabulary:   {}", model.vocabulary().len());
                println!("hidden:       {}", model.hidden_size());
                println!("intents:      {}", model.labels().labels().join(", "));
            }
        }
        Err(e) => {
            tracing::debug!("Status check failed: {e}");
            println!("model_loaded: false ({e})");
        }
    }
    Ok(())
}

fn print_reply(reply: &ChatReply) {
    println!("\nAnswer: {}", reply.response);
    println!("Intent: {} (confidence {:.4})", reply.intent, reply.confidence);
}
