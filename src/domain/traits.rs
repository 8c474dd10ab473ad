// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits rather
// than the concrete loader or use case, so an alternative
// corpus source (an embedded corpus, a database table) or an
// alternative responder can be dropped in unchanged.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::intent::Corpus;
use crate::domain::prediction::ChatReply;
use crate::error::EngineError;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Anything that can produce a validated intents corpus.
///
/// Implementations:
///   - JsonCorpusLoader → reads an intents JSON file
pub trait CorpusSource {
    fn load_corpus(&self) -> Result<Corpus, EngineError>;
}

// ─── Responder ────────────────────────────────────────────────────────────────
/// Anything that can turn a user message into a chat reply.
///
/// Implementations:
///   - AskUseCase → classifies with the trained network
pub trait Responder {
    fn respond(&self, message: &str) -> Result<ChatReply>;
}
