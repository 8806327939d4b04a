//! # AI Task Channel
//!
//! Text generation runs outside the editing loop. A request carries a
//! correlation id; its completion comes back on a channel and is applied
//! only if the session context that issued it is still current.
//!
//! ```text
//! EditSession::request_ai ──▶ AiRequest::run (async) ──▶ AiCompletion
//!        ▲                                                    │
//!        └──────────────── EditSession::poll_ai ◀─────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Failure reported by the text service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiServiceError {
    #[error("AI service unavailable: {0}")]
    Unavailable(String),

    #[error("AI service rejected the request: {0}")]
    Rejected(String),
}

/// External text generation collaborator
pub trait TextService: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        structured_output: bool,
    ) -> impl Future<Output = Result<String, AiServiceError>> + Send;
}

/// User-facing AI actions. Each has its own busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiAction {
    Continue,
    Polish,
    Summarize,
}

impl AiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiAction::Continue => "continue",
            AiAction::Polish => "polish",
            AiAction::Summarize => "summarize",
        }
    }

    /// Whether the service should answer in structured form
    pub fn structured_output(&self) -> bool {
        matches!(self, AiAction::Summarize)
    }
}

impl std::fmt::Display for AiAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issued request, ready to run against a service
#[derive(Debug, Clone, PartialEq)]
pub struct AiRequest {
    pub id: String,
    pub action: AiAction,
    pub prompt: String,
}

/// Result posted back to the session
#[derive(Debug, Clone, PartialEq)]
pub struct AiCompletion {
    pub id: String,
    pub result: Result<String, AiServiceError>,
}

pub type AiSender = UnboundedSender<AiCompletion>;
pub type AiReceiver = UnboundedReceiver<AiCompletion>;

impl AiRequest {
    /// Await the service and post the completion
    pub async fn run<S: TextService>(self, service: &S, sender: AiSender) {
        let result = service
            .generate(&self.prompt, self.action.structured_output())
            .await;

        if sender.send(AiCompletion { id: self.id, result }).is_err() {
            debug!("AI completion dropped: session is gone");
        }
    }
}

/// Why a completion was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The session left the context that issued the request
    ContextChanged,
    /// The node the result was meant for no longer exists
    TargetMissing,
    /// The service returned only whitespace
    EmptyResult,
}

/// What happened to a completion
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome {
    Applied { id: String, created: Vec<String> },
    Discarded { id: String, reason: DiscardReason },
    Failed { id: String, message: String },
}

impl AiOutcome {
    pub fn id(&self) -> &str {
        match self {
            AiOutcome::Applied { id, .. }
            | AiOutcome::Discarded { id, .. }
            | AiOutcome::Failed { id, .. } => id,
        }
    }
}

/// Split generated text into paragraph texts
pub fn paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
