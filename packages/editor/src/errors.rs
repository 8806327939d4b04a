//! Error types for the editor

use crate::ai::AiAction;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Container error: {0}")]
    Container(#[from] crate::container::ContainerError),

    #[error("Fragment error: {0}")]
    Fragment(#[from] crate::fragments::FragmentError),

    #[error("AI action already running: {0}")]
    AiBusy(AiAction),

    #[error("Unknown AI task: {0}")]
    UnknownAiTask(String),

    #[error("Document is not file-backed")]
    NotFileBacked,
}
