//! Shared error types for the services crate.

use thiserror::Error;

use coach_core::model::BoardError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `CoachService`.
///
/// Quiz mistakes and missing questions are not errors; they are answered
/// with a reply. Only the session store can fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoachError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while building a question source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("scripted question source needs at least one square")]
    EmptyScript,
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
