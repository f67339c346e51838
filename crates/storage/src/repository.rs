use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coach_core::model::{Session, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for per-user quiz sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fetch the session for a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_session(&self, user_id: UserId) -> Result<Option<Session>, StorageError>;

    /// Store a session for a user that has none yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the user already has a session.
    async fn create_session(&self, session: &Session) -> Result<(), StorageError>;

    /// Overwrite an existing session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user has no session.
    async fn update_session(&self, session: &Session) -> Result<(), StorageError>;

    /// Replace whatever the user had with a fresh session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn reset_session(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Session, StorageError>;

    /// Drop sessions last active before `cutoff`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be updated.
    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError>;
}

/// Simple in-memory repository; sessions live for the process lifetime.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sessions: Arc<Mutex<HashMap<UserId, Session>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, Session>>, StorageError> {
        self.sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn get_session(&self, user_id: UserId) -> Result<Option<Session>, StorageError> {
        Ok(self.guard()?.get(&user_id).cloned())
    }

    async fn create_session(&self, session: &Session) -> Result<(), StorageError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&session.user_id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(session.user_id(), session.clone());
        Ok(())
    }

    async fn update_session(&self, session: &Session) -> Result<(), StorageError> {
        let mut guard = self.guard()?;
        let slot = guard
            .get_mut(&session.user_id())
            .ok_or(StorageError::NotFound)?;
        *slot = session.clone();
        Ok(())
    }

    async fn reset_session(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Session, StorageError> {
        let mut guard = self.guard()?;
        let session = guard
            .entry(user_id)
            .and_modify(|session| session.reset(now))
            .or_insert_with(|| Session::new(user_id, now));
        Ok(session.clone())
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        let mut guard = self.guard()?;
        let before = guard.len();
        guard.retain(|_, session| session.last_active_at() >= cutoff);
        Ok(before - guard.len())
    }
}

/// Session store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let sessions: Arc<dyn SessionRepository> = Arc::new(InMemoryRepository::new());
        Self { sessions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use coach_core::model::PracticeMode;
    use coach_core::time::fixed_now;

    #[tokio::test]
    async fn create_then_update_round_trips() {
        let repo = InMemoryRepository::new();
        let mut session = Session::new(UserId::new(1), fixed_now());
        repo.create_session(&session).await.unwrap();

        session.set_mode(PracticeMode::Easy);
        session.record_practice_points(1);
        repo.update_session(&session).await.unwrap();

        let fetched = repo.get_session(UserId::new(1)).await.unwrap().unwrap();
        assert_eq!(fetched, session);
    }

    #[tokio::test]
    async fn create_twice_conflicts_and_update_missing_fails() {
        let repo = InMemoryRepository::new();
        let session = Session::new(UserId::new(1), fixed_now());
        repo.create_session(&session).await.unwrap();

        let err = repo.create_session(&session).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));

        let stranger = Session::new(UserId::new(2), fixed_now());
        let err = repo.update_session(&stranger).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn reset_replaces_existing_session() {
        let repo = InMemoryRepository::new();
        let mut session = Session::new(UserId::new(5), fixed_now());
        session.record_practice_points(2);
        repo.create_session(&session).await.unwrap();

        let fresh = repo.reset_session(UserId::new(5), fixed_now()).await.unwrap();
        assert_eq!(fresh.max_score(), 0);
        let stored = repo.get_session(UserId::new(5)).await.unwrap().unwrap();
        assert_eq!(stored, fresh);
    }

    #[tokio::test]
    async fn evicts_only_idle_sessions() {
        let repo = InMemoryRepository::new();
        let old = Session::new(UserId::new(1), fixed_now() - Duration::hours(2));
        let recent = Session::new(UserId::new(2), fixed_now());
        repo.create_session(&old).await.unwrap();
        repo.create_session(&recent).await.unwrap();

        let removed = repo
            .evict_idle(fixed_now() - Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(repo.get_session(UserId::new(1)).await.unwrap().is_none());
        assert!(repo.get_session(UserId::new(2)).await.unwrap().is_some());
    }
}
