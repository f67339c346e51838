use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coach_core::model::{Session, UserId};

use super::SqliteRepository;
use super::mapping::{SessionColumns, map_session_row, user_id_to_i64};
use crate::repository::{SessionRepository, StorageError};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

const UPSERT_SESSION: &str = r"
    INSERT INTO sessions (
        user_id, mode, score, max_score, flow,
        test_asked, test_correct, pending_square, last_active_at
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(user_id) DO UPDATE SET
        mode = excluded.mode,
        score = excluded.score,
        max_score = excluded.max_score,
        flow = excluded.flow,
        test_asked = excluded.test_asked,
        test_correct = excluded.test_correct,
        pending_square = excluded.pending_square,
        last_active_at = excluded.last_active_at
";

impl SqliteRepository {
    async fn upsert(&self, session: &Session) -> Result<(), StorageError> {
        let cols = SessionColumns::from_session(session);
        sqlx::query(UPSERT_SESSION)
            .bind(user_id_to_i64(session.user_id())?)
            .bind(cols.mode)
            .bind(cols.score)
            .bind(cols.max_score)
            .bind(cols.flow)
            .bind(cols.test_asked)
            .bind(cols.test_correct)
            .bind(cols.pending_square)
            .bind(session.last_active_at())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn get_session(&self, user_id: UserId) -> Result<Option<Session>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    user_id, mode, score, max_score, flow,
                    test_asked, test_correct, pending_square, last_active_at
                FROM sessions
                WHERE user_id = ?1
            ",
        )
        .bind(user_id_to_i64(user_id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn create_session(&self, session: &Session) -> Result<(), StorageError> {
        let cols = SessionColumns::from_session(session);
        let res = sqlx::query(
            r"
                INSERT INTO sessions (
                    user_id, mode, score, max_score, flow,
                    test_asked, test_correct, pending_square, last_active_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(user_id_to_i64(session.user_id())?)
        .bind(cols.mode)
        .bind(cols.score)
        .bind(cols.max_score)
        .bind(cols.flow)
        .bind(cols.test_asked)
        .bind(cols.test_correct)
        .bind(cols.pending_square)
        .bind(session.last_active_at())
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StorageError::Conflict)
            }
            Err(e) => Err(conn(e)),
        }
    }

    async fn update_session(&self, session: &Session) -> Result<(), StorageError> {
        let cols = SessionColumns::from_session(session);
        let res = sqlx::query(
            r"
                UPDATE sessions SET
                    mode = ?2,
                    score = ?3,
                    max_score = ?4,
                    flow = ?5,
                    test_asked = ?6,
                    test_correct = ?7,
                    pending_square = ?8,
                    last_active_at = ?9
                WHERE user_id = ?1
            ",
        )
        .bind(user_id_to_i64(session.user_id())?)
        .bind(cols.mode)
        .bind(cols.score)
        .bind(cols.max_score)
        .bind(cols.flow)
        .bind(cols.test_asked)
        .bind(cols.test_correct)
        .bind(cols.pending_square)
        .bind(session.last_active_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn reset_session(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Session, StorageError> {
        let session = Session::new(user_id, now);
        self.upsert(&session).await?;
        Ok(session)
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        let res = sqlx::query("DELETE FROM sessions WHERE last_active_at < ?1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        usize::try_from(res.rows_affected())
            .map_err(|_| StorageError::Serialization("evicted count overflow".into()))
    }
}
