use coach_core::model::{
    ActiveFlow, PracticeMode, Question, Session, Square, TestRun, UserId,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn user_id_to_i64(id: UserId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("user_id overflow".into()))
}

fn user_id_from_i64(v: i64) -> Result<UserId, StorageError> {
    u64::try_from(v)
        .map(UserId::new)
        .map_err(|_| StorageError::Serialization("user_id sign overflow".into()))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Column values for one session row, in bind order after `user_id`.
pub(crate) struct SessionColumns {
    pub mode: Option<&'static str>,
    pub score: i64,
    pub max_score: i64,
    pub flow: &'static str,
    pub test_asked: i64,
    pub test_correct: i64,
    pub pending_square: Option<String>,
}

impl SessionColumns {
    pub(crate) fn from_session(session: &Session) -> Self {
        let (test_asked, test_correct) = match session.flow() {
            ActiveFlow::Test(run) => (i64::from(run.asked), i64::from(run.correct)),
            _ => (0, 0),
        };
        Self {
            mode: session.mode().map(PracticeMode::as_str),
            score: i64::from(session.score()),
            max_score: i64::from(session.max_score()),
            flow: session.flow().kind(),
            test_asked,
            test_correct,
            pending_square: session.flow().pending().map(|q| q.square.code()),
        }
    }
}

fn parse_flow(
    kind: &str,
    asked: u32,
    correct: u32,
    pending: Option<Question>,
) -> Result<ActiveFlow, StorageError> {
    match kind {
        "idle" => Ok(ActiveFlow::Idle),
        "practice" => Ok(ActiveFlow::Practice { pending }),
        "test" => Ok(ActiveFlow::Test(TestRun {
            asked,
            correct,
            pending,
        })),
        _ => Err(StorageError::Serialization(format!("invalid flow: {kind}"))),
    }
}

pub(crate) fn map_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<Session, StorageError> {
    let user_id = user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?;
    let mode = row
        .try_get::<Option<String>, _>("mode")
        .map_err(ser)?
        .map(|raw| PracticeMode::parse(&raw))
        .transpose()
        .map_err(ser)?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let max_score = u32_from_i64("max_score", row.try_get::<i64, _>("max_score").map_err(ser)?)?;
    let asked = u32_from_i64("test_asked", row.try_get::<i64, _>("test_asked").map_err(ser)?)?;
    let correct = u32_from_i64(
        "test_correct",
        row.try_get::<i64, _>("test_correct").map_err(ser)?,
    )?;
    let pending = row
        .try_get::<Option<String>, _>("pending_square")
        .map_err(ser)?
        .map(|raw| raw.parse::<Square>().map(Question::for_square))
        .transpose()
        .map_err(ser)?;
    let flow_kind: String = row.try_get("flow").map_err(ser)?;
    let flow = parse_flow(&flow_kind, asked, correct, pending)?;
    let last_active_at = row.try_get("last_active_at").map_err(ser)?;

    Session::from_persisted(user_id, mode, score, max_score, flow, last_active_at).map_err(ser)
}
