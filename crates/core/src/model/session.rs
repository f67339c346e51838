use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{Question, UserId};
use crate::scoring::{MAX_POINTS_PER_QUESTION, TEST_LENGTH};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("score ({score}) exceeds max score ({max_score})")]
    ScoreExceedsMax { score: u32, max_score: u32 },

    #[error("max score ({0}) is not a whole number of questions")]
    UnevenMaxScore(u32),

    #[error("test asked {asked} questions, limit is {limit}")]
    TestOverrun { asked: u32, limit: u32 },

    #[error("test counted {correct} correct out of {asked} asked")]
    CorrectExceedsAsked { correct: u32, asked: u32 },

    #[error("unknown practice mode: {0}")]
    UnknownMode(String),
}

//
// ─── PRACTICE MODE ─────────────────────────────────────────────────────────────
//

/// How practice questions are presented. Scoring is the same for all modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    /// Coordinate plus a hint naming the side.
    Easy,
    /// Bare coordinate.
    Medium,
    /// Bare coordinate, answer expected on one line.
    Hard,
}

impl PracticeMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PracticeMode::Easy => "easy",
            PracticeMode::Medium => "medium",
            PracticeMode::Hard => "hard",
        }
    }

    /// Parses the storage form produced by [`PracticeMode::as_str`].
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::UnknownMode` for anything else.
    pub fn parse(raw: &str) -> Result<Self, SessionStateError> {
        match raw {
            "easy" => Ok(PracticeMode::Easy),
            "medium" => Ok(PracticeMode::Medium),
            "hard" => Ok(PracticeMode::Hard),
            other => Err(SessionStateError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── ACTIVE FLOW ───────────────────────────────────────────────────────────────
//

/// Progress of a running test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestRun {
    pub asked: u32,
    pub correct: u32,
    pub pending: Option<Question>,
}

impl TestRun {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.asked >= TEST_LENGTH
    }
}

/// Which flow currently owns the user's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActiveFlow {
    /// Waiting for a mode selection.
    #[default]
    Idle,
    Practice { pending: Option<Question> },
    Test(TestRun),
}

impl ActiveFlow {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ActiveFlow::Idle => "idle",
            ActiveFlow::Practice { .. } => "practice",
            ActiveFlow::Test(_) => "test",
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<&Question> {
        match self {
            ActiveFlow::Idle => None,
            ActiveFlow::Practice { pending } => pending.as_ref(),
            ActiveFlow::Test(run) => run.pending.as_ref(),
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Per-user quiz state.
///
/// `score`/`max_score` accumulate over every practice answer and are only
/// cleared by [`Session::reset`]. Test results never touch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: UserId,
    mode: Option<PracticeMode>,
    score: u32,
    max_score: u32,
    flow: ActiveFlow,
    last_active_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            mode: None,
            score: 0,
            max_score: 0,
            flow: ActiveFlow::Idle,
            last_active_at: now,
        }
    }

    /// Rehydrate a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` if the counters are inconsistent.
    pub fn from_persisted(
        user_id: UserId,
        mode: Option<PracticeMode>,
        score: u32,
        max_score: u32,
        flow: ActiveFlow,
        last_active_at: DateTime<Utc>,
    ) -> Result<Self, SessionStateError> {
        if score > max_score {
            return Err(SessionStateError::ScoreExceedsMax { score, max_score });
        }
        if max_score % MAX_POINTS_PER_QUESTION != 0 {
            return Err(SessionStateError::UnevenMaxScore(max_score));
        }
        if let ActiveFlow::Test(run) = &flow {
            if run.asked > TEST_LENGTH {
                return Err(SessionStateError::TestOverrun {
                    asked: run.asked,
                    limit: TEST_LENGTH,
                });
            }
            if run.correct > run.asked {
                return Err(SessionStateError::CorrectExceedsAsked {
                    correct: run.correct,
                    asked: run.asked,
                });
            }
        }

        Ok(Self {
            user_id,
            mode,
            score,
            max_score,
            flow,
            last_active_at,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn mode(&self) -> Option<PracticeMode> {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PracticeMode) {
        self.mode = Some(mode);
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    #[must_use]
    pub fn flow(&self) -> &ActiveFlow {
        &self.flow
    }

    pub fn set_flow(&mut self, flow: ActiveFlow) {
        self.flow = flow;
    }

    #[must_use]
    pub fn is_test_active(&self) -> bool {
        matches!(self.flow, ActiveFlow::Test(_))
    }

    #[must_use]
    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active_at = now;
    }

    /// Adds a practice result. The max always grows by a full question.
    pub fn record_practice_points(&mut self, points: u32) {
        let points = points.min(MAX_POINTS_PER_QUESTION);
        self.score = self.score.saturating_add(points);
        self.max_score = self.max_score.saturating_add(MAX_POINTS_PER_QUESTION);
    }

    /// Zeroes every counter and returns to mode selection.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(self.user_id, now);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
