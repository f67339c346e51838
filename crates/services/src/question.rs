//! Question generation.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use coach_core::model::{File, Question, Rank, Square};

use crate::error::QuestionSourceError;

/// Produces the next square to ask about.
pub trait QuestionSource: Send + Sync {
    fn next_question(&self) -> Question;
}

/// Uniform draw over the sixteen back-rank squares. Repeats are allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomQuestions;

impl QuestionSource for RandomQuestions {
    fn next_question(&self) -> Question {
        let mut rng = rand::rng();
        let file = File::ALL[rng.random_range(0..File::ALL.len())];
        let rank = Rank::ALL[rng.random_range(0..Rank::ALL.len())];
        Question::for_square(Square::from_parts(file, rank))
    }
}

/// Replays a fixed list of squares, wrapping around at the end.
#[derive(Debug)]
pub struct ScriptedQuestions {
    squares: Vec<Square>,
    cursor: AtomicUsize,
}

impl ScriptedQuestions {
    /// Build a script from coordinates such as `"d1"`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::EmptyScript` for an empty list and
    /// `QuestionSourceError::Board` for coordinates off the back ranks.
    pub fn from_codes(codes: &[&str]) -> Result<Self, QuestionSourceError> {
        let squares = codes
            .iter()
            .map(|code| code.parse::<Square>())
            .collect::<Result<Vec<_>, _>>()?;
        if squares.is_empty() {
            return Err(QuestionSourceError::EmptyScript);
        }
        Ok(Self {
            squares,
            cursor: AtomicUsize::new(0),
        })
    }
}

impl QuestionSource for ScriptedQuestions {
    fn next_question(&self) -> Question {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.squares.len();
        Question::for_square(self.squares[idx])
    }
}
