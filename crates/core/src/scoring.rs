//! Scoring rules and result banding.

use crate::model::PieceFact;
use crate::normalizer::ParsedAnswer;

/// Points available for one practice question: one for the color, one for the piece.
pub const MAX_POINTS_PER_QUESTION: u32 = 2;

/// Number of questions in a test run.
pub const TEST_LENGTH: u32 = 10;

/// How a parsed answer compares to the ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Color and piece both right.
    Correct,
    /// Only the piece is right.
    PieceOnly,
    /// Only the color is right.
    ColorOnly,
    Wrong,
}

impl Verdict {
    #[must_use]
    pub fn judge(answer: &ParsedAnswer, fact: &PieceFact) -> Self {
        let color_ok = answer.color == Some(fact.color);
        let piece_ok = answer.piece == Some(fact.kind);
        match (color_ok, piece_ok) {
            (true, true) => Verdict::Correct,
            (false, true) => Verdict::PieceOnly,
            (true, false) => Verdict::ColorOnly,
            (false, false) => Verdict::Wrong,
        }
    }

    /// Partial-credit points used in practice.
    #[must_use]
    pub fn practice_points(self) -> u32 {
        match self {
            Verdict::Correct => 2,
            Verdict::PieceOnly | Verdict::ColorOnly => 1,
            Verdict::Wrong => 0,
        }
    }

    /// Tests only count fully correct answers.
    #[must_use]
    pub fn is_fully_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// `numerator / denominator` as a percentage; zero when nothing was counted.
#[must_use]
pub fn percentage(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    f64::from(numerator) * 100.0 / f64::from(denominator)
}

/// Comment tier for a finished test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Master,
    Good,
    Fair,
    NeedsPractice,
}

impl GradeBand {
    /// Lower edges are inclusive: 90, 70 and 50 percent.
    #[must_use]
    pub fn from_percentage(percent: f64) -> Self {
        if percent >= 90.0 {
            GradeBand::Master
        } else if percent >= 70.0 {
            GradeBand::Good
        } else if percent >= 50.0 {
            GradeBand::Fair
        } else {
            GradeBand::NeedsPractice
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            GradeBand::Master => "🏆",
            GradeBand::Good => "👍",
            GradeBand::Fair => "💪",
            GradeBand::NeedsPractice => "📚",
        }
    }

    #[must_use]
    pub fn comment(self) -> &'static str {
        match self {
            GradeBand::Master => "Отличный результат! Вы настоящий мастер!",
            GradeBand::Good => "Хороший результат!",
            GradeBand::Fair => "Неплохо, но можно лучше!",
            GradeBand::NeedsPractice => "Потренируйтесь еще!",
        }
    }
}
