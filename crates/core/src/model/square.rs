use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised when a coordinate falls outside the quizzed back ranks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BoardError {
    #[error("invalid square: file {file:?}, rank {rank}")]
    InvalidSquare { file: char, rank: u8 },

    #[error("cannot parse square from {0:?}")]
    Unparseable(String),
}

//
// ─── FILE ─────────────────────────────────────────────────────────────────────
//

/// Column `a`..`h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    /// Parses a file letter, accepting either case.
    #[must_use]
    pub fn from_char(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'a' => Some(File::A),
            'b' => Some(File::B),
            'c' => Some(File::C),
            'd' => Some(File::D),
            'e' => Some(File::E),
            'f' => Some(File::F),
            'g' => Some(File::G),
            'h' => Some(File::H),
            _ => None,
        }
    }

    /// Lower-case letter for this file.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            File::A => 'a',
            File::B => 'b',
            File::C => 'c',
            File::D => 'd',
            File::E => 'e',
            File::F => 'f',
            File::G => 'g',
            File::H => 'h',
        }
    }
}

//
// ─── RANK ─────────────────────────────────────────────────────────────────────
//

/// Back rank being quizzed. Ranks 2..=7 are never asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    /// White's back rank.
    First,
    /// Black's back rank.
    Eighth,
}

impl Rank {
    pub const ALL: [Rank; 2] = [Rank::First, Rank::Eighth];

    #[must_use]
    pub fn from_number(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Rank::First),
            8 => Some(Rank::Eighth),
            _ => None,
        }
    }

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Rank::First => 1,
            Rank::Eighth => 8,
        }
    }
}

//
// ─── SQUARE ───────────────────────────────────────────────────────────────────
//

/// A back-rank coordinate such as `d1` or `g8`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    file: File,
    rank: Rank,
}

impl Square {
    #[must_use]
    pub fn from_parts(file: File, rank: Rank) -> Self {
        Self { file, rank }
    }

    /// Builds a square from a raw file letter and rank number.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::InvalidSquare` unless the file is `a..=h` and the
    /// rank is 1 or 8.
    pub fn new(file: char, rank: u8) -> Result<Self, BoardError> {
        match (File::from_char(file), Rank::from_number(rank)) {
            (Some(file), Some(rank)) => Ok(Self { file, rank }),
            _ => Err(BoardError::InvalidSquare { file, rank }),
        }
    }

    #[must_use]
    pub fn file(&self) -> File {
        self.file
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Lower-case coordinate, the form used for storage (`d1`).
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}{}", self.file.as_char(), self.rank.number())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.code())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.file.as_char().to_ascii_uppercase(),
            self.rank.number()
        )
    }
}

impl FromStr for Square {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(BoardError::Unparseable(s.to_string()));
        };
        let rank = rank
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| BoardError::Unparseable(s.to_string()))?;
        Square::new(file, rank)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
