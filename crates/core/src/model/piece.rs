use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of pieces that start on a back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Canonical Russian name shown in feedback.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Rook => "ладья",
            PieceKind::Knight => "конь",
            PieceKind::Bishop => "слон",
            PieceKind::Queen => "ферзь",
            PieceKind::King => "король",
        }
    }

    /// Unicode glyph for the piece.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Rook => '♖',
            PieceKind::Knight => '♘',
            PieceKind::Bishop => '♗',
            PieceKind::Queen => '♕',
            PieceKind::King => '♔',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Side that owns a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorCode {
    White,
    Black,
}

impl ColorCode {
    /// Single-letter code used in answers and feedback (`Б` / `Ч`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ColorCode::White => "Б",
            ColorCode::Black => "Ч",
        }
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Ground truth for a quizzed square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceFact {
    pub kind: PieceKind,
    pub color: ColorCode,
    pub symbol: char,
}

impl PieceFact {
    #[must_use]
    pub fn new(kind: PieceKind, color: ColorCode) -> Self {
        Self {
            kind,
            color,
            symbol: kind.symbol(),
        }
    }

    /// Answer without the glyph, e.g. `Б ферзь`.
    #[must_use]
    pub fn short_answer(&self) -> String {
        format!("{} {}", self.color, self.kind)
    }
}

impl fmt::Display for PieceFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.color, self.kind, self.symbol)
    }
}
