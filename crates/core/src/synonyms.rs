//! Accepted spellings for colors and pieces.
//!
//! Tables are plain data; new spellings go here without touching the
//! classification code. Keys are lower-case.

use crate::model::{ColorCode, PieceKind};

pub const COLOR_SYNONYMS: &[(&str, ColorCode)] = &[
    ("б", ColorCode::White),
    ("белый", ColorCode::White),
    ("белая", ColorCode::White),
    ("белые", ColorCode::White),
    ("ч", ColorCode::Black),
    ("черный", ColorCode::Black),
    ("черная", ColorCode::Black),
    ("черные", ColorCode::Black),
    ("white", ColorCode::White),
    ("black", ColorCode::Black),
    ("w", ColorCode::White),
    ("b", ColorCode::Black),
];

pub const PIECE_SYNONYMS: &[(&str, PieceKind)] = &[
    ("л", PieceKind::Rook),
    ("ладья", PieceKind::Rook),
    ("тура", PieceKind::Rook),
    ("rook", PieceKind::Rook),
    ("к", PieceKind::Knight),
    ("конь", PieceKind::Knight),
    ("кн", PieceKind::Knight),
    ("horse", PieceKind::Knight),
    ("knight", PieceKind::Knight),
    ("с", PieceKind::Bishop),
    ("слон", PieceKind::Bishop),
    ("bishop", PieceKind::Bishop),
    ("ф", PieceKind::Queen),
    ("ферзь", PieceKind::Queen),
    ("королева", PieceKind::Queen),
    ("queen", PieceKind::Queen),
    ("кр", PieceKind::King),
    ("король", PieceKind::King),
    ("king", PieceKind::King),
];

/// Looks up `token` in a synonym table.
pub(crate) fn lookup<T: Copy>(table: &[(&str, T)], token: &str) -> Option<T> {
    table
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, value)| *value)
}
