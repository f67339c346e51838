//! Static knowledge of the starting back ranks.

use crate::model::{ColorCode, File, PieceFact, PieceKind, Rank, Square};

/// Piece that starts on the given file. Identical for ranks 1 and 8.
#[must_use]
pub fn kind_for_file(file: File) -> PieceKind {
    match file {
        File::A | File::H => PieceKind::Rook,
        File::B | File::G => PieceKind::Knight,
        File::C | File::F => PieceKind::Bishop,
        File::D => PieceKind::Queen,
        File::E => PieceKind::King,
    }
}

/// Side whose pieces start on the given rank.
#[must_use]
pub fn color_for_rank(rank: Rank) -> ColorCode {
    match rank {
        Rank::First => ColorCode::White,
        Rank::Eighth => ColorCode::Black,
    }
}

/// Ground truth for a back-rank square.
#[must_use]
pub fn piece_fact_for(square: Square) -> PieceFact {
    PieceFact::new(kind_for_file(square.file()), color_for_rank(square.rank()))
}

/// Files grouped by piece kind, in the order they are listed for reference:
/// rooks, knights, bishops, queen, king.
#[must_use]
pub fn files_by_kind() -> [(PieceKind, &'static [File]); 5] {
    [
        (PieceKind::Rook, &[File::A, File::H]),
        (PieceKind::Knight, &[File::B, File::G]),
        (PieceKind::Bishop, &[File::C, File::F]),
        (PieceKind::Queen, &[File::D]),
        (PieceKind::King, &[File::E]),
    ]
}
