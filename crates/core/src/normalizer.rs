//! Free-form answer parsing.
//!
//! Answers may name the color and the piece in either order, abbreviate
//! either, or name only one of them. Nothing here fails: unknown words just
//! leave the corresponding dimension unresolved.

use crate::model::{ColorCode, PieceKind};
use crate::synonyms::{COLOR_SYNONYMS, PIECE_SYNONYMS, lookup};

/// Result of parsing a user's answer. Either side may be unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedAnswer {
    pub color: Option<ColorCode>,
    pub piece: Option<PieceKind>,
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}

/// Classifies a token as a color.
#[must_use]
pub fn classify_color(token: &str) -> Option<ColorCode> {
    lookup(COLOR_SYNONYMS, &normalize(token))
}

/// Classifies a token as a piece kind.
#[must_use]
pub fn classify_piece(token: &str) -> Option<PieceKind> {
    lookup(PIECE_SYNONYMS, &normalize(token))
}

/// Parses a raw answer into its color and piece parts.
///
/// With two or more words the last word is taken as the piece and the rest
/// as the color. The color is retried on the piece word to accept reversed
/// order, and each unresolved side finally falls back to the first word that
/// matches it.
#[must_use]
pub fn parse_answer(raw: &str) -> ParsedAnswer {
    let lowered = normalize(raw);
    let parts: Vec<&str> = lowered.split_whitespace().collect();

    let (color_input, piece_input) = match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() => (rest.join(" "), (*last).to_string()),
        _ => (lowered.clone(), lowered.clone()),
    };

    let mut color = classify_color(&color_input).or_else(|| classify_color(&piece_input));
    let mut piece = classify_piece(&piece_input);

    if color.is_none() {
        color = parts.iter().find_map(|word| classify_color(word));
    }
    if piece.is_none() {
        piece = parts.iter().find_map(|word| classify_piece(word));
    }

    ParsedAnswer { color, piece }
}
