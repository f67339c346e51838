use serde::{Deserialize, Serialize};

use crate::board::piece_fact_for;
use crate::model::{PieceFact, Square};

/// An open question: the square shown to the user and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub square: Square,
    pub fact: PieceFact,
}

impl Question {
    #[must_use]
    pub fn for_square(square: Square) -> Self {
        Self {
            square,
            fact: piece_fact_for(square),
        }
    }
}
