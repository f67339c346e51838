mod ids;
mod piece;
mod question;
mod session;
mod square;

pub use ids::{ParseUserIdError, UserId};
pub use piece::{ColorCode, PieceFact, PieceKind};
pub use question::Question;
pub use session::{ActiveFlow, PracticeMode, Session, SessionStateError, TestRun};
pub use square::{BoardError, File, Rank, Square};
