//! What the core hands back to the chat transport.

use coach_core::model::PracticeMode;

//
// ─── BUTTON LABELS ─────────────────────────────────────────────────────────────
//

pub const LABEL_EASY: &str = "🎮 Легкий режим";
pub const LABEL_MEDIUM: &str = "🎯 Средний режим";
pub const LABEL_HARD: &str = "⚡ Сложный режим";
pub const LABEL_TEST: &str = "📝 Тест (10 вопросов)";
pub const LABEL_HELP: &str = "📚 Справка";
pub const LABEL_STATS: &str = "📊 Статистика";
pub const LABEL_FINISH: &str = "🏁 Завершить";
pub const LABEL_NEXT: &str = "🔄 Еще вопрос";

const MAIN_MENU_ROWS: &[&[&str]] = &[
    &[LABEL_EASY, LABEL_MEDIUM],
    &[LABEL_HARD, LABEL_TEST],
    &[LABEL_HELP, LABEL_STATS],
];

const ANSWER_ROWS: &[&[&str]] = &[&[LABEL_FINISH, LABEL_NEXT]];

/// Buttons to show under a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    MainMenu,
    AnswerControls,
    /// Free-text input only.
    None,
}

impl Keyboard {
    #[must_use]
    pub fn rows(self) -> &'static [&'static [&'static str]] {
        match self {
            Keyboard::MainMenu => MAIN_MENU_ROWS,
            Keyboard::AnswerControls => ANSWER_ROWS,
            Keyboard::None => &[],
        }
    }
}

/// Input class the core expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expecting {
    ModeSelection,
    PracticeAnswer,
    TestAnswer,
}

/// Messages to send, in order, plus the keyboard for the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub messages: Vec<String>,
    pub keyboard: Keyboard,
    pub expecting: Expecting,
}

impl Reply {
    #[must_use]
    pub fn menu(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
            keyboard: Keyboard::MainMenu,
            expecting: Expecting::ModeSelection,
        }
    }

    #[must_use]
    pub fn practice(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
            keyboard: Keyboard::AnswerControls,
            expecting: Expecting::PracticeAnswer,
        }
    }

    #[must_use]
    pub fn test(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
            keyboard: Keyboard::None,
            expecting: Expecting::TestAnswer,
        }
    }

    /// Puts `text` in front of the existing messages.
    #[must_use]
    pub fn preceded_by(mut self, text: impl Into<String>) -> Self {
        self.messages.insert(0, text.into());
        self
    }

    /// All messages joined by blank lines.
    #[must_use]
    pub fn text(&self) -> String {
        self.messages.join("\n\n")
    }
}

//
// ─── INPUT CLASSIFICATION ──────────────────────────────────────────────────────
//

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Practice(PracticeMode),
    Test,
    Help,
    Stats,
}

impl MenuChoice {
    /// Accepts a button label or a plain word such as `easy` or `тест`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        match token {
            LABEL_EASY => return Some(Self::Practice(PracticeMode::Easy)),
            LABEL_MEDIUM => return Some(Self::Practice(PracticeMode::Medium)),
            LABEL_HARD => return Some(Self::Practice(PracticeMode::Hard)),
            LABEL_TEST => return Some(Self::Test),
            LABEL_HELP => return Some(Self::Help),
            LABEL_STATS => return Some(Self::Stats),
            _ => {}
        }
        match token.to_lowercase().as_str() {
            "easy" | "легкий" => Some(Self::Practice(PracticeMode::Easy)),
            "medium" | "средний" => Some(Self::Practice(PracticeMode::Medium)),
            "hard" | "сложный" => Some(Self::Practice(PracticeMode::Hard)),
            "test" | "тест" => Some(Self::Test),
            "help" | "справка" => Some(Self::Help),
            "stats" | "статистика" => Some(Self::Stats),
            _ => None,
        }
    }
}

/// Buttons shown while answering practice questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    NextQuestion,
    Finish,
}

impl Control {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            LABEL_NEXT => Some(Self::NextQuestion),
            LABEL_FINISH => Some(Self::Finish),
            _ => None,
        }
    }
}

/// Slash commands understood in any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Stats,
    Cancel,
}

impl Command {
    /// Parses `/start`, `/help`, `/stats` and `/cancel`, ignoring a `@botname` suffix.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim().split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "stats" => Some(Self::Stats),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}
