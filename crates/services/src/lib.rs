#![forbid(unsafe_code)]

pub mod app_services;
pub mod coach;
pub mod error;
pub mod flows;
pub mod messages;
pub mod question;
pub mod reply;
pub mod report;

pub use coach_core::Clock;

pub use app_services::AppServices;
pub use coach::CoachService;
pub use error::{AppServicesError, CoachError, QuestionSourceError};
pub use flows::{PracticeFlow, TestFlow};
pub use question::{QuestionSource, RandomQuestions, ScriptedQuestions};
pub use reply::{Command, Control, Expecting, Keyboard, MenuChoice, Reply};
