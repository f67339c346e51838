use std::sync::Arc;

use tracing::{debug, info, warn};

use coach_core::model::{ActiveFlow, PracticeMode, Session};
use coach_core::normalizer::parse_answer;
use coach_core::scoring::Verdict;

use crate::messages;
use crate::question::QuestionSource;
use crate::reply::Reply;

/// Single-question practice with partial credit.
///
/// `Idle --mode--> Practice --answer--> Practice --finish--> Idle`.
/// Answering does not issue a new question; the user asks for one.
#[derive(Clone)]
pub struct PracticeFlow {
    questions: Arc<dyn QuestionSource>,
}

impl PracticeFlow {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionSource>) -> Self {
        Self { questions }
    }

    /// Switch to practice in `mode` and ask the first question.
    pub fn enter(&self, session: &mut Session, mode: PracticeMode) -> Reply {
        session.set_mode(mode);
        info!(user_id = %session.user_id(), %mode, "practice started");
        self.ask(session, mode)
    }

    /// Ask another question in the stored mode.
    pub fn next_question(&self, session: &mut Session) -> Reply {
        let mode = session.mode().unwrap_or(PracticeMode::Medium);
        self.ask(session, mode)
    }

    fn ask(&self, session: &mut Session, mode: PracticeMode) -> Reply {
        let question = self.questions.next_question();
        session.set_flow(ActiveFlow::Practice {
            pending: Some(question),
        });
        Reply::practice(messages::practice_question(mode, question.square))
    }

    /// Back to mode selection. Cumulative score is kept.
    pub fn finish(&self, session: &mut Session) -> Reply {
        session.set_flow(ActiveFlow::Idle);
        Reply::menu(messages::practice_finished())
    }

    /// Score a free-text answer against the open question.
    ///
    /// The question stays open until the next one is asked.
    pub fn answer(&self, session: &mut Session, raw: &str) -> Reply {
        let ActiveFlow::Practice {
            pending: Some(question),
        } = *session.flow()
        else {
            warn!(user_id = %session.user_id(), "answer without an active practice question");
            session.set_flow(ActiveFlow::Idle);
            return Reply::menu(messages::lost_question());
        };

        let parsed = parse_answer(raw);
        let verdict = Verdict::judge(&parsed, &question.fact);
        let points = verdict.practice_points();
        session.record_practice_points(points);
        debug!(
            user_id = %session.user_id(),
            square = %question.square,
            ?verdict,
            points,
            score = session.score(),
            max_score = session.max_score(),
            "practice answer scored"
        );

        Reply::practice(messages::practice_feedback(verdict, &question.fact))
    }
}
