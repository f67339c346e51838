use std::sync::Arc;

use tracing::{debug, info, warn};

use coach_core::model::{ActiveFlow, PracticeMode, Session, TestRun};
use coach_core::normalizer::parse_answer;
use coach_core::scoring::{GradeBand, Verdict, percentage};

use crate::messages;
use crate::question::QuestionSource;
use crate::reply::Reply;

/// Fixed-length test: every answer is right or wrong, no partial credit.
///
/// Runs in the medium presentation and leaves practice totals untouched.
#[derive(Clone)]
pub struct TestFlow {
    questions: Arc<dyn QuestionSource>,
}

impl TestFlow {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionSource>) -> Self {
        Self { questions }
    }

    /// Start a fresh run and ask the first question.
    pub fn enter(&self, session: &mut Session) -> Reply {
        session.set_mode(PracticeMode::Medium);
        session.set_flow(ActiveFlow::Test(TestRun::default()));
        info!(user_id = %session.user_id(), "test started");
        self.ask_next(session).preceded_by(messages::test_intro())
    }

    /// Ask the next question, or finalize once the run is exhausted.
    ///
    /// Outside a running test there is nothing to ask; the menu is shown.
    pub fn ask_next(&self, session: &mut Session) -> Reply {
        let ActiveFlow::Test(mut run) = *session.flow() else {
            return Reply::menu(messages::choose_mode());
        };
        if run.is_exhausted() {
            return self.finalize(session, run);
        }

        let question = self.questions.next_question();
        run.asked += 1;
        run.pending = Some(question);
        session.set_flow(ActiveFlow::Test(run));
        Reply::test(messages::test_question(run.asked, question.square))
    }

    /// Judge an answer, then move on to the next question or the result.
    pub fn answer(&self, session: &mut Session, raw: &str) -> Reply {
        let ActiveFlow::Test(mut run) = *session.flow() else {
            warn!(user_id = %session.user_id(), "test answer without a running test");
            return Reply::menu(messages::lost_question());
        };
        let Some(question) = run.pending.take() else {
            warn!(user_id = %session.user_id(), "test answer without a pending question");
            return self.ask_next(session);
        };

        let verdict = Verdict::judge(&parse_answer(raw), &question.fact);
        if verdict.is_fully_correct() {
            run.correct += 1;
        }
        debug!(
            user_id = %session.user_id(),
            square = %question.square,
            ?verdict,
            asked = run.asked,
            correct = run.correct,
            "test answer judged"
        );
        session.set_flow(ActiveFlow::Test(run));

        self.ask_next(session)
            .preceded_by(messages::test_feedback(verdict, &question.fact))
    }

    fn finalize(&self, session: &mut Session, run: TestRun) -> Reply {
        let percent = percentage(run.correct, run.asked);
        let band = GradeBand::from_percentage(percent);
        session.set_flow(ActiveFlow::Idle);
        info!(
            user_id = %session.user_id(),
            correct = run.correct,
            asked = run.asked,
            percent,
            ?band,
            "test finished"
        );
        Reply::menu(messages::test_result(run.correct, run.asked, percent, band))
    }
}
