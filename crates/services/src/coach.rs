use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use coach_core::Clock;
use coach_core::model::{ActiveFlow, Session, UserId};
use storage::repository::{SessionRepository, StorageError};

use crate::error::CoachError;
use crate::flows::{PracticeFlow, TestFlow};
use crate::messages;
use crate::question::QuestionSource;
use crate::report::stats_for;
use crate::reply::{Command, Control, MenuChoice, Reply};

/// Entry points the chat transport calls with a user id and the user's text.
///
/// Each call loads the user's session, runs the practice or test flow and
/// stores the result. Calls for the same user are serialized; different
/// users do not wait on each other.
#[derive(Clone)]
pub struct CoachService {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
    practice: PracticeFlow,
    test: TestFlow,
    locks: Arc<Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>>,
}

impl CoachService {
    #[must_use]
    pub fn new(
        clock: Clock,
        sessions: Arc<dyn SessionRepository>,
        questions: Arc<dyn QuestionSource>,
    ) -> Self {
        Self {
            clock,
            sessions,
            practice: PracticeFlow::new(Arc::clone(&questions)),
            test: TestFlow::new(questions),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_for(&self, user_id: UserId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(user_id).or_default())
    }

    /// Load (or create) the session, apply `step`, and store the result.
    async fn with_session<F>(&self, user_id: UserId, step: F) -> Result<Reply, CoachError>
    where
        F: FnOnce(&mut Session) -> Reply + Send,
    {
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        let now = self.clock.now();
        let existing = self.sessions.get_session(user_id).await?;
        let is_new = existing.is_none();
        let mut session = existing.unwrap_or_else(|| Session::new(user_id, now));

        let reply = step(&mut session);
        session.touch(now);

        if is_new {
            debug!(%user_id, "session created on first contact");
            self.sessions.create_session(&session).await?;
        } else {
            match self.sessions.update_session(&session).await {
                // Evicted between load and store.
                Err(StorageError::NotFound) => {
                    warn!(%user_id, "session evicted mid-message, storing it again");
                    self.sessions.create_session(&session).await?;
                }
                other => other?,
            }
        }
        Ok(reply)
    }

    /// Fresh session with every counter zeroed, and the mode menu.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Storage` if the session cannot be stored.
    pub async fn handle_start(&self, user_id: UserId) -> Result<Reply, CoachError> {
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;
        self.sessions
            .reset_session(user_id, self.clock.now())
            .await?;
        info!(%user_id, "session reset");
        Ok(Reply::menu(messages::welcome()))
    }

    /// Enter practice or test from the main menu. Help and stats are served
    /// from here too since they share the menu.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Storage` if the session cannot be loaded or stored.
    pub async fn handle_mode_select(
        &self,
        user_id: UserId,
        token: &str,
    ) -> Result<Reply, CoachError> {
        match MenuChoice::parse(token) {
            Some(MenuChoice::Help) => Ok(self.handle_help()),
            Some(MenuChoice::Stats) => self.handle_stats(user_id).await,
            _ => {
                self.with_session(user_id, |session| self.select_mode(session, token))
                    .await
            }
        }
    }

    fn select_mode(&self, session: &mut Session, token: &str) -> Reply {
        match MenuChoice::parse(token) {
            Some(MenuChoice::Practice(mode)) => self.practice.enter(session, mode),
            Some(MenuChoice::Test) => self.test.enter(session),
            Some(MenuChoice::Help) => self.handle_help(),
            Some(MenuChoice::Stats) => Reply::menu(stats_for(Some(session))),
            None => Reply::menu(messages::choose_mode()),
        }
    }

    /// Score free text against whichever question is open.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Storage` if the session cannot be loaded or stored.
    pub async fn handle_answer(&self, user_id: UserId, raw: &str) -> Result<Reply, CoachError> {
        self.with_session(user_id, |session| {
            if session.is_test_active() {
                self.test.answer(session, raw)
            } else {
                self.practice.answer(session, raw)
            }
        })
        .await
    }

    /// Practice buttons. During a test, finishing abandons the run and
    /// "next" repeats the open question.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Storage` if the session cannot be loaded or stored.
    pub async fn handle_control(
        &self,
        user_id: UserId,
        control: Control,
    ) -> Result<Reply, CoachError> {
        self.with_session(user_id, |session| self.apply_control(session, control))
            .await
    }

    fn apply_control(&self, session: &mut Session, control: Control) -> Reply {
        match (*session.flow(), control) {
            (ActiveFlow::Test(_), Control::Finish) => abandon(session),
            (ActiveFlow::Test(run), Control::NextQuestion) => match run.pending {
                Some(question) => {
                    Reply::test(messages::test_question(run.asked, question.square))
                }
                None => self.test.ask_next(session),
            },
            (_, Control::NextQuestion) => self.practice.next_question(session),
            (_, Control::Finish) => self.practice.finish(session),
        }
    }

    /// Abort whatever is running and return to the menu.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Storage` if the session cannot be loaded or stored.
    pub async fn handle_cancel(&self, user_id: UserId) -> Result<Reply, CoachError> {
        self.with_session(user_id, abandon).await
    }

    /// Cumulative practice statistics. Does not create a session.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Storage` if the session cannot be loaded.
    pub async fn handle_stats(&self, user_id: UserId) -> Result<Reply, CoachError> {
        let session = self.sessions.get_session(user_id).await?;
        Ok(Reply::menu(stats_for(session.as_ref())))
    }

    #[must_use]
    pub fn handle_help(&self) -> Reply {
        Reply::menu(messages::help())
    }

    /// Route raw chat text: slash commands first, then menu, buttons or
    /// answers depending on what the user is doing.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Storage` if the session cannot be loaded or stored.
    pub async fn handle_text(&self, user_id: UserId, text: &str) -> Result<Reply, CoachError> {
        if text.trim_start().starts_with('/') {
            return match Command::parse(text) {
                Some(Command::Start) => self.handle_start(user_id).await,
                Some(Command::Help) => Ok(self.handle_help()),
                Some(Command::Stats) => self.handle_stats(user_id).await,
                Some(Command::Cancel) => self.handle_cancel(user_id).await,
                None => Ok(Reply::menu(messages::unknown_command())),
            };
        }

        self.with_session(user_id, |session| match *session.flow() {
            ActiveFlow::Idle => self.select_mode(session, text),
            ActiveFlow::Practice { .. } => match Control::parse(text) {
                Some(control) => self.apply_control(session, control),
                None => self.practice.answer(session, text),
            },
            ActiveFlow::Test(_) => self.test.answer(session, text),
        })
        .await
    }

    /// Drop sessions idle for longer than `ttl`.
    /// A negative or unrepresentable `ttl` evicts nothing.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Storage` if the store cannot be updated.
    pub async fn evict_idle(&self, ttl: Duration) -> Result<usize, CoachError> {
        let Some(cutoff) = self.clock.idle_cutoff(ttl) else {
            warn!(?ttl, "idle ttl out of range, nothing evicted");
            return Ok(0);
        };
        let removed = self.sessions.evict_idle(cutoff).await?;
        {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        if removed > 0 {
            info!(removed, "evicted idle sessions");
        }
        Ok(removed)
    }
}

fn abandon(session: &mut Session) -> Reply {
    session.set_flow(ActiveFlow::Idle);
    Reply::menu(messages::interrupted())
}
