use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use coach_core::model::{ActiveFlow, PracticeMode, Session, UserId};
use coach_core::time::fixed_clock;
use services::reply::{LABEL_EASY, LABEL_FINISH, LABEL_HARD, LABEL_NEXT, LABEL_STATS, LABEL_TEST};
use services::{
    Clock, CoachError, CoachService, Control, Expecting, Keyboard, ScriptedQuestions, messages,
};
use storage::repository::{InMemoryRepository, SessionRepository, StorageError};

fn coach_with(repo: &InMemoryRepository, clock: Clock, codes: &[&str]) -> CoachService {
    CoachService::new(
        clock,
        Arc::new(repo.clone()),
        Arc::new(ScriptedQuestions::from_codes(codes).unwrap()),
    )
}

fn coach(repo: &InMemoryRepository, codes: &[&str]) -> CoachService {
    coach_with(repo, fixed_clock(), codes)
}

const USER: UserId = UserId::new(42);

#[tokio::test]
async fn start_creates_zeroed_session_with_menu() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["d1"]);

    let reply = coach.handle_start(USER).await.unwrap();
    assert_eq!(reply.keyboard, Keyboard::MainMenu);
    assert_eq!(reply.expecting, Expecting::ModeSelection);
    assert_eq!(reply.messages, vec![messages::welcome()]);

    let session = repo.get_session(USER).await.unwrap().unwrap();
    assert_eq!(session.score(), 0);
    assert_eq!(session.max_score(), 0);
    assert_eq!(*session.flow(), ActiveFlow::Idle);
}

#[tokio::test]
async fn start_discards_previous_progress() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["d1"]);

    coach.handle_start(USER).await.unwrap();
    coach.handle_mode_select(USER, LABEL_EASY).await.unwrap();
    coach.handle_answer(USER, "Б ферзь").await.unwrap();

    coach.handle_start(USER).await.unwrap();
    let session = repo.get_session(USER).await.unwrap().unwrap();
    assert_eq!((session.score(), session.max_score()), (0, 0));
    assert_eq!(session.mode(), None);
}

#[tokio::test]
async fn practice_on_d1_awards_partial_credit() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["d1"]);
    coach.handle_start(USER).await.unwrap();

    let reply = coach.handle_mode_select(USER, LABEL_HARD).await.unwrap();
    assert_eq!(reply.keyboard, Keyboard::AnswerControls);
    assert!(reply.messages[0].contains("`D1`"));

    for answer in ["Б ферзь", "ферзь б", "б конь", "ч слон"] {
        coach.handle_answer(USER, answer).await.unwrap();
    }

    let session = repo.get_session(USER).await.unwrap().unwrap();
    assert_eq!(session.score(), 5);
    assert_eq!(session.max_score(), 8);
    assert_eq!(session.mode(), Some(PracticeMode::Hard));

    let stats = coach.handle_stats(USER).await.unwrap();
    assert!(stats.messages[0].contains("*5/8*"));
    assert!(stats.messages[0].contains("62.5%"));
}

#[tokio::test]
async fn practice_controls_ask_again_and_finish() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["a1", "g8"]);
    coach.handle_start(USER).await.unwrap();
    coach.handle_mode_select(USER, LABEL_EASY).await.unwrap();

    let reply = coach
        .handle_control(USER, Control::NextQuestion)
        .await
        .unwrap();
    assert!(reply.messages[0].contains("`G8`"));

    let reply = coach.handle_control(USER, Control::Finish).await.unwrap();
    assert_eq!(reply.keyboard, Keyboard::MainMenu);
    assert_eq!(reply.messages, vec![messages::practice_finished()]);

    let session = repo.get_session(USER).await.unwrap().unwrap();
    assert_eq!(*session.flow(), ActiveFlow::Idle);
}

#[tokio::test]
async fn full_test_reports_band_and_leaves_practice_totals() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["d1"]);
    coach.handle_start(USER).await.unwrap();

    let reply = coach.handle_mode_select(USER, LABEL_TEST).await.unwrap();
    assert_eq!(reply.messages[0], messages::test_intro());
    assert!(reply.messages[1].contains("Вопрос 1/10"));
    assert_eq!(reply.expecting, Expecting::TestAnswer);

    let mut last = reply;
    for n in 1..=10 {
        let answer = if n <= 7 { "белый ферзь" } else { "черная ладья" };
        last = coach.handle_answer(USER, answer).await.unwrap();
        if n < 10 {
            assert!(last.messages[1].contains(&format!("Вопрос {}/10", n + 1)));
        }
    }

    assert_eq!(last.keyboard, Keyboard::MainMenu);
    assert_eq!(last.messages.len(), 2);
    assert!(last.messages[0].starts_with("❌"));
    assert!(last.messages[1].contains("*7/10*"));
    assert!(last.messages[1].contains("70.0%"));
    assert!(last.messages[1].starts_with("👍"));

    let session = repo.get_session(USER).await.unwrap().unwrap();
    assert_eq!(*session.flow(), ActiveFlow::Idle);
    assert_eq!((session.score(), session.max_score()), (0, 0));
}

#[tokio::test]
async fn cancel_abandons_running_test() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["e8"]);
    coach.handle_start(USER).await.unwrap();
    coach.handle_mode_select(USER, LABEL_TEST).await.unwrap();
    coach.handle_answer(USER, "ч король").await.unwrap();

    let reply = coach.handle_cancel(USER).await.unwrap();
    assert_eq!(reply.messages, vec![messages::interrupted()]);
    assert_eq!(reply.keyboard, Keyboard::MainMenu);

    let session = repo.get_session(USER).await.unwrap().unwrap();
    assert!(!session.is_test_active());
}

#[tokio::test]
async fn next_during_test_repeats_open_question() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["b1", "c8"]);
    coach.handle_start(USER).await.unwrap();
    coach.handle_mode_select(USER, LABEL_TEST).await.unwrap();

    let reply = coach
        .handle_control(USER, Control::NextQuestion)
        .await
        .unwrap();
    assert!(reply.messages[0].contains("Вопрос 1/10"));
    assert!(reply.messages[0].contains("`B1`"));
}

#[tokio::test]
async fn text_router_follows_session_state() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["h1"]);

    let reply = coach.handle_text(USER, "/start").await.unwrap();
    assert_eq!(reply.messages, vec![messages::welcome()]);

    let reply = coach.handle_text(USER, "что-то").await.unwrap();
    assert_eq!(reply.messages, vec![messages::choose_mode()]);

    let reply = coach.handle_text(USER, LABEL_EASY).await.unwrap();
    assert_eq!(reply.expecting, Expecting::PracticeAnswer);

    let reply = coach.handle_text(USER, "white rook").await.unwrap();
    assert!(reply.messages[0].starts_with("✅"));

    let reply = coach.handle_text(USER, LABEL_NEXT).await.unwrap();
    assert!(reply.messages[0].contains("`H1`"));

    let reply = coach.handle_text(USER, LABEL_FINISH).await.unwrap();
    assert_eq!(reply.keyboard, Keyboard::MainMenu);

    let reply = coach.handle_text(USER, LABEL_STATS).await.unwrap();
    assert!(reply.messages[0].contains("*2/2*"));

    let reply = coach.handle_text(USER, "/help@blind_bot").await.unwrap();
    assert_eq!(reply.messages, vec![messages::help()]);

    let reply = coach.handle_text(USER, "/bogus").await.unwrap();
    assert_eq!(reply.messages, vec![messages::unknown_command()]);
}

#[tokio::test]
async fn first_contact_without_start_creates_session() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["f8"]);

    let reply = coach.handle_mode_select(USER, LABEL_EASY).await.unwrap();
    assert!(reply.messages[0].contains("`F8`"));
    assert!(repo.get_session(USER).await.unwrap().is_some());
}

#[tokio::test]
async fn stats_before_any_session_is_placeholder() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["d1"]);

    let reply = coach.handle_stats(USER).await.unwrap();
    assert_eq!(reply.messages, vec![messages::no_stats()]);
    assert!(repo.get_session(USER).await.unwrap().is_none());
}

#[tokio::test]
async fn answer_without_question_recovers_to_menu() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["d1"]);
    coach.handle_start(USER).await.unwrap();

    let reply = coach.handle_answer(USER, "Б ферзь").await.unwrap();
    assert_eq!(reply.messages, vec![messages::lost_question()]);
    assert_eq!(reply.expecting, Expecting::ModeSelection);
}

#[tokio::test]
async fn users_do_not_share_progress() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["d8"]);
    let other = UserId::new(7);

    coach.handle_mode_select(USER, LABEL_EASY).await.unwrap();
    coach.handle_mode_select(other, LABEL_EASY).await.unwrap();
    coach.handle_answer(USER, "ч ферзь").await.unwrap();
    coach.handle_answer(other, "б ферзь").await.unwrap();

    let mine = repo.get_session(USER).await.unwrap().unwrap();
    let theirs = repo.get_session(other).await.unwrap().unwrap();
    assert_eq!(mine.score(), 2);
    assert_eq!(theirs.score(), 1);
}

#[tokio::test]
async fn idle_sessions_are_evicted() {
    let repo = InMemoryRepository::new();
    let early = coach(&repo, &["d1"]);
    early.handle_start(USER).await.unwrap();

    let mut later_clock = fixed_clock();
    later_clock.advance(Duration::minutes(45));
    let later = coach_with(&repo, later_clock, &["d1"]);
    later.handle_start(UserId::new(2)).await.unwrap();

    let removed = later.evict_idle(Duration::minutes(30)).await.unwrap();
    assert_eq!(removed, 1);
    assert!(repo.get_session(USER).await.unwrap().is_none());
    assert!(repo.get_session(UserId::new(2)).await.unwrap().is_some());
}

struct OfflineRepository;

#[async_trait]
impl SessionRepository for OfflineRepository {
    async fn get_session(&self, _user_id: UserId) -> Result<Option<Session>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn create_session(&self, _session: &Session) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn update_session(&self, _session: &Session) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn reset_session(
        &self,
        _user_id: UserId,
        _now: DateTime<Utc>,
    ) -> Result<Session, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn evict_idle(&self, _cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn storage_failures_surface_as_errors() {
    let coach = CoachService::new(
        fixed_clock(),
        Arc::new(OfflineRepository),
        Arc::new(ScriptedQuestions::from_codes(&["d1"]).unwrap()),
    );

    let err = coach.handle_text(USER, LABEL_EASY).await.unwrap_err();
    assert!(matches!(
        err,
        CoachError::Storage(StorageError::Connection(_))
    ));
    assert!(coach.handle_start(USER).await.is_err());

    // Help needs no session.
    assert_eq!(coach.handle_help().messages, vec![messages::help()]);
}

/// Delays every load so concurrent calls overlap.
#[derive(Clone)]
struct SlowRepository {
    inner: InMemoryRepository,
    delay: std::time::Duration,
}

#[async_trait]
impl SessionRepository for SlowRepository {
    async fn get_session(&self, user_id: UserId) -> Result<Option<Session>, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_session(user_id).await
    }

    async fn create_session(&self, session: &Session) -> Result<(), StorageError> {
        self.inner.create_session(session).await
    }

    async fn update_session(&self, session: &Session) -> Result<(), StorageError> {
        self.inner.update_session(session).await
    }

    async fn reset_session(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Session, StorageError> {
        self.inner.reset_session(user_id, now).await
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        self.inner.evict_idle(cutoff).await
    }
}

fn slow_coach(repo: &InMemoryRepository, clock: Clock, codes: &[&str]) -> CoachService {
    CoachService::new(
        clock,
        Arc::new(SlowRepository {
            inner: repo.clone(),
            delay: std::time::Duration::from_millis(50),
        }),
        Arc::new(ScriptedQuestions::from_codes(codes).unwrap()),
    )
}

#[tokio::test]
async fn session_evicted_while_message_runs_is_stored_again() {
    let repo = InMemoryRepository::new();
    coach(&repo, &["d1"]).handle_start(USER).await.unwrap();

    let mut later_clock = fixed_clock();
    later_clock.advance(Duration::minutes(45));
    let later = slow_coach(&repo, later_clock, &["c1"]);

    let (reply, evicted) = tokio::join!(later.handle_mode_select(USER, LABEL_EASY), async {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        later.evict_idle(Duration::minutes(30)).await
    });

    assert_eq!(evicted.unwrap(), 1);
    let reply = reply.unwrap();
    assert_eq!(reply.expecting, Expecting::PracticeAnswer);
    assert!(reply.messages[0].contains("`C1`"));

    let session = repo.get_session(USER).await.unwrap().unwrap();
    assert_eq!(session.mode(), Some(PracticeMode::Easy));
    assert_eq!(session.last_active_at(), later_clock.now());
}

#[tokio::test]
async fn concurrent_texts_are_routed_in_arrival_order() {
    let repo = InMemoryRepository::new();
    let coach = slow_coach(&repo, fixed_clock(), &["d1"]);
    coach.handle_text(USER, LABEL_EASY).await.unwrap();

    let (finished, answered) = tokio::join!(coach.handle_text(USER, LABEL_FINISH), async {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        coach.handle_text(USER, "б ферзь").await
    });

    assert_eq!(finished.unwrap().messages, vec![messages::practice_finished()]);
    // The answer lands after "finish", so it is read as menu input.
    assert_eq!(answered.unwrap().messages, vec![messages::choose_mode()]);

    let session = repo.get_session(USER).await.unwrap().unwrap();
    assert_eq!(*session.flow(), ActiveFlow::Idle);
    assert_eq!(session.max_score(), 0);
}

#[tokio::test]
async fn out_of_range_ttl_evicts_nothing() {
    let repo = InMemoryRepository::new();
    let coach = coach(&repo, &["d1"]);
    coach.handle_start(USER).await.unwrap();

    assert_eq!(coach.evict_idle(Duration::minutes(-5)).await.unwrap(), 0);
    assert_eq!(
        coach.evict_idle(Duration::days(1_000_000_000)).await.unwrap(),
        0
    );
    assert!(repo.get_session(USER).await.unwrap().is_some());
}
