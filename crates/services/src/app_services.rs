use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::coach::CoachService;
use crate::error::AppServicesError;
use crate::question::{QuestionSource, RandomQuestions};

/// Assembles the coach on top of a session store.
#[derive(Clone)]
pub struct AppServices {
    coach: Arc<CoachService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, Arc::new(RandomQuestions)))
    }

    /// Build services whose sessions live only as long as the process.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, Arc::new(RandomQuestions))
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        questions: Arc<dyn QuestionSource>,
    ) -> Self {
        let coach = Arc::new(CoachService::new(
            clock,
            Arc::clone(&storage.sessions),
            questions,
        ));
        Self { coach }
    }

    #[must_use]
    pub fn coach(&self) -> Arc<CoachService> {
        Arc::clone(&self.coach)
    }
}
