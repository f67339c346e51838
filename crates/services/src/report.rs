//! Practice statistics.

use coach_core::model::Session;
use coach_core::scoring::percentage;

use crate::messages;

/// Renders cumulative practice results, or a placeholder before the first answer.
#[must_use]
pub fn stats_for(session: Option<&Session>) -> String {
    match session {
        Some(session) if session.max_score() > 0 => messages::stats(
            session.score(),
            session.max_score(),
            percentage(session.score(), session.max_score()),
        ),
        _ => messages::no_stats(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_core::model::UserId;
    use coach_core::time::fixed_now;

    #[test]
    fn empty_session_has_no_stats() {
        let session = Session::new(UserId::new(1), fixed_now());
        assert_eq!(stats_for(Some(&session)), messages::no_stats());
        assert_eq!(stats_for(None), messages::no_stats());
    }

    #[test]
    fn stats_show_one_decimal_and_rules() {
        let mut session = Session::new(UserId::new(1), fixed_now());
        session.record_practice_points(2);
        session.record_practice_points(1);
        session.record_practice_points(1);

        let text = stats_for(Some(&session));
        assert!(text.contains("*4/6*"));
        assert!(text.contains("*66.7%*"));
        assert!(text.contains(messages::SCORING_RULES));
    }
}
