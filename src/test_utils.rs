use crate::models::domain::{
    Answer, AssessmentCatalog, AssessmentSession, DifficultyBucket, Question, QuestionType,
};

pub mod fixtures {
    use super::*;

    /// Short-answer question in `bucket` tagged with a subject and topic.
    pub fn question(bucket: DifficultyBucket, subject: &str, topic: &str) -> Question {
        let mut question = Question::new("What is 6 x 7?", QuestionType::ShortAnswer, bucket, "42");
        question.subject = Some(subject.to_string());
        question.topic = Some(topic.to_string());
        question
    }

    pub fn session(user_id: &str, first_question_id: &str) -> AssessmentSession {
        let catalog = AssessmentCatalog::builtin();
        AssessmentSession::start(
            user_id,
            catalog
                .get("math_basic")
                .expect("built-in math_basic config"),
            first_question_id,
        )
    }

    pub fn answer(user_id: &str, question: &Question, is_correct: bool) -> Answer {
        Answer::record(user_id, question, "42", is_correct, 15, None)
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use crate::models::domain::DifficultyBucket;
    use actix_web::http::StatusCode;

    #[test]
    fn test_fixture_question_is_tagged() {
        let question = question(DifficultyBucket::Hard, "Science", "Experiments");
        assert_eq!(question.subject.as_deref(), Some("Science"));
        assert!(question.is_correct("42"));
    }

    #[test]
    fn test_fixture_session_pins_first_question() {
        let session = session("user-1", "q-1");
        assert_eq!(session.current_question_id.as_deref(), Some("q-1"));
    }

    #[test]
    fn test_fixture_answer_copies_question_metadata() {
        let question = question(DifficultyBucket::Easy, "Math", "Fractions");
        let answer = answer("user-1", &question, false);
        assert_eq!(answer.topic.as_deref(), Some("Fractions"));
        assert!(!answer.is_correct);
    }

    #[test]
    fn test_status_helpers() {
        assert_error_status(StatusCode::CONFLICT);
        assert_success_status(StatusCode::CREATED);
    }
}
