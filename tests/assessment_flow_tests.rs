mod common;

use chrono::{Duration, Utc};

use adaptive_assessment_server::{
    errors::AppError,
    models::{
        domain::{AssessmentCatalog, DifficultyBucket, SessionStatus},
        dto::request::{
            AdvanceAssessmentRequest, CompleteAssessmentRequest, StartAssessmentRequest,
            SubmitAssessmentAnswerRequest,
        },
    },
    repositories::AssessmentSessionRepository,
    services::AssessmentService,
};

use common::{catalog, TestStore};

const USER: &str = "learner-1";

fn start_request(config_id: &str) -> StartAssessmentRequest {
    StartAssessmentRequest {
        user_id: USER.to_string(),
        config_id: config_id.to_string(),
    }
}

fn answer_request(question_id: &str, answer: &str) -> SubmitAssessmentAnswerRequest {
    SubmitAssessmentAnswerRequest {
        user_id: USER.to_string(),
        question_id: question_id.to_string(),
        answer: answer.to_string(),
        time_spent: Some(10),
    }
}

fn advance_request() -> AdvanceAssessmentRequest {
    AdvanceAssessmentRequest {
        user_id: USER.to_string(),
    }
}

fn complete_request(time_spent: Option<i64>) -> CompleteAssessmentRequest {
    CompleteAssessmentRequest {
        user_id: USER.to_string(),
        time_spent,
    }
}

fn service(store: &TestStore, max_questions: i32, initial_difficulty: i32) -> std::sync::Arc<AssessmentService> {
    store
        .app_state(catalog(max_questions, initial_difficulty))
        .assessment_service
}

#[tokio::test]
async fn max_questions_ends_session_after_single_wrong_answer() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, Some("Math"), 0).await;
    store.seed_question("e2", DifficultyBucket::Easy, Some("Math"), 1).await;
    let service = service(&store, 1, 3);

    let started = service.start(USER, start_request("quick")).await.unwrap();
    assert_eq!(started.question.id, "e1");

    let outcome = service
        .record_answer(USER, &started.session_id, answer_request("e1", "41"))
        .await
        .unwrap();
    assert!(!outcome.is_correct);
    assert_eq!(outcome.new_difficulty, 2);
    assert_eq!(outcome.performance_ratio, 0.0);
    assert_eq!(outcome.explanation.as_deref(), Some("Explanation for e1"));

    let advanced = service
        .advance(USER, &started.session_id, advance_request())
        .await
        .unwrap();
    assert!(advanced.is_complete);
    assert!(advanced.question.is_none());

    let session = service.get_session(&started.session_id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.completed_at.is_some());
    assert_eq!(session.result_id, advanced.result_id);

    let result = service
        .get_result(advanced.result_id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(result.total_questions, 1);
    assert_eq!(result.correct_answers, 0);
    assert_eq!(result.time_spent, 10);
}

#[tokio::test]
async fn difficulty_rises_after_first_correct_then_holds() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    store.seed_question("m1", DifficultyBucket::Medium, None, 0).await;
    store.seed_question("m2", DifficultyBucket::Medium, None, 1).await;
    let service = service(&store, 20, 3);

    let started = service.start(USER, start_request("quick")).await.unwrap();
    assert_eq!(started.question.difficulty, 3);

    let first = service
        .record_answer(USER, &started.session_id, answer_request("e1", "42"))
        .await
        .unwrap();
    assert!(first.is_correct);
    assert_eq!(first.new_difficulty, 4);

    let next = service
        .advance(USER, &started.session_id, advance_request())
        .await
        .unwrap();
    assert!(!next.is_complete);
    let question = next.question.unwrap();
    assert_eq!(question.id, "m1");
    assert_eq!(question.difficulty, 6);

    let second = service
        .record_answer(USER, &started.session_id, answer_request("m1", "0"))
        .await
        .unwrap();
    assert!(!second.is_correct);
    assert_eq!(second.new_difficulty, 4);
    assert_eq!(second.performance_ratio, 0.5);

    let session = service.get_session(&started.session_id).await.unwrap();
    assert_eq!(session.questions_answered, 2);
    assert_eq!(session.correct_answers, 1);
    assert!(session.current_question_id.is_none());
    assert!(session.last_answered_at.is_some());
}

#[tokio::test]
async fn exhausted_bucket_completes_instead_of_failing() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    let service = service(&store, 20, 2);

    let started = service.start(USER, start_request("quick")).await.unwrap();
    service
        .record_answer(USER, &started.session_id, answer_request("e1", "nope"))
        .await
        .unwrap();

    let advanced = service
        .advance(USER, &started.session_id, advance_request())
        .await
        .unwrap();

    assert!(advanced.is_complete);
    assert!(advanced.result_id.is_some());
}

#[tokio::test]
async fn stable_performance_completes_before_max_and_threads_subjects() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, Some("Math"), 0).await;
    store.seed_question("m1", DifficultyBucket::Medium, Some("Science"), 0).await;
    store.seed_question("m2", DifficultyBucket::Medium, Some("Science"), 1).await;
    store.seed_question("m3", DifficultyBucket::Medium, Some("Science"), 2).await;
    store.seed_question("h1", DifficultyBucket::Hard, None, 0).await;
    store.seed_question("h2", DifficultyBucket::Hard, None, 1).await;
    let service = service(&store, 20, 3);

    let started = service.start(USER, start_request("quick")).await.unwrap();
    let mut current = started.question.id.clone();
    let mut served = vec![current.clone()];

    let result_id = loop {
        service
            .record_answer(USER, &started.session_id, answer_request(&current, "42"))
            .await
            .unwrap();
        let advanced = service
            .advance(USER, &started.session_id, advance_request())
            .await
            .unwrap();
        if advanced.is_complete {
            break advanced.result_id.unwrap();
        }
        current = advanced.question.unwrap().id;
        served.push(current.clone());
    };

    assert_eq!(served, vec!["e1", "m1", "m2", "m3", "h1"]);

    let result = service.get_result(&result_id).await.unwrap();
    assert_eq!(result.total_questions, 5);
    assert_eq!(result.overall_percentage, 100.0);

    let subjects: Vec<_> = result.subjects.iter().map(|s| s.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Math", "Science", "Social"]);
    assert_eq!(result.subjects[1].max_score, 3);
    assert_eq!(result.subjects[2].topics[0].topic, "Basics");
    assert!(result.weaknesses.is_empty());
}

#[tokio::test]
async fn start_without_questions_fails_closed() {
    let store = TestStore::new();
    store.seed_question("h1", DifficultyBucket::Hard, None, 0).await;
    let service = service(&store, 10, 3);

    let result = service.start(USER, start_request("quick")).await;

    assert!(matches!(result, Err(AppError::NoQuestionsAvailable(_))));
    assert!(service.current_session(USER).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_config_is_not_found() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    let service = service(&store, 10, 3);

    let result = service.start(USER, start_request("comprehensive")).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn acting_for_another_user_is_unauthorized() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    let service = service(&store, 10, 3);

    let result = service.start("someone-else", start_request("quick")).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));

    let started = service.start(USER, start_request("quick")).await.unwrap();
    let mut request = answer_request("e1", "42");
    request.user_id = "someone-else".to_string();
    let result = service
        .record_answer("someone-else", &started.session_id, request)
        .await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn answering_a_question_that_is_not_pinned_is_rejected() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    store.seed_question("e2", DifficultyBucket::Easy, None, 1).await;
    let service = service(&store, 10, 3);

    let started = service.start(USER, start_request("quick")).await.unwrap();

    let wrong_question = service
        .record_answer(USER, &started.session_id, answer_request("e2", "42"))
        .await;
    assert!(matches!(wrong_question, Err(AppError::Conflict(_))));

    service
        .record_answer(USER, &started.session_id, answer_request("e1", "42"))
        .await
        .unwrap();

    // answered question is unpinned, a repeat is rejected
    let repeat = service
        .record_answer(USER, &started.session_id, answer_request("e1", "42"))
        .await;
    assert!(matches!(repeat, Err(AppError::Conflict(_))));

    let session = service.get_session(&started.session_id).await.unwrap();
    assert_eq!(session.questions_answered, 1);
}

#[tokio::test]
async fn advance_repeats_the_pinned_question() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    let service = service(&store, 10, 3);

    let started = service.start(USER, start_request("quick")).await.unwrap();
    let advanced = service
        .advance(USER, &started.session_id, advance_request())
        .await
        .unwrap();

    assert!(!advanced.is_complete);
    assert_eq!(advanced.question.unwrap().id, "e1");
}

#[tokio::test]
async fn complete_is_idempotent() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, Some("Math"), 0).await;
    let service = service(&store, 10, 3);

    let started = service.start(USER, start_request("quick")).await.unwrap();
    service
        .record_answer(USER, &started.session_id, answer_request("e1", "42"))
        .await
        .unwrap();

    let first = service
        .complete(USER, &started.session_id, complete_request(Some(95)))
        .await
        .unwrap();
    assert_eq!(first.time_spent, 95);
    assert_eq!(first.correct_answers, 1);

    let second = service
        .complete(USER, &started.session_id, complete_request(None))
        .await
        .unwrap();
    assert_eq!(second.id, first.id);

    let answer_after = service
        .record_answer(USER, &started.session_id, answer_request("e1", "42"))
        .await;
    assert!(matches!(answer_after, Err(AppError::NotFound(_))));

    let page = service
        .list_results(USER, Default::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.pagination.limit, 20);
    assert_eq!(page.items[0].id, first.id);
}

#[tokio::test]
async fn cancelled_session_accepts_no_further_work() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    let service = service(&store, 10, 3);

    let started = service.start(USER, start_request("quick")).await.unwrap();
    let cancelled = service.cancel(USER, &started.session_id).await.unwrap();
    assert_eq!(cancelled.status, SessionStatus::Cancelled);

    let answer = service
        .record_answer(USER, &started.session_id, answer_request("e1", "42"))
        .await;
    assert!(matches!(answer, Err(AppError::NotFound(_))));

    let complete = service
        .complete(USER, &started.session_id, complete_request(None))
        .await;
    assert!(matches!(complete, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn starting_again_supersedes_the_previous_session() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    let service = service(&store, 10, 3);

    let first = service.start(USER, start_request("quick")).await.unwrap();
    let second = service.start(USER, start_request("quick")).await.unwrap();

    let old = service.get_session(&first.session_id).await.unwrap();
    assert_eq!(old.status, SessionStatus::Cancelled);

    let current = service.current_session(USER).await.unwrap().unwrap();
    assert_eq!(current.id, second.session_id);
}

#[tokio::test]
async fn start_reports_the_configured_time_limit() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    let timed = AssessmentCatalog::from_json_str(
        r#"[{"id":"timed","subjects":["Math"],"topics":["Basics"],"max_questions":5,"initial_difficulty":2,"time_limit_seconds":1800}]"#,
    )
    .unwrap();
    let timed_service = store.app_state(timed).assessment_service;

    let started = timed_service.start(USER, start_request("timed")).await.unwrap();
    assert_eq!(started.time_limit_seconds, Some(1800));
    assert_eq!(started.question.time_limit_seconds, 300);

    let untimed = service(&store, 5, 2)
        .start(USER, start_request("quick"))
        .await
        .unwrap();
    assert_eq!(untimed.time_limit_seconds, None);
}

#[tokio::test]
async fn idle_sessions_expire() {
    let store = TestStore::new();
    store.seed_question("e1", DifficultyBucket::Easy, None, 0).await;
    let service = service(&store, 10, 3);

    let started = service.start(USER, start_request("quick")).await.unwrap();
    let mut session = service.get_session(&started.session_id).await.unwrap();
    session.started_at = Utc::now() - Duration::hours(5);
    store.sessions.put(session).await;

    let result = service
        .record_answer(USER, &started.session_id, answer_request("e1", "42"))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    let session = service.get_session(&started.session_id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Cancelled);

    let other = service.start(USER, start_request("quick")).await.unwrap();
    let mut session = service.get_session(&other.session_id).await.unwrap();
    session.started_at = Utc::now() - Duration::hours(5);
    store.sessions.put(session).await;

    assert_eq!(service.expire_stale_sessions().await.unwrap(), 1);
    assert_eq!(service.expire_stale_sessions().await.unwrap(), 0);
    assert!(store
        .sessions
        .find_latest_in_progress(USER)
        .await
        .unwrap()
        .is_none());
}
