// tests/api_tests.rs

use std::sync::Arc;

use learnsmart::{
    routes,
    services::{
        curriculum::CurriculumIndex, learner::LearnerState, persistence::SqliteStateStore,
    },
    state::AppState,
};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::Mutex;

const CURRICULUM_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/curriculum.json");

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let store = memory_store().await;
    store.migrate().await.expect("Failed to migrate database");

    let learner = LearnerState::restore(&store, "Tester")
        .await
        .expect("Failed to restore learner");

    serve(store, learner).await
}

/// Same app, but the `state_blobs` table never gets created, so every
/// cache write fails.
async fn spawn_app_with_broken_store() -> String {
    let store = memory_store().await;
    serve(store, LearnerState::new("Tester")).await
}

async fn memory_store() -> SqliteStateStore {
    // In-memory SQLite; a single connection that never recycles keeps the
    // database alive for the whole test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    SqliteStateStore::new(pool)
}

async fn serve(store: SqliteStateStore, learner: LearnerState) -> String {
    let curriculum = CurriculumIndex::load_from_path(CURRICULUM_PATH).expect("Failed to load curriculum");

    let state = AppState {
        store: Arc::new(store),
        curriculum: Arc::new(curriculum),
        learner: Arc::new(Mutex::new(learner)),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn quick_test_body() -> Value {
    json!({
        "classId": "class-10",
        "subjectId": "science",
        "chapterId": "life-processes",
        "topicId": "nutrition"
    })
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn curriculum_browsing() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let classes: Value = client
        .get(&format!("{}/api/curriculum/classes", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(classes.as_array().unwrap().len(), 2);

    let class = client
        .get(&format!("{}/api/curriculum/classes/class-10", address))
        .send()
        .await
        .unwrap();
    assert_eq!(class.status().as_u16(), 200);
    let class: Value = class.json().await.unwrap();
    assert_eq!(class["subjects"][0]["id"], "science");

    let missing = client
        .get(&format!("{}/api/curriculum/classes/class-42", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn curriculum_search() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let hits: Value = client
        .get(&format!("{}/api/curriculum/search?q=PHOTOSYNTHESIS", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let hits = hits.as_array().unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().any(|h| h["id"] == "autotrophic-nutrition"));

    let blank: Value = client
        .get(&format!("{}/api/curriculum/search?q=%20%20", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(blank.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn quick_test_lifecycle() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // No test yet
    let none = client
        .get(&format!("{}/api/tests/current", address))
        .send()
        .await
        .unwrap();
    assert_eq!(none.status().as_u16(), 404);

    // 1. Start
    let started = client
        .post(&format!("{}/api/tests/quick", address))
        .json(&quick_test_body())
        .send()
        .await
        .unwrap();
    assert_eq!(started.status().as_u16(), 201);
    let session: Value = started.json().await.unwrap();
    let questions = session["questions"].as_array().unwrap();
    // Nutrition has 4 concepts: 3 or 4 questions.
    assert!((3..=4).contains(&questions.len()));
    assert!(questions[0].get("correctAnswer").is_none());
    assert!(questions[0].get("explanation").is_none());
    let test_id = session["testId"].as_str().unwrap().to_string();

    // 2. A second start is rejected while one is running
    let conflict = client
        .post(&format!("{}/api/tests/quick", address))
        .json(&quick_test_body())
        .send()
        .await
        .unwrap();
    assert_eq!(conflict.status().as_u16(), 409);

    // 3. Answer, navigate, answer again
    let answered = client
        .post(&format!("{}/api/tests/current/answer", address))
        .json(&json!({ "option": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(answered.status().as_u16(), 200);
    let view: Value = answered.json().await.unwrap();
    assert_eq!(view["answeredCount"], 1);

    let out_of_range = client
        .post(&format!("{}/api/tests/current/answer", address))
        .json(&json!({ "option": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(out_of_range.status().as_u16(), 400);

    let next = client
        .post(&format!("{}/api/tests/current/next", address))
        .send()
        .await
        .unwrap();
    assert_eq!(next.status().as_u16(), 200);
    let next: Value = next.json().await.unwrap();
    assert_eq!(next["id"], questions[1]["id"]);

    let bad_jump = client
        .post(&format!("{}/api/tests/current/goto", address))
        .json(&json!({ "index": 99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_jump.status().as_u16(), 400);

    // 4. Submit
    let submitted = client
        .post(&format!("{}/api/tests/current/submit", address))
        .send()
        .await
        .unwrap();
    assert_eq!(submitted.status().as_u16(), 200);
    let body: Value = submitted.json().await.unwrap();
    assert_eq!(body["result"]["testId"], test_id.as_str());
    assert_eq!(body["result"]["totalQuestions"], questions.len());
    assert_eq!(body["saved"], true);
    assert!(body["gamification"]["unlocked"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"] == "first_quiz"));

    // 5. Double submit finds no session
    let again = client
        .post(&format!("{}/api/tests/current/submit", address))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 404);

    // 6. History
    let history: Value = client
        .get(&format!("{}/api/tests/history", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);

    let detail = client
        .get(&format!("{}/api/tests/history/{}", address, test_id))
        .send()
        .await
        .unwrap();
    assert_eq!(detail.status().as_u16(), 200);
    let detail: Value = detail.json().await.unwrap();
    // Answer keys are visible once the test is over.
    assert!(detail["questions"][0].get("correctAnswer").is_some());

    // 7. First-quiz reward landed in XP
    let progress: Value = client
        .get(&format!("{}/api/progress", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(progress["totalXp"].as_u64().unwrap() >= 50);
    assert_eq!(progress["streak"]["current"], 1);
}

#[tokio::test]
async fn submit_returns_the_result_when_the_cache_write_fails() {
    let address = spawn_app_with_broken_store().await;
    let client = reqwest::Client::new();

    let started = client
        .post(&format!("{}/api/tests/quick", address))
        .json(&quick_test_body())
        .send()
        .await
        .unwrap();
    assert_eq!(started.status().as_u16(), 201);
    let session: Value = started.json().await.unwrap();
    let test_id = session["testId"].as_str().unwrap().to_string();

    let submitted = client
        .post(&format!("{}/api/tests/current/submit", address))
        .send()
        .await
        .unwrap();
    assert_eq!(submitted.status().as_u16(), 200);
    let body: Value = submitted.json().await.unwrap();
    assert_eq!(body["result"]["testId"], test_id.as_str());
    assert_eq!(body["saved"], false);

    let again = client
        .post(&format!("{}/api/tests/current/submit", address))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 404);

    // The result is still held in memory
    let history: Value = client
        .get(&format!("{}/api/tests/history", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["testId"], test_id.as_str());
}

#[tokio::test]
async fn cancel_discards_the_test() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(&format!("{}/api/tests/quick", address))
        .json(&quick_test_body())
        .send()
        .await
        .unwrap();

    let cancelled = client
        .post(&format!("{}/api/tests/current/cancel", address))
        .send()
        .await
        .unwrap();
    assert_eq!(cancelled.status().as_u16(), 204);

    let history: Value = client
        .get(&format!("{}/api/tests/history", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 0);

    // A new test can start right away
    let restarted = client
        .post(&format!("{}/api/tests/quick", address))
        .json(&quick_test_body())
        .send()
        .await
        .unwrap();
    assert_eq!(restarted.status().as_u16(), 201);
}

#[tokio::test]
async fn chapter_test_is_backfilled() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let started = client
        .post(&format!("{}/api/tests/chapter", address))
        .json(&json!({
            "classId": "class-10",
            "subjectId": "science",
            "chapterId": "life-processes"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(started.status().as_u16(), 201);

    let session: Value = started.json().await.unwrap();
    let count = session["questions"].as_array().unwrap().len();
    // 9 concepts in the chapter, topped up to 10.
    assert_eq!(count, 10);
    assert_eq!(session["testType"], "chapter");
}

#[tokio::test]
async fn start_test_rejects_bad_input() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Validation: empty id
    let invalid = client
        .post(&format!("{}/api/tests/quick", address))
        .json(&json!({
            "classId": "",
            "subjectId": "science",
            "chapterId": "life-processes",
            "topicId": "nutrition"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status().as_u16(), 400);

    // Unknown topic
    let unknown = client
        .post(&format!("{}/api/tests/quick", address))
        .json(&json!({
            "classId": "class-10",
            "subjectId": "science",
            "chapterId": "life-processes",
            "topicId": "photosynthesis-2"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 404);

    // Topic without concepts generates nothing to answer
    let empty = client
        .post(&format!("{}/api/tests/quick", address))
        .json(&json!({
            "classId": "class-10",
            "subjectId": "science",
            "chapterId": "life-processes",
            "topicId": "excretion"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status().as_u16(), 400);
}
