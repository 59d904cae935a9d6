// tests/learner_tests.rs

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
    // 1. In-memory SQLite; a single connection that never recycles keeps the
    //    database alive for the whole test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    // 2. Run migrations
    let store = SqliteStateStore::new(pool);
    store.migrate().await.expect("Failed to migrate database");

    // 3. Curriculum and learner state
    let curriculum = CurriculumIndex::load_from_path(CURRICULUM_PATH).expect("Failed to load curriculum");
    let learner = LearnerState::restore(&store, "Tester")
        .await
        .expect("Failed to restore learner");

    let state = AppState {
        store: Arc::new(store),
        curriculum: Arc::new(curriculum),
        learner: Arc::new(Mutex::new(learner)),
    };

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn get_json(client: &reqwest::Client, url: String) -> Value {
    client.get(url).send().await.unwrap().json().await.unwrap()
}

#[tokio::test]
async fn practice_test_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // 1. Create from a chapter
    let created = client
        .post(&format!("{}/api/practice-tests", address))
        .json(&json!({
            "title": "Real Numbers mock",
            "classId": "class-10",
            "subjectId": "mathematics",
            "chapterId": "real-numbers",
            "marksPerQuestion": 2.0,
            "negativeMarking": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let paper: Value = created.json().await.unwrap();
    let id = paper["id"].as_str().unwrap().to_string();
    let count = paper["questions"].as_array().unwrap().len();
    assert_eq!(count, 10);
    assert_eq!(paper["maxMarks"], 20.0);
    assert_eq!(paper["durationMinutes"], 30);
    assert!(paper["questions"][0].get("correctAnswer").is_none());

    let listed = get_json(&client, format!("{}/api/practice-tests", address)).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // 2. Wrong answer count
    let mismatch = client
        .post(&format!("{}/api/practice-tests/{}/submit", address, id))
        .json(&json!({ "answers": [0], "timeTaken": 1000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(mismatch.status().as_u16(), 400);

    // 3. An option the question does not have
    let mut answers = vec![Value::Null; count];
    answers[0] = json!(9);
    let out_of_range = client
        .post(&format!("{}/api/practice-tests/{}/submit", address, id))
        .json(&json!({ "answers": answers, "timeTaken": 1000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(out_of_range.status().as_u16(), 400);

    // 4. Leave everything blank: no marks, no penalty
    let blank = client
        .post(&format!("{}/api/practice-tests/{}/submit", address, id))
        .json(&json!({ "answers": vec![Value::Null; count], "timeTaken": 1000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status().as_u16(), 200);
    let result: Value = blank.json().await.unwrap();
    assert_eq!(result["unanswered"], count);
    assert_eq!(result["penalty"], 0.0);
    assert_eq!(result["obtainedMarks"], 0.0);

    // 5. Unknown paper
    let unknown = client
        .post(&format!("{}/api/practice-tests/nope/submit", address))
        .json(&json!({ "answers": [], "timeTaken": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 404);

    let stats = get_json(&client, format!("{}/api/practice-tests/stats", address)).await;
    assert_eq!(stats["attempts"], 1);
}

#[tokio::test]
async fn practice_test_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/practice-tests", address))
        .json(&json!({
            "title": "Too generous",
            "classId": "class-10",
            "subjectId": "mathematics",
            "chapterId": "real-numbers",
            "marksPerQuestion": 50.0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn leaderboard_by_class() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let all = get_json(&client, format!("{}/api/leaderboard", address)).await;
    let all = all.as_array().unwrap();
    // Six seeded peers plus the learner
    assert_eq!(all.len(), 7);
    assert_eq!(all[0]["rank"], 1);
    assert_eq!(all.iter().filter(|e| e["isCurrentUser"] == true).count(), 1);

    let class_nine = get_json(&client, format!("{}/api/leaderboard?class_id=class-9", address)).await;
    let class_nine = class_nine.as_array().unwrap();
    assert_eq!(class_nine.len(), 2);
    assert_eq!(class_nine[1]["rank"], 2);

    let top = get_json(&client, format!("{}/api/leaderboard?limit=3", address)).await;
    assert_eq!(top.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn lessons_feed_analytics_and_leaderboard() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/lessons/evaporation/complete", address);

    let first: Value = client.post(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(first["newlyCompleted"], true);
    assert_eq!(first["lessonsCompleted"], 1);

    let second: Value = client.post(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(second["newlyCompleted"], false);
    assert_eq!(second["lessonsCompleted"], 1);

    let unknown = client
        .post(&format!("{}/api/lessons/not-a-concept/complete", address))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 404);

    let analytics = get_json(&client, format!("{}/api/analytics", address)).await;
    assert_eq!(analytics["lessonsCompleted"], 1);

    let board = get_json(&client, format!("{}/api/leaderboard", address)).await;
    let me = board
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["isCurrentUser"] == true)
        .cloned()
        .unwrap();
    assert_eq!(me["lessonsCompleted"], 1);
    // 20 per lesson + 10 for a one-day streak
    assert_eq!(me["totalPoints"], 30);
}

#[tokio::test]
async fn credits_feed_analytics_and_leaderboard() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/credits/spend", address);

    let spent = client.post(&url).json(&json!({ "credits": 4 })).send().await.unwrap();
    assert_eq!(spent.status().as_u16(), 200);
    let spent: Value = spent.json().await.unwrap();
    assert_eq!(spent["creditsUsed"], 4);

    let zero = client.post(&url).json(&json!({ "credits": 0 })).send().await.unwrap();
    assert_eq!(zero.status().as_u16(), 400);

    let analytics = get_json(&client, format!("{}/api/analytics", address)).await;
    assert_eq!(analytics["creditsUsed"], 4);

    let board = get_json(&client, format!("{}/api/leaderboard", address)).await;
    let me = board
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["isCurrentUser"] == true)
        .cloned()
        .unwrap();
    assert_eq!(me["creditsUsed"], 4);
    // 5 per credit, no streak yet
    assert_eq!(me["totalPoints"], 20);
}

#[tokio::test]
async fn achievements_listed_and_reset() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let achievements = get_json(&client, format!("{}/api/achievements", address)).await;
    let achievements = achievements.as_array().unwrap();
    assert_eq!(achievements.len(), 9);
    assert!(achievements.iter().all(|a| a["unlockedAt"].is_null()));

    // Take and submit a test so there is something to forget
    client
        .post(&format!("{}/api/tests/quick", address))
        .json(&json!({
            "classId": "class-9",
            "subjectId": "science",
            "chapterId": "matter",
            "topicId": "states-of-matter"
        }))
        .send()
        .await
        .unwrap();
    let submitted = client
        .post(&format!("{}/api/tests/current/submit", address))
        .send()
        .await
        .unwrap();
    assert_eq!(submitted.status().as_u16(), 200);

    let progress = get_json(&client, format!("{}/api/progress", address)).await;
    assert!(progress["totalXp"].as_u64().unwrap() > 0);

    let reset = client
        .post(&format!("{}/api/learner/reset", address))
        .send()
        .await
        .unwrap();
    assert_eq!(reset.status().as_u16(), 204);

    let progress = get_json(&client, format!("{}/api/progress", address)).await;
    assert_eq!(progress["totalXp"], 0);
    assert_eq!(progress["level"], 1);
    let history = get_json(&client, format!("{}/api/tests/history", address)).await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}
