use enrollment_registry::{AppConfig, AppState, InMemoryRepository, RepositoryState, create_router};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v2/users/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request failed")
    }

    async fn token_for(&self, username: &str, password: &str) -> String {
        let body: Value = self.login(username, password).await.json().await.unwrap();
        body["token"].as_str().expect("token in login response").to_string()
    }
}

async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::new()) as RepositoryState;
    let state = AppState::new(AppConfig::default(), repo);
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_admin_lists_enrollments() {
    let app = spawn_app().await;
    let token = app.token_for("admin1", "pass1").await;

    let response = app
        .client
        .get(app.url("/api/v2/enrollments"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Enrollment Information");
    let s2 = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["studentId"] == "S2")
        .unwrap();
    assert_eq!(
        s2["courses"],
        json!([{ "courseId": "C1" }, { "courseId": "C3" }])
    );
}

#[tokio::test]
async fn test_login_failures() {
    let app = spawn_app().await;

    let wrong = app.login("admin1", "wrong").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let body: Value = wrong.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body.get("token").is_none());

    let missing = app
        .client
        .post(app.url("/api/v2/users/login"))
        .json(&json!({ "username": "admin1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn_app().await;

    let no_token = app
        .client
        .get(app.url("/api/v2/enrollments"))
        .send()
        .await
        .unwrap();
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .client
        .get(app.url("/api/v2/enrollments/S1"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_cannot_list_enrollments() {
    let app = spawn_app().await;
    let token = app.token_for("student1", "pass3").await;

    let response = app
        .client
        .get(app.url("/api/v2/enrollments"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_enrollment_lifecycle() {
    let app = spawn_app().await;
    let token = app.token_for("student1", "pass3").await;
    let enroll = json!({ "studentId": "S1", "courseId": "C1" });

    // 1. Enroll
    let created = app
        .client
        .post(app.url("/api/v2/enrollments/S1"))
        .bearer_auth(&token)
        .json(&enroll)
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let body: Value = created.json().await.unwrap();
    assert_eq!(body["data"], enroll);

    // 2. Same pair again
    let duplicate = app
        .client
        .post(app.url("/api/v2/enrollments/S1"))
        .bearer_auth(&token)
        .json(&enroll)
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // 3. Read back
    let record: Value = app
        .client
        .get(app.url("/api/v2/enrollments/S1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["data"]["courses"], json!(["C2", "C1"]));

    // 4. Delete own record
    let deleted = app
        .client
        .delete(app.url("/api/v2/enrollments/S1"))
        .bearer_auth(&token)
        .json(&json!({ "studentId": "S1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: Value = deleted.json().await.unwrap();
    let remaining = body["data"].as_array().unwrap();
    assert!(!remaining.is_empty());
    assert!(remaining.iter().all(|e| e["studentId"] != "S1"));

    // 5. Gone
    let gone = app
        .client
        .get(app.url("/api/v2/enrollments/S1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_cannot_touch_another_student() {
    let app = spawn_app().await;
    let token = app.token_for("student1", "pass3").await;

    let enroll = app
        .client
        .post(app.url("/api/v2/enrollments/S2"))
        .bearer_auth(&token)
        .json(&json!({ "studentId": "S2", "courseId": "C4" }))
        .send()
        .await
        .unwrap();
    assert_eq!(enroll.status(), StatusCode::FORBIDDEN);

    let delete = app
        .client
        .delete(app.url("/api/v2/enrollments/S2"))
        .bearer_auth(&token)
        .json(&json!({ "studentId": "S2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_body_is_rejected() {
    let app = spawn_app().await;
    let token = app.token_for("student1", "pass3").await;

    let response = app
        .client
        .post(app.url("/api/v2/enrollments/S1"))
        .bearer_auth(&token)
        .json(&json!({ "studentId": "S1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["error"], "Course Id is required");
}

#[tokio::test]
async fn test_reset_restores_fixture() {
    let app = spawn_app().await;
    let token = app.token_for("student2", "pass4").await;

    let deleted = app
        .client
        .delete(app.url("/api/v2/enrollments/S2"))
        .bearer_auth(&token)
        .json(&json!({ "studentId": "S2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    let reset = app
        .client
        .post(app.url("/api/v2/enrollments/reset"))
        .send()
        .await
        .unwrap();
    assert_eq!(reset.status(), StatusCode::OK);

    let restored = app
        .client
        .get(app.url("/api/v2/enrollments/S2"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(restored.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_acknowledges_session() {
    let app = spawn_app().await;
    let token = app.token_for("student3", "pass5").await;

    let response = app
        .client
        .post(app.url("/api/v2/users/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Logout successful");
    assert_eq!(body["token"], token.as_str());
}

#[tokio::test]
async fn test_reset_path_is_not_a_student_record() {
    let app = spawn_app().await;
    let token = app.token_for("admin1", "pass1").await;

    // The reset route owns this path and only accepts POST.
    let response = app
        .client
        .get(app.url("/api/v2/enrollments/reset"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
