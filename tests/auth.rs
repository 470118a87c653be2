use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{test, App};
use pretty_assertions::assert_eq;
use serde_json::json;

use taskhive::auth::TokenService;
use taskhive::routes;
use taskhive::state::AppState;
use taskhive::store::MemoryStore;

const TEST_SECRET: &str = "integration-test-secret";

fn test_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()), TokenService::new(TEST_SECRET))
}

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;

    // Register a new user
    let register_payload = json!({
        "username": "integration_user",
        "password": "Password123!"
    });
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body_bytes = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes)
    );

    let registered: serde_json::Value =
        serde_json::from_slice(&body_bytes).expect("Failed to parse register response JSON");
    assert_eq!(registered["status"], 201);
    assert_eq!(registered["result"]["username"], "integration_user");
    assert_eq!(registered["result"]["taskRefs"], json!([]));
    assert!(
        registered["result"].get("passwordHash").is_none(),
        "Credential digest must never appear in a response"
    );

    // Registering the same username again hits the uniqueness constraint
    let req_conflict = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let resp_conflict = test::call_service(&app, req_conflict).await;
    let status_conflict = resp_conflict.status();
    let body_conflict = test::read_body(resp_conflict).await;
    assert_eq!(
        status_conflict,
        actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        "Duplicate registration did not surface as a storage failure. Body: {:?}",
        String::from_utf8_lossy(&body_conflict)
    );
    let conflict: serde_json::Value =
        serde_json::from_slice(&body_conflict).expect("Failed to parse conflict response JSON");
    assert_eq!(conflict["status"], 500);
    assert_eq!(conflict["error"], "DuplicateKeyError");
    assert_eq!(conflict["dbError"], "duplicate_key");

    // Login with the registered credentials
    let login_payload = json!({
        "username": "integration_user",
        "password": "Password123!"
    });
    let req_login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&login_payload)
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    let status_login = resp_login.status();
    let body_login = test::read_body(resp_login).await;
    assert_eq!(
        status_login,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body_login)
    );

    let login: serde_json::Value =
        serde_json::from_slice(&body_login).expect("Failed to parse login response JSON");
    let auth_token = login["authToken"]
        .as_str()
        .expect("authToken should be a string");
    assert!(
        auth_token.starts_with("JWT "),
        "authToken must carry the JWT scheme prefix, got {:?}",
        auth_token
    );
    assert_eq!(login["result"]["username"], "integration_user");
    assert_eq!(
        login["result"]["id"], registered["result"]["id"],
        "Login must identify the registered user"
    );

    // The issued token opens the protected scope
    let req_tasks = test::TestRequest::get()
        .uri("/api/tasks/my-tasks")
        .append_header(("Authorization", auth_token))
        .to_request();
    let resp_tasks = test::call_service(&app, req_tasks).await;
    assert_eq!(resp_tasks.status(), actix_web::http::StatusCode::OK);

    let tasks: serde_json::Value = test::read_body_json(resp_tasks).await;
    assert_eq!(tasks["result"], json!([]));
}

#[test_log::test(actix_rt::test)]
async fn test_register_rejects_missing_fields() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;

    let test_cases = vec![
        (json!({ "password": "Password123!" }), "missing username"),
        (json!({ "username": "someone" }), "missing password"),
        (json!({}), "missing both fields"),
        (
            json!({ "username": "   ", "password": "Password123!" }),
            "blank username",
        ),
        (
            json!({ "username": "someone", "password": "" }),
            "empty password",
        ),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            actix_web::http::StatusCode::BAD_REQUEST,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes).expect("Failed to parse error envelope");
        assert_eq!(body["status"], 400, "Envelope status for {}", description);
        assert_eq!(
            body["message"], "Username and password are required",
            "Envelope message for {}",
            description
        );
    }
}

#[test_log::test(actix_rt::test)]
async fn test_login_failure_modes() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;

    // Seed one account
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "login_user", "password": "Password123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success(), "Setup: registration failed");

    let test_cases = vec![
        (
            json!({ "username": "nobody_here", "password": "Password123!" }),
            actix_web::http::StatusCode::NOT_FOUND,
            "unknown username",
        ),
        (
            json!({ "username": "login_user", "password": "WrongPassword!" }),
            actix_web::http::StatusCode::FORBIDDEN,
            "wrong password",
        ),
        (
            json!({ "username": "login_user" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing password",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }
}

#[test_log::test(actix_rt::test)]
async fn test_usernames_are_case_insensitive() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "Alice", "password": "Password123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let registered: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        registered["result"]["username"], "alice",
        "Usernames are stored lowercased"
    );

    // A different casing of the same name is a duplicate
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "ALICE", "password": "Other456!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(status, actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DuplicateKeyError");

    // Login works regardless of the casing presented
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "aLiCe", "password": "Password123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
}
