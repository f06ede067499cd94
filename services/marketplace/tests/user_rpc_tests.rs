//! HTTP tests for the `user.*` procedures

mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{rpc, signed_up, test_app, token_for, token_with_email};

#[tokio::test]
async fn procedures_require_a_bearer_token() {
    let app = test_app();

    let (status, body) = rpc(&app, "user.switchRole", None, json!({ "userId": "ada" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "Unauthenticated");

    let (status, _) = rpc(
        &app,
        "user.switchRole",
        Some("not-a-jwt"),
        json!({ "userId": "ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sync_creates_then_updates() {
    let app = test_app();
    let token = token_for("ada");

    let (status, body) = rpc(&app, "user.sync", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "created");
    assert_eq!(body["user"]["id"], "ada");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["isFreelancer"], false);
    assert_eq!(body["user"]["isClient"], false);

    let (_, body) = rpc(&app, "user.sync", Some(&token), json!({})).await;
    assert_eq!(body["outcome"], "updated");
}

#[tokio::test]
async fn sync_follows_a_changed_provider_email() {
    let app = test_app();

    let old = token_with_email("ada", Some("ada@old.example.com"));
    let (status, body) = rpc(&app, "user.sync", Some(&old), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "created");

    let new = token_with_email("ada", Some("ada@new.example.com"));
    for _ in 0..2 {
        let (status, body) = rpc(&app, "user.sync", Some(&new), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "updated");
        assert_eq!(body["user"]["id"], "ada");
        assert_eq!(body["user"]["email"], "ada@new.example.com");
    }

    let (status, body) = rpc(&app, "user.me", Some(&new), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@new.example.com");
}

#[tokio::test]
async fn sync_without_email_is_rejected() {
    let app = test_app();
    let token = token_with_email("ada", None);

    let (status, body) = rpc(&app, "user.sync", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "MissingEmail");
}

#[tokio::test]
async fn me_is_not_found_before_sync() {
    let app = test_app();
    let token = token_for("ada");

    let (status, body) = rpc(&app, "user.me", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "NotFound");

    rpc(&app, "user.sync", Some(&token), json!({})).await;
    let (status, body) = rpc(&app, "user.me", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "ada");
    assert_eq!(body["portfolioProjects"], json!([]));
}

#[tokio::test]
async fn switch_role_oscillates() {
    let app = test_app();
    let token = signed_up(&app, "ada").await;

    let expected = [(true, false), (false, true), (true, false)];
    for (is_freelancer, is_client) in expected {
        let (status, body) =
            rpc(&app, "user.switchRole", Some(&token), json!({ "userId": "ada" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isFreelancer"], is_freelancer);
        assert_eq!(body["isClient"], is_client);
    }
}

#[tokio::test]
async fn dual_role_switches_to_client() {
    let app = test_app();
    let token = signed_up(&app, "ada").await;

    let (status, _) = rpc(
        &app,
        "user.updateRole",
        Some(&token),
        json!({ "userId": "ada", "isFreelancer": true, "isClient": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = rpc(&app, "user.switchRole", Some(&token), json!({ "userId": "ada" })).await;
    assert_eq!(body["isFreelancer"], false);
    assert_eq!(body["isClient"], true);
}

#[tokio::test]
async fn role_changes_on_another_user_are_unauthorized() {
    let app = test_app();
    let ada = signed_up(&app, "ada").await;
    signed_up(&app, "bob").await;

    let (status, body) = rpc(
        &app,
        "user.updateRole",
        Some(&ada),
        json!({ "userId": "bob", "isFreelancer": true, "isClient": false }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "Unauthorized");

    let (status, _) = rpc(&app, "user.switchRole", Some(&ada), json!({ "userId": "bob" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn switch_role_for_unknown_user_is_not_found() {
    let app = test_app();
    let token = token_for("ghost");

    let (status, body) =
        rpc(&app, "user.switchRole", Some(&token), json!({ "userId": "ghost" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "NotFound");
}

#[tokio::test]
async fn update_profile_enforces_unique_usernames() {
    let app = test_app();
    let ada = signed_up(&app, "ada").await;
    let bob = signed_up(&app, "bob").await;

    let (status, body) = rpc(
        &app,
        "user.updateProfile",
        Some(&ada),
        json!({
            "userId": "ada",
            "username": "ada_l",
            "about": "Analytical engines",
            "skills": ["math", "poetry"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada_l");
    assert_eq!(body["skills"], json!(["math", "poetry"]));
    assert_eq!(body["socialLinks"], json!([]));

    // unchanged own username is fine
    let (status, _) = rpc(
        &app,
        "user.updateProfile",
        Some(&ada),
        json!({ "userId": "ada", "username": "ada_l" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = rpc(
        &app,
        "user.updateProfile",
        Some(&bob),
        json!({ "userId": "bob", "username": "ada_l" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "UsernameTaken");
}

#[tokio::test]
async fn update_profile_username_length() {
    let app = test_app();
    let ada = signed_up(&app, "ada").await;

    for (username, expected) in [
        ("ab".to_string(), StatusCode::BAD_REQUEST),
        ("a".repeat(31), StatusCode::BAD_REQUEST),
        ("abc".to_string(), StatusCode::OK),
        ("b".repeat(30), StatusCode::OK),
    ] {
        let (status, body) = rpc(
            &app,
            "user.updateProfile",
            Some(&ada),
            json!({ "userId": "ada", "username": username }),
        )
        .await;
        assert_eq!(status, expected, "username {:?}", username);
        if expected == StatusCode::BAD_REQUEST {
            assert_eq!(body["error"]["kind"], "ValidationFailed");
            assert!(body["error"]["fieldErrors"]["username"].is_array());
        }
    }
}

#[tokio::test]
async fn malformed_body_uses_the_error_envelope() {
    let app = test_app();
    let ada = signed_up(&app, "ada").await;

    let (status, body) = rpc(&app, "user.updateProfile", Some(&ada), json!({ "userId": "ada" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "ValidationFailed");
    assert!(body["error"]["fieldErrors"]["body"].is_array());
}

#[tokio::test]
async fn get_profile_is_open_to_any_authenticated_caller() {
    let app = test_app();
    signed_up(&app, "ada").await;
    let bob = signed_up(&app, "bob").await;

    let (status, body) = rpc(&app, "user.getProfile", Some(&bob), json!({ "userId": "ada" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "ada");
    assert!(body["portfolioProjects"].is_array());

    let (status, _) = rpc(&app, "user.getProfile", None, json!({ "userId": "ada" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
