//! Tests for user identity and nickname handlers.

use super::*;
use crate::domain::ports::{
    MockIdentityCommand, MockNicknameCommand, NicknameEntry,
};
use crate::domain::{Nickname, UserId};
use crate::inbound::http::state::HttpStatePorts;
use actix_web::{App, http::StatusCode, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn state_with(identity: MockIdentityCommand, nicknames: MockNicknameCommand) -> HttpState {
    HttpState::new(HttpStatePorts {
        identity: Arc::new(identity),
        nicknames: Arc::new(nicknames),
        ..HttpStatePorts::default()
    })
}

async fn post_json(state: HttpState, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(crate::inbound::http::json_config())
            .service(get_or_create_user)
            .service(check_nickname)
            .service(update_nickname)
            .service(get_nicknames_and_ids),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(&body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

#[rstest]
#[actix_web::test]
async fn get_or_create_user_returns_identifier() {
    let mut identity = MockIdentityCommand::new();
    identity
        .expect_get_or_create_user()
        .withf(|email| email.as_ref() == "learner@example.com")
        .times(1)
        .return_once(|_| Ok(UserId::new("a1B2c3D4e5").expect("valid")));

    let (status, body) = post_json(
        state_with(identity, MockNicknameCommand::new()),
        "/get_or_create_user",
        json!({ "email": " learner@example.com " }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "userId": "a1B2c3D4e5" }));
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({ "email": "no-at-sign" }), "malformed")]
#[actix_web::test]
async fn get_or_create_user_rejects_bad_email(#[case] body: Value, #[case] code: &str) {
    let (status, body) = post_json(
        state_with(MockIdentityCommand::new(), MockNicknameCommand::new()),
        "/get_or_create_user",
        body,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "email");
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn get_or_create_user_surfaces_outage() {
    let mut identity = MockIdentityCommand::new();
    identity
        .expect_get_or_create_user()
        .return_once(|_| Err(Error::service_unavailable("tabular store unavailable")));

    let (status, body) = post_json(
        state_with(identity, MockNicknameCommand::new()),
        "/get_or_create_user",
        json!({ "email": "learner@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}

#[rstest]
#[case(json!({ "userId": "u1" }))]
#[case(json!({ "user_id": "u1" }))]
#[actix_web::test]
async fn check_nickname_accepts_both_key_styles(#[case] body: Value) {
    let mut nicknames = MockNicknameCommand::new();
    nicknames
        .expect_check_nickname()
        .withf(|id| id.as_ref() == "u1")
        .return_once(|_| Ok(Nickname::new("Kai").expect("valid")));

    let (status, body) = post_json(
        state_with(MockIdentityCommand::new(), nicknames),
        "/check_nickname",
        body,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "nickname": "Kai" }));
}

#[rstest]
#[case("user not found")]
#[case("nickname not set")]
#[actix_web::test]
async fn check_nickname_not_found_uses_result_body(#[case] message: &'static str) {
    let mut nicknames = MockNicknameCommand::new();
    nicknames
        .expect_check_nickname()
        .return_once(move |_| Err(Error::not_found(message)));

    let (status, body) = post_json(
        state_with(MockIdentityCommand::new(), nicknames),
        "/check_nickname",
        json!({ "userId": "u1" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "result": message }));
}

#[rstest]
#[actix_web::test]
async fn update_nickname_reports_success() {
    let mut nicknames = MockNicknameCommand::new();
    nicknames
        .expect_update_nickname()
        .withf(|id, nickname| id.as_ref() == "u1" && nickname.as_ref() == "Kai")
        .times(1)
        .return_once(|_, _| Ok(()));

    let (status, body) = post_json(
        state_with(MockIdentityCommand::new(), nicknames),
        "/update_nickname",
        json!({ "user_id": "u1", "nickname": " Kai " }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}

#[rstest]
#[actix_web::test]
async fn update_nickname_unknown_user_is_404() {
    let mut nicknames = MockNicknameCommand::new();
    nicknames
        .expect_update_nickname()
        .return_once(|_, _| Err(Error::not_found("user not found")));

    let (status, body) = post_json(
        state_with(MockIdentityCommand::new(), nicknames),
        "/update_nickname",
        json!({ "userId": "ghost", "nickname": "Kai" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "result": "user not found" }));
}

#[rstest]
#[actix_web::test]
async fn update_nickname_rejects_blank_nickname() {
    let (status, body) = post_json(
        state_with(MockIdentityCommand::new(), MockNicknameCommand::new()),
        "/update_nickname",
        json!({ "userId": "u1", "nickname": "  " }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "nickname");
}

#[rstest]
#[actix_web::test]
async fn nicknames_map_keeps_first_owner() {
    let mut nicknames = MockNicknameCommand::new();
    nicknames
        .expect_nicknames_for()
        .withf(|emails| emails.len() == 3)
        .return_once(|_| {
            Ok(vec![
                NicknameEntry {
                    nickname: Nickname::new("Kai").expect("valid"),
                    user_id: user_id("u1"),
                },
                NicknameEntry {
                    nickname: Nickname::new("Mei").expect("valid"),
                    user_id: user_id("u2"),
                },
                NicknameEntry {
                    nickname: Nickname::new("Kai").expect("valid"),
                    user_id: user_id("u3"),
                },
            ])
        });

    let (status, body) = post_json(
        state_with(MockIdentityCommand::new(), nicknames),
        "/get_nicknames_and_ids",
        json!({ "emails": ["a@x.io", "b@x.io", "c@x.io"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Kai": "u1", "Mei": "u2" }));
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_invalid_request() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(
                MockIdentityCommand::new(),
                MockNicknameCommand::new(),
            )))
            .app_data(crate::inbound::http::json_config())
            .service(get_or_create_user),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/get_or_create_user")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value =
        serde_json::from_slice(&actix_test::read_body(response).await).expect("error body");
    assert_eq!(body["code"], "invalid_request");
}
