//! User identity and nickname handlers.
//!
//! ```text
//! POST /get_or_create_user {"email":"learner@example.com"}
//! POST /check_nickname {"userId":"a1B2c3D4e5"}
//! POST /update_nickname {"userId":"a1B2c3D4e5","nickname":"Kai"}
//! POST /get_nicknames_and_ids {"emails":["learner@example.com"]}
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::legacy_not_found;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    EMAIL, parse_email, parse_email_list, parse_nickname, parse_user_id,
};

/// Request body for `POST /get_or_create_user`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Response body for `POST /get_or_create_user`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserIdResponse {
    pub user_id: String,
}

/// Request body carrying only a user identifier.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
}

/// Response body for `POST /check_nickname`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct NicknameResponse {
    pub nickname: String,
}

/// Request body for `POST /update_nickname`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNicknameRequest {
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// Response body for `POST /update_nickname`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Request body for `POST /get_nicknames_and_ids`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct EmailsRequest {
    #[serde(default)]
    pub emails: Option<Vec<String>>,
}

/// Return the user id bound to an email, creating one on first sight.
#[utoipa::path(
    post,
    path = "/get_or_create_user",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "User identifier", body = UserIdResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getOrCreateUser"
)]
#[post("/get_or_create_user")]
pub async fn get_or_create_user(
    state: web::Data<HttpState>,
    payload: web::Json<EmailRequest>,
) -> ApiResult<web::Json<UserIdResponse>> {
    let email = parse_email(payload.into_inner().email, EMAIL)?;
    let user_id = state.identity.get_or_create_user(&email).await?;
    Ok(web::Json(UserIdResponse {
        user_id: user_id.to_string(),
    }))
}

/// Return the nickname stored for a user.
#[utoipa::path(
    post,
    path = "/check_nickname",
    request_body = UserIdRequest,
    responses(
        (status = 200, description = "Nickname", body = NicknameResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user or nickname not set"),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "checkNickname"
)]
#[post("/check_nickname")]
pub async fn check_nickname(
    state: web::Data<HttpState>,
    payload: web::Json<UserIdRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id(payload.into_inner().user_id)?;
    match state.nicknames.check_nickname(&user_id).await {
        Ok(nickname) => Ok(HttpResponse::Ok().json(NicknameResponse {
            nickname: nickname.to_string(),
        })),
        Err(err) => Ok(legacy_not_found(err)),
    }
}

/// Set the nickname for an existing user.
#[utoipa::path(
    post,
    path = "/update_nickname",
    request_body = UpdateNicknameRequest,
    responses(
        (status = 200, description = "Nickname stored", body = SuccessResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user"),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateNickname"
)]
#[post("/update_nickname")]
pub async fn update_nickname(
    state: web::Data<HttpState>,
    payload: web::Json<UpdateNicknameRequest>,
) -> ApiResult<HttpResponse> {
    let UpdateNicknameRequest { user_id, nickname } = payload.into_inner();
    let user_id = parse_user_id(user_id)?;
    let nickname = parse_nickname(nickname)?;
    match state.nicknames.update_nickname(&user_id, &nickname).await {
        Ok(()) => Ok(HttpResponse::Ok().json(SuccessResponse { success: true })),
        Err(err) => Ok(legacy_not_found(err)),
    }
}

/// Map nicknames to user ids for the given emails.
///
/// Emails without a user or without a nickname are omitted. When two users
/// share a nickname the first one listed wins.
#[utoipa::path(
    post,
    path = "/get_nicknames_and_ids",
    request_body = EmailsRequest,
    responses(
        (status = 200, description = "Nickname to user id map", body = BTreeMap<String, String>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "getNicknamesAndIds"
)]
#[post("/get_nicknames_and_ids")]
pub async fn get_nicknames_and_ids(
    state: web::Data<HttpState>,
    payload: web::Json<EmailsRequest>,
) -> ApiResult<web::Json<BTreeMap<String, String>>> {
    let emails = parse_email_list(payload.into_inner().emails)?;
    let entries = state.nicknames.nicknames_for(&emails).await?;
    let mut directory = BTreeMap::new();
    for entry in entries {
        directory
            .entry(entry.nickname.to_string())
            .or_insert_with(|| entry.user_id.to_string());
    }
    Ok(web::Json(directory))
}

#[cfg(test)]
mod tests;
