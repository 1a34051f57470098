//! Word record handlers.
//!
//! ```text
//! GET /get_words?userId=a1B2c3D4e5
//! POST /add_word {"userId":"a1B2c3D4e5","word":"resilient"}
//! POST /delete_word {"userId":"a1B2c3D4e5","word":"resilient"}
//! POST /delete_record {"userId":"a1B2c3D4e5",
//!     "key":"6f1c2a9e-4b7d-4c1a-9f3e-2d8b5a7c0e11","expectedVersion":2}
//! POST /fill_missing_content {"userId":"a1B2c3D4e5"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::DeleteRecordRequest;
use crate::domain::{Error, WordRecord, numbered_text};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::legacy_not_found;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserIdRequest;
use crate::inbound::http::validation::{parse_record_key, parse_user_id, parse_word};

const SUCCESS: &str = "success";
const NO_UPDATES: &str = "no updates needed";
/// Every incomplete record changed underneath the pass; a retry may succeed.
const CONFLICTS_PENDING: &str = "conflicts pending";

/// Query string for `GET /get_words`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct GetWordsQuery {
    /// Owner of the records; `user_id` is accepted too.
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
}

/// One stored word as returned to clients.
///
/// `synonyms` and `examples` are display text (`"1. x\n2. y"`); the list
/// forms carry the same items unflattened.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordResponse {
    pub word: String,
    pub pronunciation: String,
    pub definition: String,
    pub synonyms: String,
    pub examples: String,
    pub synonym_list: Vec<String>,
    pub example_list: Vec<String>,
    /// Absent for legacy rows that have not been backfilled yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub version: u64,
    pub complete: bool,
}

impl From<WordRecord> for WordResponse {
    fn from(record: WordRecord) -> Self {
        let complete = record.is_complete();
        let WordRecord {
            key,
            word,
            enrichment,
            version,
            ..
        } = record;
        Self {
            word,
            pronunciation: enrichment.pronunciation,
            definition: enrichment.definition,
            synonyms: numbered_text(&enrichment.synonyms),
            examples: numbered_text(&enrichment.examples),
            synonym_list: enrichment.synonyms,
            example_list: enrichment.examples,
            key: key.map(|key| key.to_string()),
            version,
            complete,
        }
    }
}

/// Request body addressing a word by its text.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordRequest {
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub word: Option<String>,
}

/// Request body for `POST /delete_record`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordBody {
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, alias = "expected_version")]
    pub expected_version: Option<u64>,
}

/// `{"result": ...}` body shared by the mutation endpoints.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ResultResponse {
    pub result: String,
}

impl ResultResponse {
    fn success() -> Self {
        Self {
            result: SUCCESS.to_owned(),
        }
    }
}

/// Response body for `POST /fill_missing_content`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FillMissingResponse {
    pub result: String,
    pub updated: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<usize>,
}

/// List every record owned by a user.
#[utoipa::path(
    get,
    path = "/get_words",
    params(GetWordsQuery),
    responses(
        (status = 200, description = "Records owned by the user", body = [WordResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["words"],
    operation_id = "getWords"
)]
#[get("/get_words")]
pub async fn get_words(
    state: web::Data<HttpState>,
    query: web::Query<GetWordsQuery>,
) -> ApiResult<web::Json<Vec<WordResponse>>> {
    let user_id = parse_user_id(query.into_inner().user_id)?;
    let records = state.words_query.get_words(&user_id).await?;
    Ok(web::Json(records.into_iter().map(WordResponse::from).collect()))
}

/// Enrich a word and store it for the user.
#[utoipa::path(
    post,
    path = "/add_word",
    request_body = WordRequest,
    responses(
        (status = 200, description = "Word stored", body = ResultResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store or completion service unavailable", body = Error)
    ),
    tags = ["words"],
    operation_id = "addWord"
)]
#[post("/add_word")]
pub async fn add_word(
    state: web::Data<HttpState>,
    payload: web::Json<WordRequest>,
) -> ApiResult<web::Json<ResultResponse>> {
    let WordRequest { user_id, word } = payload.into_inner();
    let user_id = parse_user_id(user_id)?;
    let word = parse_word(word)?;
    state.words.add_word(&user_id, &word).await?;
    Ok(web::Json(ResultResponse::success()))
}

/// Delete the first record matching the user and word.
#[utoipa::path(
    post,
    path = "/delete_word",
    request_body = WordRequest,
    responses(
        (status = 200, description = "Word deleted", body = ResultResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Word not found", body = ResultResponse),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["words"],
    operation_id = "deleteWord"
)]
#[post("/delete_word")]
pub async fn delete_word(
    state: web::Data<HttpState>,
    payload: web::Json<WordRequest>,
) -> ApiResult<HttpResponse> {
    let WordRequest { user_id, word } = payload.into_inner();
    let user_id = parse_user_id(user_id)?;
    let word = parse_word(word)?;
    match state.words.delete_word(&user_id, &word).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ResultResponse::success())),
        Err(err) => Ok(legacy_not_found(err)),
    }
}

/// Delete one record by surrogate key, optionally guarded by its version.
#[utoipa::path(
    post,
    path = "/delete_record",
    request_body = DeleteRecordBody,
    responses(
        (status = 200, description = "Record deleted", body = ResultResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Record not found", body = Error),
        (status = 409, description = "Record changed since it was read", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["words"],
    operation_id = "deleteRecord"
)]
#[post("/delete_record")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    payload: web::Json<DeleteRecordBody>,
) -> ApiResult<web::Json<ResultResponse>> {
    let DeleteRecordBody {
        user_id,
        key,
        expected_version,
    } = payload.into_inner();
    let request = DeleteRecordRequest {
        user_id: parse_user_id(user_id)?,
        key: parse_record_key(key)?,
        expected_version,
    };
    state.words.delete_record(request).await?;
    Ok(web::Json(ResultResponse::success()))
}

/// Enrich every incomplete record owned by the user.
#[utoipa::path(
    post,
    path = "/fill_missing_content",
    request_body = UserIdRequest,
    responses(
        (status = 200, description = "Backfill summary", body = FillMissingResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store or completion service unavailable", body = Error)
    ),
    tags = ["words"],
    operation_id = "fillMissingContent"
)]
#[post("/fill_missing_content")]
pub async fn fill_missing_content(
    state: web::Data<HttpState>,
    payload: web::Json<UserIdRequest>,
) -> ApiResult<web::Json<FillMissingResponse>> {
    let user_id = parse_user_id(payload.into_inner().user_id)?;
    let report = state.words.fill_missing_content(&user_id).await?;
    let result = match (report.updated, report.conflicts) {
        (0, 0) => NO_UPDATES,
        (0, _) => CONFLICTS_PENDING,
        _ => SUCCESS,
    };
    Ok(web::Json(FillMissingResponse {
        result: result.to_owned(),
        updated: report.updated,
        conflicts: (report.updated > 0 || report.conflicts > 0).then_some(report.conflicts),
    }))
}

#[cfg(test)]
#[path = "words_tests.rs"]
mod tests;
