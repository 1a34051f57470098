//! HTTP inbound adapter exposing the vocabulary endpoints.

use actix_web::{error::InternalError, web};

use crate::domain::Error;

pub mod error;
pub mod health;
pub mod state;
pub mod users;
pub mod validation;
pub mod words;

pub use error::ApiResult;

/// JSON extractor config rendering body errors as `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, invalid_body(message)).into()
    })
}

/// Query extractor config rendering query errors as `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, invalid_body(message)).into()
    })
}

fn invalid_body(message: String) -> actix_web::HttpResponse {
    actix_web::ResponseError::error_response(&Error::invalid_request(message))
}

/// Register extractor configs and every vocabulary route on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use vocab_backend::inbound::http::{configure, state::{HttpState, HttpStatePorts}};
///
/// let state = HttpState::new(HttpStatePorts::default());
/// let _app = App::new()
///     .app_data(web::Data::new(state))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(users::get_or_create_user)
        .service(users::check_nickname)
        .service(users::update_nickname)
        .service(users::get_nicknames_and_ids)
        .service(words::get_words)
        .service(words::add_word)
        .service(words::delete_word)
        .service(words::delete_record)
        .service(words::fill_missing_content);
}
