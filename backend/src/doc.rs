//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every vocabulary endpoint and the health probes. The
//! document is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::users::{
    EmailRequest, EmailsRequest, NicknameResponse, SuccessResponse, UpdateNicknameRequest,
    UserIdRequest, UserIdResponse,
};
use crate::inbound::http::words::{
    DeleteRecordBody, FillMissingResponse, ResultResponse, WordRequest, WordResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vocabulary backend API",
        description = "Per-user vocabulary records with generated pronunciations, definitions, synonyms and examples."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::get_or_create_user,
        crate::inbound::http::users::check_nickname,
        crate::inbound::http::users::update_nickname,
        crate::inbound::http::users::get_nicknames_and_ids,
        crate::inbound::http::words::get_words,
        crate::inbound::http::words::add_word,
        crate::inbound::http::words::delete_word,
        crate::inbound::http::words::delete_record,
        crate::inbound::http::words::fill_missing_content,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        EmailRequest,
        EmailsRequest,
        UserIdRequest,
        UserIdResponse,
        NicknameResponse,
        UpdateNicknameRequest,
        SuccessResponse,
        WordRequest,
        WordResponse,
        DeleteRecordBody,
        ResultResponse,
        FillMissingResponse
    )),
    tags(
        (name = "users", description = "User identity and nicknames"),
        (name = "words", description = "Vocabulary records and enrichment"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    fn word_schema_carries_display_and_list_forms() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let word = schemas.get("WordResponse").expect("WordResponse schema");

        for field in ["synonyms", "synonymList", "examples", "exampleList", "key", "version"] {
            assert_object_schema_has_field(word, field);
        }
    }

    #[rstest]
    #[case("/get_or_create_user")]
    #[case("/get_words")]
    #[case("/delete_record")]
    #[case("/fill_missing_content")]
    #[case("/health/ready")]
    fn document_lists_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
