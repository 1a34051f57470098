//! Translate driven-port failures into the error envelope.

use serde_json::json;
use tracing::{error, warn};

use super::Error;
use super::ports::{CompletionSourceError, SheetClientError};

/// Map a tabular store failure. Remote failures become
/// `service_unavailable`; requests this service built wrongly become
/// `internal_error`.
pub(crate) fn store_failure(err: SheetClientError) -> Error {
    if err.is_upstream_unavailable() {
        warn!(kind = err.kind(), error = %err, "tabular store call failed");
        Error::service_unavailable("tabular store unavailable")
            .with_details(json!({ "upstream": "sheets", "kind": err.kind() }))
    } else {
        error!(kind = err.kind(), error = %err, "tabular store rejected request");
        Error::internal(err.to_string())
    }
}

/// Map a completion service failure that was not absorbed.
pub(crate) fn completion_failure(err: CompletionSourceError) -> Error {
    warn!(kind = err.kind(), error = %err, "completion call failed");
    Error::service_unavailable("completion service unavailable")
        .with_details(json!({ "upstream": "completion", "kind": err.kind() }))
}
