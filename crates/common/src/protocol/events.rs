// Events emitted to the embedded front-end.

use serde::{Deserialize, Serialize};

/// One delivery of parse trees for a completed request.
pub const PARSE_RESULT_EVENT: &str = "slash://parse-result";
/// Emitted once after the pipeline finishes loading.
pub const PARSER_READY_EVENT: &str = "slash://parser-ready";

/// Payload of [`PARSE_RESULT_EVENT`]: the originating request id and one
/// tree per sentence, in pipeline order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParseResultPayload {
    pub request_id: u64,
    pub trees: Vec<String>,
}
