// Worker method names and typed params — derived from contracts/worker-methods.json.

use serde::{Deserialize, Serialize};

/// One-time pipeline initialization. Must succeed before any annotate call.
pub const PIPELINE_LOAD: &str = "pipeline.load";
/// Annotate one raw text string into a document of parse trees.
pub const DOCUMENT_ANNOTATE: &str = "document.annotate";

/// All methods the worker dispatches.
pub const WORKER_METHODS: &[&str] = &[PIPELINE_LOAD, DOCUMENT_ANNOTATE];

/// Params for `pipeline.load`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineLoadParams {
    /// Filesystem path to the parser resource directory (model jars).
    pub path: String,
}

/// Result of `pipeline.load`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineLoadResult {
    pub ok: bool,
}

/// Params for `document.annotate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotateParams {
    pub text: String,
}
