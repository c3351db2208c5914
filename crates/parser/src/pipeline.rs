// Pipeline client: one-time load handshake, then per-request annotation.

use std::future::Future;
use std::path::Path;

use slash_common::document::AnnotatedDocument;
use slash_common::protocol::methods::{
    AnnotateParams, PipelineLoadParams, PipelineLoadResult, DOCUMENT_ANNOTATE, PIPELINE_LOAD,
};
use tokio::process::Command;
use tracing::info;

use crate::config::ParserConfig;
use crate::error::ServiceError;
use crate::worker::WorkerHandle;

/// Entry class of the JVM worker, resolved on the resource classpath.
const WORKER_MAIN_CLASS: &str = "reader.pipeline.StdioWorker";
const DEFAULT_JAVA_BIN: &str = "java";

/// Seam between the bridge and the external parsing service.
pub trait ParserService: Send + Sync + 'static {
    fn annotate(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<AnnotatedDocument, ServiceError>> + Send;
}

/// A loaded parsing pipeline backed by the JVM worker process.
pub struct Pipeline {
    worker: WorkerHandle,
}

impl Pipeline {
    /// Spawn the JVM worker and run the `pipeline.load` handshake. Any
    /// failure here is an initialization failure and terminal: the caller
    /// gets no pipeline and the bridge is never wired up.
    pub async fn load(config: &ParserConfig) -> Result<Self, ServiceError> {
        let resource_dir = config
            .resource_dir
            .as_deref()
            .ok_or_else(|| ServiceError::initialization("resource_dir is not configured"))?;
        let java_bin = config.java_bin.as_deref().unwrap_or(DEFAULT_JAVA_BIN);

        let mut command = Command::new(java_bin);
        command
            .arg("-cp")
            .arg(format!("{}/*", resource_dir.display()))
            .arg(WORKER_MAIN_CLASS);

        Self::load_with_command(command, resource_dir).await
    }

    /// Spawn `command` as the worker and run the load handshake. Split out
    /// so tests can supply a stub worker process.
    pub async fn load_with_command(
        command: Command,
        resource_dir: &Path,
    ) -> Result<Self, ServiceError> {
        let worker = WorkerHandle::spawn(command)
            .map_err(|error| ServiceError::initialization(error.to_string()))?;

        let params = PipelineLoadParams { path: resource_dir.display().to_string() };
        let params = serde_json::to_value(&params)
            .map_err(|error| ServiceError::initialization(error.to_string()))?;
        let result = worker
            .request(PIPELINE_LOAD, Some(params))
            .await
            .map_err(|error| ServiceError::initialization(error.to_string()))?;

        let loaded: PipelineLoadResult = serde_json::from_value(result).map_err(|error| {
            ServiceError::initialization(format!("malformed load response: {error}"))
        })?;
        if !loaded.ok {
            return Err(ServiceError::initialization("worker reported pipeline not loaded"));
        }

        info!(resource_dir = %resource_dir.display(), "pipeline loaded");
        Ok(Self { worker })
    }
}

impl ParserService for Pipeline {
    fn annotate(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<AnnotatedDocument, ServiceError>> + Send {
        async move {
            let params = AnnotateParams { text: text.to_string() };
            let params = serde_json::to_value(&params)
                .map_err(|error| ServiceError::parse(error.to_string()))?;
            let result = self
                .worker
                .request(DOCUMENT_ANNOTATE, Some(params))
                .await
                .map_err(|error| ServiceError::parse(error.to_string()))?;

            serde_json::from_value(result).map_err(|error| {
                ServiceError::parse(format!("worker returned a malformed document: {error}"))
            })
        }
    }
}
