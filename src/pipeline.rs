//! The request pipeline: cache-aside orchestration.
//!
//! One entry point, [`Orchestrator::handle`], shared by every transport.
//! The flow is validate → lookup → generate → insert. A failed lookup
//! aborts the request; a failed insert only costs the cache entry and
//! the response still goes out.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{MuninError, Result};
use crate::generate::Generator;
use crate::prompt::PromptSet;
use crate::store::CacheStore;
use crate::telemetry::Metrics;
use crate::types::OperationRequest;

/// Transport-independent request pipeline.
///
/// Owns the capability objects and the counters; the HTTP layer only
/// decodes requests and encodes responses.
pub struct Orchestrator {
    store: Arc<dyn CacheStore>,
    generator: Arc<dyn Generator>,
    prompts: PromptSet,
    metrics: Metrics,
    max_param_len: usize,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn CacheStore>,
        generator: Arc<dyn Generator>,
        prompts: PromptSet,
        metrics: Metrics,
        max_param_len: usize,
    ) -> Self {
        Self {
            store,
            generator,
            prompts,
            metrics,
            max_param_len,
        }
    }

    /// Run one request to completion and return the text for the client.
    pub async fn handle(&self, request: &OperationRequest) -> Result<String> {
        match self.run(request).await {
            Ok(result) => Ok(result),
            Err(e) => {
                if matches!(e, MuninError::BadRequest(_)) {
                    warn!(
                        operation = %request.operation,
                        keyword = %request.keyword,
                        context = %request.context,
                        error = %e,
                        "request rejected"
                    );
                } else {
                    error!(
                        operation = %request.operation,
                        keyword = %request.keyword,
                        context = %request.context,
                        error = %e,
                        "request failed"
                    );
                }
                Err(e)
            }
        }
    }

    async fn run(&self, request: &OperationRequest) -> Result<String> {
        self.validate(request)?;
        let operation = request.operation;

        if operation.cached() {
            if let Some(entry) = self
                .store
                .lookup(&request.keyword, &request.context)
                .await?
            {
                self.metrics.record_cache_hit(operation);
                info!(%operation, keyword = %request.keyword, "cache hit");
                return Ok(entry.result);
            }
        }

        self.metrics.record_request(operation);
        let prompt = self
            .prompts
            .build(operation, &request.keyword, &request.context);
        let result = {
            let _timer = self.metrics.generation_timer(operation);
            self.generator.generate(&prompt.system, &prompt.texts).await?
        };
        // The production adapter already rejects empty output; test
        // doubles and future backends go through the same gate.
        if result.is_empty() {
            return Err(MuninError::EmptyGeneration);
        }

        if operation.cached() {
            if let Err(e) = self
                .store
                .insert(&request.keyword, &request.context, &result)
                .await
            {
                warn!(keyword = %request.keyword, error = %e, "cache insert failed");
            }
        }

        info!(%operation, keyword = %request.keyword, "generated");
        Ok(result)
    }

    fn validate(&self, request: &OperationRequest) -> Result<()> {
        if request.keyword.is_empty() {
            return Err(MuninError::BadRequest(
                "missing required parameter: keyword".to_string(),
            ));
        }
        if request.keyword.len() > self.max_param_len {
            return Err(MuninError::BadRequest(format!(
                "keyword exceeds {} bytes",
                self.max_param_len
            )));
        }
        if request.context.len() > self.max_param_len {
            return Err(MuninError::BadRequest(format!(
                "context exceeds {} bytes",
                self.max_param_len
            )));
        }
        Ok(())
    }
}
