//! Munin - caching front-end for generative text operations
//!
//! Munin sits between small clients (for example a reading tool that
//! looks words up as the user selects them) and an OpenAI-compatible
//! chat backend. Translations are cached in Postgres keyed by
//! (keyword, context), so a repeat lookup costs one SELECT instead of
//! one paid generation. Format and summarize pass through uncached.
//! A per-client token bucket limiter sits in front of everything.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use munin::config::Config;
//! use munin::generate::OpenAiGenerator;
//! use munin::store::PgCacheStore;
//! use munin::telemetry::Metrics;
//! use munin::{Operation, OperationRequest, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> munin::Result<()> {
//!     let config = Config::default();
//!     let registry = prometheus::Registry::new();
//!     let metrics = Metrics::new(&registry)?;
//!
//!     let store = PgCacheStore::connect("postgres://localhost/munin", &config.database).await?;
//!     store.ensure_schema().await?;
//!     let generator = OpenAiGenerator::new(&config.backend, "api-key".to_string())?;
//!
//!     let orchestrator = Orchestrator::new(
//!         Arc::new(store),
//!         Arc::new(generator),
//!         config.prompts.clone(),
//!         metrics,
//!         config.server.max_param_len,
//!     );
//!
//!     let request = OperationRequest::new(Operation::Translate, "虫子", "程序里有个虫子。");
//!     println!("{}", orchestrator.handle(&request).await?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod limiter;
pub mod pipeline;
pub mod prompt;
pub mod server;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use error::{MuninError, Result};
pub use generate::{Generator, OpenAiGenerator};
pub use limiter::RateLimiter;
pub use pipeline::Orchestrator;
pub use prompt::{Prompt, PromptSet};
pub use store::{CacheEntry, CacheStore, PgCacheStore};
pub use telemetry::Metrics;
pub use types::{Operation, OperationRequest};
pub use version::{PKG_VERSION, version_string};
