//! A thin client for the Optimizely X experimentation platform's REST API,
//! built for CI/CD pipeline tasks that read and update experiments,
//! features, environments, and audiences.
//!
//! # Overview
//!
//! The crate revolves around an [`ApiClient`] that authenticates with a
//! bearer token and exposes lookup and update operations: resolving
//! human-readable identifiers (project id, environment name, audience name)
//! to the platform's internal identifiers, and forwarding get/update calls
//! for experiments and features by id.
//!
//! The client is stateless: nothing is cached between calls, every lookup
//! re-fetches from the server, and all failures are terminal for the
//! operation in progress. The calling orchestrator decides whether to abort
//! the overall task.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. There is no local retry and
//! no fallback path; every error propagates immediately to the caller.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for
//! logging messages under the `optimizely` target. Raw response bodies are
//! emitted at debug level to aid post-hoc troubleshooting.
//!
//! # Examples
//!
//! ```no_run
//! use optimizely_client::{ApiClientConfig, Result};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     env_logger::init();
//!
//!     let client = ApiClientConfig::new("https://api.optimizely.com/v2", "my-token")
//!         .to_client()?;
//!
//!     let project = client.get_project("12345").await?;
//!     let audience_id = client.get_audience_id(&project.id, "Beta Users").await?;
//!     println!("audience id: {}", audience_id);
//!     Ok(())
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

pub mod models;

mod client;
mod config;
mod error;

pub use client::ApiClient;
pub use config::ApiClientConfig;
pub use error::{Error, Result};
