//! Client for a remote test-orchestration service.
//!
//! [`ConformanceClient`] wraps the service's REST endpoints (test plans,
//! module runs, module info and logs). [`wait_for_state`] polls a module
//! until it reaches a terminal status, checks its result against an
//! accepted set, and reports interrupted runs and timeouts as distinct
//! [`ConformanceError`] variants.
//!
//! ```no_run
//! use conformance_client::{ClientConfig, ConformanceClient, WaitOptions};
//!
//! # async fn run() -> conformance_client::Result<()> {
//! let client = ConformanceClient::new(
//!     ClientConfig::new("https://suite.example.com").with_bearer_token("token"),
//! )?;
//! let outcome = client.wait_for_state("abc123", &WaitOptions::default()).await?;
//! println!("{} / {:?}", outcome.status, outcome.result);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod poller;

pub use api::{ConformanceClient, ModuleInfo};
pub use config::{ClientConfig, WaitDefaults};
pub use error::{ConformanceError, ErrorKind, Result};
pub use poller::{ModuleInfoSource, ModuleOutcome, WaitOptions, wait_for_modules, wait_for_state};
