pub mod client;
pub mod types;

pub use client::{ConformanceClient, REQUEST_TIMEOUT};
pub use types::ModuleInfo;
