pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod i18n;
pub mod llm;
pub mod logging;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{DocsmithError, Result};
pub use generator::types::RunResult;
pub use generator::workflow::{Pipeline, launch};
