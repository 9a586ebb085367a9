//! Shared utilities for the pocket wallet.

pub mod logging;
pub mod redact;

pub use logging::{init_logging, LogFormat, LoggingError};
pub use redact::short_id;
