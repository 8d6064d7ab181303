//! # nacos-a2a-telemetry
//!
//! Structured logging for agent registration and discovery, built on `tracing`.
//!
//! ## Usage
//!
//! ```rust
//! use nacos_a2a_telemetry::{info, init_telemetry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("my-agent")?;
//!     info!(agent = "my-agent", "registering");
//!     Ok(())
//! }
//! ```

pub mod init;

pub use tracing::{Span, debug, error, info, instrument, trace, warn};

pub use init::{DEFAULT_FILTER, init_json_telemetry, init_telemetry};
