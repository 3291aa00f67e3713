//! Logging setup for the logsift binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or to whichever application embeds the pipeline).
//!
//! ```ignore
//! use logsift::observability::init_tracing;
//!
//! fn main() {
//!     init_tracing(0);
//!     // ... run the pipeline
//! }
//! ```

pub mod tracing;

pub use self::tracing::{default_directive, init_tracing, LOG_ENV_VAR};
