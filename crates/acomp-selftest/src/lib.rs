//! # Acomp Self-Test
//!
//! Correctness harness for the async compression offload protocol:
//! compress a multi-segment input stream, decompress the result, and
//! verify the round trip reproduces the original bytes.
//!
//! The original hardware diagnostic ran at module load and logged its
//! outcome on unload; here that lifecycle is two plain calls,
//! [`run_self_test`] and [`shutdown_message`], invoked by whatever
//! driver embeds the harness.
//!
//! ## Example
//!
//! ```ignore
//! use acomp_selftest::{run_self_test, shutdown_message, SelfTestConfig};
//!
//! let report = run_self_test(&SelfTestConfig::default())?;
//! println!("compressed {} -> {} bytes", report.src_total, report.compressed_len);
//! shutdown_message();
//! ```

pub mod config;
pub mod error;
pub mod harness;
pub mod verify;

pub use config::SelfTestConfig;
pub use error::{Result, SelfTestError};
pub use harness::{run_self_test, shutdown_message, SelfTestReport};
pub use verify::verify_round_trip;
