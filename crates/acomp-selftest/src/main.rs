//! Acomp round-trip self-test driver.
//!
//! ## Usage
//!
//! ```bash
//! # Default layout: two 16 KiB segments through deflate
//! acomp-selftest
//!
//! # Single-segment layout of the same total size
//! acomp-selftest --segments 1 --segment-size 32768
//!
//! # Exercise a different registered algorithm
//! acomp-selftest --algorithm deflate --log-level debug
//! ```

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use acomp_selftest::{run_self_test, shutdown_message, SelfTestConfig};

#[derive(Parser, Debug)]
#[command(name = "acomp-selftest")]
#[command(version)]
#[command(about = "Compress/decompress round-trip self-test", long_about = None)]
struct Args {
    /// Algorithm to acquire from the registry
    #[arg(long, default_value = "deflate")]
    algorithm: String,

    /// Number of segments per stream
    #[arg(long, default_value = "2")]
    segments: usize,

    /// Size of each source segment in bytes
    #[arg(long, default_value = "16384")]
    segment_size: usize,

    /// Size of each compressed-destination segment in bytes
    /// (defaults to the source segment size)
    #[arg(long)]
    dst_segment_size: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let config = SelfTestConfig {
        algorithm: args.algorithm,
        segment_count: args.segments,
        segment_size: args.segment_size,
        dst_segment_size: args.dst_segment_size.unwrap_or(args.segment_size),
    };

    match run_self_test(&config) {
        Ok(report) => {
            info!(
                algorithm = %report.algorithm,
                segments = report.segment_count,
                src_total = report.src_total,
                compressed = report.compressed_len,
                decompressed = report.decompressed_len,
                "round trip verified"
            );
            shutdown_message();
        }
        Err(err) => {
            shutdown_message();
            // Negative harness status becomes a positive exit code.
            std::process::exit(-err.code());
        }
    }
}
