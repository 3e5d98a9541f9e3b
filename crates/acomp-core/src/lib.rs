//! # Acomp Core
//!
//! Scatter-gather buffer sets and an async compression offload protocol,
//! modeled after hardware-accelerated transforms: work is submitted
//! without blocking, executes on a separate context, and signals its
//! outcome through a completion token.
//!
//! ## Protocol
//!
//! - [`SgList`] - N physical regions presented as one logical stream
//! - [`AcompRequest`] - reusable request bound to a source/destination pair
//! - [`Submission`] / [`CompletionToken`] - queued-now, resolved-later
//! - [`AcompTransform`] - algorithm instance with its offload worker
//! - [`Registry`] - named engine lookup, pre-seeded with deflate
//!
//! ## Example
//!
//! ```ignore
//! use acomp_core::{alloc_transform, SegmentBuf, SgList};
//!
//! let tfm = alloc_transform("deflate")?;
//! let mut req = tfm.alloc_request();
//! req.set_params(src, dst, slen, dlen);
//! let submission = tfm.compress(&mut req);
//! req.wait(submission)?;
//! println!("produced {} bytes", req.produced());
//! ```

pub mod completion;
pub mod deflate;
pub mod error;
pub mod registry;
pub mod request;
pub mod sg;
pub mod transform;

pub use completion::{Completion, CompletionToken, Submission};
pub use deflate::DeflateEngine;
pub use error::{Error, Result};
pub use registry::{alloc_transform, registry, BlockEngine, Registry};
pub use request::AcompRequest;
pub use sg::{SegmentBuf, SgList};
pub use transform::{AcompTransform, BACKLOG_DEPTH};
