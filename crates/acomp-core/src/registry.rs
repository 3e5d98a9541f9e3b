//! Algorithm registry and transform acquisition.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::deflate::DeflateEngine;
use crate::error::{Error, Result};
use crate::transform::AcompTransform;

/// Synchronous codec contract executed by the offload worker.
///
/// Engines see contiguous byte runs; scatter-gather assembly happens in
/// the transform layer before and after each call.
pub trait BlockEngine: Send + Sync {
    /// Registered algorithm name.
    fn name(&self) -> &str;

    /// Compress `input`, returning the encoded stream.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompress `input`, returning the decoded stream.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Name-to-engine map from which transforms are allocated.
#[derive(Default)]
pub struct Registry {
    engines: Mutex<HashMap<String, Arc<dyn BlockEngine>>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-seeded with the built-in engines.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(DeflateEngine::new()));
        registry
    }

    /// Register an engine under its own name, replacing any previous
    /// registration of that name.
    pub fn register(&self, engine: Arc<dyn BlockEngine>) {
        let mut engines = self
            .engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        engines.insert(engine.name().to_owned(), engine);
    }

    /// Allocate a transform context for `algorithm`.
    ///
    /// An unknown name fails immediately with
    /// [`Error::UnknownAlgorithm`]; nothing is allocated in that case.
    pub fn alloc_transform(&self, algorithm: &str) -> Result<AcompTransform> {
        let engine = {
            let engines = self
                .engines
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            engines
                .get(algorithm)
                .cloned()
                .ok_or_else(|| Error::UnknownAlgorithm(algorithm.to_owned()))?
        };
        AcompTransform::spawn(algorithm.to_owned(), engine)
    }
}

/// Process-global registry, pre-seeded with the built-in engines.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::with_builtins)
}

/// Allocate a transform for `algorithm` from the global registry.
pub fn alloc_transform(algorithm: &str) -> Result<AcompTransform> {
    registry().alloc_transform(algorithm)
}
