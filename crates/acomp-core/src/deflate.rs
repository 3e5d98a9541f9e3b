//! Deflate engine backed by `flate2` (zlib framing).

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::registry::BlockEngine;

/// Software deflate codec standing in for a hardware-backed transform.
#[derive(Debug, Clone)]
pub struct DeflateEngine {
    level: Compression,
}

impl DeflateEngine {
    /// Create an engine at the default compression level.
    pub fn new() -> Self {
        Self {
            level: Compression::default(),
        }
    }

    /// Create an engine at an explicit flate2 level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level),
        }
    }
}

impl Default for DeflateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockEngine for DeflateEngine {
    fn name(&self) -> &str {
        "deflate"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
        encoder
            .write_all(input)
            .map_err(|e| Error::backend("deflate", e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| Error::backend("deflate", e.to_string()))
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(input);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| Error::backend("deflate", e.to_string()))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_ramp() {
        let engine = DeflateEngine::new();
        let input: Vec<u8> = (0..4096).map(|i| i as u8).collect();
        let compressed = engine.compress(&input).unwrap();
        assert!(compressed.len() < input.len(), "ramp data must compress");
        let restored = engine.decompress(&compressed).unwrap();
        assert_eq!(restored, input);
    }

    #[test]
    fn empty_input_round_trips() {
        let engine = DeflateEngine::new();
        let compressed = engine.compress(&[]).unwrap();
        assert_eq!(engine.decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn garbage_input_is_a_backend_error() {
        let engine = DeflateEngine::new();
        let err = engine.decompress(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, Error::Backend { algorithm: "deflate", .. }));
    }
}
