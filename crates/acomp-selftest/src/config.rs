//! Self-test configuration.

use serde::Deserialize;

use crate::error::{Result, SelfTestError};

/// Self-test configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SelfTestConfig {
    /// Algorithm to acquire from the registry
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Number of segments each stream is partitioned into
    #[serde(default = "default_segment_count")]
    pub segment_count: usize,

    /// Size of each source (and decode) segment, bytes
    #[serde(default = "default_segment_size")]
    pub segment_size: usize,

    /// Size of each compressed-destination segment, bytes
    #[serde(default = "default_segment_size")]
    pub dst_segment_size: usize,
}

fn default_algorithm() -> String {
    "deflate".to_owned()
}

fn default_segment_count() -> usize {
    2
}

fn default_segment_size() -> usize {
    16384
}

impl Default for SelfTestConfig {
    fn default() -> Self {
        SelfTestConfig {
            algorithm: default_algorithm(),
            segment_count: default_segment_count(),
            segment_size: default_segment_size(),
            dst_segment_size: default_segment_size(),
        }
    }
}

impl SelfTestConfig {
    /// Reject configurations that cannot describe a runnable test.
    pub fn validate(&self) -> Result<()> {
        if self.segment_count == 0 {
            return Err(SelfTestError::InvalidConfig("segment count must be >= 1"));
        }
        Ok(())
    }

    /// Total logical source length: `segment_count * segment_size`.
    pub fn src_total(&self) -> usize {
        self.segment_count * self.segment_size
    }

    /// Total offered destination capacity.
    pub fn dst_total(&self) -> usize {
        self.segment_count * self.dst_segment_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_two_by_16k_layout() {
        let config = SelfTestConfig::default();
        assert_eq!(config.algorithm, "deflate");
        assert_eq!(config.segment_count, 2);
        assert_eq!(config.segment_size, 16384);
        assert_eq!(config.src_total(), 32768);
        assert_eq!(config.dst_total(), 32768);
        config.validate().unwrap();
    }

    #[test]
    fn zero_segments_is_invalid() {
        let config = SelfTestConfig {
            segment_count: 0,
            ..SelfTestConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SelfTestError::InvalidConfig(_))
        ));
    }
}
