// Run Configuration
// Settings shared by the CLI, the batch driver and the RSA core

use std::path::PathBuf;

use clap::ValueEnum;

use crate::rsa::bigint::MILLER_RABIN_ROUNDS;
use crate::rsa::keygen::DEFAULT_MODULUS_BITS;

/// Log file used when none is given
pub const DEFAULT_LOG_FILE: &str = "textbook_rsa.log";

/// What to do with a plaintext outside [1, n) at encryption time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum RangePolicy {
    /// Log a warning and encrypt anyway; the value wraps mod n
    #[default]
    Warn,
    /// Refuse to encrypt
    Reject,
}

/// Configuration for a batch run
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub modulus_bits: u64,
    pub primality_rounds: u32,
    pub range_policy: RangePolicy,
    pub parallel: bool,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            modulus_bits: DEFAULT_MODULUS_BITS,
            primality_rounds: MILLER_RABIN_ROUNDS,
            range_policy: RangePolicy::Warn,
            parallel: false,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            log_filter: "debug".to_string(),
        }
    }
}

impl RunConfig {
    pub fn with_modulus_bits(mut self, bits: u64) -> Self {
        self.modulus_bits = bits;
        self
    }

    pub fn with_primality_rounds(mut self, rounds: u32) -> Self {
        self.primality_rounds = rounds;
        self
    }

    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// `None` turns the log file off
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_program() {
        let config = RunConfig::default();
        assert_eq!(config.modulus_bits, 1024);
        assert_eq!(config.primality_rounds, 64);
        assert_eq!(config.range_policy, RangePolicy::Warn);
        assert!(!config.parallel);
        assert_eq!(config.log_file, Some(PathBuf::from(DEFAULT_LOG_FILE)));
    }

    #[test]
    fn test_builders() {
        let config = RunConfig::default()
            .with_modulus_bits(512)
            .with_primality_rounds(10)
            .with_range_policy(RangePolicy::Reject)
            .with_parallel(true)
            .with_log_file(None)
            .with_log_filter("warn");
        assert_eq!(config.modulus_bits, 512);
        assert_eq!(config.primality_rounds, 10);
        assert_eq!(config.range_policy, RangePolicy::Reject);
        assert!(config.parallel);
        assert!(config.log_file.is_none());
        assert_eq!(config.log_filter, "warn");
    }
}
