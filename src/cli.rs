// Command Line Interface
// Flags and positional integers, turned into a RunConfig

use std::path::PathBuf;

use clap::Parser;

use crate::config::{RangePolicy, RunConfig, DEFAULT_LOG_FILE};
use crate::rsa::bigint::MILLER_RABIN_ROUNDS;
use crate::rsa::keygen::DEFAULT_MODULUS_BITS;

/// Textbook RSA: for each integer, generate sender and recipient keys,
/// encrypt, sign, decrypt and verify.
#[derive(Debug, Parser)]
#[command(name = "textbook-rsa", version, about)]
pub struct Cli {
    /// Integers to encrypt; read from one line of stdin when omitted
    #[arg(allow_hyphen_values = true)]
    pub values: Vec<String>,

    /// Modulus size in bits for every generated key
    #[arg(long, default_value_t = DEFAULT_MODULUS_BITS)]
    pub bits: u64,

    /// Miller-Rabin rounds per prime candidate (at least 1)
    #[arg(
        long,
        default_value_t = MILLER_RABIN_ROUNDS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub rounds: u32,

    /// What to do with a plaintext outside [1, n)
    #[arg(long, value_enum, default_value_t = RangePolicy::Warn)]
    pub range_policy: RangePolicy,

    /// Process every integer on its own thread
    #[arg(long)]
    pub parallel: bool,

    /// Append-only diagnostic log
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Do not write the diagnostic log
    #[arg(long)]
    pub no_log: bool,

    /// Log filter directive, e.g. "debug" or "warn"
    #[arg(long, default_value = "debug")]
    pub log_filter: String,
}

impl Cli {
    /// Split into the run configuration and the raw integer tokens
    pub fn into_parts(self) -> (RunConfig, Vec<String>) {
        let log_file = if self.no_log { None } else { Some(self.log_file) };

        let config = RunConfig::default()
            .with_modulus_bits(self.bits)
            .with_primality_rounds(self.rounds)
            .with_range_policy(self.range_policy)
            .with_parallel(self.parallel)
            .with_log_file(log_file)
            .with_log_filter(self.log_filter);

        (config, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["textbook-rsa", "5", "42"]).unwrap();
        let (config, values) = cli.into_parts();
        assert_eq!(values, vec!["5", "42"]);
        assert_eq!(config.modulus_bits, DEFAULT_MODULUS_BITS);
        assert_eq!(config.primality_rounds, MILLER_RABIN_ROUNDS);
        assert_eq!(config.range_policy, RangePolicy::Warn);
        assert_eq!(config.log_file, Some(PathBuf::from(DEFAULT_LOG_FILE)));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "textbook-rsa",
            "--bits",
            "512",
            "--rounds",
            "20",
            "--range-policy",
            "reject",
            "--parallel",
            "--no-log",
            "7",
        ])
        .unwrap();
        let (config, values) = cli.into_parts();
        assert_eq!(values, vec!["7"]);
        assert_eq!(config.modulus_bits, 512);
        assert_eq!(config.primality_rounds, 20);
        assert_eq!(config.range_policy, RangePolicy::Reject);
        assert!(config.parallel);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_no_values_means_stdin() {
        let cli = Cli::try_parse_from(["textbook-rsa"]).unwrap();
        let (_, values) = cli.into_parts();
        assert!(values.is_empty());
    }

    #[test]
    fn test_negative_looking_values_reach_the_validator() {
        let cli = Cli::try_parse_from(["textbook-rsa", "5", "-3"]).unwrap();
        let (_, values) = cli.into_parts();
        assert_eq!(values, vec!["5", "-3"]);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let result = Cli::try_parse_from(["textbook-rsa", "--rounds", "0", "5"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["textbook-rsa", "--rounds", "1", "5"]).unwrap();
        assert_eq!(cli.rounds, 1);
    }
}
