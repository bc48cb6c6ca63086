// Batch Driver
// Runs one sender/recipient exchange per input integer and reports it

use std::fmt;
use std::io::{self, Write};
use std::process::ExitCode;
use std::thread;

use anyhow::Context;
use rand::{thread_rng, Rng};
use tracing::{debug, error, info};

use crate::cli::Cli;
use crate::config::RunConfig;
use crate::errors::{InputError, RsaResult};
use crate::rsa::{Ciphertext, KeyPair, Plaintext, Recipient, Sender, Signature, Verdict};
use crate::util::{parse_tokens, read_line_tokens, LogSink, PROMPT};

/// Everything one exchange produced, printed as five lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub plaintext: Plaintext,
    pub ciphertext: Ciphertext,
    pub signature: Signature,
    pub deciphered: Plaintext,
    pub verdict: Verdict,
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "plaintext = {}", self.plaintext)?;
        writeln!(f, "ciphertext = {}", self.ciphertext)?;
        writeln!(f, "signature = {}", self.signature)?;
        writeln!(f, "decipheredtext = {}", self.deciphered)?;
        writeln!(f, "{}", self.verdict)
    }
}

/// An input whose exchange failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub index: usize,
    pub value: Plaintext,
    pub reason: String,
}

/// Outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failures: Vec<Failure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run one exchange for `value` with fresh keys from the thread-local RNG
pub fn process_value(value: &Plaintext, config: &RunConfig) -> RsaResult<Transcript> {
    process_value_with_rng(&mut thread_rng(), value, config)
}

/// Run one exchange for `value`: fresh sender and recipient key pairs,
/// then encrypt, sign, decrypt and verify
pub fn process_value_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    value: &Plaintext,
    config: &RunConfig,
) -> RsaResult<Transcript> {
    let sender_keys = KeyPair::generate_with_rng(rng, config.modulus_bits, config.primality_rounds)?;
    let sender = Sender::from_key_pair(&sender_keys).with_range_policy(config.range_policy);

    let recipient_keys =
        KeyPair::generate_with_rng(rng, config.modulus_bits, config.primality_rounds)?;
    let recipient = Recipient::from_key_pair(&recipient_keys);

    let ciphertext = sender.encrypt(recipient.public_key(), value)?;
    let signature = sender.sign(value);
    let deciphered = recipient.decrypt(&ciphertext);
    let verdict = Verdict::from(recipient.verify_signature(
        sender.public_key(),
        &deciphered,
        &signature,
    ));

    Ok(Transcript {
        plaintext: value.clone(),
        ciphertext,
        signature,
        deciphered,
        verdict,
    })
}

/// Process every value and write the transcripts to `out` in input order
///
/// A failed exchange is logged and recorded in the report; the rest of the
/// batch still runs. With `config.parallel` each value gets its own scoped
/// thread, logging into the same sink.
pub fn run<W: Write>(
    values: &[Plaintext],
    config: &RunConfig,
    sink: &LogSink,
    out: &mut W,
) -> anyhow::Result<BatchReport> {
    let mut report = BatchReport::default();

    if config.parallel {
        let results: Vec<RsaResult<Transcript>> = thread::scope(|scope| {
            let handles: Vec<_> = values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    scope.spawn(move || {
                        sink.in_scope(|| {
                            info!(index, "processing value");
                            process_value(value, config)
                        })
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload)))
                .collect()
        });

        for (index, (value, result)) in values.iter().zip(results).enumerate() {
            record(&mut report, out, sink, index, value, result)?;
        }
    } else {
        for (index, value) in values.iter().enumerate() {
            let result = sink.in_scope(|| {
                info!(index, "processing value");
                process_value(value, config)
            });
            record(&mut report, out, sink, index, value, result)?;
        }
    }

    Ok(report)
}

fn record<W: Write>(
    report: &mut BatchReport,
    out: &mut W,
    sink: &LogSink,
    index: usize,
    value: &Plaintext,
    result: RsaResult<Transcript>,
) -> anyhow::Result<()> {
    report.processed += 1;

    match result {
        Ok(transcript) => {
            write!(out, "{}", transcript).context("failed to write output")?;
        }
        Err(err) => {
            sink.in_scope(|| error!(index, "exchange for {} failed: {}", value, err));
            report.failures.push(Failure {
                index,
                value: value.clone(),
                reason: err.to_string(),
            });
        }
    }

    Ok(())
}

/// Entry point behind the binary
///
/// Invalid input aborts before any key is generated: nothing is written to
/// stdout and the exit status is a failure.
pub fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    let (config, tokens) = cli.into_parts();

    let sink = match &config.log_file {
        Some(path) => LogSink::open(path, &config.log_filter)
            .context("failed to open the diagnostic log")?,
        None => LogSink::disabled(),
    };

    let outcome = sink.in_scope(|| run_session(&config, tokens, &sink));

    sink.close().context("failed to close the diagnostic log")?;
    outcome
}

fn run_session(config: &RunConfig, tokens: Vec<String>, sink: &LogSink) -> anyhow::Result<ExitCode> {
    debug!("Start of program");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let tokens = if tokens.is_empty() {
        writeln!(out, "{}", PROMPT)?;
        out.flush()?;
        read_line_tokens(io::stdin().lock())?
    } else {
        tokens
    };

    let values = match parse_tokens(&tokens) {
        Ok(values) => values,
        Err(err @ (InputError::InvalidToken { .. } | InputError::EmptyInput)) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err).context("failed to collect input"),
    };

    let report = run(&values, config, sink, &mut out)?;
    out.flush()?;

    for failure in &report.failures {
        eprintln!(
            "Error: value #{} ({}) failed: {}",
            failure.index + 1,
            failure.value,
            failure.reason
        );
    }

    debug!(processed = report.processed, failed = report.failures.len(), "End of program");

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
