use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use urlkey::{DigestAlgorithm, Normalizer, NormalizerOptions};

/// Print canonical identifiers and hashes for URLs.
///
/// URLs are taken from the command line, or from stdin (one per line) when
/// none are given.
#[derive(Debug, Parser)]
#[command(name = "urlkey", version, about)]
struct Cli {
    /// URLs to normalize
    urls: Vec<String>,

    /// Emit one JSON object per URL instead of the labelled text form
    #[arg(long)]
    json: bool,

    /// Digest used for the identifier and canonical URL hashes
    #[arg(long, value_enum, default_value_t = DigestArg::Md5)]
    digest: DigestArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DigestArg {
    Md5,
    Sha256,
}

impl From<DigestArg> for DigestAlgorithm {
    fn from(arg: DigestArg) -> Self {
        match arg {
            DigestArg::Md5 => DigestAlgorithm::Md5,
            DigestArg::Sha256 => DigestAlgorithm::Sha256,
        }
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    let normalizer = Normalizer::with_options(NormalizerOptions {
        digest: cli.digest.into(),
    });
    debug!(digest = normalizer.digest().name(), "normalizer ready");

    let lines: Box<dyn Iterator<Item = io::Result<String>>> = if cli.urls.is_empty() {
        Box::new(io::stdin().lock().lines())
    } else {
        Box::new(cli.urls.into_iter().map(Ok))
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let all_ok = normalize_batch(&normalizer, lines, cli.json, &mut out)?;
    out.flush()?;

    Ok(all_ok)
}

/// Normalize each input line and write the results to `out`.
///
/// Lines that fail to normalize or are not valid UTF-8 are logged and
/// skipped. Returns `false` if any line was skipped.
fn normalize_batch<W: Write>(
    normalizer: &Normalizer,
    lines: impl Iterator<Item = io::Result<String>>,
    json: bool,
    out: &mut W,
) -> Result<bool> {
    let mut all_ok = true;
    let mut first = true;

    for (index, line) in lines.enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!(line = index + 1, error = %err, "skipping unreadable input line");
                all_ok = false;
                continue;
            }
            Err(err) => return Err(err).context("failed to read URLs from stdin"),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let result = match normalizer.normalize(input) {
            Ok(result) => result,
            Err(err) => {
                warn!(url = input, code = err.code(), "skipping URL: {}", err);
                all_ok = false;
                continue;
            }
        };

        if json {
            let record = serde_json::to_string(&result).context("failed to serialize result")?;
            writeln!(out, "{}", record)?;
        } else {
            if !first {
                writeln!(out)?;
            }
            write!(out, "{}", result)?;
        }
        first = false;
    }

    Ok(all_ok)
}

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("urlkey error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
