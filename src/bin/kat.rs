//! # Known-Answer Test Runner
//!
//! Runs the published Speck and Simon test vectors against one or all cipher
//! backends and reports which variants reproduce the reference ciphertexts.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin kat -- [--backend generic|native|all] [--family speck|simon] [-v | -q]
//! ```
//!
//! The exit status is 1 if any vector fails, so the tool can gate a build of an
//! alternate backend.

use clap::{Parser, ValueEnum};
use speck_simon::vectors::{self, Outcome, TestVector};
use speck_simon::{backend_by_name, backends, CipherBackend};
use tracing_subscriber::EnvFilter;

/// Verbosity levels for output control.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Verbosity {
    /// Only print the final pass/fail line
    Quiet,
    /// Print one line per failing variant plus a summary
    Normal,
    /// Print every variant, including the bytes of mismatches
    Verbose,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum FamilyFilter {
    Speck,
    Simon,
}

#[derive(Parser)]
#[command(name = "kat")]
#[command(about = "Check Speck/Simon backends against the published test vectors")]
#[command(version)]
struct Args {
    /// Backend to check, or "all"
    #[arg(short, long, default_value = "all")]
    backend: String,

    /// Only run one family
    #[arg(short, long, value_enum)]
    family: Option<FamilyFilter>,

    /// Print every variant
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print the summary line
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Default)]
struct Tally {
    passed: usize,
    failed: usize,
    skipped: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let verbosity = if args.verbose {
        Verbosity::Verbose
    } else if args.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    };

    let selected: Vec<&'static dyn CipherBackend> = if args.backend.eq_ignore_ascii_case("all") {
        backends().to_vec()
    } else {
        match backend_by_name(&args.backend) {
            Some(backend) => vec![backend],
            None => {
                eprintln!("Unknown backend: {}", args.backend);
                std::process::exit(1);
            }
        }
    };

    let mut total = Tally::default();
    for backend in selected {
        if verbosity == Verbosity::Verbose {
            println!("{}", "-".repeat(46));
            println!("Backend: {}", backend.name());
            println!("{}", "-".repeat(46));
        }
        let tally = run_backend(backend, args.family, verbosity);
        if verbosity != Verbosity::Quiet {
            println!(
                "{:<8} passed {:>2}, failed {:>2}, skipped {:>2}",
                backend.name(),
                tally.passed,
                tally.failed,
                tally.skipped
            );
        }
        total.passed += tally.passed;
        total.failed += tally.failed;
        total.skipped += tally.skipped;
    }

    if total.failed == 0 {
        println!("OK: {} vectors passed", total.passed);
    } else {
        println!("FAILED: {} of {} vectors", total.failed, total.passed + total.failed);
        std::process::exit(1);
    }
}

fn run_backend(
    backend: &dyn CipherBackend,
    family: Option<FamilyFilter>,
    verbosity: Verbosity,
) -> Tally {
    let mut tally = Tally::default();

    for vector in vectors::all().filter(|v| matches_family(v, family)) {
        let outcome = vectors::run(vector, backend);
        match &outcome {
            Outcome::Pass => tally.passed += 1,
            Outcome::Skipped => tally.skipped += 1,
            _ => tally.failed += 1,
        }

        if verbosity == Verbosity::Verbose || (verbosity == Verbosity::Normal && outcome.is_failure())
        {
            print_outcome(vector, &outcome, verbosity);
        }
    }

    tally
}

fn matches_family(vector: &TestVector, family: Option<FamilyFilter>) -> bool {
    match family {
        None => true,
        Some(FamilyFilter::Speck) => vector.variant.starts_with("speck"),
        Some(FamilyFilter::Simon) => vector.variant.starts_with("simon"),
    }
}

fn print_outcome(vector: &TestVector, outcome: &Outcome, verbosity: Verbosity) {
    match outcome {
        Outcome::Pass => println!("  {:<14} ok", vector.variant),
        Outcome::Skipped => println!("  {:<14} skipped", vector.variant),
        Outcome::Error(e) => println!("  {:<14} error: {}", vector.variant, e),
        Outcome::Encrypt { expected, found } | Outcome::Decrypt { expected, found } => {
            let stage = if matches!(outcome, Outcome::Encrypt { .. }) {
                "encrypt"
            } else {
                "decrypt"
            };
            println!("  {:<14} {} mismatch", vector.variant, stage);
            if verbosity == Verbosity::Verbose {
                println!("    expected: {}", hex::encode(expected));
                println!("    found:    {}", hex::encode(found));
            }
        }
    }
}
