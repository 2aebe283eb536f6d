//! Turn protoc-generated Go files into plain struct packages.
//!
//! Usage:
//!   pbgo-trans [OPTIONS] <INPUT>...
//!
//! Each input file (or every `*.pb.go` file in an input directory) is
//! transformed independently; a failing input does not stop the others, but
//! makes the process exit with status 1.

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use pbgo_trans::{collect_inputs, read_source, run_file, transform, Config, Diagnostic};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Extract exported message structs from generated `.pb.go` files and write
/// them into a new package with only their `json` tags.
#[derive(Parser)]
#[command(name = "pbgo-trans", author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Input files or directories (directories contribute their `*.pb.go` files)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory the generated files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Print generated sources to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Suffix appended to the source package name
    #[arg(long)]
    package_suffix: Option<String>,

    /// Package name used when the source declares an empty one
    #[arg(long)]
    fallback_package: Option<String>,

    /// Name prefix of generator bookkeeping fields to drop
    #[arg(long)]
    internal_prefix: Option<String>,

    /// File name suffix of generated sources
    #[arg(long)]
    source_suffix: Option<String>,

    /// Struct tag key carried over to the output fields
    #[arg(long)]
    tag_key: Option<String>,

    /// Print every skipped struct and field
    #[arg(short, long)]
    diagnostics: bool,

    /// Human-readable diagnostics
    #[arg(short = 'H', long)]
    human: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(suffix) = &self.package_suffix {
            config.package_suffix = suffix.clone();
        }
        if let Some(name) = &self.fallback_package {
            config.fallback_package = name.clone();
        }
        if let Some(prefix) = &self.internal_prefix {
            config.internal_prefix = prefix.clone();
        }
        if let Some(suffix) = &self.source_suffix {
            config.source_suffix = suffix.clone();
        }
        if let Some(key) = &self.tag_key {
            config.tag_key = key.clone();
        }
        config
    }
}

#[derive(Clone, Copy)]
enum OutputStyle {
    Compact,
    Human,
}

fn print_diagnostic(out: &mut dyn Write, path: &Path, d: &Diagnostic, style: OutputStyle) -> io::Result<()> {
    match style {
        OutputStyle::Compact => writeln!(out, "{}:{}", path.display(), d),
        OutputStyle::Human => {
            writeln!(out, "  {} {}: {}: {}", path.display(), d.position, d.subject(), d.message())?;
            writeln!(out, "    rule: {} ({})", d.reason.rule_id(), d.severity().as_str())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--stdout` output stays clean.
    let level = cli.verbose.tracing_level_filter();
    let filter = EnvFilter::new(format!("warn,pbgo_trans={level}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = cli.config();
    let style = if cli.human {
        OutputStyle::Human
    } else {
        OutputStyle::Compact
    };
    let inputs = collect_inputs(&cli.inputs, &config).context("collecting inputs")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stderr = io::stderr();
    let mut has_error = false;
    let mut written = 0usize;
    let mut skipped = 0usize;

    for input in &inputs {
        let result = if cli.stdout {
            read_source(input).and_then(|source| transform(&source, &config))
        } else {
            run_file(input, &cli.out_dir, &config).map(|outcome| outcome.transformed)
        };
        let transformed = match result {
            Ok(t) => t,
            Err(e) => {
                error!(input = %input.display(), "{}", e);
                has_error = true;
                continue;
            }
        };
        written += 1;
        skipped += transformed.diagnostics.len();
        if cli.stdout {
            out.write_all(&transformed.bytes)?;
        }
        if cli.diagnostics {
            // Generated sources own stdout when printed there.
            let mut err_out = stderr.lock();
            let diag_out: &mut dyn Write = if cli.stdout { &mut err_out } else { &mut out };
            for d in &transformed.diagnostics {
                print_diagnostic(diag_out, input, d, style)?;
            }
        }
    }
    out.flush()?;

    if inputs.len() > 1 || has_error {
        eprintln!(
            "pbgo-trans: {} of {} file(s) transformed, {} item(s) skipped",
            written,
            inputs.len(),
            skipped
        );
    }
    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
