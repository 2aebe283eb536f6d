//! One file through the whole pipeline: read, parse, extract, render, write.
//!
//! Each run owns everything it creates, so runs over different files are
//! independent and may happen in parallel.

use crate::config::Config;
use crate::diagnostics::Diagnostic;
use crate::error::Error;
use crate::extract::{extract, Extraction};
use crate::parser::parse;
use crate::render::render_with_tag_key;
use crate::schema::StructDescriptor;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// Result of transforming one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Package name used in the generated source.
    pub package: String,
    pub structs: Vec<StructDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
    /// Generated Go source.
    pub bytes: Vec<u8>,
}

/// A file written by [`run_file`].
#[derive(Debug)]
pub struct Outcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub transformed: Transformed,
}

/// Parse `source`, extract its exported structs and render them.
pub fn transform(source: &str, config: &Config) -> Result<Transformed, Error> {
    let unit = parse(source)?;
    let package = config.output_package(&unit.package);
    let Extraction {
        structs,
        diagnostics,
    } = extract(&unit, &config.extract_options());
    let bytes = render_with_tag_key(&structs, &package, &config.tag_key);
    debug!(
        source_package = %unit.package,
        %package,
        structs = structs.len(),
        skipped = diagnostics.len(),
        "transformed source"
    );
    Ok(Transformed {
        package,
        structs,
        diagnostics,
        bytes,
    })
}

pub fn read_source(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so `path` either keeps its old content or gets all of `bytes`.
pub fn write_source(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let write_err = |source: io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    let file = tmp.persist(path).map_err(|e| write_err(e.error))?;
    // Temporary files are created owner-only; generated sources are not secret.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }
    #[cfg(not(unix))]
    drop(file);
    Ok(())
}

/// Transform `input` and write the result into `out_dir`.
///
/// On a parse failure nothing is written.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn run_file(input: &Path, out_dir: &Path, config: &Config) -> Result<Outcome, Error> {
    let source = read_source(input)?;
    let transformed = transform(&source, config)?;
    let output = out_dir.join(config.output_file_name(input));
    if same_file(input, &output) {
        return Err(Error::Write {
            path: output,
            source: io::Error::new(io::ErrorKind::AlreadyExists, "output would overwrite the input file"),
        });
    }
    write_source(&output, &transformed.bytes)?;
    info!(
        output = %output.display(),
        structs = transformed.structs.len(),
        "wrote schema"
    );
    Ok(Outcome {
        input: input.to_path_buf(),
        output,
        transformed,
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Expand `paths` into the list of files to process: directories contribute
/// their source files (non-recursive, sorted by name), files are kept as given.
pub fn collect_inputs(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>, Error> {
    let mut inputs = Vec::new();
    for path in paths {
        if !path.is_dir() {
            inputs.push(path.clone());
            continue;
        }
        let read_err = |source: io::Error| Error::Read {
            path: path.clone(),
            source,
        };
        let mut found = Vec::new();
        for entry in fs::read_dir(path).map_err(read_err)? {
            let entry_path = entry.map_err(read_err)?.path();
            if entry_path.is_file() && config.is_source_file(&entry_path) {
                found.push(entry_path);
            }
        }
        found.sort();
        debug!(dir = %path.display(), files = found.len(), "expanded directory");
        inputs.extend(found);
    }
    Ok(inputs)
}
