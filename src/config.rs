//! Naming and filtering settings for a pipeline run.

use crate::extract::{ExtractOptions, DEFAULT_INTERNAL_PREFIX};
use crate::tag::DEFAULT_TAG_KEY;
use std::path::{Path, PathBuf};

pub const DEFAULT_PACKAGE_SUFFIX: &str = "_trans";
pub const DEFAULT_FALLBACK_PACKAGE: &str = "hello";
pub const DEFAULT_SOURCE_SUFFIX: &str = ".pb.go";
pub const DEFAULT_OUTPUT_EXTENSION: &str = "go";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fields whose name starts with this prefix are dropped.
    pub internal_prefix: String,
    /// Appended to the source package name.
    pub package_suffix: String,
    /// Output package name when the source package name is empty.
    pub fallback_package: String,
    /// Input file name suffix stripped to form the output base name.
    pub source_suffix: String,
    /// Extension of output files, without the dot.
    pub output_extension: String,
    /// Tag key carried over to output fields.
    pub tag_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            internal_prefix: DEFAULT_INTERNAL_PREFIX.to_string(),
            package_suffix: DEFAULT_PACKAGE_SUFFIX.to_string(),
            fallback_package: DEFAULT_FALLBACK_PACKAGE.to_string(),
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            tag_key: DEFAULT_TAG_KEY.to_string(),
        }
    }
}

impl Config {
    /// Output package name for a source file declaring package `declared`.
    /// Never empty: an empty fallback falls back to [`DEFAULT_FALLBACK_PACKAGE`].
    pub fn output_package(&self, declared: &str) -> String {
        if !declared.is_empty() {
            format!("{}{}", declared, self.package_suffix)
        } else if !self.fallback_package.is_empty() {
            self.fallback_package.clone()
        } else {
            DEFAULT_FALLBACK_PACKAGE.to_string()
        }
    }

    /// Output file name (no directory) for `input`: `orders.pb.go` becomes
    /// `orders.go`. Inputs without the source suffix lose their last
    /// extension instead.
    pub fn output_file_name(&self, input: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stripped = file_name
            .strip_suffix(self.source_suffix.as_str())
            .filter(|stem| !stem.is_empty() && !self.source_suffix.is_empty());
        let base = match stripped {
            Some(stem) => stem.to_string(),
            None => Path::new(&file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.clone()),
        };
        PathBuf::from(format!("{}.{}", base, self.output_extension))
    }

    /// Whether `path` names a file this tool picks up from a directory.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.len() > self.source_suffix.len() && n.ends_with(&self.source_suffix))
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            internal_prefix: self.internal_prefix.clone(),
        }
    }
}
