//! Non-fatal findings from schema extraction.
//!
//! Every struct or field the extractor leaves out produces one [`Diagnostic`].
//! Diagnostics are returned to the caller and also emitted as `tracing`
//! events, so a CLI run shows them without any extra plumbing.

use crate::ast::Position;
use std::fmt;
use tracing::{debug, info, warn};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Expected for generated code (bookkeeping fields, private types).
    Info,
    /// Data that exists in the source but cannot be represented.
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

/// Why something was left out of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Struct name does not start with an uppercase letter.
    UnexportedStruct,
    /// Struct declares type parameters; its fields refer to them.
    GenericStruct,
    /// Field has no name.
    EmbeddedField { type_text: String },
    /// Field name carries the generator's bookkeeping prefix.
    InternalField,
    /// Field type is not `T`, `*T`, `[]T` or `[]*T`.
    UnsupportedShape { type_text: String },
}

impl SkipReason {
    /// Stable identifier for machine-readable output.
    pub fn rule_id(&self) -> &'static str {
        match self {
            SkipReason::UnexportedStruct => "unexported-struct",
            SkipReason::GenericStruct => "generic-struct",
            SkipReason::EmbeddedField { .. } => "embedded-field",
            SkipReason::InternalField => "internal-field",
            SkipReason::UnsupportedShape { .. } => "unsupported-shape",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SkipReason::UnsupportedShape { .. } | SkipReason::GenericStruct => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// A single skipped struct or field with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: Position,
    pub struct_name: String,
    /// `None` when the whole struct was skipped.
    pub field: Option<String>,
    pub reason: SkipReason,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.reason.severity()
    }

    /// `Struct` or `Struct.Field`.
    pub fn subject(&self) -> String {
        match &self.field {
            Some(field) => format!("{}.{}", self.struct_name, field),
            None => self.struct_name.clone(),
        }
    }

    pub fn message(&self) -> String {
        match &self.reason {
            SkipReason::UnexportedStruct => "struct is not exported, skipped".to_string(),
            SkipReason::GenericStruct => "generic struct is not supported, skipped".to_string(),
            SkipReason::EmbeddedField { type_text } => {
                format!("embedded field {} is not supported, skipped", type_text)
            }
            SkipReason::InternalField => "generator bookkeeping field, skipped".to_string(),
            SkipReason::UnsupportedShape { type_text } => {
                format!("unsupported field type {}, skipped", type_text)
            }
        }
    }

    pub(crate) fn emit(&self) {
        let line = self.position.line;
        let subject = self.subject();
        match &self.reason {
            SkipReason::UnsupportedShape { type_text } => {
                warn!(%subject, line, type_text = %type_text, "unsupported field type, skipping")
            }
            SkipReason::UnexportedStruct => info!(%subject, line, "struct is not exported, skipping"),
            SkipReason::GenericStruct => warn!(%subject, line, "generic struct, skipping"),
            SkipReason::EmbeddedField { type_text } => {
                debug!(%subject, line, type_text = %type_text, "embedded field, skipping")
            }
            SkipReason::InternalField => debug!(%subject, line, "bookkeeping field, skipping"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}: {} [{}]",
            self.position,
            self.severity().as_str(),
            self.subject(),
            self.message(),
            self.reason.rule_id()
        )
    }
}
