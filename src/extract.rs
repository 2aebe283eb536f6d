//! Declaration extractor: exported struct types of a parsed file, with
//! bookkeeping fields and unrepresentable field types filtered out.

use crate::ast::{Decl, Field, SourceUnit, TypeExpr, TypeSpec};
use crate::diagnostics::{Diagnostic, SkipReason};
use crate::schema::{is_exported, FieldDescriptor, FieldShape, StructDescriptor};
use tracing::debug;

/// Name prefix of fields injected by the protocol compiler (`XXX_unrecognized`,
/// `XXX_sizecache`, ...).
pub const DEFAULT_INTERNAL_PREFIX: &str = "XXX_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub internal_prefix: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            internal_prefix: DEFAULT_INTERNAL_PREFIX.to_string(),
        }
    }
}

/// Structs in declaration order plus everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub structs: Vec<StructDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extract every exported top-level struct declaration of `unit`.
///
/// Never fails: skipped structs and fields are recorded as diagnostics.
pub fn extract(unit: &SourceUnit, options: &ExtractOptions) -> Extraction {
    let mut out = Extraction::default();
    for decl in &unit.decls {
        let Decl::Type(specs) = decl else {
            continue;
        };
        for spec in specs {
            let TypeExpr::Struct(fields) = &spec.ty else {
                continue;
            };
            let skip = if !is_exported(&spec.name) {
                Some(SkipReason::UnexportedStruct)
            } else if spec.generic {
                Some(SkipReason::GenericStruct)
            } else {
                None
            };
            if let Some(reason) = skip {
                record(
                    &mut out.diagnostics,
                    Diagnostic {
                        position: spec.position,
                        struct_name: spec.name.clone(),
                        field: None,
                        reason,
                    },
                );
                continue;
            }
            let descriptor = build_struct(spec, fields, options, &mut out.diagnostics);
            debug!(
                struct_name = %descriptor.name,
                fields = descriptor.fields.len(),
                "extracted struct"
            );
            out.structs.push(descriptor);
        }
    }
    out
}

fn build_struct(
    spec: &TypeSpec,
    fields: &[Field],
    options: &ExtractOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> StructDescriptor {
    let mut descriptors = Vec::with_capacity(fields.len());
    for field in fields {
        if field.names.is_empty() {
            record(
                diagnostics,
                Diagnostic {
                    position: field.position,
                    struct_name: spec.name.clone(),
                    field: None,
                    reason: SkipReason::EmbeddedField {
                        type_text: field.ty.to_string(),
                    },
                },
            );
            continue;
        }
        // Classified once per line; `A, B T` shares the shape and tag.
        let shape = FieldShape::classify(&field.ty);
        for name in &field.names {
            let reason = if name.starts_with(&options.internal_prefix) {
                SkipReason::InternalField
            } else if let Some(shape) = &shape {
                descriptors.push(FieldDescriptor {
                    name: name.clone(),
                    shape: shape.clone(),
                    tag: field.tag.clone(),
                });
                continue;
            } else {
                SkipReason::UnsupportedShape {
                    type_text: field.ty.to_string(),
                }
            };
            record(
                diagnostics,
                Diagnostic {
                    position: field.position,
                    struct_name: spec.name.clone(),
                    field: Some(name.clone()),
                    reason,
                },
            );
        }
    }
    StructDescriptor {
        name: spec.name.clone(),
        fields: descriptors,
    }
}

fn record(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    diagnostic.emit();
    diagnostics.push(diagnostic);
}
