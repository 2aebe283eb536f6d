//! Schema renderer: emit extracted structs as Go source for a new package.

use crate::config::DEFAULT_FALLBACK_PACKAGE;
use crate::schema::{FieldDescriptor, StructDescriptor};
use crate::tag::DEFAULT_TAG_KEY;

/// Render `structs` as the source of package `package`, carrying over `json`
/// tags.
pub fn render(structs: &[StructDescriptor], package: &str) -> Vec<u8> {
    render_with_tag_key(structs, package, DEFAULT_TAG_KEY)
}

/// Render `structs`, keeping only the `tag_key` segment of each field tag.
/// An empty `package` is replaced by the default fallback name.
pub fn render_with_tag_key(structs: &[StructDescriptor], package: &str, tag_key: &str) -> Vec<u8> {
    let package = if package.is_empty() {
        DEFAULT_FALLBACK_PACKAGE
    } else {
        package
    };
    let mut out = format!("package {}\n\n", package);
    for s in structs {
        out.push_str(&format!("type {} struct {{\n", s.name));
        for field in &s.fields {
            out.push_str(&field_line(field, tag_key));
            out.push('\n');
        }
        out.push_str("}\n\n");
    }
    out.into_bytes()
}

fn field_line(field: &FieldDescriptor, tag_key: &str) -> String {
    match field.tag_info(tag_key) {
        Some(tag) => format!("\t{} {} {}", field.name, field.shape, tag.to_literal()),
        None => format!("\t{} {}", field.name, field.shape),
    }
}
