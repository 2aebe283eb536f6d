//! Extracted schema: exported structs and the fields that survive filtering.

use crate::ast::TypeExpr;
use crate::tag::TagInfo;
use std::fmt;

/// The field type shapes the schema can express. Each carries the name of
/// the referenced type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// `T`
    Named(String),
    /// `*T`
    PointerToNamed(String),
    /// `[]T`
    SliceOfNamed(String),
    /// `[]*T`
    SliceOfPointerToNamed(String),
}

impl FieldShape {
    /// Classify a type expression; `None` for every other shape (maps,
    /// qualified or generic names, nested pointers, inline structs, ...).
    pub fn classify(ty: &TypeExpr) -> Option<FieldShape> {
        match ty {
            TypeExpr::Name { .. } => ty.plain_name().map(|n| FieldShape::Named(n.to_string())),
            TypeExpr::Pointer(inner) => inner
                .plain_name()
                .map(|n| FieldShape::PointerToNamed(n.to_string())),
            TypeExpr::Slice(elem) => match elem.as_ref() {
                TypeExpr::Pointer(inner) => inner
                    .plain_name()
                    .map(|n| FieldShape::SliceOfPointerToNamed(n.to_string())),
                other => other.plain_name().map(|n| FieldShape::SliceOfNamed(n.to_string())),
            },
            _ => None,
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldShape::Named(n) => write!(f, "{}", n),
            FieldShape::PointerToNamed(n) => write!(f, "*{}", n),
            FieldShape::SliceOfNamed(n) => write!(f, "[]{}", n),
            FieldShape::SliceOfPointerToNamed(n) => write!(f, "[]*{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub shape: FieldShape,
    /// Raw tag literal as written in the source, quotes included.
    pub tag: Option<String>,
}

impl FieldDescriptor {
    /// Serialization segment of the tag for `key`, if the tag has one.
    pub fn tag_info(&self, key: &str) -> Option<TagInfo> {
        self.tag
            .as_deref()
            .and_then(|raw| TagInfo::from_literal(raw, key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Exported identifiers start with an uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
