//! # pbgo-trans: plain Go structs from generated protobuf code
//!
//! Reads a protoc-generated Go file (`*.pb.go`), picks out its exported
//! message structs and writes them into a new package as plain structs that
//! only carry `json` tags. Consumers can then depend on simple data types
//! instead of the generated message types and their runtime.
//!
//! ## Pipeline
//!
//! - [`parser::parse`]: Go source -> [`SourceUnit`] (PEST grammar)
//! - [`extract::extract`]: exported struct declarations -> [`StructDescriptor`]s,
//!   dropping `XXX_` bookkeeping fields and unsupported field types
//! - [`render::render`]: descriptors -> Go source of the new package
//! - [`pipeline`]: naming, file I/O and the whole chain for one file
//!
//! ## Field types
//!
//! Only `T`, `*T`, `[]T` and `[]*T` with a plain type name `T` are carried
//! over. Maps, qualified types (`*timestamppb.Timestamp`), inline structs,
//! interfaces, funcs, channels, arrays and nested pointers/slices are skipped
//! and reported as [`Diagnostic`]s; they never fail a run.
//!
//! ## Example
//!
//! ```text
//! type Order struct {
//! 	ID               string   `protobuf:"bytes,1,opt,name=id" json:"id"`
//! 	Items            []*Item  `protobuf:"bytes,2,rep,name=items"`
//! 	XXX_unrecognized []byte   `json:"-"`
//! }
//! ```
//!
//! becomes
//!
//! ```text
//! type Order struct {
//! 	ID string `json:"id"`
//! 	Items []*Item
//! }
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod schema;
pub mod tag;

pub use ast::{Decl, Field, Position, SourceUnit, TypeExpr, TypeSpec};
pub use config::Config;
pub use diagnostics::{Diagnostic, Severity, SkipReason};
pub use error::Error;
pub use extract::{extract, ExtractOptions, Extraction};
pub use parser::parse;
pub use pipeline::{collect_inputs, read_source, run_file, transform, write_source, Outcome, Transformed};
pub use render::{render, render_with_tag_key};
pub use schema::{FieldDescriptor, FieldShape, StructDescriptor};
pub use tag::TagInfo;
