//! Syntax tree for the parsed subset of Go source.
//!
//! Only the parts of a file that schema extraction looks at are modelled in
//! detail: the package clause, imports and type declarations. Function, var
//! and const declarations are kept as opaque entries so the declaration order
//! of the file is preserved.

use std::fmt;

/// 1-based line/column of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    /// Declared package name (`package foo`).
    pub package: String,
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
}

impl SourceUnit {
    /// All import specs across every import declaration, in order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls.iter().flat_map(|d| match d {
            Decl::Import(specs) => specs.as_slice(),
            _ => &[][..],
        })
    }

    /// All type specs across every type declaration group, in order.
    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.decls.iter().flat_map(|d| match d {
            Decl::Type(specs) => specs.as_slice(),
            _ => &[][..],
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Import(Vec<ImportSpec>),
    /// A `type` declaration; a parenthesised group yields several specs.
    Type(Vec<TypeSpec>),
    /// `func`, `var` or `const`, parsed at the token level only.
    Other { keyword: DeclKeyword, position: Position },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Func,
    Var,
    Const,
}

impl DeclKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKeyword::Func => "func",
            DeclKeyword::Var => "var",
            DeclKeyword::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// `.`, `_` or a package alias.
    pub alias: Option<String>,
    /// Unquoted import path.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    /// `type A = B`
    pub alias: bool,
    /// Declares type parameters (`type Box[T any] ...`).
    pub generic: bool,
    pub ty: TypeExpr,
    pub position: Position,
}

/// Go type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `T`, `pkg.T`, `T[A, B]`
    Name {
        package: Option<String>,
        name: String,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array { len: String, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// Function type; the signature after `func` is kept as normalized text.
    Func(String),
    Struct(Vec<Field>),
    /// Interface type; the body is kept as normalized text.
    Interface(String),
}

impl TypeExpr {
    /// Plain unqualified, non-generic type name.
    pub fn plain_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Name {
                package: None,
                name,
                args,
            } if args.is_empty() => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// One field line of a struct body.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Empty for embedded fields; several for `A, B int`.
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// Raw tag literal including its quotes or backquotes.
    pub tag: Option<String>,
    pub position: Position,
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name {
                package,
                name,
                args,
            } => {
                if let Some(pkg) = package {
                    write!(f, "{}.", pkg)?;
                }
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "[")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, "]")?;
                }
                Ok(())
            }
            TypeExpr::Pointer(inner) => write!(f, "*{}", inner),
            TypeExpr::Slice(elem) => write!(f, "[]{}", elem),
            TypeExpr::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {}", elem),
                ChanDir::Send => write!(f, "chan<- {}", elem),
                ChanDir::Recv => write!(f, "<-chan {}", elem),
            },
            TypeExpr::Func(signature) => write!(f, "func{}", signature),
            TypeExpr::Struct(fields) => {
                if fields.is_empty() {
                    return write!(f, "struct{{}}");
                }
                write!(f, "struct {{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    if !field.names.is_empty() {
                        write!(f, "{} ", field.names.join(", "))?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                write!(f, " }}")
            }
            TypeExpr::Interface(body) => {
                if body.is_empty() {
                    write!(f, "interface{{}}")
                } else {
                    write!(f, "interface {{ {} }}", body)
                }
            }
        }
    }
}
