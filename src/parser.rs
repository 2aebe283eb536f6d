//! Parse Go source into a [`SourceUnit`] using PEST.

use crate::ast::*;
use crate::error::Error;
use crate::tag::unquote;
use pest::error::{ErrorVariant, LineColLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct GoParser;

/// Parse Go source text.
pub fn parse(source: &str) -> Result<SourceUnit, Error> {
    let pairs = GoParser::parse(Rule::file, source).map_err(syntax_error)?;
    let pair = pairs
        .into_iter()
        .next()
        .ok_or_else(|| Error::parse(Position::new(1, 1), "empty parse"))?;
    build_file(pair)
}

fn syntax_error(e: pest::error::Error<Rule>) -> Error {
    let (line, column) = match e.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    let message = match &e.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => match (positives.is_empty(), negatives.is_empty()) {
            (false, true) => format!("expected {}", rule_list(positives)),
            (true, false) => format!("unexpected {}", rule_list(negatives)),
            (false, false) => format!(
                "expected {}, found {}",
                rule_list(positives),
                rule_list(negatives)
            ),
            (true, true) => "unexpected input".to_string(),
        },
        ErrorVariant::CustomError { message } => message.clone(),
    };
    Error::parse(Position::new(line, column), message)
}

fn rule_list(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(|r| format!("{:?}", r))
        .collect::<Vec<_>>()
        .join(" or ")
}

fn position(pair: &Pair<Rule>) -> Position {
    let (line, column) = pair.line_col();
    Position::new(line, column)
}

fn build_file(pair: Pair<Rule>) -> Result<SourceUnit, Error> {
    let start = position(&pair);
    let mut package = None;
    let mut decls = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::package_clause => package = Some(build_package_clause(inner)?),
            Rule::import_decl => decls.push(Decl::Import(build_import_decl(inner)?)),
            Rule::type_decl => decls.push(Decl::Type(build_type_decl(inner)?)),
            Rule::other_decl => decls.push(build_other_decl(inner)?),
            _ => {}
        }
    }

    Ok(SourceUnit {
        package: package.ok_or_else(|| Error::parse(start, "missing package clause"))?,
        decls,
    })
}

fn build_package_clause(pair: Pair<Rule>) -> Result<String, Error> {
    let pos = position(&pair);
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| Error::parse(pos, "package clause: missing name"))
}

// ==================== Imports ====================

fn build_import_decl(pair: Pair<Rule>) -> Result<Vec<ImportSpec>, Error> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::import_spec)
        .map(build_import_spec)
        .collect()
}

fn build_import_spec(pair: Pair<Rule>) -> Result<ImportSpec, Error> {
    let pos = position(&pair);
    let mut alias = None;
    let mut path = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::import_alias => alias = Some(inner.as_str().to_string()),
            Rule::string_lit => {
                path = Some(
                    unquote(inner.as_str())
                        .ok_or_else(|| Error::parse(position(&inner), "invalid import path literal"))?,
                )
            }
            _ => {}
        }
    }
    Ok(ImportSpec {
        alias,
        path: path.ok_or_else(|| Error::parse(pos, "import spec: missing path"))?,
    })
}

// ==================== Type declarations ====================

fn build_type_decl(pair: Pair<Rule>) -> Result<Vec<TypeSpec>, Error> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::type_spec)
        .map(build_type_spec)
        .collect()
}

fn build_type_spec(pair: Pair<Rule>) -> Result<TypeSpec, Error> {
    let pos = position(&pair);
    let mut name = None;
    let mut alias = false;
    let mut generic = false;
    let mut ty = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => name = Some(inner.as_str().to_string()),
            Rule::type_params => generic = true,
            Rule::alias_marker => alias = true,
            rule if is_type_rule(rule) => ty = Some(build_type(inner)?),
            _ => {}
        }
    }
    Ok(TypeSpec {
        name: name.ok_or_else(|| Error::parse(pos, "type spec: missing name"))?,
        alias,
        generic,
        ty: ty.ok_or_else(|| Error::parse(pos, "type spec: missing type"))?,
        position: pos,
    })
}

fn is_type_rule(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::pointer_type
            | Rule::slice_type
            | Rule::array_type
            | Rule::map_type
            | Rule::chan_type
            | Rule::func_type
            | Rule::struct_type
            | Rule::interface_type
            | Rule::paren_type
            | Rule::type_name
    )
}

fn build_type(pair: Pair<Rule>) -> Result<TypeExpr, Error> {
    let pos = position(&pair);
    match pair.as_rule() {
        Rule::type_name => build_type_name(pair),
        Rule::pointer_type => Ok(TypeExpr::Pointer(Box::new(build_first_type(pair)?))),
        Rule::slice_type => Ok(TypeExpr::Slice(Box::new(build_first_type(pair)?))),
        Rule::paren_type => build_first_type(pair),
        Rule::array_type => {
            let mut len = None;
            let mut elem = None;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::array_len => len = Some(normalize(inner.as_str())),
                    rule if is_type_rule(rule) => elem = Some(build_type(inner)?),
                    _ => {}
                }
            }
            Ok(TypeExpr::Array {
                len: len.ok_or_else(|| Error::parse(pos, "array type: missing length"))?,
                elem: Box::new(elem.ok_or_else(|| Error::parse(pos, "array type: missing element"))?),
            })
        }
        Rule::map_type => {
            let mut types = pair
                .into_inner()
                .filter(|p| is_type_rule(p.as_rule()))
                .map(build_type);
            let key = types
                .next()
                .ok_or_else(|| Error::parse(pos, "map type: missing key"))??;
            let value = types
                .next()
                .ok_or_else(|| Error::parse(pos, "map type: missing value"))??;
            Ok(TypeExpr::Map {
                key: Box::new(key),
                value: Box::new(value),
            })
        }
        Rule::chan_type => {
            let mut dir = ChanDir::Both;
            let mut elem = None;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::chan_dir => {
                        let text: String = inner.as_str().split_whitespace().collect();
                        dir = match text.as_str() {
                            "<-chan" => ChanDir::Recv,
                            "chan<-" => ChanDir::Send,
                            _ => ChanDir::Both,
                        };
                    }
                    rule if is_type_rule(rule) => elem = Some(build_type(inner)?),
                    _ => {}
                }
            }
            Ok(TypeExpr::Chan {
                dir,
                elem: Box::new(elem.ok_or_else(|| Error::parse(pos, "chan type: missing element"))?),
            })
        }
        Rule::func_type => {
            let text = pair.as_str().trim_start();
            let signature = text.strip_prefix("func").unwrap_or(text);
            Ok(TypeExpr::Func(normalize(signature)))
        }
        Rule::interface_type => {
            let text = pair.as_str();
            let body = match (text.find('{'), text.rfind('}')) {
                (Some(open), Some(close)) if open < close => &text[open + 1..close],
                _ => "",
            };
            Ok(TypeExpr::Interface(normalize(body)))
        }
        Rule::struct_type => {
            let fields = pair
                .into_inner()
                .filter(|p| p.as_rule() == Rule::field_decl)
                .map(build_field)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeExpr::Struct(fields))
        }
        other => Err(Error::parse(pos, format!("unhandled type rule: {:?}", other))),
    }
}

fn build_first_type(pair: Pair<Rule>) -> Result<TypeExpr, Error> {
    let pos = position(&pair);
    let inner = pair
        .into_inner()
        .find(|p| is_type_rule(p.as_rule()))
        .ok_or_else(|| Error::parse(pos, "missing element type"))?;
    build_type(inner)
}

fn build_type_name(pair: Pair<Rule>) -> Result<TypeExpr, Error> {
    let pos = position(&pair);
    let mut idents = Vec::new();
    let mut args = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => idents.push(inner.as_str().to_string()),
            Rule::type_args => {
                for arg in inner.into_inner().filter(|p| is_type_rule(p.as_rule())) {
                    args.push(build_type(arg)?);
                }
            }
            _ => {}
        }
    }
    let mut idents = idents.into_iter();
    let first = idents
        .next()
        .ok_or_else(|| Error::parse(pos, "type name: missing identifier"))?;
    let (package, name) = match idents.next() {
        Some(second) => (Some(first), second),
        None => (None, first),
    };
    Ok(TypeExpr::Name {
        package,
        name,
        args,
    })
}

fn build_field(pair: Pair<Rule>) -> Result<Field, Error> {
    let pos = position(&pair);
    let mut names = Vec::new();
    let mut ty = None;
    let mut tag = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::named_field => {
                for part in inner.into_inner() {
                    match part.as_rule() {
                        Rule::ident_list => {
                            names = part
                                .into_inner()
                                .filter(|p| p.as_rule() == Rule::ident)
                                .map(|p| p.as_str().to_string())
                                .collect();
                        }
                        rule if is_type_rule(rule) => ty = Some(build_type(part)?),
                        _ => {}
                    }
                }
            }
            Rule::embedded_field => {
                let mut pointer = false;
                for part in inner.into_inner() {
                    match part.as_rule() {
                        Rule::embedded_pointer => pointer = true,
                        Rule::type_name => ty = Some(build_type_name(part)?),
                        _ => {}
                    }
                }
                if pointer {
                    ty = ty.map(|t| TypeExpr::Pointer(Box::new(t)));
                }
            }
            Rule::tag => tag = Some(inner.as_str().trim().to_string()),
            _ => {}
        }
    }
    Ok(Field {
        names,
        ty: ty.ok_or_else(|| Error::parse(pos, "field: missing type"))?,
        tag,
        position: pos,
    })
}

// ==================== Other declarations ====================

fn build_other_decl(pair: Pair<Rule>) -> Result<Decl, Error> {
    let pos = position(&pair);
    let keyword = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::other_keyword)
        .ok_or_else(|| Error::parse(pos, "declaration: missing keyword"))?;
    let keyword = match keyword.as_str() {
        "func" => DeclKeyword::Func,
        "var" => DeclKeyword::Var,
        "const" => DeclKeyword::Const,
        other => return Err(Error::parse(pos, format!("unknown declaration keyword: {}", other))),
    };
    Ok(Decl::Other {
        keyword,
        position: pos,
    })
}

/// Collapse runs of whitespace (including newlines) to single spaces.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
