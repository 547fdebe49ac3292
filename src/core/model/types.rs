//! Resolved TypeScript types.
//!
//! The model resolves annotations only as far as classification needs: primitive
//! keywords, literal types, unions and type aliases. Every other shape keeps its
//! source text.

use std::fmt;

/// A type after alias expansion and union flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Any,
    Unknown,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Object,
    Null,
    Undefined,
    Void,
    Never,
    StringLiteral(String),
    /// Source text of the number literal.
    NumberLiteral(String),
    BooleanLiteral(bool),
    /// Template literal type, e.g. `` `${Size}-${Variant}` ``.
    Template(String),
    Union(Vec<ResolvedType>),
    /// A named type that is not an alias (interface, class, enum, global).
    Reference { name: String, text: String },
    /// Anything else, with its source text.
    Other(String),
}

impl ResolvedType {
    /// Build a union, flattening nested unions and dropping exact duplicates.
    pub fn union(members: impl IntoIterator<Item = ResolvedType>) -> Self {
        let mut flat: Vec<ResolvedType> = Vec::new();
        for member in members {
            match member {
                ResolvedType::Union(inner) => {
                    for m in inner {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            ResolvedType::Union(flat)
        }
    }

    /// Union constituents, or the type itself.
    pub fn members(&self) -> &[ResolvedType] {
        match self {
            ResolvedType::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, ResolvedType::Union(_))
    }

    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            ResolvedType::String | ResolvedType::StringLiteral(_) | ResolvedType::Template(_)
        )
    }

    pub fn is_number_like(&self) -> bool {
        matches!(self, ResolvedType::Number | ResolvedType::NumberLiteral(_))
    }

    pub fn is_boolean_like(&self) -> bool {
        matches!(
            self,
            ResolvedType::Boolean | ResolvedType::BooleanLiteral(_)
        )
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Any => f.write_str("any"),
            ResolvedType::Unknown => f.write_str("unknown"),
            ResolvedType::String => f.write_str("string"),
            ResolvedType::Number => f.write_str("number"),
            ResolvedType::Boolean => f.write_str("boolean"),
            ResolvedType::BigInt => f.write_str("bigint"),
            ResolvedType::Symbol => f.write_str("symbol"),
            ResolvedType::Object => f.write_str("object"),
            ResolvedType::Null => f.write_str("null"),
            ResolvedType::Undefined => f.write_str("undefined"),
            ResolvedType::Void => f.write_str("void"),
            ResolvedType::Never => f.write_str("never"),
            ResolvedType::StringLiteral(value) => write!(f, "\"{value}\""),
            ResolvedType::NumberLiteral(text) => f.write_str(text),
            ResolvedType::BooleanLiteral(value) => write!(f, "{value}"),
            ResolvedType::Template(text) => f.write_str(text),
            ResolvedType::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            ResolvedType::Reference { text, .. } => f.write_str(text),
            ResolvedType::Other(text) => f.write_str(text),
        }
    }
}
