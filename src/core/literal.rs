//! Typed evaluation of decorator arguments.
//!
//! Decorator options such as `@property({ type: Boolean, reflect: true })` are read
//! without general evaluation: only literal shapes are accepted, anything else is a
//! [`LiteralError`].

use swc_ecma_ast::{Expr, Lit, ObjectLit, Prop, PropName, PropOrSpread, UnaryOp};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("unsupported {shape} in decorator argument")]
    Unsupported { shape: &'static str },
    #[error("unsupported object key in decorator argument")]
    UnsupportedKey,
}

/// A literal value read from source.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    Array(Vec<LiteralValue>),
    /// Object entries in source order.
    Object(Vec<(String, LiteralValue)>),
    /// A bare identifier such as `String` or `Boolean`, kept by name.
    Identifier(String),
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Value of an object entry; `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&LiteralValue> {
        match self {
            LiteralValue::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Evaluate a literal expression.
pub fn evaluate(expr: &Expr) -> Result<LiteralValue, LiteralError> {
    match expr {
        Expr::Lit(Lit::Str(s)) => Ok(LiteralValue::String(
            s.value.as_str().unwrap_or_default().to_string(),
        )),
        Expr::Lit(Lit::Num(n)) => Ok(LiteralValue::Number(n.value)),
        Expr::Lit(Lit::Bool(b)) => Ok(LiteralValue::Boolean(b.value)),
        Expr::Lit(Lit::Null(_)) => Ok(LiteralValue::Null),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => Ok(LiteralValue::String(
            tpl.quasis
                .iter()
                .filter_map(|q| q.cooked.as_ref().and_then(|c| c.as_str()))
                .collect(),
        )),
        Expr::Unary(unary) if unary.op == UnaryOp::Minus => match evaluate(&unary.arg)? {
            LiteralValue::Number(n) => Ok(LiteralValue::Number(-n)),
            _ => Err(LiteralError::Unsupported {
                shape: "unary expression",
            }),
        },
        Expr::Ident(ident) if &*ident.sym == "undefined" => Ok(LiteralValue::Undefined),
        Expr::Ident(ident) => Ok(LiteralValue::Identifier(ident.sym.to_string())),
        Expr::Array(array) => array
            .elems
            .iter()
            .map(|elem| match elem {
                Some(elem) if elem.spread.is_none() => evaluate(&elem.expr),
                Some(_) => Err(LiteralError::Unsupported { shape: "spread" }),
                None => Ok(LiteralValue::Undefined),
            })
            .collect::<Result<_, _>>()
            .map(LiteralValue::Array),
        Expr::Object(object) => evaluate_object(object),
        Expr::Paren(paren) => evaluate(&paren.expr),
        Expr::TsAs(as_expr) => evaluate(&as_expr.expr),
        Expr::TsConstAssertion(assertion) => evaluate(&assertion.expr),
        other => Err(LiteralError::Unsupported {
            shape: expression_shape(other),
        }),
    }
}

fn evaluate_object(object: &ObjectLit) -> Result<LiteralValue, LiteralError> {
    let mut entries = Vec::with_capacity(object.props.len());
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            return Err(LiteralError::Unsupported { shape: "spread" });
        };
        match &**prop {
            Prop::KeyValue(kv) => entries.push((key_text(&kv.key)?, evaluate(&kv.value)?)),
            Prop::Shorthand(ident) => {
                let name = ident.sym.to_string();
                entries.push((name.clone(), LiteralValue::Identifier(name)));
            }
            _ => {
                return Err(LiteralError::Unsupported {
                    shape: "object member",
                });
            }
        }
    }
    Ok(LiteralValue::Object(entries))
}

fn key_text(key: &PropName) -> Result<String, LiteralError> {
    match key {
        PropName::Ident(ident) => Ok(ident.sym.to_string()),
        PropName::Str(s) => Ok(s.value.as_str().unwrap_or_default().to_string()),
        PropName::Num(n) => Ok(n.value.to_string()),
        _ => Err(LiteralError::UnsupportedKey),
    }
}

fn expression_shape(expr: &Expr) -> &'static str {
    match expr {
        Expr::Call(_) => "call expression",
        Expr::Member(_) => "member expression",
        Expr::Tpl(_) => "template with substitutions",
        Expr::Arrow(_) | Expr::Fn(_) => "function",
        Expr::Bin(_) => "binary expression",
        Expr::Cond(_) => "conditional expression",
        Expr::New(_) => "new expression",
        Expr::Unary(_) => "unary expression",
        _ => "expression",
    }
}
