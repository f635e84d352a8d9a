use std::fmt::Display;

use hcl_edit::expr::{Expression, ObjectKey, UnaryOperator};
use hcl_edit::template::Element;
use indexmap::IndexMap;

use crate::types::diagnostics::Diagnostic;
use crate::types::values::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    NotALiteral(String),
    NonLiteralKey(String),
    InvalidNumber(String),
}

impl Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::NotALiteral(src) => {
                write!(f, "references are not supported in variable defaults: '{}'", src)
            }
            EvalError::NonLiteralKey(src) => {
                write!(f, "object keys must be identifiers or string literals: '{}'", src)
            }
            EvalError::InvalidNumber(src) => write!(f, "invalid number literal: '{}'", src),
        }
    }
}

impl From<EvalError> for Diagnostic {
    fn from(err: EvalError) -> Self {
        Diagnostic::error(err.to_string())
    }
}

/// Evaluates the literal subset of HCL expressions into a [`Value`].
///
/// A variable's `default = ...` may only use literals; anything that would
/// need an evaluation scope (references, function calls, conditionals)
/// surfaces as an [`EvalError`]. Literal arrays evaluate to tuples and
/// literal objects to objects, mirroring how the host types `[]`/`{}`
/// before conversion to the declared constraint.
pub fn eval_literal_expression(expr: &Expression) -> Result<Value, EvalError> {
    let value = match expr {
        Expression::Null(_) => Value::null(),
        Expression::Bool(decorated_bool) => Value::bool(*decorated_bool.value()),
        Expression::Number(formatted_number) => {
            match (
                formatted_number.value().as_u64(),
                formatted_number.value().as_i64(),
                formatted_number.value().as_f64(),
            ) {
                (Some(value), _, _) => Value::integer(value.into()),
                (_, Some(value), _) => Value::integer(value.into()),
                (_, _, Some(value)) => Value::float(value),
                (None, None, None) => {
                    return Err(EvalError::InvalidNumber(expr.to_string().trim().to_string()))
                }
            }
        }
        Expression::String(decorated_string) => Value::string(decorated_string.value().clone()),
        Expression::Array(entries) => {
            let mut res = vec![];
            for entry_expr in entries.iter() {
                res.push(eval_literal_expression(entry_expr)?);
            }
            Value::tuple(res)
        }
        Expression::Object(object) => {
            let mut map = IndexMap::new();
            for (k, v) in object.into_iter() {
                let key = match k {
                    ObjectKey::Ident(ident) => ident.as_str().to_string(),
                    ObjectKey::Expression(Expression::String(literal)) => literal.value().clone(),
                    ObjectKey::Expression(other) => {
                        return Err(EvalError::NonLiteralKey(
                            other.to_string().trim().to_string(),
                        ))
                    }
                };
                map.insert(key, eval_literal_expression(v.expr())?);
            }
            Value::object(map)
        }
        Expression::StringTemplate(template) => {
            let mut res = String::new();
            for element in template.iter() {
                match element {
                    Element::Literal(literal) => res.push_str(literal.value()),
                    Element::Interpolation(_) | Element::Directive(_) => {
                        return Err(EvalError::NotALiteral(
                            expr.to_string().trim().to_string(),
                        ))
                    }
                }
            }
            Value::string(res)
        }
        Expression::HeredocTemplate(heredoc) => {
            let mut res = String::new();
            for element in heredoc.template.iter() {
                match element {
                    Element::Literal(literal) => res.push_str(literal.value()),
                    Element::Interpolation(_) | Element::Directive(_) => {
                        return Err(EvalError::NotALiteral(
                            expr.to_string().trim().to_string(),
                        ))
                    }
                }
            }
            Value::string(res)
        }
        Expression::Parenthesis(parens) => eval_literal_expression(parens.inner())?,
        Expression::UnaryOp(op) => {
            let inner = eval_literal_expression(&op.expr)?;
            match (op.operator.value(), inner) {
                (UnaryOperator::Neg, Value::Integer(value)) => Value::integer(-value),
                (UnaryOperator::Neg, Value::Float(value)) => Value::float(-value),
                (UnaryOperator::Not, Value::Bool(value)) => Value::bool(!value),
                _ => {
                    return Err(EvalError::NotALiteral(expr.to_string().trim().to_string()))
                }
            }
        }
        Expression::Variable(_)
        | Expression::Traversal(_)
        | Expression::FuncCall(_)
        | Expression::Conditional(_)
        | Expression::ForExpr(_)
        | Expression::BinaryOp(_) => {
            return Err(EvalError::NotALiteral(expr.to_string().trim().to_string()))
        }
    };
    Ok(value)
}

/// Convenience wrapper over bare source text, for interface catalog entries
/// that record their expected default as literal text.
pub fn eval_literal_source(src: &str) -> Result<Value, Diagnostic> {
    let expr = crate::hcl::parser::parse_expr(src)
        .map_err(|e| Diagnostic::error(format!("parsing error: {}", e.to_string())))?;
    eval_literal_expression(&expr).map_err(Diagnostic::from)
}
