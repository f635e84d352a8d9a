use hcl_edit::expr::{Expression, ObjectKey};
use hcl_edit::parser;
use indexmap::IndexMap;
use std::fmt;

use super::diagnostics::Diagnostic;
use super::values::Value;

/// A Terraform type constraint, normalized from a `type = ...` expression.
///
/// Object attributes preserve their declaration order so diagnostics stay
/// deterministic; equality over objects is order-independent (see
/// [`super::compatibility::TypeChecker`]).
#[derive(Clone, Debug)]
pub enum TypeConstraint {
    String,
    Number,
    Bool,
    Any,
    List(Box<TypeConstraint>),
    Set(Box<TypeConstraint>),
    Map(Box<TypeConstraint>),
    Tuple(Vec<TypeConstraint>),
    Object(IndexMap<String, AttributeSpec>),
}

/// One attribute of an object constraint. `default` is present iff the
/// attribute was declared with the `optional(...)` wrapper; the one-argument
/// form `optional(T)` normalizes to an explicit null default.
#[derive(Clone, Debug)]
pub struct AttributeSpec {
    pub constraint: TypeConstraint,
    pub optional: bool,
    pub default: Option<Value>,
}

impl AttributeSpec {
    pub fn required(constraint: TypeConstraint) -> Self {
        AttributeSpec { constraint, optional: false, default: None }
    }

    pub fn optional(constraint: TypeConstraint, default: Value) -> Self {
        AttributeSpec { constraint, optional: true, default: Some(default) }
    }

    fn from_expression(name: &str, expr: &Expression) -> Result<Self, TypeConstraintError> {
        if let Expression::FuncCall(call) = expr {
            if call.name.namespace.is_empty() && call.name.name.as_str() == "optional" {
                let args = call.args.iter().collect::<Vec<_>>();
                let (constraint, default) = match args.as_slice() {
                    [type_arg] => (TypeConstraint::from_expression(type_arg)?, Value::null()),
                    [type_arg, default_arg] => {
                        let constraint = TypeConstraint::from_expression(type_arg)?;
                        let raw =
                            crate::eval::eval_literal_expression(default_arg).map_err(|e| {
                                TypeConstraintError::InvalidDefault {
                                    attribute: name.to_string(),
                                    message: e.to_string(),
                                }
                            })?;
                        let default = constraint.coerce_value(raw).map_err(|e| {
                            TypeConstraintError::InvalidDefault {
                                attribute: name.to_string(),
                                message: e.message,
                            }
                        })?;
                        (constraint, default)
                    }
                    args => {
                        return Err(TypeConstraintError::BadArity {
                            constructor: "optional".to_string(),
                            expected: "one or two arguments",
                            got: args.len(),
                        })
                    }
                };
                return Ok(AttributeSpec::optional(constraint, default));
            }
        }
        Ok(AttributeSpec::required(TypeConstraint::from_expression(expr)?))
    }
}

impl TypeConstraint {
    pub fn string() -> Self {
        TypeConstraint::String
    }
    pub fn number() -> Self {
        TypeConstraint::Number
    }
    pub fn bool() -> Self {
        TypeConstraint::Bool
    }
    pub fn any() -> Self {
        TypeConstraint::Any
    }
    pub fn list(elem: TypeConstraint) -> Self {
        TypeConstraint::List(Box::new(elem))
    }
    pub fn set(elem: TypeConstraint) -> Self {
        TypeConstraint::Set(Box::new(elem))
    }
    pub fn map(elem: TypeConstraint) -> Self {
        TypeConstraint::Map(Box::new(elem))
    }
    pub fn tuple(elems: Vec<TypeConstraint>) -> Self {
        TypeConstraint::Tuple(elems)
    }
    pub fn object<S: ToString, T: IntoIterator<Item = (S, AttributeSpec)>>(attrs: T) -> Self {
        let mut attributes = IndexMap::new();
        for (name, spec) in attrs {
            attributes.insert(name.to_string(), spec);
        }
        TypeConstraint::Object(attributes)
    }

    /// Parses a type constraint from bare source text, e.g. the expected
    /// type recorded in an interface catalog entry.
    pub fn from_source(src: &str) -> Result<Self, TypeConstraintError> {
        let expr = parser::parse_expr(src)
            .map_err(|e| TypeConstraintError::InvalidSource(e.to_string()))?;
        Self::from_expression(&expr)
    }

    /// Normalizes an already-parsed `type = ...` expression.
    pub fn from_expression(expr: &Expression) -> Result<Self, TypeConstraintError> {
        match expr {
            Expression::Variable(ident) => match ident.as_str() {
                "string" => Ok(TypeConstraint::String),
                "number" => Ok(TypeConstraint::Number),
                "bool" => Ok(TypeConstraint::Bool),
                "any" => Ok(TypeConstraint::Any),
                other => Err(TypeConstraintError::UnknownConstructor(other.to_string())),
            },
            Expression::Parenthesis(parens) => Self::from_expression(parens.inner()),
            Expression::FuncCall(call) => {
                if !call.name.namespace.is_empty() {
                    let full = call
                        .name
                        .namespace
                        .iter()
                        .map(|i| i.as_str())
                        .chain(std::iter::once(call.name.name.as_str()))
                        .collect::<Vec<_>>()
                        .join("::");
                    return Err(TypeConstraintError::UnknownConstructor(full));
                }
                let name = call.name.name.as_str();
                let args = call.args.iter().collect::<Vec<_>>();
                match name {
                    "list" | "set" | "map" => {
                        let [elem_arg] = args.as_slice() else {
                            return Err(TypeConstraintError::BadArity {
                                constructor: name.to_string(),
                                expected: "exactly one argument",
                                got: args.len(),
                            });
                        };
                        let elem = Box::new(Self::from_expression(elem_arg)?);
                        Ok(match name {
                            "list" => TypeConstraint::List(elem),
                            "set" => TypeConstraint::Set(elem),
                            _ => TypeConstraint::Map(elem),
                        })
                    }
                    "tuple" => {
                        let [elems_arg] = args.as_slice() else {
                            return Err(TypeConstraintError::BadArity {
                                constructor: "tuple".to_string(),
                                expected: "exactly one argument",
                                got: args.len(),
                            });
                        };
                        let Expression::Array(entries) = elems_arg else {
                            return Err(TypeConstraintError::NotATypeExpression(
                                elems_arg.to_string().trim().to_string(),
                            ));
                        };
                        let elems = entries
                            .iter()
                            .map(Self::from_expression)
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(TypeConstraint::Tuple(elems))
                    }
                    "object" => {
                        let [attrs_arg] = args.as_slice() else {
                            return Err(TypeConstraintError::BadArity {
                                constructor: "object".to_string(),
                                expected: "exactly one argument",
                                got: args.len(),
                            });
                        };
                        let Expression::Object(entries) = attrs_arg else {
                            return Err(TypeConstraintError::NotATypeExpression(
                                attrs_arg.to_string().trim().to_string(),
                            ));
                        };
                        let mut attributes = IndexMap::new();
                        for (key, value) in entries.into_iter() {
                            let attr_name = object_key_name(key)?;
                            let spec = AttributeSpec::from_expression(&attr_name, value.expr())?;
                            attributes.insert(attr_name, spec);
                        }
                        Ok(TypeConstraint::Object(attributes))
                    }
                    "optional" => Err(TypeConstraintError::MisplacedOptional),
                    other => Err(TypeConstraintError::UnknownConstructor(other.to_string())),
                }
            }
            other => {
                Err(TypeConstraintError::NotATypeExpression(other.to_string().trim().to_string()))
            }
        }
    }

    /// Renders the constraint back as canonical type-expression text.
    pub fn to_source(&self) -> String {
        match self {
            TypeConstraint::String => "string".to_string(),
            TypeConstraint::Number => "number".to_string(),
            TypeConstraint::Bool => "bool".to_string(),
            TypeConstraint::Any => "any".to_string(),
            TypeConstraint::List(elem) => format!("list({})", elem.to_source()),
            TypeConstraint::Set(elem) => format!("set({})", elem.to_source()),
            TypeConstraint::Map(elem) => format!("map({})", elem.to_source()),
            TypeConstraint::Tuple(elems) => {
                format!(
                    "tuple([{}])",
                    elems.iter().map(|e| e.to_source()).collect::<Vec<_>>().join(", ")
                )
            }
            TypeConstraint::Object(attributes) => {
                let attrs = attributes
                    .iter()
                    .map(|(name, spec)| {
                        let rendered = match (&spec.optional, &spec.default) {
                            (true, Some(Value::Null)) => {
                                format!("optional({})", spec.constraint.to_source())
                            }
                            (true, Some(default)) => format!(
                                "optional({}, {})",
                                spec.constraint.to_source(),
                                default.to_source()
                            ),
                            _ => spec.constraint.to_source(),
                        };
                        format!("{} = {}", name, rendered)
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("object({{ {} }})", attrs)
            }
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, AttributeSpec>> {
        match self {
            TypeConstraint::Object(attributes) => Some(attributes),
            _ => None,
        }
    }
}

impl fmt::Display for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_source())
    }
}

fn object_key_name(key: &ObjectKey) -> Result<String, TypeConstraintError> {
    match key {
        ObjectKey::Ident(ident) => Ok(ident.as_str().to_string()),
        ObjectKey::Expression(Expression::String(literal)) => Ok(literal.value().clone()),
        ObjectKey::Expression(other) => {
            Err(TypeConstraintError::NotATypeExpression(other.to_string().trim().to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    InvalidSource(String),
    UnknownConstructor(String),
    MisplacedOptional,
    BadArity { constructor: String, expected: &'static str, got: usize },
    NotATypeExpression(String),
    InvalidDefault { attribute: String, message: String },
}

impl fmt::Display for TypeConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeConstraintError::InvalidSource(e) => {
                write!(f, "invalid type expression: {}", e)
            }
            TypeConstraintError::UnknownConstructor(name) => {
                write!(f, "'{}' is not a type constructor", name)
            }
            TypeConstraintError::MisplacedOptional => {
                write!(f, "optional(...) is only valid for object attributes")
            }
            TypeConstraintError::BadArity { constructor, expected, got } => {
                write!(f, "{}(...) takes {}, got {}", constructor, expected, got)
            }
            TypeConstraintError::NotATypeExpression(src) => {
                write!(f, "'{}' is not a type expression", src)
            }
            TypeConstraintError::InvalidDefault { attribute, message } => {
                write!(f, "invalid default for attribute '{}': {}", attribute, message)
            }
        }
    }
}

impl From<TypeConstraintError> for Diagnostic {
    fn from(err: TypeConstraintError) -> Self {
        Diagnostic::error(err.to_string())
    }
}
