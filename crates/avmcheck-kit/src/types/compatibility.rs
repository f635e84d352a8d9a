use indexmap::IndexMap;

use super::constraints::{AttributeSpec, TypeConstraint};
use super::diagnostics::Diagnostic;
use super::values::Value;

/// Structural comparisons between declared and expected variable shapes.
///
/// Mismatches are boolean results, never errors: callers turn a `false`
/// into a user-facing diagnostic. Malformed input is rejected earlier, by
/// the constraint normalizer or the default evaluator.
pub struct TypeChecker;

impl TypeChecker {
    /// Structural equality over two type constraints. Object attributes
    /// compare by name-keyed lookup regardless of declaration order; when
    /// both sides of an attribute are optional their defaults must match
    /// under [`TypeChecker::defaults_equal`].
    pub fn constraints_equal(got: &TypeConstraint, want: &TypeConstraint) -> bool {
        match (got, want) {
            (TypeConstraint::String, TypeConstraint::String)
            | (TypeConstraint::Number, TypeConstraint::Number)
            | (TypeConstraint::Bool, TypeConstraint::Bool)
            | (TypeConstraint::Any, TypeConstraint::Any) => true,
            (TypeConstraint::List(got_elem), TypeConstraint::List(want_elem))
            | (TypeConstraint::Set(got_elem), TypeConstraint::Set(want_elem))
            | (TypeConstraint::Map(got_elem), TypeConstraint::Map(want_elem)) => {
                Self::constraints_equal(got_elem, want_elem)
            }
            (TypeConstraint::Tuple(got_elems), TypeConstraint::Tuple(want_elems)) => {
                got_elems.len() == want_elems.len()
                    && got_elems
                        .iter()
                        .zip(want_elems.iter())
                        .all(|(g, w)| Self::constraints_equal(g, w))
            }
            (TypeConstraint::Object(got_attrs), TypeConstraint::Object(want_attrs)) => {
                if got_attrs.len() != want_attrs.len() {
                    return false;
                }
                got_attrs.iter().all(|(name, got_spec)| match want_attrs.get(name) {
                    Some(want_spec) => Self::attribute_specs_equal(got_spec, want_spec),
                    None => false,
                })
            }
            _ => false,
        }
    }

    fn attribute_specs_equal(got: &AttributeSpec, want: &AttributeSpec) -> bool {
        if got.optional != want.optional {
            return false;
        }
        if !Self::constraints_equal(&got.constraint, &want.constraint) {
            return false;
        }
        match (&got.default, &want.default) {
            (None, None) => true,
            (Some(got_default), Some(want_default)) => {
                Self::defaults_equal(got_default, want_default)
            }
            _ => false,
        }
    }

    /// Semantic equality over two realized default values.
    ///
    /// Empty literal collections (`[]`, `{}`) carry no element type, so two
    /// zero-length collections of any flavor compare equal. Sets compare
    /// order-independently, lists and tuples element-wise in order, maps and
    /// objects by key set. Unknown values compare equal to nothing.
    pub fn defaults_equal(got: &Value, want: &Value) -> bool {
        if let (Some(0), Some(0)) = (got.collection_len(), want.collection_len()) {
            return true;
        }
        match (got, want) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::Integer(lhs), Value::Integer(rhs)) => lhs == rhs,
            (Value::Float(lhs), Value::Float(rhs)) => lhs == rhs,
            (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
            (Value::List(lhs), Value::List(rhs)) | (Value::Tuple(lhs), Value::Tuple(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs.iter().zip(rhs.iter()).all(|(l, r)| Self::defaults_equal(l, r))
            }
            (Value::Set(lhs), Value::Set(rhs)) => Self::set_entries_equal(lhs, rhs),
            (Value::Map(lhs), Value::Map(rhs)) | (Value::Object(lhs), Value::Object(rhs)) => {
                if lhs.len() != rhs.len() {
                    return false;
                }
                lhs.iter().all(|(key, l)| match rhs.get(key) {
                    Some(r) => Self::defaults_equal(l, r),
                    None => false,
                })
            }
            _ => false,
        }
    }

    fn set_entries_equal(got: &[Value], want: &[Value]) -> bool {
        if got.len() != want.len() {
            return false;
        }
        let mut matched = vec![false; want.len()];
        'entries: for g in got {
            for (i, w) in want.iter().enumerate() {
                if !matched[i] && Self::defaults_equal(g, w) {
                    matched[i] = true;
                    continue 'entries;
                }
            }
            return false;
        }
        true
    }

    /// Whether a variable's `nullable` attribute complies with an
    /// interface's nullable policy. A non-nullable interface requires the
    /// explicit `nullable = false`; a nullable one accepts an absent
    /// attribute or a literal `true`.
    pub fn nullable_complies(got: Option<&Value>, want_nullable: bool) -> bool {
        match (want_nullable, got) {
            (true, None) => true,
            (true, Some(value)) => value.as_bool() == Some(true),
            (false, Some(value)) => value.as_bool() == Some(false),
            (false, None) => false,
        }
    }
}

impl TypeConstraint {
    /// Converts an evaluated literal to this constraint's shape, the way the
    /// host converts a default to the variable's declared type: literal
    /// tuples become lists or sets, literal objects become maps. Null and
    /// unknown convert to every type.
    pub fn coerce_value(&self, value: Value) -> Result<Value, Diagnostic> {
        if matches!(value, Value::Null | Value::Unknown) {
            return Ok(value);
        }
        match self {
            TypeConstraint::Any => Ok(value),
            TypeConstraint::String => match value {
                Value::String(_) => Ok(value),
                other => Err(self.mismatch(&other)),
            },
            TypeConstraint::Number => match value {
                Value::Integer(_) | Value::Float(_) => Ok(value),
                other => Err(self.mismatch(&other)),
            },
            TypeConstraint::Bool => match value {
                Value::Bool(_) => Ok(value),
                other => Err(self.mismatch(&other)),
            },
            TypeConstraint::List(elem) => match value {
                Value::List(entries) | Value::Set(entries) | Value::Tuple(entries) => {
                    let entries = entries
                        .into_iter()
                        .map(|e| elem.coerce_value(e))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::list(entries))
                }
                other => Err(self.mismatch(&other)),
            },
            TypeConstraint::Set(elem) => match value {
                Value::List(entries) | Value::Set(entries) | Value::Tuple(entries) => {
                    let entries = entries
                        .into_iter()
                        .map(|e| elem.coerce_value(e))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::set(entries))
                }
                other => Err(self.mismatch(&other)),
            },
            TypeConstraint::Map(elem) => match value {
                Value::Map(entries) | Value::Object(entries) => {
                    let mut coerced = IndexMap::new();
                    for (key, entry) in entries {
                        coerced.insert(key, elem.coerce_value(entry)?);
                    }
                    Ok(Value::map(coerced))
                }
                other => Err(self.mismatch(&other)),
            },
            TypeConstraint::Tuple(elems) => match value {
                Value::List(entries) | Value::Tuple(entries) if entries.len() == elems.len() => {
                    let entries = elems
                        .iter()
                        .zip(entries.into_iter())
                        .map(|(constraint, entry)| constraint.coerce_value(entry))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::tuple(entries))
                }
                other => Err(self.mismatch(&other)),
            },
            TypeConstraint::Object(attributes) => match value {
                Value::Map(entries) | Value::Object(entries) => {
                    let mut coerced = IndexMap::new();
                    for (key, entry) in entries {
                        let Some(spec) = attributes.get(&key) else {
                            return Err(Diagnostic::error(format!(
                                "unexpected attribute '{}' for {}",
                                key,
                                self.to_source()
                            )));
                        };
                        coerced.insert(key, spec.constraint.coerce_value(entry)?);
                    }
                    for (name, spec) in attributes.iter() {
                        if !spec.optional && !coerced.contains_key(name) {
                            return Err(Diagnostic::error(format!(
                                "missing required attribute '{}' for {}",
                                name,
                                self.to_source()
                            )));
                        }
                    }
                    Ok(Value::object(coerced))
                }
                other => Err(self.mismatch(&other)),
            },
        }
    }

    fn mismatch(&self, value: &Value) -> Diagnostic {
        Diagnostic::error(format!("expected {}, got {}", self.to_source(), value.type_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const LOCK_TYPE: &str = "object({ kind = string, name = optional(string, null) })";

    #[test_case("string")]
    #[test_case("any")]
    #[test_case("list(number)")]
    #[test_case("set(string)")]
    #[test_case("map(list(bool))")]
    #[test_case("tuple([string, number])")]
    #[test_case(LOCK_TYPE)]
    #[test_case("object({ ids = optional(set(string), []) })")]
    fn constraint_equality_is_reflexive(src: &str) {
        let constraint = TypeConstraint::from_source(src).unwrap();
        assert!(TypeChecker::constraints_equal(&constraint, &constraint));
    }

    #[test_case("list(string)", "set(string)")]
    #[test_case("string", "number")]
    #[test_case("map(string)", "map(number)")]
    #[test_case("tuple([string])", "tuple([string, string])")]
    #[test_case(LOCK_TYPE, "object({ kind = string })")]
    #[test_case(LOCK_TYPE, "object({ kind = string, label = optional(string, null) })")]
    fn constraint_equality_is_symmetric(got_src: &str, want_src: &str) {
        let got = TypeConstraint::from_source(got_src).unwrap();
        let want = TypeConstraint::from_source(want_src).unwrap();
        assert_eq!(
            TypeChecker::constraints_equal(&got, &want),
            TypeChecker::constraints_equal(&want, &got)
        );
        assert!(!TypeChecker::constraints_equal(&got, &want));
    }

    #[test]
    fn object_attribute_order_does_not_matter() {
        let got = TypeConstraint::from_source("object({ a = string, b = number })").unwrap();
        let want = TypeConstraint::from_source("object({ b = number, a = string })").unwrap();
        assert!(TypeChecker::constraints_equal(&got, &want));
    }

    #[test]
    fn matching_lock_interface_type_compares_equal() {
        let got = TypeConstraint::from_source(LOCK_TYPE).unwrap();
        let want = TypeConstraint::from_source(LOCK_TYPE).unwrap();
        assert!(TypeChecker::constraints_equal(&got, &want));
    }

    #[test]
    fn optional_attribute_inner_type_mismatch_is_unequal() {
        let got = TypeConstraint::from_source(
            "object({ kind = string, name = optional(number, null) })",
        )
        .unwrap();
        let want = TypeConstraint::from_source(LOCK_TYPE).unwrap();
        assert!(!TypeChecker::constraints_equal(&got, &want));
    }

    #[test]
    fn optional_default_mismatch_is_unequal() {
        let got = TypeConstraint::from_source(
            "object({ kind = string, name = optional(string, \"x\") })",
        )
        .unwrap();
        let want = TypeConstraint::from_source(LOCK_TYPE).unwrap();
        assert!(!TypeChecker::constraints_equal(&got, &want));
    }

    #[test]
    fn required_vs_optional_is_unequal_even_with_matching_inner_type() {
        let got = TypeConstraint::from_source("object({ kind = string, name = string })").unwrap();
        let want = TypeConstraint::from_source(LOCK_TYPE).unwrap();
        assert!(!TypeChecker::constraints_equal(&got, &want));
    }

    #[test]
    fn set_default_order_does_not_matter() {
        let got = Value::set(vec![Value::integer(2), Value::integer(3), Value::integer(1)]);
        let want = Value::set(vec![Value::integer(1), Value::integer(2), Value::integer(3)]);
        assert!(TypeChecker::defaults_equal(&got, &want));
    }

    #[test]
    fn list_default_order_matters() {
        let got = Value::list(vec![Value::integer(2), Value::integer(3), Value::integer(1)]);
        let want = Value::list(vec![Value::integer(1), Value::integer(2), Value::integer(3)]);
        assert!(!TypeChecker::defaults_equal(&got, &want));
    }

    #[test]
    fn reordered_literal_compares_by_declared_collection_kind() {
        let literal = Value::tuple(vec![Value::integer(2), Value::integer(3), Value::integer(1)]);
        let want = Value::tuple(vec![Value::integer(1), Value::integer(2), Value::integer(3)]);

        let set_constraint = TypeConstraint::from_source("set(number)").unwrap();
        let got = set_constraint.coerce_value(literal.clone()).unwrap();
        let expected = set_constraint.coerce_value(want.clone()).unwrap();
        assert!(TypeChecker::defaults_equal(&got, &expected));

        let list_constraint = TypeConstraint::from_source("list(number)").unwrap();
        let got = list_constraint.coerce_value(literal).unwrap();
        let expected = list_constraint.coerce_value(want).unwrap();
        assert!(!TypeChecker::defaults_equal(&got, &expected));
    }

    #[test_case(Value::object(IndexMap::new()), Value::list(vec![]))]
    #[test_case(Value::map(IndexMap::new()), Value::object(IndexMap::new()))]
    #[test_case(Value::tuple(vec![]), Value::set(vec![]))]
    fn empty_collections_compare_equal_across_kinds(got: Value, want: Value) {
        assert!(TypeChecker::defaults_equal(&got, &want));
        assert!(TypeChecker::defaults_equal(&want, &got));
    }

    #[test]
    fn non_empty_collections_of_different_kinds_are_unequal() {
        let got = Value::list(vec![Value::integer(1)]);
        let want = Value::set(vec![Value::integer(1)]);
        assert!(!TypeChecker::defaults_equal(&got, &want));
    }

    #[test_case(Value::null(), Value::null(), true)]
    #[test_case(Value::string("x"), Value::string("x"), true)]
    #[test_case(Value::string("x"), Value::string("y"), false)]
    #[test_case(Value::integer(1), Value::float(1.0), false)]
    #[test_case(Value::string("1"), Value::integer(1), false)]
    #[test_case(Value::unknown(), Value::unknown(), false)]
    fn default_equality_cases(got: Value, want: Value, expected: bool) {
        assert_eq!(TypeChecker::defaults_equal(&got, &want), expected);
    }

    #[test]
    fn default_equality_is_symmetric_over_nested_values() {
        let mut lhs = IndexMap::new();
        lhs.insert("a".to_string(), Value::list(vec![Value::integer(1)]));
        lhs.insert("b".to_string(), Value::null());
        let mut rhs = IndexMap::new();
        rhs.insert("b".to_string(), Value::null());
        rhs.insert("a".to_string(), Value::list(vec![Value::integer(1)]));
        let got = Value::object(lhs);
        let want = Value::object(rhs);
        assert!(TypeChecker::defaults_equal(&got, &want));
        assert!(TypeChecker::defaults_equal(&want, &got));
    }

    #[test_case(true, None, true)]
    #[test_case(true, Some(Value::bool(true)), true)]
    #[test_case(true, Some(Value::bool(false)), false)]
    #[test_case(false, None, false)]
    #[test_case(false, Some(Value::bool(false)), true)]
    #[test_case(false, Some(Value::bool(true)), false)]
    #[test_case(false, Some(Value::string("false")), false)]
    fn nullable_policy_cases(want_nullable: bool, got: Option<Value>, expected: bool) {
        assert_eq!(TypeChecker::nullable_complies(got.as_ref(), want_nullable), expected);
    }

    #[test]
    fn coercion_rejects_missing_required_attributes() {
        let constraint = TypeConstraint::from_source(LOCK_TYPE).unwrap();
        let err = constraint.coerce_value(Value::object(IndexMap::new())).unwrap_err();
        assert!(err.message.contains("missing required attribute 'kind'"));
    }

    #[test]
    fn coercion_rejects_unexpected_attributes() {
        let constraint = TypeConstraint::from_source("object({ kind = string })").unwrap();
        let mut entries = IndexMap::new();
        entries.insert("kind".to_string(), Value::string("CanNotDelete"));
        entries.insert("extra".to_string(), Value::bool(true));
        let err = constraint.coerce_value(Value::object(entries)).unwrap_err();
        assert!(err.message.contains("unexpected attribute 'extra'"));
    }

    #[test]
    fn null_coerces_to_every_constraint() {
        for src in ["string", "number", "set(string)", LOCK_TYPE] {
            let constraint = TypeConstraint::from_source(src).unwrap();
            assert_eq!(constraint.coerce_value(Value::null()).unwrap(), Value::null());
        }
    }
}
