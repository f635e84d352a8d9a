use indoc::indoc;

use crate::kit::types::constraints::{TypeConstraint, TypeConstraintError};
use crate::kit::types::values::Value;

/// A named AVM interface: the variable shape a conforming module must
/// expose. `type_source` keeps the published type expression verbatim so
/// diagnostics can echo it back untouched.
#[derive(Debug, Clone)]
pub struct VariableInterface {
    pub name: String,
    pub type_source: String,
    pub default: Value,
    pub nullable: bool,
}

impl VariableInterface {
    pub fn new(
        name: impl Into<String>,
        type_source: impl Into<String>,
        default: Value,
        nullable: bool,
    ) -> Self {
        VariableInterface {
            name: name.into(),
            type_source: type_source.into(),
            default,
            nullable,
        }
    }

    pub fn constraint(&self) -> Result<TypeConstraint, TypeConstraintError> {
        TypeConstraint::from_source(&self.type_source)
    }
}

lazy_static! {
    /// The interfaces every AVM resource module is expected to expose.
    pub static ref BUILTIN_INTERFACES: Vec<VariableInterface> = vec![
        VariableInterface::new("tags", "map(string)", Value::null(), true),
        VariableInterface::new(
            "lock",
            indoc! {"
                object({
                  kind = string
                  name = optional(string, null)
                })"}
            .trim(),
            Value::null(),
            true,
        ),
        VariableInterface::new(
            "managed_identities",
            indoc! {"
                object({
                  system_assigned            = optional(bool, false)
                  user_assigned_resource_ids = optional(set(string), [])
                })"}
            .trim(),
            Value::object(Default::default()),
            false,
        ),
        VariableInterface::new(
            "customer_managed_key",
            indoc! {"
                object({
                  key_vault_resource_id = string
                  key_name              = string
                  key_version           = optional(string, null)
                  user_assigned_identity = optional(object({
                    resource_id = string
                  }), null)
                })"}
            .trim(),
            Value::null(),
            true,
        ),
    ];
}

pub fn find_interface(name: &str) -> Option<&'static VariableInterface> {
    BUILTIN_INTERFACES.iter().find(|interface| interface.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kit::types::TypeChecker;
    use test_case::test_case;

    #[test]
    fn every_builtin_interface_type_parses() {
        for interface in BUILTIN_INTERFACES.iter() {
            let constraint = interface
                .constraint()
                .unwrap_or_else(|e| panic!("interface '{}': {}", interface.name, e));
            assert!(TypeChecker::constraints_equal(&constraint, &constraint));
        }
    }

    #[test_case("tags", true)]
    #[test_case("lock", true)]
    #[test_case("managed_identities", true)]
    #[test_case("customer_managed_key", true)]
    #[test_case("unheard_of", false)]
    fn it_finds_interfaces_by_name(name: &str, expected: bool) {
        assert_eq!(find_interface(name).is_some(), expected);
    }

    #[test]
    fn lock_interface_has_an_optional_name_attribute() {
        let constraint = find_interface("lock").unwrap().constraint().unwrap();
        let attributes = constraint.as_object().unwrap();
        assert!(!attributes["kind"].optional);
        assert!(attributes["name"].optional);
        assert_eq!(attributes["name"].default, Some(Value::null()));
    }
}
