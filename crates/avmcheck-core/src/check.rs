use crate::interfaces::{find_interface, VariableInterface};
use crate::kit::eval::eval_literal_expression;
use crate::kit::helpers::hcl::RawHclContent;
use crate::kit::types::constraints::TypeConstraint;
use crate::kit::types::diagnostics::Diagnostic;
use crate::kit::types::values::Value;
use crate::kit::types::TypeChecker;
use crate::variable::VariableBlock;

/// Checks one variable against one interface and reports every deviation.
/// A mismatch is a diagnostic, not an error; an empty result means the
/// variable conforms. An undocumented variable is reported at warning
/// level, everything else at error level.
pub fn check_variable(
    variable: &VariableBlock,
    interface: &VariableInterface,
) -> Vec<Diagnostic> {
    let mut diagnostics = vec![];

    let want = match interface.constraint() {
        Ok(constraint) => constraint,
        Err(e) => {
            diagnostics.push(
                Diagnostic::error(format!(
                    "interface '{}' has an unusable type specification: {}",
                    interface.name, e
                ))
                .for_variable(&variable.name),
            );
            return diagnostics;
        }
    };

    let got = match &variable.type_expr {
        None => {
            diagnostics.push(
                Diagnostic::error(format!(
                    "variable must declare the '{}' interface type",
                    interface.name
                ))
                .for_variable(&variable.name)
                .with_expected(&interface.type_source),
            );
            None
        }
        Some(expr) => match TypeConstraint::from_expression(expr) {
            Ok(constraint) => Some(constraint),
            Err(e) => {
                diagnostics.push(Diagnostic::from(e).for_variable(&variable.name));
                None
            }
        },
    };

    if let Some(got) = &got {
        if !TypeChecker::constraints_equal(got, &want) {
            diagnostics.push(
                Diagnostic::error(format!(
                    "type does not match the '{}' interface",
                    interface.name
                ))
                .for_variable(&variable.name)
                .with_expected(&interface.type_source),
            );
        }
    }

    match &variable.default_expr {
        None => {
            diagnostics.push(
                Diagnostic::error("variable must declare a default value")
                    .for_variable(&variable.name)
                    .with_expected(interface.default.to_source()),
            );
        }
        Some(expr) => match eval_literal_expression(expr) {
            Err(e) => {
                diagnostics.push(Diagnostic::from(e).for_variable(&variable.name));
            }
            Ok(raw) => {
                let coerced = match &got {
                    Some(constraint) => match constraint.coerce_value(raw) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            diagnostics.push(
                                Diagnostic::error(format!(
                                    "default value does not conform to the declared type: {}",
                                    e.message
                                ))
                                .for_variable(&variable.name),
                            );
                            None
                        }
                    },
                    None => Some(raw),
                };
                if let Some(value) = coerced {
                    if !TypeChecker::defaults_equal(&value, &interface.default) {
                        diagnostics.push(
                            Diagnostic::error(format!(
                                "default value does not match the '{}' interface",
                                interface.name
                            ))
                            .for_variable(&variable.name)
                            .with_expected(interface.default.to_source()),
                        );
                    }
                }
            }
        },
    }

    let nullable_value = match &variable.nullable_expr {
        None => None,
        Some(expr) => match eval_literal_expression(expr) {
            Ok(value) => Some(value),
            Err(e) => {
                diagnostics.push(Diagnostic::from(e).for_variable(&variable.name));
                Some(Value::unknown())
            }
        },
    };
    if !TypeChecker::nullable_complies(nullable_value.as_ref(), interface.nullable) {
        let suggestion = match interface.nullable {
            true => "remove the nullable attribute or set nullable = true",
            false => "set nullable = false",
        };
        diagnostics.push(
            Diagnostic::error(format!(
                "nullable setting does not comply with the '{}' interface",
                interface.name
            ))
            .for_variable(&variable.name)
            .with_suggestion(suggestion),
        );
    }

    if variable.description_expr.is_none() {
        diagnostics.push(
            Diagnostic::warning("variable is missing a description")
                .for_variable(&variable.name)
                .with_suggestion("add a description attribute"),
        );
    }

    diagnostics
}

/// Runs every variable block in a module source against the built-in
/// interface whose name matches its label. Variables without a matching
/// interface are skipped; malformed source is an error, not a finding.
pub fn check_source(source: &str) -> Result<Vec<Diagnostic>, Diagnostic> {
    let mut diagnostics = vec![];
    let blocks = RawHclContent::from_string(source.to_string()).into_blocks()?;
    for block in blocks.iter() {
        if block.ident.as_str() != "variable" {
            continue;
        }
        let variable = VariableBlock::from_block(block)?;
        if let Some(interface) = find_interface(&variable.name) {
            diagnostics.append(&mut check_variable(&variable, interface));
        }
    }
    Ok(diagnostics)
}
