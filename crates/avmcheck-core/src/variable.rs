use crate::kit::hcl::expr::Expression;
use crate::kit::hcl::structure::Block;
use crate::kit::helpers::hcl::{visit_label, visit_optional_untyped_attribute};
use crate::kit::types::diagnostics::Diagnostic;

/// The raw material of a `variable "name" { ... }` block: the label and the
/// attribute expressions the conformance checks care about, still unparsed.
#[derive(Debug, Clone)]
pub struct VariableBlock {
    pub name: String,
    pub type_expr: Option<Expression>,
    pub default_expr: Option<Expression>,
    pub nullable_expr: Option<Expression>,
    pub description_expr: Option<Expression>,
}

impl VariableBlock {
    pub fn from_block(block: &Block) -> Result<Self, Diagnostic> {
        if block.ident.as_str() != "variable" {
            return Err(Diagnostic::error(format!(
                "expected a variable block, got '{}'",
                block.ident.as_str()
            )));
        }
        let name = visit_label(0, "name", block).map_err(Diagnostic::from)?;
        Ok(VariableBlock {
            name,
            type_expr: visit_optional_untyped_attribute("type", block),
            default_expr: visit_optional_untyped_attribute("default", block),
            nullable_expr: visit_optional_untyped_attribute("nullable", block),
            description_expr: visit_optional_untyped_attribute("description", block),
        })
    }

    pub fn has_default(&self) -> bool {
        self.default_expr.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kit::helpers::hcl::RawHclContent;
    use indoc::indoc;

    #[test]
    fn it_extracts_variable_attributes() {
        let source = indoc! {r#"
            variable "lock" {
              type = object({
                kind = string
                name = optional(string, null)
              })
              default     = null
              nullable    = true
              description = "Resource lock configuration."
            }
        "#};

        let block = RawHclContent::from_string(source.to_string()).into_block_instance().unwrap();
        let variable = VariableBlock::from_block(&block).unwrap();
        assert_eq!(variable.name, "lock");
        assert!(variable.type_expr.is_some());
        assert!(variable.has_default());
        assert!(variable.nullable_expr.is_some());
        assert!(variable.description_expr.is_some());
    }

    #[test]
    fn it_tolerates_sparse_variable_blocks() {
        let block = RawHclContent::from_string("variable \"tags\" {}".to_string())
            .into_block_instance()
            .unwrap();
        let variable = VariableBlock::from_block(&block).unwrap();
        assert_eq!(variable.name, "tags");
        assert!(variable.type_expr.is_none());
        assert!(!variable.has_default());
    }

    #[test]
    fn it_rejects_non_variable_blocks() {
        let block = RawHclContent::from_string("output \"id\" {}".to_string())
            .into_block_instance()
            .unwrap();
        assert!(VariableBlock::from_block(&block).is_err());
    }
}
