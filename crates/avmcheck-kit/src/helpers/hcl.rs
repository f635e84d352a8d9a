use std::collections::VecDeque;
use std::fmt::Display;

use hcl_edit::expr::Expression;
use hcl_edit::structure::{Block, BlockLabel};

use crate::types::diagnostics::Diagnostic;

#[derive(Debug)]
pub enum VisitorError {
    MissingField(String),
    TypeMismatch(String, String),
}

impl Display for VisitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitorError::MissingField(name) => write!(f, "missing field '{}'", name),
            VisitorError::TypeMismatch(expected, name) => {
                write!(f, "expected {} for '{}'", expected, name)
            }
        }
    }
}

impl From<VisitorError> for Diagnostic {
    fn from(err: VisitorError) -> Self {
        Diagnostic::error(err.to_string())
    }
}

pub fn visit_label(index: usize, name: &str, block: &Block) -> Result<String, VisitorError> {
    let label = block.labels.get(index).ok_or(VisitorError::MissingField(name.to_string()))?;
    match label {
        BlockLabel::String(literal) => Ok(literal.to_string()),
        BlockLabel::Ident(_e) => Err(VisitorError::TypeMismatch("string".into(), name.to_string())),
    }
}

pub fn visit_optional_untyped_attribute(field_name: &str, block: &Block) -> Option<Expression> {
    let Some(attribute) = block.body.get_attribute(field_name) else {
        return None;
    };
    Some(attribute.value.clone())
}

/// Raw Terraform source text, split into its top level blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHclContent(String);

impl RawHclContent {
    pub fn from_string(s: String) -> Self {
        RawHclContent(s)
    }

    pub fn into_blocks(&self) -> Result<VecDeque<Block>, Diagnostic> {
        let content = crate::hcl::parser::parse_body(&self.0).map_err(|e| {
            Diagnostic::error(format!("parsing error: {}", e.to_string()))
        })?;
        Ok(content.into_blocks().into_iter().collect::<VecDeque<Block>>())
    }

    pub fn into_block_instance(&self) -> Result<Block, Diagnostic> {
        let mut blocks = self.into_blocks()?;
        if blocks.len() != 1 {
            return Err(Diagnostic::error("expected exactly one block instance"));
        }
        Ok(blocks.pop_front().unwrap())
    }

    pub fn to_string(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn it_splits_module_source_into_blocks() {
        let source = indoc! {r#"
            variable "lock" {
              type = object({
                kind = string
                name = optional(string, null)
              })
              default  = null
              nullable = true
            }

            variable "tags" {
              type    = map(string)
              default = null
            }
        "#};

        let raw = RawHclContent::from_string(source.to_string());
        let blocks = raw.into_blocks().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(visit_label(0, "name", &blocks[0]).unwrap(), "lock");
        assert_eq!(visit_label(0, "name", &blocks[1]).unwrap(), "tags");
        assert!(visit_optional_untyped_attribute("type", &blocks[0]).is_some());
        assert!(visit_optional_untyped_attribute("validation", &blocks[0]).is_none());
    }

    #[test]
    fn it_rejects_multi_block_sources_as_single_instances() {
        let raw = RawHclContent::from_string(
            "variable \"a\" {}\nvariable \"b\" {}".to_string(),
        );
        assert!(raw.into_block_instance().is_err());
    }

    #[test]
    fn it_reports_parse_failures() {
        let raw = RawHclContent::from_string("variable \"a\" {".to_string());
        let err = raw.into_blocks().unwrap_err();
        assert!(err.message.starts_with("parsing error:"));
    }
}
