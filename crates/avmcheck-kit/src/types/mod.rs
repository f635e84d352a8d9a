pub mod compatibility;
pub mod constraints;
pub mod diagnostics;
pub mod values;

pub use compatibility::TypeChecker;
pub use constraints::{AttributeSpec, TypeConstraint, TypeConstraintError};
pub use diagnostics::{Diagnostic, DiagnosticLevel};
pub use values::Value;
