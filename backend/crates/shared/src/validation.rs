//! Schema validation helpers
//!
//! Payload schemas are `validator::Validate` structs. Failures are flattened
//! into [`FieldErrors`]: one user-facing message per field, which is what the
//! envelope carries in `details.fieldErrors` and what forms display inline.

use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Field name -> first error message
pub type FieldErrors = BTreeMap<String, String>;

/// Flatten `ValidationErrors` into one message per field
///
/// Nested structs/lists are reported as `parent.child` / `parent[0].child`.
/// Errors declared without a `message` fall back to their code.
pub fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect_into(&mut out, None, errors);
    out
}

fn collect_into(out: &mut FieldErrors, prefix: Option<&str>, errors: &ValidationErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    out.entry(path).or_insert(message);
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_into(out, Some(&path), inner),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_into(out, Some(&format!("{path}[{index}]")), inner);
                }
            }
        }
    }
}

/// Validate a payload and return its field errors on failure
pub fn validate_fields<T: Validate>(payload: &T) -> Result<(), FieldErrors> {
    payload.validate().map_err(|e| collect_field_errors(&e))
}
