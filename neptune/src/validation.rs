//! Validators for Neptune-specific attribute formats

use tfplug::types::{AttributePath, Diagnostic, Dynamic};
use tfplug::validator::Validator;

/// Cluster and endpoint identifiers: lowercase letters, digits and single
/// hyphens, starting with a letter and not ending with a hyphen
pub struct NeptuneIdentifierValidator;

impl NeptuneIdentifierValidator {
    /// Returns one message per rule the value breaks
    pub fn violations(path: &AttributePath, value: &str) -> Vec<String> {
        let mut violations = vec![];

        if value.is_empty()
            || !value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            violations.push(format!(
                "only lowercase alphanumeric characters and hyphens allowed in {:?}",
                path.to_string()
            ));
        }
        if !value.starts_with(|c: char| c.is_ascii_lowercase()) {
            violations.push(format!(
                "first character of {:?} must be a letter",
                path.to_string()
            ));
        }
        if value.contains("--") {
            violations.push(format!(
                "{:?} cannot contain two consecutive hyphens",
                path.to_string()
            ));
        }
        if value.ends_with('-') {
            violations.push(format!("{:?} cannot end with a hyphen", path.to_string()));
        }

        violations
    }
}

impl Validator for NeptuneIdentifierValidator {
    fn description(&self) -> String {
        "must be a valid Neptune identifier".to_string()
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(value) = value.as_string() else {
            return;
        };

        for violation in Self::violations(path, value) {
            diagnostics.push(
                Diagnostic::error("Invalid Neptune identifier", violation)
                    .with_attribute(path.clone()),
            );
        }
    }
}
