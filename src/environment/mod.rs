//! # Environments & Variables
//!
//! Config strings may contain `{{variable}}` placeholders. Values come from
//! the global `[variables]` table, overridden by the selected
//! `[environments.<name>]` table (dev / staging / prod).

use std::collections::{BTreeMap, HashMap};

/// Variables of one named environment, keyed by variable name.
pub type VariableTable = BTreeMap<String, String>;

/// Build a merged variable map from global variables and environment variables.
/// Priority: environment variables override global variables.
pub fn build_variable_map(
    globals: &VariableTable,
    environment: Option<&VariableTable>,
) -> HashMap<String, String> {
    let mut variables = HashMap::new();

    for (key, value) in globals {
        if !key.is_empty() {
            variables.insert(key.clone(), value.clone());
        }
    }

    if let Some(env) = environment {
        for (key, value) in env {
            if !key.is_empty() {
                variables.insert(key.clone(), value.clone());
            }
        }
    }

    variables
}

/// Interpolate `{{key}}` placeholders in a string using the provided variable map.
pub fn interpolate(input: &str, variables: &HashMap<String, String>) -> String {
    let mut result = input.to_string();
    for (key, value) in variables {
        result = result.replace(&format!("{{{{{key}}}}}"), value);
    }
    result
}

/// Name of the first placeholder still present in `input`, if any.
pub fn unresolved_placeholder(input: &str) -> Option<&str> {
    let start = input.find("{{")?;
    let rest = &input[start + 2..];
    let end = rest.find("}}")?;
    Some(&rest[..end])
}
