//! Error types for the plan engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading declarations or resolving specifications.
///
/// Every variant is a configuration defect tied to one declaration file or
/// one scenario. Platform ineligibility is never an error; it is reported
/// through [`crate::resolver::Disposition::Skipped`].
#[derive(Debug, Error)]
pub enum PlanError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed YAML.
    #[error("invalid yaml in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document is not well-formed JSON.
    #[error("invalid json in {}: {source}", .path.display())]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The declaration document does not have the required shape.
    #[error("invalid declaration in {}: {reason}", .path.display())]
    InvalidDeclaration { path: PathBuf, reason: String },

    /// A collected scenario has no backing declaration.
    #[error("no specification for scenario {scenario} in file {}", .path.display())]
    MissingScenario { scenario: String, path: PathBuf },

    /// A merged scenario mapping did not satisfy the typed field schema.
    #[error("invalid scenario {scenario} in {}: {source}", .path.display())]
    InvalidScenario {
        scenario: String,
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_scenario_names_scenario_and_file() {
        let err = PlanError::MissingScenario {
            scenario: "kernel.sched.basic".to_string(),
            path: PathBuf::from("tests/kernel/testspec.yaml"),
        };
        assert_eq!(
            err.to_string(),
            "no specification for scenario kernel.sched.basic in file tests/kernel/testspec.yaml"
        );
    }

    #[test]
    fn invalid_declaration_names_file_and_reason() {
        let err = PlanError::InvalidDeclaration {
            path: PathBuf::from("testspec.yaml"),
            reason: "missing required `tests` mapping".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid declaration in testspec.yaml: missing required `tests` mapping"
        );
    }
}
