//! Platform descriptor loading.
//!
//! Descriptors are produced by the surrounding build system as YAML or JSON
//! files; the file extension decides the format.

use std::fs;
use std::path::Path;

use tracing::debug;

use testbed_types::Platform;

use crate::error::PlanError;

/// Load a platform descriptor from a `.yaml`/`.yml` or JSON file.
pub fn load_platform(path: &Path) -> Result<Platform, PlanError> {
    let text = fs::read_to_string(path).map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path.extension().and_then(|ext| ext.to_str());
    let platform: Platform = if matches!(extension, Some("yaml" | "yml")) {
        serde_yaml::from_str(&text).map_err(|source| PlanError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(&text).map_err(|source| PlanError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?
    };

    debug!(platform = %platform.identifier, "loaded platform descriptor");
    Ok(platform)
}
