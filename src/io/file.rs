use std::path::Path;

use crate::error::{Error, Result};
use crate::source::local::Workspace;

/// Save the workspace to a JSON file, creating parent directories as needed.
pub fn save_workspace(workspace: &Workspace, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(workspace)?;
    std::fs::write(path, json).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the workspace from a JSON file.
pub fn load_workspace(path: &Path) -> Result<Workspace> {
    let json = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}
