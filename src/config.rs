//! Where the app keeps its files.

use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "TimelineBoard";

/// Resolved on-disk locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Holds `settings.json` (view state).
    pub config_dir: PathBuf,
    /// Holds `workspace.json` and `timeline.log`.
    pub data_dir: PathBuf,
}

impl AppPaths {
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", APP_NAME) {
            Self {
                config_dir: proj_dirs.config_dir().to_path_buf(),
                data_dir: proj_dirs.data_dir().to_path_buf(),
            }
        } else {
            // No home directory; keep everything next to the binary's cwd.
            Self::rooted_at(".")
        }
    }

    pub fn rooted_at(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            config_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    pub fn workspace_file(&self) -> PathBuf {
        self.data_dir.join("workspace.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("timeline.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        let paths = AppPaths::rooted_at("/tmp/tb");
        assert_eq!(paths.settings_file(), PathBuf::from("/tmp/tb/settings.json"));
        assert_eq!(paths.workspace_file(), PathBuf::from("/tmp/tb/workspace.json"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/tb/timeline.log"));
    }
}
