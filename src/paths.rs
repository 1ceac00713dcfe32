//! Default locations for the Factorio log and the cursor state file.

use std::path::PathBuf;

/// Platform-default location of `factorio-current.log`.
///
/// macOS keeps it under Application Support, Windows under APPDATA, and
/// everything else under `~/.factorio`. Returns `None` when the relevant
/// base directory cannot be resolved.
pub fn default_log_path() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| {
            home.join("Library/Application Support/factorio/factorio-current.log")
        })
    } else if cfg!(target_os = "windows") {
        dirs::data_dir().map(|data| data.join("Factorio/factorio-current.log"))
    } else {
        dirs::home_dir().map(|home| home.join(".factorio/factorio-current.log"))
    }
}

/// Default cursor state file, in the OS temp dir.
pub fn default_cursor_path() -> PathBuf {
    std::env::temp_dir().join("factorio-tail-cursor.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_names_the_current_log() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with("factorio-current.log"));
        }
    }

    #[test]
    fn test_default_cursor_path_is_in_temp_dir() {
        let path = default_cursor_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert_eq!(path.extension().unwrap(), "json");
    }
}
