//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + description manifest):
//!   Windows: %APPDATA%\article-narrator\
//!   macOS:   ~/Library/Application Support/article-narrator/
//!   Linux:   ~/.config/article-narrator/
//!
//! Audio artifacts are not stored here; they live in the cache directory
//! configured in `[cache]` (the working directory by default).

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `descriptions.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the default description manifest.
    pub manifest_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "article-narrator";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let manifest_file = config_dir.join("descriptions.json");

        Self {
            config_dir,
            settings_file,
            manifest_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
