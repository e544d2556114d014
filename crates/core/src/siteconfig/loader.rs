use crate::error::Result;
use crate::siteconfig::directives::SiteConfig;
use crate::siteconfig::parser::ConfigParser;
use std::path::{Path, PathBuf};

/// Name of the directive file looked up in each config directory
pub const SITE_FILE: &str = "site.txt";

/// Loads the site configuration from the standard and custom directories
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Custom config directory path, applied last
    custom_dir: Option<PathBuf>,
    /// Standard config directory path, applied first
    standard_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader with no directories; `load` then yields the defaults
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None }
    }

    /// Loader for the per-user directory and the bundled `site_configs/`
    pub fn with_default_dirs() -> Self {
        let mut builder = ConfigLoaderBuilder::new();

        if let Some(custom_dir) = Self::default_custom_dir() {
            builder = builder.custom_dir(custom_dir);
        }

        if let Some(standard_dir) = Self::default_standard_dir() {
            builder = builder.standard_dir(standard_dir);
        }

        builder.build()
    }

    /// Build the site config.
    ///
    /// Starts from the defaults, applies the standard file, then the custom
    /// one. A missing file is skipped; an unreadable or malformed one is
    /// logged and skipped.
    pub fn load(&self) -> Result<SiteConfig> {
        let mut config = SiteConfig::default();

        for file_path in self.find_config_files() {
            match ConfigParser::parse_file(&file_path) {
                Ok(directives) => {
                    tracing::debug!(path = %file_path.display(), count = directives.len(), "applying site config");
                    config.apply_all(directives);
                }
                Err(e) => tracing::warn!(path = %file_path.display(), error = %e, "skipping site config"),
            }
        }

        Ok(config)
    }

    /// Existing config files, lowest priority first
    fn find_config_files(&self) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        for dir in [&self.standard_dir, &self.custom_dir].into_iter().flatten() {
            let file_path = dir.join(SITE_FILE);
            if file_path.exists() && !config_files.contains(&file_path) {
                config_files.push(file_path);
            }
        }

        config_files
    }

    pub fn custom_dir(&self) -> Option<&Path> {
        self.custom_dir.as_deref()
    }

    /// Get default custom config directory (`<config dir>/bandbbs`)
    fn default_custom_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bandbbs"))
    }

    /// Get default standard config directory (bundled next to the binary's working dir)
    fn default_standard_dir() -> Option<PathBuf> {
        let std_dir = PathBuf::from("site_configs");
        if std_dir.exists() { Some(std_dir) } else { None }
    }
}

/// Builder for ConfigLoader
#[derive(Debug, Default)]
pub struct ConfigLoaderBuilder {
    custom_dir: Option<PathBuf>,
    standard_dir: Option<PathBuf>,
}

impl ConfigLoaderBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None }
    }

    /// Set custom config directory
    pub fn custom_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set standard config directory
    pub fn standard_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.standard_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the ConfigLoader
    pub fn build(self) -> ConfigLoader {
        ConfigLoader { custom_dir: self.custom_dir, standard_dir: self.standard_dir }
    }
}
